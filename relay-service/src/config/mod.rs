use relay_core::config::{self as core_config, get_env};
use relay_core::error::AppError;
use serde::Deserialize;
use std::env;

/// Public Gemini REST endpoint. Overridable so tests can point the relay at
/// a local stand-in server.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub gemini: GeminiConfig,
    pub smtp: SmtpConfig,
    pub contact: ContactConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactConfig {
    /// Address that receives contact-form mail (the site operator).
    pub recipient: String,
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = core_config::is_prod();

        Ok(RelayConfig {
            common,
            gemini: GeminiConfig {
                api_key: get_env("GEMINI_API_KEY", Some(""), is_prod)?,
                model: get_env("GEMINI_MODEL", Some(GEMINI_DEFAULT_MODEL), is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(GEMINI_API_BASE), is_prod)?,
            },
            smtp: SmtpConfig {
                host: get_env("SMTP_HOST", Some("smtp.gmail.com"), is_prod)?,
                port: get_env("SMTP_PORT", Some("587"), is_prod)?
                    .parse()
                    .unwrap_or(587),
                user: get_env("SMTP_USER", Some(""), is_prod)?,
                password: get_env("SMTP_PASSWORD", Some(""), is_prod)?,
                enabled: env::var("SMTP_ENABLED")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .unwrap_or(false),
            },
            contact: ContactConfig {
                recipient: get_env("CONTACT_RECIPIENT", Some("owner@example.com"), is_prod)?,
            },
        })
    }
}
