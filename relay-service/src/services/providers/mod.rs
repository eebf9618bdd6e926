//! Outbound provider abstractions and implementations.
//!
//! The relay talks to exactly two third parties: the Gemini generate-content
//! API and an SMTP transport. Both sit behind traits so tests can substitute
//! recording or failing stand-ins.

pub mod email;
pub mod gemini;

use crate::models::ChatTurn;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use email::{MockEmailProvider, SmtpProvider};
pub use gemini::GeminiClient;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// The upstream answered with a non-success status; its body is relayed
    /// to the caller along with the original status code.
    #[error("Upstream error {status}")]
    Upstream { status: u16, body: Value },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Send error: {0}")]
    SendFailed(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Fully composed email message ready for dispatch.
#[derive(Debug, Clone)]
pub struct EmailEnvelope {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: String,
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Forward a conversation history and return the upstream JSON body
    /// unmodified. The whole response is buffered; no streaming.
    async fn generate(&self, history: &[ChatTurn]) -> Result<Value, ProviderError>;
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Dispatch the envelope once. No retry on failure.
    async fn send(&self, envelope: &EmailEnvelope) -> Result<(), ProviderError>;
}
