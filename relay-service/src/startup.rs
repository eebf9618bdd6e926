//! Application startup and lifecycle management.
//!
//! Builds the provider set from configuration, wires the HTTP router, and
//! owns the server future. Tests build with injected providers.

use crate::config::RelayConfig;
use crate::handlers;
use crate::services::providers::{
    ChatProvider, EmailProvider, GeminiClient, MockEmailProvider, SmtpProvider,
};
use axum::{
    routing::{get, post},
    Router,
};
use relay_core::error::AppError;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state. Read-only after startup; handlers never mutate
/// it, so requests need no synchronization beyond the Arc clones.
#[derive(Clone)]
pub struct AppState {
    pub config: RelayConfig,
    pub chat_provider: Arc<dyn ChatProvider>,
    pub email_provider: Arc<dyn EmailProvider>,
}

impl AppState {
    /// Build the provider set from configuration.
    pub fn from_config(config: RelayConfig) -> Result<Self, AppError> {
        let chat_provider: Arc<dyn ChatProvider> = Arc::new(
            GeminiClient::new(config.gemini.clone())
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e.to_string())))?,
        );

        let email_provider: Arc<dyn EmailProvider> = if config.smtp.enabled {
            match SmtpProvider::new(&config.smtp) {
                Ok(provider) => {
                    tracing::info!("SMTP email provider initialized");
                    Arc::new(provider)
                }
                Err(e) => {
                    tracing::warn!("Failed to initialize SMTP provider: {}. Using mock.", e);
                    Arc::new(MockEmailProvider::new())
                }
            }
        } else {
            tracing::info!("SMTP provider disabled, using mock email provider");
            Arc::new(MockEmailProvider::new())
        };

        Ok(Self {
            config,
            chat_provider,
            email_provider,
        })
    }
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(config)?;
        Self::build_with_state(state).await
    }

    /// Build with a pre-assembled state; tests use this to inject providers.
    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        let app = router(state.clone());

        // Port 0 = random port for testing.
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

/// Route table: the two relays plus infrastructure probes. CORS is
/// deliberately permissive; the frontend may be served from any origin.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/api/chat", post(handlers::relay_chat))
        .route("/api/send-email", post(handlers::send_contact_email))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
