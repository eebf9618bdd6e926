use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use relay_core::config::Config as CoreConfig;
use relay_service::config::{ContactConfig, GeminiConfig, RelayConfig, SmtpConfig};
use relay_service::services::providers::{
    ChatProvider, EmailProvider, GeminiClient, MockEmailProvider,
};
use relay_service::startup::{AppState, Application};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

/// Configuration for tests: random port, SMTP disabled, Gemini pointed at
/// the given base URL.
pub fn test_config(api_base: &str, api_key: &str) -> RelayConfig {
    RelayConfig {
        common: CoreConfig { port: 0 },
        gemini: GeminiConfig {
            api_key: api_key.to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_base: api_base.to_string(),
        },
        smtp: SmtpConfig {
            host: "smtp.test.local".to_string(),
            port: 587,
            user: "test".to_string(),
            password: "test".to_string(),
            enabled: false,
        },
        contact: ContactConfig {
            recipient: "owner@example.com".to_string(),
        },
    }
}

impl TestApp {
    /// Spawn the relay with an injected email provider.
    pub async fn spawn_with(config: RelayConfig, email_provider: Arc<dyn EmailProvider>) -> Self {
        let chat_provider: Arc<dyn ChatProvider> = Arc::new(
            GeminiClient::new(config.gemini.clone()).expect("Failed to create Gemini client"),
        );

        let state = AppState {
            config,
            chat_provider,
            email_provider,
        };

        let app = Application::build_with_state(state)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }

    /// Spawn with defaults: recording email mock, unreachable Gemini base.
    pub async fn spawn() -> Self {
        Self::spawn_with(
            test_config("http://127.0.0.1:9", "test-key"),
            Arc::new(MockEmailProvider::new()),
        )
        .await
    }
}

#[derive(Clone)]
enum UpstreamBehavior {
    Fixed { status: StatusCode, body: Value },
    Echo,
}

#[derive(Clone)]
struct UpstreamState {
    behavior: UpstreamBehavior,
    hits: Arc<AtomicU64>,
    requests: Arc<Mutex<Vec<Value>>>,
}

/// Stand-in for the Gemini API. Records every request body it receives and
/// answers either with a canned response or by echoing the request back.
pub struct MockUpstream {
    pub base_url: String,
    hits: Arc<AtomicU64>,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockUpstream {
    pub async fn spawn(status: StatusCode, body: Value) -> Self {
        Self::spawn_inner(UpstreamBehavior::Fixed { status, body }).await
    }

    pub async fn spawn_echo() -> Self {
        Self::spawn_inner(UpstreamBehavior::Echo).await
    }

    async fn spawn_inner(behavior: UpstreamBehavior) -> Self {
        let state = UpstreamState {
            behavior,
            hits: Arc::new(AtomicU64::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        // The generate-content path keeps model and method in one segment
        // ("gemini-2.0-flash:generateContent"), so a single capture matches.
        let app = Router::new()
            .route("/models/:call", post(handle_generate))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock upstream listener");
        let port = listener
            .local_addr()
            .expect("Failed to read mock upstream address")
            .port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        MockUpstream {
            base_url: format!("http://127.0.0.1:{}", port),
            hits: state.hits,
            requests: state.requests,
        }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle_generate(
    State(state): State<UpstreamState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.requests.lock().unwrap().push(body.clone());

    match &state.behavior {
        UpstreamBehavior::Fixed { status, body } => (*status, Json(body.clone())),
        UpstreamBehavior::Echo => (StatusCode::OK, Json(body)),
    }
}
