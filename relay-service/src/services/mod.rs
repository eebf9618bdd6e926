pub mod envelope;
pub mod metrics;
pub mod providers;

pub use envelope::compose_contact_email;
pub use metrics::{get_metrics, init_metrics, record_provider_call, record_relay_request};
pub use providers::{
    ChatProvider, EmailEnvelope, EmailProvider, GeminiClient, MockEmailProvider, ProviderError,
    SmtpProvider,
};
