use super::{EmailEnvelope, EmailProvider, ProviderError};
use crate::config::SmtpConfig;
use crate::services::metrics::record_provider_call;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// SMTP email provider backed by lettre's async STARTTLS transport.
pub struct SmtpProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpProvider {
    pub fn new(config: &SmtpConfig) -> Result<Self, ProviderError> {
        let creds = Credentials::new(config.user.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to create SMTP relay: {}", e))
            })?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, envelope: &EmailEnvelope) -> Result<(), ProviderError> {
        let from: Mailbox = envelope
            .from
            .parse()
            .map_err(|e| ProviderError::Configuration(format!("Invalid from address: {}", e)))?;

        let to: Mailbox = envelope
            .to
            .parse()
            .map_err(|e| ProviderError::InvalidRecipient(format!("Invalid recipient: {}", e)))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(envelope.subject.clone())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(envelope.body_text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(envelope.body_html.clone()),
                    ),
            )
            .map_err(|e| ProviderError::SendFailed(format!("Failed to build message: {}", e)))?;

        self.transport.send(message).await.map_err(|e| {
            record_provider_call("smtp", "error");
            ProviderError::SendFailed(format!("Failed to send email: {}", e))
        })?;

        record_provider_call("smtp", "ok");
        tracing::info!(
            to = %envelope.to,
            subject = %envelope.subject,
            "Email sent successfully"
        );

        Ok(())
    }
}

/// Mock email provider used when SMTP is disabled and in tests. Records every
/// envelope it accepts; can be constructed in a failing mode.
#[derive(Default)]
pub struct MockEmailProvider {
    fail: bool,
    send_count: AtomicU64,
    sent: Mutex<Vec<EmailEnvelope>>,
}

impl MockEmailProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that rejects every dispatch, for failure-path testing.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Number of dispatch attempts, including rejected ones.
    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }

    /// Envelopes accepted so far.
    pub fn sent(&self) -> Vec<EmailEnvelope> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EmailProvider for MockEmailProvider {
    async fn send(&self, envelope: &EmailEnvelope) -> Result<(), ProviderError> {
        self.send_count.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(ProviderError::SendFailed(
                "Mock transport rejected the message".to_string(),
            ));
        }

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(envelope.clone());
        }

        tracing::info!(
            to = %envelope.to,
            subject = %envelope.subject,
            "[MOCK] Email would be sent"
        );

        Ok(())
    }
}
