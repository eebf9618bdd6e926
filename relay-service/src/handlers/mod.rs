pub mod chat;
pub mod contact;
pub mod health;

pub use chat::relay_chat;
pub use contact::send_contact_email;
pub use health::{health_check, metrics_endpoint, readiness_check};
