pub mod chat;
pub mod contact;

pub use chat::{ChatPart, ChatRequest, ChatTurn};
pub use contact::{ContactMessage, SenderType};
