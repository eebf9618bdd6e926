use serde::{Deserialize, Serialize};

/// One message in a conversation, in the Gemini wire shape. Forwarded to the
/// provider exactly as received; order across a history is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub parts: Vec<ChatPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPart {
    pub text: String,
}

/// Inbound chat payload from the frontend.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub chat_history: Vec<ChatTurn>,
}
