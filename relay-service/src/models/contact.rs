use serde::{Deserialize, Deserializer};
use validator::Validate;

/// Contact-form submission from the frontend.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub company: Option<String>,
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub message: String,
    /// Free-form category chosen in the form (e.g. "Collaboration").
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub sender_type: SenderType,
}

/// Who is submitting the form. Anything other than the literal
/// "Organization", including an absent field, counts as Individual.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SenderType {
    Organization,
    #[default]
    Individual,
}

impl<'de> Deserialize<'de> for SenderType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "Organization" => SenderType::Organization,
            _ => SenderType::Individual,
        })
    }
}

impl SenderType {
    /// Label shown in front of the sender identity in the composed email.
    pub fn from_label(&self) -> &'static str {
        match self {
            SenderType::Organization => "From (Organization)",
            SenderType::Individual => "From (Individual)",
        }
    }
}
