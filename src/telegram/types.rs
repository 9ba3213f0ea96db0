//! Subset of the Telegram Bot API update schema.

use serde::{Deserialize, Serialize};

/// An incoming update delivered to the webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Message sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

impl Update {
    /// Chat id and text of a text message, if this update carries one.
    pub fn text_message(&self) -> Option<(i64, &str)> {
        let message = self.message.as_ref()?;
        let text = message.text.as_deref()?;
        Some((message.chat.id, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_text_update() {
        let json = r#"{
            "update_id": 42,
            "message": {
                "message_id": 7,
                "date": 1729000000,
                "chat": {"id": 1001, "type": "private"},
                "from": {"id": 5, "is_bot": false, "first_name": "Ada", "username": "ada", "language_code": "en"},
                "text": "/news coindesk 2"
            }
        }"#;

        let update: Update = serde_json::from_str(json).unwrap();
        assert_eq!(update.update_id, 42);
        assert_eq!(update.text_message(), Some((1001, "/news coindesk 2")));

        let from = update.message.unwrap().from.unwrap();
        assert_eq!(from.username.as_deref(), Some("ada"));
        assert_eq!(from.last_name, None);
    }

    #[test]
    fn test_non_text_update() {
        let json = r#"{"update_id": 1, "message": {"message_id": 2, "chat": {"id": 3}, "sticker": {}}}"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert!(update.text_message().is_none());

        let update: Update = serde_json::from_str(r#"{"update_id": 9}"#).unwrap();
        assert!(update.text_message().is_none());
    }
}
