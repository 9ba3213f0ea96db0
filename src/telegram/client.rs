//! Outbound Bot API client.

use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::types::Update;
use crate::{NewsError, Result};

const API_BASE: &str = "https://api.telegram.org";

/// Slack on top of the long-poll timeout before the request itself times out.
const POLL_GRACE_SECS: u64 = 10;

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

/// Options for one outgoing message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Send with `parse_mode=HTML`.
    pub html: bool,
    pub disable_link_preview: bool,
}

/// Delivers replies to a chat.
pub trait MessageSender: Send + Sync {
    fn send_message<'a>(
        &'a self,
        chat_id: i64,
        text: &'a str,
        options: SendOptions,
    ) -> BoxFuture<'a, Result<()>>;
}

/// Telegram Bot API client
pub struct TelegramClient {
    client: Client,
    bot_token: String,
    api_base: String,
}

impl TelegramClient {
    pub fn new(client: Client, bot_token: impl Into<String>) -> Self {
        Self {
            client,
            bot_token: bot_token.into(),
            api_base: API_BASE.to_string(),
        }
    }

    /// Point the client at a different API host.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }

    async fn post_send_message(&self, chat_id: i64, text: &str, options: SendOptions) -> Result<()> {
        let resp = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&send_message_body(chat_id, text, options))
            .send()
            .await
            .map_err(|e| NewsError::Telegram(format!("sendMessage request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(NewsError::Telegram(format!(
                "sendMessage returned {status}: {error_text}"
            )));
        }

        Ok(())
    }

    /// Long-poll for updates with `update_id >= offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        let body = json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        let updates: Option<Vec<Update>> = self
            .call("getUpdates", &body, Duration::from_secs(timeout_secs + POLL_GRACE_SECS))
            .await?;
        Ok(updates.unwrap_or_default())
    }

    /// Remove any webhook so `getUpdates` is allowed.
    pub async fn delete_webhook(&self) -> Result<()> {
        let _: Option<bool> = self
            .call("deleteWebhook", &json!({}), Duration::from_secs(POLL_GRACE_SECS))
            .await?;
        Ok(())
    }

    async fn call<T>(&self, method: &str, body: &Value, timeout: Duration) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let resp = self
            .client
            .post(self.method_url(method))
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| NewsError::Telegram(format!("{method} request failed: {e}")))?;

        let status = resp.status();
        let parsed: ApiResponse<T> = resp
            .json()
            .await
            .map_err(|e| NewsError::Telegram(format!("{method} returned {status}: {e}")))?;

        if !parsed.ok {
            return Err(NewsError::Telegram(format!(
                "{method} returned {status}: {}",
                parsed.description.unwrap_or_default()
            )));
        }
        Ok(parsed.result)
    }
}

impl MessageSender for TelegramClient {
    fn send_message<'a>(
        &'a self,
        chat_id: i64,
        text: &'a str,
        options: SendOptions,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.post_send_message(chat_id, text, options))
    }
}

fn send_message_body(chat_id: i64, text: &str, options: SendOptions) -> Value {
    let mut body = json!({
        "chat_id": chat_id,
        "text": text,
    });
    if options.html {
        body["parse_mode"] = json!("HTML");
    }
    if options.disable_link_preview {
        body["disable_web_page_preview"] = json!(true);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let client = TelegramClient::new(Client::new(), "123:abc");
        assert_eq!(
            client.method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );

        let client = client.with_api_base("http://127.0.0.1:8081/");
        assert_eq!(
            client.method_url("sendMessage"),
            "http://127.0.0.1:8081/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_body_plain() {
        let body = send_message_body(10, "hi", SendOptions::default());
        assert_eq!(body, json!({"chat_id": 10, "text": "hi"}));
    }

    #[test]
    fn test_body_html_without_preview() {
        let options = SendOptions {
            html: true,
            disable_link_preview: true,
        };
        let body = send_message_body(10, "<b>hi</b>", options);
        assert_eq!(body["parse_mode"], "HTML");
        assert_eq!(body["disable_web_page_preview"], true);
    }

    #[test]
    fn test_api_response_envelope() {
        let ok: ApiResponse<Vec<Update>> = serde_json::from_value(json!({
            "ok": true,
            "result": [{"update_id": 7, "message": {"message_id": 1, "chat": {"id": 5}, "text": "/news"}}]
        }))
        .unwrap();
        assert!(ok.ok);
        assert_eq!(ok.result.unwrap()[0].update_id, 7);

        let failed: ApiResponse<Vec<Update>> = serde_json::from_value(json!({
            "ok": false,
            "error_code": 409,
            "description": "Conflict: can't use getUpdates method while webhook is active"
        }))
        .unwrap();
        assert!(!failed.ok);
        assert!(failed.result.is_none());
        assert!(failed.description.unwrap().contains("webhook is active"));
    }

    #[tokio::test]
    async fn test_get_updates_from_unreachable_api_fails() {
        let client = TelegramClient::new(Client::new(), "t").with_api_base("http://127.0.0.1:9");
        let err = client.get_updates(0, 1).await.unwrap_err();
        assert!(matches!(err, NewsError::Telegram(msg) if msg.contains("getUpdates")));
    }

    #[tokio::test]
    async fn test_send_to_unreachable_api_fails() {
        let client = TelegramClient::new(Client::new(), "t").with_api_base("http://127.0.0.1:9");
        let err = client
            .send_message(1, "hi", SendOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::Telegram(_)));
    }
}
