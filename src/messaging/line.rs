use crate::messaging::MessagingClient;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

/// Reply-API client for the LINE Messaging API.
pub struct LineClient {
    http: reqwest::Client,
    channel_access_token: String,
    api_base: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl LineClient {
    pub fn new(channel_access_token: String, api_base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            channel_access_token,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn reply_endpoint(&self) -> String {
        format!("{}/v2/bot/message/reply", self.api_base)
    }
}

#[async_trait]
impl MessagingClient for LineClient {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<()> {
        let request = ReplyRequest {
            reply_token,
            messages: [TextMessage { kind: "text", text }],
        };

        let response = self
            .http
            .post(self.reply_endpoint())
            .bearer_auth(&self.channel_access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Messaging(format!("LINE API error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Messaging(format!(
                "LINE API returned {}: {}",
                status, body
            )));
        }

        debug!(chars = text.chars().count(), "Reply delivered");
        Ok(())
    }
}
