use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::error::{HubError, HubResult};

const ALERT_TIMEOUT: Duration = Duration::from_secs(10);

/// Webhook message body
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub content: String,
}

impl Message {
    pub fn new(content: impl ToString) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

/// Outbound, best-effort notification channel
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `content` once. Errors are reported, never retried.
    async fn notify(&self, content: &str) -> HubResult<()>;
}

/// Posts alerts to a Discord webhook
#[derive(Debug, Clone)]
pub struct DiscordManager {
    client: Client,
    url: Option<String>,
}

impl DiscordManager {
    /// Without a webhook URL every alert is skipped with a log line.
    pub fn new(url: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(ALERT_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self { client, url }
    }

    #[instrument(skip(self, message))]
    pub async fn send_message(&self, message: &Message) -> HubResult<()> {
        let Some(url) = &self.url else {
            warn!("no Discord webhook configured, dropping alert: {}", message.content);
            return Ok(());
        };

        let body = serde_json::to_vec(message).map_err(HubError::Serialization)?;

        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        info!("Discord webhook POST response status: {}", response.status());
        Ok(())
    }
}

#[async_trait]
impl Notifier for DiscordManager {
    async fn notify(&self, content: &str) -> HubResult<()> {
        let result = self.send_message(&Message::new(content)).await;
        if let Err(e) = &result {
            error!("failed to send Discord message: {e}");
        }
        result
    }
}
