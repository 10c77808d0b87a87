//! Discord client: the only module that talks to the Discord REST API.
//!
//! The bot receives commands over the HTTP interactions endpoint (see
//! `handlers`), so no gateway connection is held. Outgoing traffic is:
//! application lookup and command sync at startup, follow-up webhooks and
//! attachment downloads per invocation.
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::feedback::AttachmentFetcher;
use crate::models::Attachment;

pub mod channel;
pub mod commands;
pub mod handlers;
pub mod models;
pub mod signature;

use commands::CommandDefinition;
use models::{Application, MessagePayload};

pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Discord API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct DiscordErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisteredCommand {
    pub name: String,
}

#[derive(Clone)]
pub struct DiscordClient {
    client: Client,
    bot_token: String,
    api_base: String,
}

impl DiscordClient {
    pub fn new(bot_token: String, api_base: impl Into<String>) -> Result<Self, DiscordError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            bot_token,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("Authorization", format!("Bot {}", self.bot_token))
    }

    /// The application owning the bot token. Fails if the token is invalid.
    pub async fn current_application(&self) -> Result<Application, DiscordError> {
        let request = self
            .client
            .get(format!("{}/applications/@me", self.api_base));
        let response = check(self.authorized(request).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Overwrites the global command list. Safe to repeat on every startup.
    pub async fn sync_commands(
        &self,
        application_id: &str,
        commands: &[CommandDefinition],
    ) -> Result<Vec<RegisteredCommand>, DiscordError> {
        let request = self
            .client
            .put(format!(
                "{}/applications/{application_id}/commands",
                self.api_base
            ))
            .json(commands);
        let response = check(self.authorized(request).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Sends a follow-up message for an acknowledged interaction.
    pub async fn create_followup(
        &self,
        application_id: &str,
        interaction_token: &str,
        message: &MessagePayload,
    ) -> Result<(), DiscordError> {
        let response = self
            .client
            .post(format!(
                "{}/webhooks/{application_id}/{interaction_token}",
                self.api_base
            ))
            .json(message)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    pub async fn download(&self, url: &str) -> Result<Bytes, DiscordError> {
        let response = check(self.client.get(url).send().await?).await?;
        let bytes = response.bytes().await?;
        debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes)
    }
}

#[async_trait]
impl AttachmentFetcher for DiscordClient {
    async fn fetch(&self, attachment: &Attachment) -> anyhow::Result<Bytes> {
        self.download(&attachment.url)
            .await
            .with_context(|| format!("Failed to download attachment '{}'", attachment.filename))
    }
}

/// Turns a non-2xx response into `DiscordError::Api`.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, DiscordError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<DiscordErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body);
    Err(DiscordError::Api {
        status: status.as_u16(),
        message,
    })
}
