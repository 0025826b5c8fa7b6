//! Contact-form acknowledgement mail.
//!
//! Messages go out through a JSON mail-sending API (Resend-compatible by default). Delivery is
//! a single request whose outcome is returned to the caller as a [`MailReceipt`] or a
//! [`MailError`]; nothing is retried.

mod template;

use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use template::{CONTACT_SUBJECT, contact_acknowledgement};

/// Errors returned by mail providers.
#[derive(Debug, Error)]
pub enum MailError {
    /// The provider answered but refused the message.
    #[error("{0}")]
    Rejected(String),
    /// The provider could not be reached or its reply was unreadable.
    #[error("{0}")]
    Transport(String),
}

/// An outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    /// `From` header, e.g. `Your Company <hello@example.org>`.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
}

/// Delivery metadata reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailReceipt {
    /// Provider-assigned message identifier, when one was returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Recipients the provider accepted.
    pub accepted: Vec<String>,
    /// Recipients the provider refused.
    pub rejected: Vec<String>,
}

/// Interface implemented by mail-sending backends.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Submit a message for delivery.
    async fn send(&self, message: MailMessage) -> Result<MailReceipt, MailError>;
}

/// Mailer posting to an HTTP mail API with bearer authentication.
pub struct HttpMailer {
    http: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Serialize)]
struct SendPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendResponse {
    id: Option<String>,
}

impl HttpMailer {
    /// Build a mailer from the shared configuration.
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        Self::new(config.mail_api_url.clone(), config.mail_api_key.clone())
    }

    /// Build a mailer for an explicit endpoint and key.
    pub fn new(endpoint: String, api_key: String) -> Result<Self, MailError> {
        let http = Client::builder()
            .user_agent("mediclarity/mail")
            .build()
            .map_err(|error| {
                MailError::Transport(format!("failed to construct HTTP client: {error}"))
            })?;
        Ok(Self {
            http,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: MailMessage) -> Result<MailReceipt, MailError> {
        let payload = SendPayload {
            from: &message.from,
            to: [message.to.as_str()],
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| MailError::Transport(format!("failed to reach mail API: {error}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected(provider_message(status, &body)));
        }

        let body: SendResponse = response
            .json()
            .await
            .map_err(|error| MailError::Transport(format!("unreadable mail API reply: {error}")))?;

        tracing::info!(message_id = ?body.id, "Mail accepted by provider");
        Ok(MailReceipt {
            message_id: body.id,
            accepted: vec![message.to],
            rejected: Vec::new(),
        })
    }
}

/// Pull the human-readable message out of a provider error body.
fn provider_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| format!("mail API returned {status}"))
}
