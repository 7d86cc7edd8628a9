//! Outgoing mail messages and the transports that deliver them.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::MailTransportKind;

/// A rendered plain-text mail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailMessage {
    pub id: Uuid,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Single-line header value; control characters such as CR and LF become spaces.
fn header_value(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

impl MailMessage {
    /// Render as an RFC 5322 message.
    pub fn to_eml(&self) -> String {
        let mut eml = String::new();
        eml.push_str(&format!("Message-ID: <{}@agency-catalog>\r\n", self.id));
        eml.push_str(&format!("Date: {}\r\n", self.created_at.to_rfc2822()));
        eml.push_str(&format!("From: {}\r\n", header_value(&self.from)));
        eml.push_str(&format!("To: {}\r\n", header_value(&self.to)));
        if let Some(ref reply_to) = self.reply_to {
            eml.push_str(&format!("Reply-To: {}\r\n", header_value(reply_to)));
        }
        eml.push_str(&format!("Subject: {}\r\n", header_value(&self.subject)));
        eml.push_str("MIME-Version: 1.0\r\n");
        eml.push_str("Content-Type: text/plain; charset=utf-8\r\n\r\n");
        eml.push_str(&self.body.replace('\n', "\r\n"));
        eml.push_str("\r\n");
        eml
    }
}

/// Errors raised while handing a message to a transport.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Relay request failed: {0}")]
    Relay(String),
}

/// Delivery channel for rendered messages.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Writes messages to the log.
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        info!(
            target: "mail",
            to = %message.to,
            subject = %message.subject,
            "\n{}",
            message.body
        );
        Ok(())
    }
}

/// Writes one `.eml` file per message.
pub struct OutboxTransport {
    dir: PathBuf,
}

impl OutboxTransport {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl MailTransport for OutboxTransport {
    fn name(&self) -> &'static str {
        "outbox"
    }

    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!(
            "{}-{}.eml",
            message.created_at.format("%Y%m%dT%H%M%S"),
            message.id
        ));
        tokio::fs::write(&path, message.to_eml()).await?;
        Ok(())
    }
}

/// POSTs messages as JSON to a mail relay.
pub struct HttpRelayTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpRelayTransport {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl MailTransport for HttpRelayTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.url)
            .json(message)
            .send()
            .await
            .map_err(|e| MailError::Relay(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Relay(format!("relay answered {}", status)));
        }
        Ok(())
    }
}

/// Build the configured transport.
pub fn build_transport(kind: &MailTransportKind) -> Arc<dyn MailTransport> {
    match kind {
        MailTransportKind::Log => Arc::new(LogTransport),
        MailTransportKind::Outbox(dir) => Arc::new(OutboxTransport::new(dir.clone())),
        MailTransportKind::Http(url) => Arc::new(HttpRelayTransport::new(url.clone())),
    }
}
