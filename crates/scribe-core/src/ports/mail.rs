//! Outgoing mail port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A plain-text email ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

/// Mail transport - abstraction over SMTP relays, HTTP mail APIs, or logs.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand one message to the transport. No retries are attempted.
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}

/// Mail transport errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail transport unreachable: {0}")]
    Transport(String),

    #[error("Mail rejected by relay: {0}")]
    Rejected(String),
}
