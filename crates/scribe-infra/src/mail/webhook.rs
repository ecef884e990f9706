use async_trait::async_trait;
use serde::Serialize;

use scribe_core::ports::{EmailMessage, MailError, Mailer};

/// Delivers mail by POSTing JSON to an HTTP mail relay.
///
/// The relay receives `{"from", "to", "subject", "text"}` and must answer
/// with a 2xx status; anything else is reported as a rejection.
pub struct WebhookMailer {
    url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    text: &'a str,
}

impl WebhookMailer {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for WebhookMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        let payload = RelayPayload {
            from: &message.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected(format!("{}: {}", status, detail)));
        }

        tracing::debug!(subject = %message.subject, "Mail handed to relay");
        Ok(())
    }
}
