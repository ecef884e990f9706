use async_trait::async_trait;

use scribe_core::ports::{EmailMessage, MailError, Mailer};
use scribe_core::text::mask_email;

/// Development transport: writes each message to the log instead of
/// delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        let recipients: Vec<String> = message.to.iter().map(|to| mask_email(to)).collect();

        tracing::info!(
            from = %message.from,
            to = ?recipients,
            subject = %message.subject,
            "Outgoing mail (log transport)\n{}",
            message.body
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_accepts_messages() {
        let message = EmailMessage {
            subject: "Hi".to_string(),
            body: "Body".to_string(),
            from: "blog@example.com".to_string(),
            to: vec!["reader@example.com".to_string()],
        };

        assert!(LogMailer.send(message).await.is_ok());
    }
}
