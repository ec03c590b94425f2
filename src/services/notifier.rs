//! Outbound share messages.
//!
//! Delivery is abstract: handlers build a [`Message`] per requested channel
//! and hand it to a [`Notifier`]. [`LogNotifier`] is the bundled
//! implementation and only records what would have been sent.

use std::fmt::Display;

use async_trait::async_trait;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Email,
    Sms,
    WhatsApp,
}

impl Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Email => write!(f, "email"),
            Channel::Sms => write!(f, "sms"),
            Channel::WhatsApp => write!(f, "whatsapp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub channel: Channel,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Share destinations supplied by a client; blank entries are ignored
#[derive(Debug, Clone, Default)]
pub struct Recipients {
    pub email: Option<String>,
    pub sms: Option<String>,
    pub whatsapp: Option<String>,
}

impl Recipients {
    /// One message per present destination
    pub fn messages(&self, subject: &str, body: &str) -> Vec<Message> {
        [
            (Channel::Email, &self.email),
            (Channel::WhatsApp, &self.whatsapp),
            (Channel::Sms, &self.sms),
        ]
        .into_iter()
        .filter_map(|(channel, to)| {
            to.as_deref()
                .map(str::trim)
                .filter(|to| !to.is_empty())
                .map(|to| Message {
                    channel,
                    to: to.to_string(),
                    subject: subject.to_string(),
                    body: body.to_string(),
                })
        })
        .collect()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: Message) -> AppResult<()>;
}

/// Writes messages to the log instead of delivering them
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: Message) -> AppResult<()> {
        tracing::info!(
            channel = %message.channel,
            to = %message.to,
            subject = %message.subject,
            body_len = message.body.len(),
            "Share message dispatched"
        );
        Ok(())
    }
}

/// Sends every message, stopping at the first failure
pub async fn dispatch(notifier: &dyn Notifier, messages: Vec<Message>) -> AppResult<usize> {
    let count = messages.len();
    for message in messages {
        notifier.send(message).await?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_messages_skip_blank_recipients() {
        let recipients = Recipients {
            email: Some("ada@example.com".into()),
            sms: Some("   ".into()),
            whatsapp: None,
        };
        let messages = recipients.messages("Subject", "Body");

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].channel, Channel::Email);
        assert_eq!(messages[0].to, "ada@example.com");
    }

    #[tokio::test]
    async fn test_dispatch_stops_on_failure() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send()
            .times(1)
            .returning(|_| Err(AppError::Notification("smtp down".into())));

        let recipients = Recipients {
            email: Some("a@b.co".into()),
            sms: Some("+15550100".into()),
            whatsapp: None,
        };
        let result = dispatch(&notifier, recipients.messages("s", "b")).await;
        assert!(matches!(result, Err(AppError::Notification(_))));
    }

    #[test]
    fn test_log_notifier_accepts_everything() {
        let recipients = Recipients {
            email: Some("a@b.co".into()),
            sms: Some("+15550100".into()),
            whatsapp: Some("+15550101".into()),
        };
        let sent = tokio_test::block_on(dispatch(&LogNotifier, recipients.messages("s", "b")));
        assert_eq!(sent.unwrap(), 3);
    }
}
