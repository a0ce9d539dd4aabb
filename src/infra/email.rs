use anyhow::Result;
use async_trait::async_trait;

use crate::app::email::EmailSender;

/// Sender that records the dispatch in the log stream instead of talking to
/// a provider. Delivery guarantees are out of scope here; the real gateway
/// sits behind the same interface.
pub struct LogEmailSender {
    from: String,
}

impl LogEmailSender {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, to: &str, subject: &str, _text: &str, _html: &str) -> Result<()> {
        tracing::info!(from = %self.from, to, subject, "email dispatched");
        Ok(())
    }
}
