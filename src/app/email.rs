use anyhow::Result;
use async_trait::async_trait;

/// Outbound email collaborator. Delivery is fire-and-forget from the
/// lifecycle's point of view: a failed send is logged and never affects the
/// result of the mutation that triggered it.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, text: &str, html: &str) -> Result<()>;
}
