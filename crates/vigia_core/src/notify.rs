use async_trait::async_trait;

use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a summary of newly stored articles to the recipient.
    /// Invoked at most once per run, with a non-empty batch.
    async fn notify(&self, recipient: &str, articles: &[Article]) -> Result<()>;
}
