use async_trait::async_trait;

use crate::config::DbCredentials;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Insert a deduplicated batch as one atomic unit of work and return
    /// the articles that were not previously stored. An article whose url
    /// already exists is skipped without touching the existing row.
    async fn store_batch(&self, articles: &[Article]) -> Result<Vec<Article>>;

    /// Full stored article set, newest first.
    async fn list_articles(&self) -> Result<Vec<Article>>;
}

/// Opens a store from database credentials. The pipeline goes through
/// this seam so the connection lives exactly as long as one run.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    async fn connect(&self, credentials: &DbCredentials) -> Result<Box<dyn ArticleStore>>;
}
