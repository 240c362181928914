use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use vigia_core::{Article, ArticleStore, DbCredentials, Result, StoreFactory};

/// In-memory store with the same insert-if-absent semantics as the
/// relational backend. `Clone` shares the underlying article set, which
/// is what tests and no-infrastructure runs rely on.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    articles: Arc<RwLock<Vec<Article>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn store_batch(&self, articles: &[Article]) -> Result<Vec<Article>> {
        let mut stored = self.articles.write().await;
        let mut new_articles = Vec::new();

        for article in articles {
            if stored.iter().any(|a| a.url == article.url) {
                continue;
            }
            stored.push(article.clone());
            new_articles.push(article.clone());
        }

        Ok(new_articles)
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        let stored = self.articles.read().await;
        Ok(stored.iter().rev().cloned().collect())
    }
}

#[async_trait]
impl StoreFactory for MemoryStore {
    async fn connect(&self, _credentials: &DbCredentials) -> Result<Box<dyn ArticleStore>> {
        Ok(Box::new(self.clone()))
    }
}
