use async_trait::async_trait;
use reqwest::Client;
use vigia_core::Article;

pub mod gnews;
pub mod newsapi;
pub mod newsdata;

pub use gnews::GNewsSource;
pub use newsapi::NewsApiSource;
pub use newsdata::NewsDataSource;

/// One external news-search API. A fetch failure of any kind degrades to
/// an empty contribution for the run; errors never cross this boundary.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Label used in diagnostics.
    fn name(&self) -> &str;

    /// Configuration parameter holding this source's API key.
    fn config_key(&self) -> &str;

    /// Perform one bounded search query and normalize the results.
    async fn fetch(&self, client: &Client, api_key: &str, query: &str) -> Vec<Article>;
}

/// The three production adapters, in the fixed order the pipeline queries
/// them. The deduplicator's last-writer-wins tie-break depends on this
/// order staying stable.
pub fn default_sources() -> Vec<Box<dyn NewsSource>> {
    vec![
        Box::new(GNewsSource::new()),
        Box::new(NewsApiSource::new()),
        Box::new(NewsDataSource::new()),
    ]
}
