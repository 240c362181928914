use std::time::Duration;

use reqwest::Client;
use tracing::{error, info, warn};
use vigia_core::{
    Article, ConfigProvider, CredentialProvider, DbCredentials, Notifier, Result, RunStatus,
    RunSummary, StoreFactory,
};

use crate::dedup::dedup_by_url;
use crate::sources::{default_sources, NewsSource};

/// Fixed keyword expression every source is queried with.
pub const QUERY: &str = "virus OR gripe OR influenza OR epidemia OR brote";

/// Configuration parameters a run cannot start without.
pub const REQUIRED_CONFIG: &[&str] = &[
    "gnews-key",
    "newsapi-key",
    "newsdata-key",
    "recipient-email",
];

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// One run: fetch every source in order, normalize, deduplicate,
/// persist, and notify about whatever turned out to be new. Stateless
/// between runs; everything durable lives behind the store.
pub struct Pipeline {
    config: Box<dyn ConfigProvider>,
    credentials: Box<dyn CredentialProvider>,
    stores: Box<dyn StoreFactory>,
    notifier: Box<dyn Notifier>,
    sources: Vec<Box<dyn NewsSource>>,
    client: Client,
}

impl Pipeline {
    pub fn new(
        config: Box<dyn ConfigProvider>,
        credentials: Box<dyn CredentialProvider>,
        stores: Box<dyn StoreFactory>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self> {
        Self::with_sources(config, credentials, stores, notifier, default_sources())
    }

    pub fn with_sources(
        config: Box<dyn ConfigProvider>,
        credentials: Box<dyn CredentialProvider>,
        stores: Box<dyn StoreFactory>,
        notifier: Box<dyn Notifier>,
        sources: Vec<Box<dyn NewsSource>>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            config,
            credentials,
            stores,
            notifier,
            sources,
            client,
        })
    }

    pub async fn run(&self) -> RunSummary {
        info!("starting news collection run");

        let config = match self.config.get(REQUIRED_CONFIG).await {
            Ok(config) => config,
            Err(e) => {
                error!("configuration could not be loaded: {}", e);
                return RunSummary::failed(
                    RunStatus::ConfigFailed,
                    format!("configuration could not be loaded: {}", e),
                );
            }
        };

        let credentials = match self.credentials.get().await {
            Ok(credentials) => credentials,
            Err(e) => {
                error!("database credentials could not be loaded: {}", e);
                return RunSummary::failed(
                    RunStatus::CredentialsFailed,
                    format!("database credentials could not be loaded: {}", e),
                );
            }
        };

        let mut collected = Vec::new();
        for source in &self.sources {
            let api_key = config
                .get(source.config_key())
                .map(String::as_str)
                .unwrap_or_default();
            let articles = source.fetch(&self.client, api_key, QUERY).await;
            info!("{} contributed {} articles", source.name(), articles.len());
            collected.extend(articles);
        }

        let unique = dedup_by_url(collected);
        info!("{} unique articles found", unique.len());

        let mut new_articles = Vec::new();
        if !unique.is_empty() {
            match self.persist(&credentials, &unique).await {
                Ok(stored) => new_articles = stored,
                Err(e) => warn!("persistence failed, nothing stored this run: {}", e),
            }
        }

        let recipient = config
            .get("recipient-email")
            .map(String::as_str)
            .unwrap_or_default();
        if new_articles.is_empty() {
            info!("no new articles, skipping notification");
        } else if recipient.is_empty() {
            info!("no recipient configured, skipping notification");
        } else if let Err(e) = self.notifier.notify(recipient, &new_articles).await {
            warn!("notification failed: {}", e);
        }

        RunSummary {
            status: RunStatus::Completed,
            unique_count: unique.len(),
            new_count: new_articles.len(),
            message: format!(
                "run completed: {} unique articles, {} newly stored",
                unique.len(),
                new_articles.len()
            ),
        }
    }

    async fn persist(
        &self,
        credentials: &DbCredentials,
        articles: &[Article],
    ) -> Result<Vec<Article>> {
        // Store lives exactly as long as this call; the connection is
        // released on both the success and the failure path.
        let store = self.stores.connect(credentials).await?;
        let new_articles = store.store_batch(articles).await?;
        info!("{} new articles stored", new_articles.len());
        Ok(new_articles)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use vigia_core::{ArticleStore, Error};
    use vigia_storage::MemoryStore;

    use super::*;

    struct StaticConfig(HashMap<String, String>);

    impl StaticConfig {
        fn full() -> Self {
            let mut map = HashMap::new();
            map.insert("gnews-key".to_string(), "k1".to_string());
            map.insert("newsapi-key".to_string(), "k2".to_string());
            map.insert("newsdata-key".to_string(), "k3".to_string());
            map.insert(
                "recipient-email".to_string(),
                "alerts@example.com".to_string(),
            );
            Self(map)
        }

        fn without(name: &str) -> Self {
            let mut config = Self::full();
            config.0.remove(name);
            config
        }
    }

    #[async_trait]
    impl ConfigProvider for StaticConfig {
        async fn get(&self, names: &[&str]) -> Result<HashMap<String, String>> {
            let mut out = HashMap::new();
            for name in names {
                match self.0.get(*name) {
                    Some(value) => {
                        out.insert(name.to_string(), value.clone());
                    }
                    None => return Err(Error::Config(name.to_string())),
                }
            }
            Ok(out)
        }
    }

    struct StaticCredentials;

    #[async_trait]
    impl CredentialProvider for StaticCredentials {
        async fn get(&self) -> Result<DbCredentials> {
            Ok(DbCredentials {
                host: "localhost".to_string(),
                username: "postgres".to_string(),
                password: String::new(),
                port: 5432,
            })
        }
    }

    struct FailingCredentials;

    #[async_trait]
    impl CredentialProvider for FailingCredentials {
        async fn get(&self) -> Result<DbCredentials> {
            Err(Error::Credentials("secrets manager unreachable".to_string()))
        }
    }

    struct FixedSource {
        name: &'static str,
        key: &'static str,
        articles: Vec<Article>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl NewsSource for FixedSource {
        fn name(&self) -> &str {
            self.name
        }

        fn config_key(&self) -> &str {
            self.key
        }

        async fn fetch(&self, _client: &Client, _api_key: &str, _query: &str) -> Vec<Article> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.articles.clone()
        }
    }

    struct FailingFactory;

    #[async_trait]
    impl StoreFactory for FailingFactory {
        async fn connect(&self, _credentials: &DbCredentials) -> Result<Box<dyn ArticleStore>> {
            Err(Error::Persistence("connection refused".to_string()))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        deliveries: Arc<Mutex<Vec<(String, Vec<Article>)>>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, recipient: &str, articles: &[Article]) -> Result<()> {
            self.deliveries
                .lock()
                .unwrap()
                .push((recipient.to_string(), articles.to_vec()));
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _recipient: &str, _articles: &[Article]) -> Result<()> {
            Err(Error::Notification("transport rejected message".to_string()))
        }
    }

    fn article(url: &str, title: &str, description: &str) -> Article {
        Article {
            title: title.to_string(),
            description: description.to_string(),
            url: url.to_string(),
            source: "test".to_string(),
            published_at: "2024-03-01T10:00:00Z".to_string(),
        }
    }

    struct Scenario {
        sources: Vec<Box<dyn NewsSource>>,
        calls: Vec<Arc<AtomicUsize>>,
    }

    fn three_sources(
        a: Vec<Article>,
        b: Vec<Article>,
        c: Vec<Article>,
    ) -> Scenario {
        let counters: Vec<Arc<AtomicUsize>> =
            (0..3).map(|_| Arc::new(AtomicUsize::new(0))).collect();
        let sources: Vec<Box<dyn NewsSource>> = vec![
            Box::new(FixedSource {
                name: "GNews",
                key: "gnews-key",
                articles: a,
                calls: counters[0].clone(),
            }),
            Box::new(FixedSource {
                name: "NewsAPI",
                key: "newsapi-key",
                articles: b,
                calls: counters[1].clone(),
            }),
            Box::new(FixedSource {
                name: "Newsdata.io",
                key: "newsdata-key",
                articles: c,
                calls: counters[2].clone(),
            }),
        ];
        Scenario {
            sources,
            calls: counters,
        }
    }

    #[tokio::test]
    async fn test_end_to_end_novelty_and_idempotence() {
        // A and B report the same url with different content, C is
        // empty. B is queried after A, so B's version must win.
        let scenario = three_sources(
            vec![article("http://x/1", "shared title", "A description")],
            vec![article("http://x/1", "shared title", "B description")],
            vec![],
        );
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::default();

        let pipeline = Pipeline::with_sources(
            Box::new(StaticConfig::full()),
            Box::new(StaticCredentials),
            Box::new(store.clone()),
            Box::new(notifier.clone()),
            scenario.sources,
        )
        .unwrap();

        let first = pipeline.run().await;
        assert_eq!(first.status_code(), 200);
        assert_eq!(first.unique_count, 1);
        assert_eq!(first.new_count, 1);

        let stored = store.list_articles().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].description, "B description");

        {
            let deliveries = notifier.deliveries.lock().unwrap();
            assert_eq!(deliveries.len(), 1);
            assert_eq!(deliveries[0].0, "alerts@example.com");
            assert_eq!(deliveries[0].1[0].description, "B description");
        }

        // Identical input the second time around: nothing is new and
        // the notifier stays quiet.
        let second = pipeline.run().await;
        assert_eq!(second.status_code(), 200);
        assert_eq!(second.unique_count, 1);
        assert_eq!(second.new_count, 0);
        assert_eq!(notifier.deliveries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_config_key_fails_before_any_fetch() {
        let scenario = three_sources(
            vec![article("http://x/1", "t", "d")],
            vec![],
            vec![],
        );
        let calls = scenario.calls.clone();

        let pipeline = Pipeline::with_sources(
            Box::new(StaticConfig::without("newsdata-key")),
            Box::new(StaticCredentials),
            Box::new(MemoryStore::new()),
            Box::new(RecordingNotifier::default()),
            scenario.sources,
        )
        .unwrap();

        let summary = pipeline.run().await;
        assert_eq!(summary.status, RunStatus::ConfigFailed);
        assert_eq!(summary.status_code(), 500);
        for counter in calls {
            assert_eq!(counter.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_credential_failure_is_terminal() {
        let scenario = three_sources(vec![], vec![], vec![]);

        let pipeline = Pipeline::with_sources(
            Box::new(StaticConfig::full()),
            Box::new(FailingCredentials),
            Box::new(MemoryStore::new()),
            Box::new(RecordingNotifier::default()),
            scenario.sources,
        )
        .unwrap();

        let summary = pipeline.run().await;
        assert_eq!(summary.status, RunStatus::CredentialsFailed);
        assert_eq!(summary.status_code(), 500);
    }

    #[tokio::test]
    async fn test_persistence_failure_degrades_to_zero_new() {
        let scenario = three_sources(
            vec![article("http://x/1", "t", "d")],
            vec![],
            vec![],
        );
        let notifier = RecordingNotifier::default();

        let pipeline = Pipeline::with_sources(
            Box::new(StaticConfig::full()),
            Box::new(StaticCredentials),
            Box::new(FailingFactory),
            Box::new(notifier.clone()),
            scenario.sources,
        )
        .unwrap();

        let summary = pipeline.run().await;
        assert_eq!(summary.status_code(), 200);
        assert_eq!(summary.unique_count, 1);
        assert_eq!(summary.new_count, 0);
        assert!(notifier.deliveries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_the_run() {
        let scenario = three_sources(
            vec![article("http://x/1", "t", "d")],
            vec![],
            vec![],
        );

        let pipeline = Pipeline::with_sources(
            Box::new(StaticConfig::full()),
            Box::new(StaticCredentials),
            Box::new(MemoryStore::new()),
            Box::new(FailingNotifier),
            scenario.sources,
        )
        .unwrap();

        let summary = pipeline.run().await;
        assert_eq!(summary.status_code(), 200);
        assert_eq!(summary.new_count, 1);
    }

    #[tokio::test]
    async fn test_empty_recipient_skips_notification() {
        let mut config = StaticConfig::full();
        config
            .0
            .insert("recipient-email".to_string(), String::new());
        let scenario = three_sources(
            vec![article("http://x/1", "t", "d")],
            vec![],
            vec![],
        );
        let notifier = RecordingNotifier::default();

        let pipeline = Pipeline::with_sources(
            Box::new(config),
            Box::new(StaticCredentials),
            Box::new(MemoryStore::new()),
            Box::new(notifier.clone()),
            scenario.sources,
        )
        .unwrap();

        let summary = pipeline.run().await;
        assert_eq!(summary.status_code(), 200);
        assert_eq!(summary.new_count, 1);
        assert!(notifier.deliveries.lock().unwrap().is_empty());
    }
}
