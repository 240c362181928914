use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection, Row};
use tokio::sync::Mutex;
use tracing::debug;
use vigia_core::{Article, ArticleStore, DbCredentials, Error, Result, StoreFactory};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        url TEXT NOT NULL UNIQUE,
        source TEXT,
        published_at TEXT,
        inserted_at TIMESTAMPTZ DEFAULT NOW()
    )
    "#,
    // Add future migrations here
];

/// Relational backend. Holds a single connection for the lifetime of one
/// run; dropping the store releases it on every exit path.
pub struct PostgresStore {
    conn: Mutex<PgConnection>,
}

impl PostgresStore {
    pub async fn connect(credentials: &DbCredentials, database: &str) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&credentials.host)
            .port(credentials.port)
            .username(&credentials.username)
            .password(&credentials.password)
            .database(database);

        let mut conn = options
            .connect()
            .await
            .map_err(|e| Error::Persistence(format!("failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&mut conn)
                .await
                .map_err(|e| Error::Persistence(format!("failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl ArticleStore for PostgresStore {
    async fn store_batch(&self, articles: &[Article]) -> Result<Vec<Article>> {
        let mut conn = self.conn.lock().await;
        let mut tx = conn
            .begin()
            .await
            .map_err(|e| Error::Persistence(format!("failed to begin transaction: {}", e)))?;

        // RETURNING only produces a row when the insert actually
        // happened, which is how a conflict-skipped article is told
        // apart from a new one. An error here drops the transaction
        // and rolls back the whole batch.
        let mut new_articles = Vec::new();
        for article in articles {
            let inserted = sqlx::query(
                "INSERT INTO articles (title, description, url, source, published_at) \
                 VALUES ($1, $2, $3, $4, $5) \
                 ON CONFLICT (url) DO NOTHING RETURNING url",
            )
            .bind(&article.title)
            .bind(&article.description)
            .bind(&article.url)
            .bind(&article.source)
            .bind(&article.published_at)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| Error::Persistence(format!("failed to insert article: {}", e)))?;

            if inserted.is_some() {
                new_articles.push(article.clone());
            } else {
                debug!("already stored, skipping: {}", article.url);
            }
        }

        tx.commit()
            .await
            .map_err(|e| Error::Persistence(format!("failed to commit batch: {}", e)))?;

        Ok(new_articles)
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        let mut conn = self.conn.lock().await;
        let rows = sqlx::query(
            "SELECT title, description, url, source, published_at \
             FROM articles ORDER BY inserted_at DESC",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| Error::Persistence(format!("failed to list articles: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| Article {
                title: row.get("title"),
                description: row.get::<Option<String>, _>("description").unwrap_or_default(),
                url: row.get("url"),
                source: row.get::<Option<String>, _>("source").unwrap_or_default(),
                published_at: row
                    .get::<Option<String>, _>("published_at")
                    .unwrap_or_default(),
            })
            .collect())
    }
}

/// Opens one [`PostgresStore`] per pipeline run.
#[derive(Debug, Clone)]
pub struct PostgresStoreFactory {
    database: String,
}

impl PostgresStoreFactory {
    pub fn new() -> Self {
        Self {
            database: "postgres".to_string(),
        }
    }

    pub fn with_database(database: &str) -> Self {
        Self {
            database: database.to_string(),
        }
    }
}

impl Default for PostgresStoreFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreFactory for PostgresStoreFactory {
    async fn connect(&self, credentials: &DbCredentials) -> Result<Box<dyn ArticleStore>> {
        let store = PostgresStore::connect(credentials, &self.database).await?;
        Ok(Box::new(store))
    }
}
