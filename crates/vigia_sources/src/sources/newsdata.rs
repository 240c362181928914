use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use vigia_core::{Article, Error, Result};

use super::NewsSource;
use crate::normalize::{self, NewsDataRecord};

const BASE_URL: &str = "https://newsdata.io/api/1/news";
const SOURCE_NAME: &str = "Newsdata.io";

#[derive(Debug, Clone)]
pub struct NewsDataSource {
    base_url: String,
}

impl NewsDataSource {
    pub fn new() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }

    async fn try_fetch(&self, client: &Client, api_key: &str, query: &str) -> Result<Vec<Article>> {
        let response = client
            .get(&self.base_url)
            .query(&[("apikey", api_key), ("q", query), ("language", "es")])
            .send()
            .await
            .map_err(|e| fetch_error(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| fetch_error(format!("response could not be read: {}", e)))?;

        parse_response(status, &body)
    }
}

impl Default for NewsDataSource {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<NewsDataRecord>,
}

fn fetch_error(message: String) -> Error {
    Error::Fetch {
        source_name: SOURCE_NAME.to_string(),
        message,
    }
}

fn parse_response(status: StatusCode, body: &str) -> Result<Vec<Article>> {
    if status != StatusCode::OK {
        return Err(fetch_error(format!("status {}: {}", status, body)));
    }

    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| fetch_error(format!("body could not be parsed: {}", e)))?;

    Ok(response
        .results
        .into_iter()
        .filter_map(|raw| match normalize::from_newsdata(raw) {
            Ok(article) => Some(article),
            Err(e) => {
                debug!("{}: {}", SOURCE_NAME, e);
                None
            }
        })
        .collect())
}

#[async_trait]
impl NewsSource for NewsDataSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn config_key(&self) -> &str {
        "newsdata-key"
    }

    async fn fetch(&self, client: &Client, api_key: &str, query: &str) -> Vec<Article> {
        debug!("querying Newsdata.io");
        match self.try_fetch(client, api_key, query).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!("{}", e);
                Vec::new()
            }
        }
    }
}
