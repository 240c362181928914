//! Per-source normalization into the canonical [`Article`] shape.
//!
//! Each search API names the same concepts differently; one pure function
//! per source tag converges them so nothing downstream needs to know
//! where an article came from. A record missing a required field yields
//! [`Error::Normalization`] naming the field, so the caller can log and
//! drop it; an article is never partially constructed.

use serde::Deserialize;
use vigia_core::{Article, Error, Result};

/// Raw record shape of the GNews `v4/search` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GNewsRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source: Option<GNewsSourceField>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GNewsSourceField {
    pub name: Option<String>,
}

/// Raw record shape of the NewsAPI `v2/everything` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsApiRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source: Option<NewsApiSourceField>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsApiSourceField {
    pub name: Option<String>,
}

/// Raw record shape of the Newsdata.io `api/1/news` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsDataRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub link: Option<String>,
    pub source_id: Option<String>,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
}

fn required(field: &'static str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::Normalization(field.to_string())),
    }
}

pub fn from_gnews(raw: GNewsRecord) -> Result<Article> {
    Ok(Article {
        title: required("title", raw.title)?,
        description: raw.description.unwrap_or_default(),
        url: required("url", raw.url)?,
        source: required("source.name", raw.source.and_then(|s| s.name))?,
        published_at: required("publishedAt", raw.published_at)?,
    })
}

pub fn from_newsapi(raw: NewsApiRecord) -> Result<Article> {
    Ok(Article {
        title: required("title", raw.title)?,
        description: raw.description.unwrap_or_default(),
        url: required("url", raw.url)?,
        source: required("source.name", raw.source.and_then(|s| s.name))?,
        published_at: required("publishedAt", raw.published_at)?,
    })
}

pub fn from_newsdata(raw: NewsDataRecord) -> Result<Article> {
    // Newsdata often leaves description empty and puts the text in
    // content; fall back before settling on an empty string.
    let description = raw
        .description
        .filter(|d| !d.is_empty())
        .or(raw.content)
        .unwrap_or_default();

    Ok(Article {
        title: required("title", raw.title)?,
        description,
        url: required("link", raw.link)?,
        source: raw.source_id.unwrap_or_else(|| "Unknown".to_string()),
        published_at: required("pubDate", raw.pub_date)?,
    })
}
