pub mod transport;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use vigia_core::{Article, Notifier, Result};

pub use transport::{HttpMailTransport, MessageTransport};

/// Composes one HTML digest of the run's new articles and hands it to
/// the transport.
pub struct EmailNotifier {
    transport: Box<dyn MessageTransport>,
}

impl EmailNotifier {
    pub fn new(transport: Box<dyn MessageTransport>) -> Self {
        Self { transport }
    }
}

fn digest_subject() -> String {
    format!("Health news digest - {}", Utc::now().format("%Y-%m-%d"))
}

fn digest_html(articles: &[Article]) -> String {
    let mut body = format!(
        "<html>\n<head>\n<style> body {{ font-family: sans-serif; }} </style>\n</head>\n<body>\n\
         <h1>Health news digest</h1>\n\
         <p>{} new articles found today:</p>\n<hr>\n",
        articles.len()
    );

    for article in articles {
        let description = if article.description.is_empty() {
            "No description available."
        } else {
            article.description.as_str()
        };
        body.push_str(&format!(
            "<h2><a href=\"{}\">{}</a></h2>\n<p><b>Source:</b> {}</p>\n<p>{}</p>\n<br>\n",
            article.url, article.title, article.source, description
        ));
    }

    body.push_str("</body></html>");
    body
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, recipient: &str, articles: &[Article]) -> Result<()> {
        let subject = digest_subject();
        let html = digest_html(articles);

        let delivery_id = self.transport.send(recipient, &subject, &html).await?;
        info!("digest sent to {}, delivery id {}", recipient, delivery_id);
        Ok(())
    }
}
