use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vigia_core::{Error, Result};

/// Outbound delivery seam. Implementations hand a composed message to
/// whatever actually sends it and report back a delivery identifier.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct DeliveryReceipt {
    id: String,
}

/// Sends mail through an HTTP mail gateway (a transactional e-mail API
/// accepting a JSON message and returning a message id).
pub struct HttpMailTransport {
    endpoint: String,
    token: String,
    sender: String,
    client: reqwest::Client,
}

impl HttpMailTransport {
    pub fn new(endpoint: &str, token: &str, sender: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            token: token.to_string(),
            sender: sender.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MessageTransport for HttpMailTransport {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<String> {
        let message = OutboundMessage {
            from: &self.sender,
            to: recipient,
            subject,
            html: html_body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&message)
            .send()
            .await
            .map_err(|e| Error::Notification(format!("mail gateway unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Notification(format!(
                "mail gateway returned status {}: {}",
                status, body
            )));
        }

        let receipt: DeliveryReceipt = response
            .json()
            .await
            .map_err(|e| Error::Notification(format!("invalid gateway response: {}", e)))?;

        debug!("message accepted by gateway: {}", receipt.id);
        Ok(receipt.id)
    }
}
