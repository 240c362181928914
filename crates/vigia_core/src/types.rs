use serde::{Deserialize, Serialize};

/// Canonical article shape every source normalizes into. Downstream
/// components never see the origin API's own field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// May be empty, never absent.
    pub description: String,
    /// Sole identity key for deduplication and storage.
    pub url: String,
    pub source: String,
    /// Origin-native timestamp text; not parsed at this layer.
    pub published_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Completed,
    ConfigFailed,
    CredentialsFailed,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub status: RunStatus,
    pub unique_count: usize,
    pub new_count: usize,
    pub message: String,
}

impl RunSummary {
    pub fn failed(status: RunStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            unique_count: 0,
            new_count: 0,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self.status {
            RunStatus::Completed => 200,
            RunStatus::ConfigFailed | RunStatus::CredentialsFailed => 500,
        }
    }
}
