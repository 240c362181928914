use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing configuration parameter: {0}")]
    Config(String),

    #[error("credential error: {0}")]
    Credentials(String),

    // The field is deliberately not called `source`: thiserror reserves
    // that name for the error's cause.
    #[error("fetch error from {source_name}: {message}")]
    Fetch {
        source_name: String,
        message: String,
    },

    #[error("record missing required field: {0}")]
    Normalization(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("notification error: {0}")]
    Notification(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("external error: {0}")]
    External(#[from] anyhow::Error),
}
