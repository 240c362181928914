pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod types;

pub use config::{
    ConfigProvider, CredentialProvider, DbCredentials, EnvConfigProvider, EnvCredentialProvider,
};
pub use error::Error;
pub use notify::Notifier;
pub use storage::{ArticleStore, StoreFactory};
pub use types::{Article, RunStatus, RunSummary};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use super::{Article, Error, Result, RunStatus, RunSummary};
    pub use super::{ArticleStore, ConfigProvider, CredentialProvider, Notifier, StoreFactory};
}
