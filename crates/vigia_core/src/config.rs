use std::collections::HashMap;

use async_trait::async_trait;

use crate::{Error, Result};

/// Flat name -> secret mapping. All-or-nothing: any missing name fails
/// the whole lookup, so a run never starts with partial configuration.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    async fn get(&self, names: &[&str]) -> Result<HashMap<String, String>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbCredentials {
    pub host: String,
    pub username: String,
    pub password: String,
    pub port: u16,
}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn get(&self) -> Result<DbCredentials>;
}

/// Reads configuration parameters from process environment variables.
/// A parameter name like `gnews-key` maps to `VIGIA_GNEWS_KEY`.
#[derive(Debug, Clone)]
pub struct EnvConfigProvider {
    prefix: String,
}

impl EnvConfigProvider {
    pub fn new() -> Self {
        Self {
            prefix: "VIGIA".to_string(),
        }
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    fn var_name(&self, name: &str) -> String {
        format!("{}_{}", self.prefix, name.replace('-', "_").to_uppercase())
    }
}

impl Default for EnvConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigProvider for EnvConfigProvider {
    async fn get(&self, names: &[&str]) -> Result<HashMap<String, String>> {
        let mut config = HashMap::new();
        for name in names {
            let var = self.var_name(name);
            match std::env::var(&var) {
                Ok(value) => {
                    config.insert(name.to_string(), value);
                }
                Err(_) => return Err(Error::Config(name.to_string())),
            }
        }
        Ok(config)
    }
}

/// Reads database credentials from `VIGIA_DB_HOST`, `VIGIA_DB_USERNAME`,
/// `VIGIA_DB_PASSWORD` and `VIGIA_DB_PORT`.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    pub fn new() -> Self {
        Self
    }

    fn var(name: &str) -> Result<String> {
        std::env::var(name).map_err(|_| Error::Credentials(format!("{} is not set", name)))
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn get(&self) -> Result<DbCredentials> {
        let port = Self::var("VIGIA_DB_PORT")?;
        let port = port
            .parse::<u16>()
            .map_err(|_| Error::Credentials(format!("invalid port: {}", port)))?;

        Ok(DbCredentials {
            host: Self::var("VIGIA_DB_HOST")?,
            username: Self::var("VIGIA_DB_USERNAME")?,
            password: Self::var("VIGIA_DB_PASSWORD")?,
            port,
        })
    }
}
