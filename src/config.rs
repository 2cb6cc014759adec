use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use handle_errors::Error;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Args {
    pub log_level: String,
    pub port: u16,
    pub store: StoreKind,
    pub database_host: String,
    pub database_port: u16,
    pub database_name: String,
    pub database_username: String,
    pub database_password: String,
    pub max_connections: u32,
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub seed_file: Option<String>,
}

/// Built-in defaults, before `setup.toml` and `NOTEFUL_*` variables.
pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("log_level", "info")?
        .set_default("port", 3030_i64)?
        .set_default("store", "postgres")?
        .set_default("database_host", "localhost")?
        .set_default("database_port", 5432_i64)?
        .set_default("database_name", "noteful")?
        .set_default("database_username", "postgres")?
        .set_default("database_password", "postgres")?
        .set_default("max_connections", 5_i64)?
        .set_default("request_timeout_secs", 10_i64)
}

impl Args {
    pub fn load() -> Result<Self, Error> {
        let config = defaults()?
            .add_source(File::with_name("setup").required(false))
            .add_source(Environment::with_prefix("NOTEFUL").try_parsing(true))
            .build()?;
        Ok(config.try_deserialize::<Args>()?)
    }

    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.database_username,
            self.database_password,
            self.database_host,
            self.database_port,
            self.database_name
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
