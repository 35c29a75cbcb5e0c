use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Optional database URL. If not provided, a per-user default is used.
    pub url: Option<String>,
    /// Maximum number of database connections in the pool
    pub max_connections: u32,
    /// Connection acquire timeout in seconds
    pub connection_timeout: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub listen_addr: String,
    /// Port number to listen on
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, json, compact)
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl Config {
    /// Load configuration from defaults, optional file, and environment.
    ///
    /// Precedence, lowest to highest: embedded defaults, the file named by
    /// `CONFIG_FILE`, `TRACKER_*` variables, then the well-known variables
    /// (`DATABASE_URL`, `LISTEN_ADDR`, `PORT`, `LOG_LEVEL`).
    pub fn from_env() -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        builder = builder.add_source(File::from_str(
            include_str!("../config/default.toml"),
            FileFormat::Toml,
        ));

        if let Ok(config_file) = env::var("CONFIG_FILE") {
            builder = builder.add_source(
                File::with_name(&config_file)
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("TRACKER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("failed to build configuration")?;

        let mut result: Config = config
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        Self::apply_standard_env_vars(&mut result)?;

        Ok(result)
    }

    /// Load configuration from a specific file path, still honoring the
    /// environment on top.
    pub fn from_file(path: &str) -> Result<Self> {
        let builder = ConfigBuilder::builder()
            .add_source(File::from_str(
                include_str!("../config/default.toml"),
                FileFormat::Toml,
            ))
            .add_source(File::with_name(path).format(FileFormat::Toml))
            .add_source(
                Environment::with_prefix("TRACKER")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder
            .build()
            .context("failed to build configuration from file")?;

        let mut result: Config = config
            .try_deserialize()
            .context("failed to deserialize configuration from file")?;

        Self::apply_standard_env_vars(&mut result)?;

        Ok(result)
    }

    /// Apply the well-known deployment variables on top of whatever the
    /// layered sources produced.
    fn apply_standard_env_vars(config: &mut Config) -> Result<()> {
        if let Ok(database_url) = env::var("DATABASE_URL") {
            config.database.url = Some(database_url);
        }

        if let Ok(listen_addr) = env::var("LISTEN_ADDR") {
            config.server.listen_addr = listen_addr;
        }

        if let Ok(port) = env::var("PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("invalid PORT value: {port}"))?;
        }

        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.logging.level = log_level;
        }

        Ok(())
    }

    /// Re-apply environment overrides to an existing configuration.
    pub fn merge_with_env(mut self) -> Result<Self> {
        Self::apply_standard_env_vars(&mut self)?;
        Ok(self)
    }

    /// The database URL, falling back to the per-user default location.
    pub fn database_url(&self) -> String {
        match &self.database.url {
            Some(url) => url.clone(),
            None => Self::default_database_url(),
        }
    }

    /// Default database location: `$XDG_DATA_HOME/task-tracker/tasks.sqlite`,
    /// or the home directory when XDG is not set.
    pub fn default_database_url() -> String {
        if let Ok(xdg_data) = env::var("XDG_DATA_HOME") {
            return format!("sqlite://{xdg_data}/task-tracker/tasks.sqlite");
        }

        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        format!("sqlite://{home}/.task-tracker/tasks.sqlite")
    }

    /// The socket address the listener binds to
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.listen_addr, self.server.port)
    }

    /// Validate the configuration before anything is constructed from it.
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ));
            }
        }

        let database_url = self.database_url();
        if !database_url.starts_with("sqlite://") && !database_url.contains(":memory:") {
            return Err(anyhow::anyhow!(
                "only SQLite databases are supported. URL must start with 'sqlite://'. Got: {}",
                database_url
            ));
        }

        if self.server.port == 0 {
            return Err(anyhow::anyhow!("server port cannot be 0"));
        }

        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!(
                "database max_connections must be greater than 0"
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                connection_timeout: 30,
            },
            server: ServerConfig {
                listen_addr: "0.0.0.0".to_string(),
                port: 8080,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }
}
