use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use tracker_database::{PoolSettings, SqliteTaskRepository};
use tracker_http::HttpServer;

/// The explicitly owned application object graph.
///
/// Built once during bootstrap, handed to the components that need it, and
/// torn down explicitly when the shutdown signal arrives. Nothing here is
/// process-global.
pub struct AppContext {
    repository: Arc<SqliteTaskRepository>,
}

impl AppContext {
    /// The shared repository handle.
    pub fn repository(&self) -> Arc<SqliteTaskRepository> {
        self.repository.clone()
    }

    /// Build the HTTP server over this context's repository.
    pub fn http_server(&self) -> HttpServer<SqliteTaskRepository> {
        HttpServer::new(self.repository.clone())
    }

    /// Tear the context down: close the connection pool, waiting for
    /// in-flight operations to finish.
    pub async fn shutdown(self) {
        info!("closing database pool");
        self.repository.close().await;
    }
}

/// Create the task repository and bring its schema up to date.
pub async fn create_repository(config: &Config) -> Result<Arc<SqliteTaskRepository>> {
    let database_url = config.database_url();
    info!(url = %database_url, "creating task repository");

    let settings = PoolSettings {
        max_connections: config.database.max_connections,
        acquire_timeout: Duration::from_secs(config.database.connection_timeout),
    };

    let repo = SqliteTaskRepository::connect_with(&database_url, settings)
        .await
        .context("failed to connect to the database")?;

    info!("running database migrations");
    repo.migrate()
        .await
        .context("failed to run database migrations")?;

    Ok(Arc::new(repo))
}

/// Initialize the complete application context.
///
/// Strictly sequential: the repository exists and is fully migrated before
/// anything downstream of it can be constructed.
pub async fn initialize_app(config: &Config) -> Result<AppContext> {
    info!("initializing application context");

    let repository = create_repository(config)
        .await
        .context("failed to create repository")?;

    info!("application context initialized");
    Ok(AppContext { repository })
}

/// Ensure the database directory exists, using the configured URL.
pub fn ensure_database_directory_from_config(config: &Config) -> Result<()> {
    ensure_database_directory(&config.database_url())
}

/// Ensure the database directory exists with owner-only permissions.
pub fn ensure_database_directory(database_url: &str) -> Result<()> {
    let Some(db_path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    if db_path.contains(":memory:") {
        return Ok(());
    }

    let db_path = Path::new(db_path);

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!(dir = %parent.display(), "creating database directory");
            std::fs::create_dir_all(parent).context("failed to create database directory")?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let permissions = std::fs::Permissions::from_mode(0o700);
                std::fs::set_permissions(parent, permissions)
                    .context("failed to set directory permissions")?;
            }
        }
    }

    // Tighten the database file itself if it already exists
    if db_path.exists() {
        set_secure_file_permissions(db_path)?;
    }

    Ok(())
}

fn set_secure_file_permissions(file_path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(file_path, permissions)
            .with_context(|| format!("failed to set permissions for {}", file_path.display()))?;
    }

    #[cfg(windows)]
    {
        // File permissions are inherited from the parent directory ACLs
        let _ = file_path;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DatabaseConfig, LogFormat, LoggingConfig, ServerConfig};
    use tempfile::TempDir;

    fn config_for(database_url: String) -> Config {
        Config {
            database: DatabaseConfig {
                url: Some(database_url),
                max_connections: 5,
                connection_timeout: 30,
            },
            server: ServerConfig {
                listen_addr: "127.0.0.1".to_string(),
                port: 0,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }

    #[tokio::test]
    async fn test_create_repository() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let config = config_for(format!("sqlite://{}", db_path.display()));

        let repo = create_repository(&config).await;
        assert!(repo.is_ok(), "failed to create repository: {:?}", repo.err());
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_initialize_app_and_teardown() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("app.db");
        let config = config_for(format!("sqlite://{}", db_path.display()));

        let context = initialize_app(&config).await.unwrap();
        let _ = context.http_server();
        context.shutdown().await;
    }

    #[test]
    fn test_ensure_database_directory() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("subdir").join("test.db");
        let database_url = format!("sqlite://{}", db_path.display());

        ensure_database_directory(&database_url).unwrap();
        assert!(db_path.parent().unwrap().exists());
    }

    #[test]
    fn test_ensure_database_directory_ignores_memory() {
        assert!(ensure_database_directory(":memory:").is_ok());
        assert!(ensure_database_directory("sqlite://:memory:").is_ok());
    }
}
