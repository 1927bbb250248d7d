//! Database layer: connection pools, entities, and the repository

pub mod models;
mod repository;

pub use repository::Repository;

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Primary connection plus an optional read replica. Workflow
/// transitions always run on the primary; list and lookup queries prefer
/// the replica when one is configured. Connections are shared behind
/// `Arc` so the pool stays cheap to clone into handlers.
#[derive(Clone)]
pub struct DbPool {
    primary: Arc<DatabaseConnection>,
    replica: Option<Arc<DatabaseConnection>>,
}

fn connect_options(url: &str, config: &DatabaseConfig) -> ConnectOptions {
    let mut opts = ConnectOptions::new(url);
    opts.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .sqlx_logging(false);
    opts
}

impl DbPool {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let primary = Database::connect(connect_options(&config.url, config))
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("primary connect failed: {}", e),
            })?;
        info!("Connected to primary database");

        let replica = match &config.read_url {
            Some(read_url) => {
                let conn = Database::connect(connect_options(read_url, config))
                    .await
                    .map_err(|e| AppError::DatabaseConnection {
                        message: format!("replica connect failed: {}", e),
                    })?;
                info!("Connected to read replica");
                Some(Arc::new(conn))
            }
            None => None,
        };

        Ok(Self {
            primary: Arc::new(primary),
            replica,
        })
    }

    /// Connection for reads; the replica when present
    pub fn read(&self) -> &DatabaseConnection {
        self.replica.as_deref().unwrap_or(&self.primary)
    }

    /// Connection for writes; always the primary
    pub fn write(&self) -> &DatabaseConnection {
        &self.primary
    }

    /// Round-trip every configured connection
    pub async fn ping(&self) -> Result<()> {
        for (name, conn) in std::iter::once(("primary", self.write()))
            .chain(self.replica.as_deref().map(|c| ("replica", c)))
        {
            conn.execute_unprepared("SELECT 1")
                .await
                .map_err(|e| AppError::DatabaseConnection {
                    message: format!("{} ping failed: {}", name, e),
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The pool is cloned into every handler and the test suite compiles
    // against the mock backend, which strips Clone from the underlying
    // connection type.
    #[test]
    fn test_pool_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<DbPool>();
    }
}
