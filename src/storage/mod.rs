//! Storage implementations.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::{StorageConfig, StorageType};
use crate::error::{ReportError, Result};
use crate::interfaces::ReportStore;

pub mod memory;
pub mod schema;
pub mod sql;

pub use memory::MemoryReportStore;
pub use sql::{SqlDatabase, SqlReportStore};

#[cfg(feature = "postgres")]
pub use sql::postgres::PostgresReportStore;
#[cfg(feature = "sqlite")]
pub use sql::sqlite::SqliteReportStore;

/// Connect to the configured database.
///
/// The database must already hold the dataset. A missing SQLite file is an
/// error rather than a new empty database.
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn ReportStore>> {
    match config.storage_type {
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            use std::str::FromStr;

            use sqlx::sqlite::SqliteConnectOptions;

            info!(backend = "sqlite", path = %config.sqlite.path, "Connecting to storage");
            let options =
                SqliteConnectOptions::from_str(&format!("sqlite:{}", config.sqlite.path))?
                    .create_if_missing(false);
            let pool = sqlx::SqlitePool::connect_with(options).await?;
            Ok(Arc::new(SqliteReportStore::new(pool)))
        }
        #[cfg(feature = "postgres")]
        StorageType::Postgres => {
            info!(backend = "postgres", "Connecting to storage");
            let pool = sqlx::PgPool::connect(&config.postgres.uri).await?;
            Ok(Arc::new(PostgresReportStore::new(pool)))
        }
        #[allow(unreachable_patterns)]
        other => {
            error!(backend = %other, "Storage backend not enabled in this build");
            Err(ReportError::UnsupportedBackend(other.to_string()))
        }
    }
}
