//! MySQL schema inspector.
//!
//! # Module Structure
//! - `connection`: Connection pool management and URL validation
//! - `inspection`: Table and column reflection from `INFORMATION_SCHEMA`
//!
//! # Security Guarantees
//! - All operations are read-only (SELECT only)
//! - Connection strings are sanitized in error messages
//! - Query timeouts prevent runaway metadata queries

pub mod connection;
pub mod inspection;


use super::{ConnectionConfig, SchemaInspector};
use crate::Result;
use crate::models::SourceColumn;
use async_trait::async_trait;
use sqlx::MySqlPool;

pub use connection::{parse_mysql_connection_config, validate_mysql_connection_string};

/// MySQL inspector over a lazily connected pool
pub struct MySqlInspector {
    /// Connection pool for metadata queries
    pub pool: MySqlPool,
    /// Connection configuration (pool settings, timeouts, etc.)
    pub config: ConnectionConfig,
}

impl std::fmt::Debug for MySqlInspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlInspector")
            .field("config", &self.config)
            .field("pool_size", &self.pool.size())
            .finish_non_exhaustive()
    }
}

impl MySqlInspector {
    /// Database being inspected. Always present: the URL must name one.
    fn schema_name(&self) -> &str {
        self.config.database.as_deref().unwrap_or_default()
    }
}

#[async_trait]
impl SchemaInspector for MySqlInspector {
    async fn test_connection(&self) -> Result<()> {
        let connectivity_result: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(crate::error::Mysql2BqError::connection_failed)?;

        if connectivity_result != 1 {
            return Err(crate::error::Mysql2BqError::configuration(
                "Basic connectivity test failed: unexpected result",
            ));
        }

        // Inspection reads INFORMATION_SCHEMA.COLUMNS for the target database
        let visible_tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_SCHEMA = ?",
        )
        .bind(self.schema_name())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            crate::error::Mysql2BqError::inspection_failed("Cannot access INFORMATION_SCHEMA", e)
        })?;

        tracing::debug!(
            "Database '{}' exposes {} tables",
            self.schema_name(),
            visible_tables
        );

        Ok(())
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        inspection::list_tables(&self.pool, self.schema_name()).await
    }

    async fn get_columns(&self, table_name: &str) -> Result<Vec<SourceColumn>> {
        inspection::get_columns(&self.pool, self.schema_name(), table_name).await
    }

    fn database_name(&self) -> Option<String> {
        self.config.database.clone()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
