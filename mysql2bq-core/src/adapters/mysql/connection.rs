//! MySQL connection pool management and validation.
//!
//! # Security Features
//! - Validates connection string format before any connection attempt
//! - Sessions are read-only and pinned to UTC
//! - Sets a per-statement execution limit

use super::{ConnectionConfig, MySqlInspector};
use crate::Result;
use sqlx::MySqlPool;
use std::time::Duration;
use url::Url;

impl MySqlInspector {
    /// Creates a new MySQL inspector with a lazily connected pool.
    ///
    /// No connection is attempted until the first query.
    ///
    /// # Errors
    /// Returns error if:
    /// - Connection string format is invalid
    /// - The URL does not name a database
    /// - Pool configuration is invalid
    pub async fn new(connection_string: &str) -> Result<Self> {
        let config = parse_mysql_connection_config(connection_string)?;
        Self::with_config(connection_string, config).await
    }

    /// Creates a new MySQL inspector with custom configuration.
    pub async fn with_config(connection_string: &str, config: ConnectionConfig) -> Result<Self> {
        config.validate()?;
        validate_mysql_connection_string(connection_string)?;

        if config.database.is_none() {
            return Err(crate::error::Mysql2BqError::configuration(
                "Connection string must name a database, e.g. mysql://user@host/database",
            ));
        }

        let pool = create_mysql_connection_pool(connection_string, &config)?;

        tracing::debug!("Created MySQL inspector for {}", config);

        Ok(Self { pool, config })
    }
}

/// Parses a MySQL connection string into configuration parameters.
///
/// Recognized query parameters: `connect_timeout` (seconds, 1-300) and
/// `query_timeout` (seconds, 1-3600). Others are left for the driver.
pub fn parse_mysql_connection_config(connection_string: &str) -> Result<ConnectionConfig> {
    validate_mysql_connection_string(connection_string)?;

    let url = Url::parse(connection_string).map_err(|e| {
        crate::error::Mysql2BqError::configuration(format!(
            "Invalid MySQL connection string format: {}",
            e
        ))
    })?;

    let mut config = ConnectionConfig::new(url.host_str().unwrap_or("localhost").to_string())
        .with_port(url.port().unwrap_or(3306));

    if config.port == Some(0) {
        return Err(crate::error::Mysql2BqError::configuration(
            "Invalid port number: must be greater than 0",
        ));
    }

    let database = url.path().trim_start_matches('/');
    if !database.is_empty() {
        if database.len() > 64 {
            return Err(crate::error::Mysql2BqError::configuration(
                "Database name too long: maximum 64 characters",
            ));
        }
        config = config.with_database(database.to_string());
    }

    let username = url.username();
    if !username.is_empty() {
        if username.len() > 32 {
            return Err(crate::error::Mysql2BqError::configuration(
                "Username too long: maximum 32 characters for MySQL",
            ));
        }
        config = config.with_username(username.to_string());
    }

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "connect_timeout" => {
                if let Ok(secs) = value.parse::<u64>()
                    && (1..=300).contains(&secs)
                {
                    config.connect_timeout = Duration::from_secs(secs);
                }
            }
            "query_timeout" => {
                if let Ok(secs) = value.parse::<u64>()
                    && (1..=3600).contains(&secs)
                {
                    config.query_timeout = Duration::from_secs(secs);
                }
            }
            _ => {}
        }
    }

    config.validate()?;

    Ok(config)
}

/// Validates MySQL connection string format.
///
/// # Errors
/// Returns error if the string is not a `mysql://` URL with a host
pub fn validate_mysql_connection_string(connection_string: &str) -> Result<()> {
    let url = Url::parse(connection_string).map_err(|e| {
        crate::error::Mysql2BqError::configuration(format!(
            "Invalid MySQL connection string format: {}",
            e
        ))
    })?;

    if url.scheme() != "mysql" {
        return Err(crate::error::Mysql2BqError::configuration(
            "Connection string must use mysql:// scheme",
        ));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(crate::error::Mysql2BqError::configuration(
            "Connection string must specify a host",
        ));
    }

    Ok(())
}

/// Creates a lazily connected MySQL pool.
fn create_mysql_connection_pool(
    connection_string: &str,
    config: &ConnectionConfig,
) -> Result<MySqlPool> {
    use sqlx::Executor;

    let query_timeout_ms = config.query_timeout.as_millis();
    let read_only = config.read_only;

    let pool = sqlx::mysql::MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .test_before_acquire(true)
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                conn.execute(format!("SET max_execution_time = {}", query_timeout_ms).as_str())
                    .await?;

                if read_only {
                    conn.execute("SET SESSION TRANSACTION READ ONLY").await?;
                }

                conn.execute("SET time_zone = '+00:00'").await?;

                Ok(())
            })
        })
        .connect_lazy(connection_string)
        .map_err(|e| {
            crate::error::Mysql2BqError::inspection_failed(
                format!(
                    "Failed to create MySQL connection pool to {}",
                    crate::adapters::redact_database_url(connection_string)
                ),
                e,
            )
        })?;

    Ok(pool)
}
