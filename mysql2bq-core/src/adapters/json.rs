//! Offline inspector backed by a JSON schema snapshot.
//!
//! The snapshot is a serialized [`SourceSchema`]:
//!
//! ```json
//! {
//!   "database": "shop",
//!   "tables": [
//!     {"name": "users", "columns": [
//!       {"name": "id", "type": "int", "nullable": false, "autoincrement": true},
//!       {"name": "email", "type": "varchar"}
//!     ]}
//!   ]
//! }
//! ```

use super::SchemaInspector;
use crate::Result;
use crate::error::Mysql2BqError;
use crate::models::{SourceColumn, SourceSchema};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Inspector reading tables from a [`SourceSchema`] held in memory.
#[derive(Debug, Clone)]
pub struct JsonInspector {
    schema: SourceSchema,
    origin: Option<PathBuf>,
}

impl JsonInspector {
    /// Wraps an already-loaded schema.
    pub fn new(schema: SourceSchema) -> Self {
        Self {
            schema,
            origin: None,
        }
    }

    /// Loads a schema snapshot file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not a valid snapshot
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Mysql2BqError::Io {
                context: format!("Failed to read schema snapshot {}", path.display()),
                source: e,
            })?;

        let schema = Self::parse(&data).map_err(|e| match e {
            Mysql2BqError::Serialization { source, .. } => Mysql2BqError::Serialization {
                context: format!("Invalid schema snapshot {}", path.display()),
                source,
            },
            other => other,
        })?;

        tracing::debug!(
            "Loaded schema snapshot {} with {} tables",
            path.display(),
            schema.tables.len()
        );

        Ok(Self {
            schema,
            origin: Some(path.to_path_buf()),
        })
    }

    /// Parses a snapshot from a JSON string.
    pub fn parse(data: &str) -> Result<SourceSchema> {
        serde_json::from_str(data).map_err(|e| Mysql2BqError::Serialization {
            context: "Invalid schema snapshot".to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl SchemaInspector for JsonInspector {
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.schema.tables.iter().map(|t| t.name.clone()).collect();
        names.sort();
        Ok(names)
    }

    async fn get_columns(&self, table_name: &str) -> Result<Vec<SourceColumn>> {
        self.schema
            .table(table_name)
            .map(|t| t.columns.clone())
            .ok_or_else(|| {
                Mysql2BqError::configuration(format!(
                    "Table '{}' not found in schema snapshot{}",
                    table_name,
                    self.origin
                        .as_ref()
                        .map_or_else(String::new, |p| format!(" {}", p.display()))
                ))
            })
    }

    fn database_name(&self) -> Option<String> {
        self.schema.database.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceType;

    const SNAPSHOT: &str = r#"{
        "database": "shop",
        "tables": [
            {"name": "users", "columns": [
                {"name": "id", "type": "int", "nullable": false, "autoincrement": true},
                {"name": "email", "type": "varchar"}
            ]},
            {"name": "audit", "columns": [
                {"name": "at", "type": "timestamp"}
            ]}
        ]
    }"#;

    #[tokio::test]
    async fn test_lists_tables_sorted() {
        let inspector = JsonInspector::new(JsonInspector::parse(SNAPSHOT).unwrap());

        assert_eq!(inspector.list_tables().await.unwrap(), vec!["audit", "users"]);
        assert_eq!(inspector.database_name(), Some("shop".to_string()));
        assert!(inspector.test_connection().await.is_ok());

        // Nothing to release for a snapshot
        inspector.close().await;
        assert_eq!(inspector.list_tables().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_columns() {
        let inspector = JsonInspector::new(JsonInspector::parse(SNAPSHOT).unwrap());
        let columns = inspector.get_columns("users").await.unwrap();

        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].source_type, SourceType::Integer);
        assert!(columns[0].autoincrement);
        assert_eq!(columns[1].source_type, SourceType::VarChar);
    }

    #[tokio::test]
    async fn test_missing_table() {
        let inspector = JsonInspector::new(JsonInspector::parse(SNAPSHOT).unwrap());
        let error = inspector.get_columns("ghost").await.unwrap_err();
        assert!(error.to_string().contains("ghost"));
    }

    #[test]
    fn test_invalid_snapshot() {
        assert!(matches!(
            JsonInspector::parse("{\"tables\": 3}"),
            Err(Mysql2BqError::Serialization { .. })
        ));
    }

    #[tokio::test]
    async fn test_from_missing_file() {
        let result = JsonInspector::from_file("/nonexistent/snapshot.json").await;
        assert!(matches!(result, Err(Mysql2BqError::Io { .. })));
    }
}
