//! BigQuery destination table definitions.
//!
//! A [`TableDefinition`] serializes directly to the JSON body accepted by the
//! BigQuery `tables.insert` REST method, and can also be rendered as a
//! standard SQL `CREATE TABLE IF NOT EXISTS` statement.

use crate::Result;
use crate::error::Mysql2BqError;
use crate::models::{Mode, TableId, TargetColumn};
use crate::schema::select_partitioning_field;
use serde::{Deserialize, Serialize};

/// Time partitioning granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartitioningType {
    Day,
}

/// Time partitioning on a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePartitioning {
    #[serde(rename = "type")]
    pub partitioning_type: PartitioningType,
    /// TIMESTAMP or DATETIME column to partition on
    pub field: String,
}

/// Wrapper matching the BigQuery `schema` object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub fields: Vec<TargetColumn>,
}

/// Destination table: identifier, schema and optional partitioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDefinition {
    pub table_reference: TableId,
    pub schema: TableSchema,
    /// `None` when the table has no time column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_partitioning: Option<TimePartitioning>,
}

impl TableDefinition {
    /// Builds a table definition, partitioning by DAY on the first
    /// time-typed column when there is one.
    pub fn new(table_reference: TableId, fields: Vec<TargetColumn>) -> Self {
        let time_partitioning = select_partitioning_field(&fields).map(|column| TimePartitioning {
            partitioning_type: PartitioningType::Day,
            field: column.name.clone(),
        });

        Self {
            table_reference,
            schema: TableSchema { fields },
            time_partitioning,
        }
    }

    /// Name of the partitioning column, if any
    pub fn partitioning_field(&self) -> Option<&str> {
        self.time_partitioning.as_ref().map(|p| p.field.as_str())
    }

    /// Renders the `tables.insert` request body as pretty JSON.
    pub fn to_table_resource(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Mysql2BqError::Serialization {
            context: format!("Failed to serialize table resource for {}", self.table_reference),
            source: e,
        })
    }

    /// Renders a BigQuery standard SQL DDL statement for this table.
    ///
    /// Column names are emitted unquoted; the table path is backtick-quoted
    /// because project ids commonly contain dashes.
    pub fn to_ddl(&self) -> String {
        let columns = self
            .schema
            .fields
            .iter()
            .map(|column| match column.mode {
                Mode::Nullable => format!("  {} {}", column.name, column.target_type),
                Mode::Required => format!("  {} {} NOT NULL", column.name, column.target_type),
                Mode::Repeated => format!("  {} ARRAY<{}>", column.name, column.target_type),
            })
            .collect::<Vec<_>>()
            .join(",\n");

        let mut ddl = format!(
            "CREATE TABLE IF NOT EXISTS `{}` (\n{}\n)",
            self.table_reference, columns
        );
        if let Some(field) = self.partitioning_field() {
            ddl.push_str(&format!("\nPARTITION BY DATE({})", field));
        }
        ddl.push(';');
        ddl
    }
}

impl std::fmt::Display for TableDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} columns, {})",
            self.table_reference,
            self.schema.fields.len(),
            match self.partitioning_field() {
                Some(field) => format!("partitioned by DAY on {}", field),
                None => "unpartitioned".to_string(),
            }
        )
    }
}
