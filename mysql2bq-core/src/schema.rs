//! Source schema to BigQuery schema conversion.

use crate::Result;
use crate::models::{Mode, SourceColumn, TargetColumn};
use crate::typemap::map_type;

/// Converts a reflected MySQL column to a BigQuery column.
///
/// The mode is always `NULLABLE`, whatever the source nullability.
///
/// # Example
/// ```rust
/// use mysql2bq_core::models::{Mode, SourceColumn, TargetType};
/// use mysql2bq_core::schema::convert_column;
///
/// let column = SourceColumn::new("id", "int").with_nullable(false).with_autoincrement(true);
/// let converted = convert_column(&column).unwrap();
/// assert_eq!(converted.target_type, TargetType::Integer);
/// assert_eq!(converted.mode, Mode::Nullable);
/// ```
pub fn convert_column(column: &SourceColumn) -> Result<TargetColumn> {
    Ok(TargetColumn {
        name: column.name.clone(),
        target_type: map_type(&column.source_type)?,
        mode: Mode::Nullable,
    })
}

/// Converts a full table schema, preserving column order.
///
/// # Errors
/// Stops at the first column whose type is not mappable and returns that
/// error unchanged; no partially converted schema is produced.
pub fn convert_schema(columns: &[SourceColumn]) -> Result<Vec<TargetColumn>> {
    columns.iter().map(convert_column).collect()
}

/// Selects the DAY partitioning column for a BigQuery table.
///
/// The first column in schema order with a time-partitionable type wins.
/// Returns `None` when the table should be created unpartitioned.
pub fn select_partitioning_field(schema: &[TargetColumn]) -> Option<&TargetColumn> {
    schema
        .iter()
        .find(|column| column.target_type.is_time_partitionable())
}
