//! Table and column reflection from MySQL `INFORMATION_SCHEMA`.

use crate::Result;
use crate::models::{SourceColumn, SourceType};
use sqlx::{MySqlPool, Row};

/// Lists base tables of a database, sorted by name.
pub async fn list_tables(pool: &MySqlPool, db_name: &str) -> Result<Vec<String>> {
    // Cast to CHAR to avoid VARBINARY type issues in MySQL 8.0+
    let tables_query = r#"
        SELECT CAST(TABLE_NAME AS CHAR) as TABLE_NAME
        FROM INFORMATION_SCHEMA.TABLES
        WHERE TABLE_SCHEMA = ?
        AND TABLE_TYPE = 'BASE TABLE'
        ORDER BY TABLE_NAME
    "#;

    let rows = sqlx::query(tables_query)
        .bind(db_name)
        .fetch_all(pool)
        .await
        .map_err(|e| crate::error::Mysql2BqError::inspection_failed("Failed to enumerate tables", e))?;

    let mut tables = Vec::with_capacity(rows.len());
    for row in &rows {
        let table_name: String = row.try_get("TABLE_NAME").map_err(|e| {
            crate::error::Mysql2BqError::inspection_failed("Failed to parse table name", e)
        })?;
        tables.push(table_name);
    }

    tracing::debug!("Found {} tables in '{}'", tables.len(), db_name);

    Ok(tables)
}

/// Reflects the columns of a table in ordinal order.
///
/// # Errors
/// Returns a configuration error when the table has no visible columns,
/// which MySQL reports for tables that do not exist.
pub async fn get_columns(
    pool: &MySqlPool,
    db_name: &str,
    table_name: &str,
) -> Result<Vec<SourceColumn>> {
    // Cast to CHAR to avoid VARBINARY type issues in MySQL 8.0+
    let columns_query = r#"
        SELECT
            CAST(c.COLUMN_NAME AS CHAR) as COLUMN_NAME,
            CAST(c.DATA_TYPE AS CHAR) as DATA_TYPE,
            CAST(c.IS_NULLABLE AS CHAR) as IS_NULLABLE,
            CAST(c.COLUMN_DEFAULT AS CHAR) as COLUMN_DEFAULT,
            CAST(c.COLUMN_COMMENT AS CHAR) as COLUMN_COMMENT,
            CAST(c.EXTRA AS CHAR) as EXTRA
        FROM INFORMATION_SCHEMA.COLUMNS c
        WHERE c.TABLE_SCHEMA = ?
        AND c.TABLE_NAME = ?
        ORDER BY c.ORDINAL_POSITION
    "#;

    let column_rows = sqlx::query(columns_query)
        .bind(db_name)
        .bind(table_name)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            crate::error::Mysql2BqError::inspection_failed(
                format!("Failed to collect columns for table '{}'", table_name),
                e,
            )
        })?;

    if column_rows.is_empty() {
        return Err(crate::error::Mysql2BqError::configuration(format!(
            "Table '{}' not found in database '{}'",
            table_name, db_name
        )));
    }

    let mut columns = Vec::with_capacity(column_rows.len());

    for row in &column_rows {
        let column_name: String = row.try_get("COLUMN_NAME").map_err(|e| {
            crate::error::Mysql2BqError::inspection_failed("Failed to parse column name", e)
        })?;
        let data_type: String = row.try_get("DATA_TYPE").unwrap_or_default();
        let is_nullable: String = row.try_get("IS_NULLABLE").unwrap_or_default();
        let column_default: Option<String> = row
            .try_get::<Option<String>, _>("COLUMN_DEFAULT")
            .ok()
            .flatten();
        let column_comment: Option<String> = row
            .try_get::<Option<String>, _>("COLUMN_COMMENT")
            .ok()
            .flatten();
        let extra: String = row.try_get("EXTRA").unwrap_or_default();

        columns.push(row_to_source_column(
            column_name,
            &data_type,
            &is_nullable,
            column_default,
            column_comment,
            &extra,
        ));
    }

    tracing::debug!(
        "Collected {} columns for table '{}'",
        columns.len(),
        table_name
    );

    Ok(columns)
}

/// Builds a source column from raw `INFORMATION_SCHEMA.COLUMNS` values.
pub(crate) fn row_to_source_column(
    name: String,
    data_type: &str,
    is_nullable: &str,
    default: Option<String>,
    comment: Option<String>,
    extra: &str,
) -> SourceColumn {
    SourceColumn {
        name,
        source_type: SourceType::from_mysql(data_type),
        nullable: is_nullable.eq_ignore_ascii_case("YES"),
        default,
        autoincrement: extra.to_lowercase().contains("auto_increment"),
        // MySQL returns an empty string for no comment
        comment: comment.filter(|c| !c.is_empty()),
    }
}
