//! Per-table conversion pipeline.
//!
//! For each selected source table: convert its columns, build the
//! destination table definition and generate the export query.

use crate::Result;
use crate::adapters::SchemaInspector;
use crate::config::{ExportConfig, validate_table_name};
use crate::error::Mysql2BqError;
use crate::models::SourceColumn;
use crate::projection::generate_projection;
use crate::schema::convert_schema;
use crate::table::TableDefinition;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything produced for one source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TablePlan {
    /// Source table name, also the destination table id
    pub table_name: String,
    /// BigQuery table to create
    pub definition: TableDefinition,
    /// MySQL export query
    pub projection: String,
}

impl TablePlan {
    /// Name of the partitioning column, if the table has one
    pub fn partitioning_field(&self) -> Option<&str> {
        self.definition.partitioning_field()
    }
}

/// Plans one table from its source columns.
///
/// # Errors
/// Returns a configuration error if the table name is not a valid table id
/// or the table has no columns, and
/// [`UnknownType`](crate::Mysql2BqError::UnknownType) if any column has a
/// type without a mapping.
pub fn plan_table(
    config: &ExportConfig,
    table_name: &str,
    columns: &[SourceColumn],
) -> Result<TablePlan> {
    validate_table_name(table_name)?;
    if columns.is_empty() {
        return Err(Mysql2BqError::configuration(format!(
            "table '{}' has no columns",
            table_name
        )));
    }

    let target_schema = convert_schema(columns)?;
    let projection = generate_projection(
        table_name,
        &target_schema,
        config.salt.expose(),
        &config.sensitive_fields,
    );
    let definition = TableDefinition::new(config.table_id(table_name), target_schema);

    tracing::debug!("Planned {}", definition);

    Ok(TablePlan {
        table_name: table_name.to_string(),
        definition,
        projection,
    })
}

/// Plans every table selected by the configured filter.
///
/// Tables are processed sequentially in the inspector's listing order. The
/// first failure aborts the run.
pub async fn plan_tables(
    inspector: &dyn SchemaInspector,
    config: &ExportConfig,
) -> Result<Vec<TablePlan>> {
    let available = inspector.list_tables().await?;

    for missing in config.table_filter.missing_includes(&available) {
        tracing::warn!("Included table '{}' does not exist in the source", missing);
    }

    let selected = config.table_filter.apply(available.iter().map(String::as_str));
    tracing::info!(
        "Converting {} of {} tables from {}",
        selected.len(),
        available.len(),
        inspector
            .database_name()
            .unwrap_or_else(|| "<unnamed database>".to_string())
    );

    let mut plans = Vec::with_capacity(selected.len());
    for table_name in &selected {
        let columns = inspector.get_columns(table_name).await?;
        let plan = plan_table(config, table_name, &columns).inspect_err(|e| {
            tracing::error!("Failed to convert table '{}': {}", table_name, e);
        })?;
        plans.push(plan);
    }

    Ok(plans)
}

/// Summary of a conversion run, written next to the generated files.
#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    /// mysql2bq version that produced the files
    pub tool_version: String,
    pub generated_at: DateTime<Utc>,
    pub source_database: Option<String>,
    /// `project.dataset`
    pub destination: String,
    pub tables: Vec<ManifestEntry>,
}

/// One converted table in a [`RunManifest`]
#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub source_table: String,
    pub destination_table: String,
    pub column_count: usize,
    pub partitioning_field: Option<String>,
}

impl RunManifest {
    /// Builds a manifest for a set of plans.
    pub fn new(config: &ExportConfig, source_database: Option<String>, plans: &[TablePlan]) -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            source_database,
            destination: format!("{}.{}", config.project, config.dataset),
            tables: plans
                .iter()
                .map(|plan| ManifestEntry {
                    source_table: plan.table_name.clone(),
                    destination_table: plan.definition.table_reference.to_string(),
                    column_count: plan.definition.schema.fields.len(),
                    partitioning_field: plan.partitioning_field().map(str::to_string),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::JsonInspector;
    use crate::filter::TableFilter;
    use crate::models::{SourceSchema, SourceTable};
    use crate::security::Salt;

    fn config() -> ExportConfig {
        ExportConfig::new("proj", "ds", Salt::from("testsalt"))
    }

    fn inspector() -> JsonInspector {
        JsonInspector::new(SourceSchema {
            database: Some("shop".to_string()),
            tables: vec![
                SourceTable {
                    name: "users".to_string(),
                    columns: vec![
                        SourceColumn::new("id", "int"),
                        SourceColumn::new("email", "varchar"),
                        SourceColumn::new("created_at", "timestamp"),
                    ],
                },
                SourceTable {
                    name: "orders".to_string(),
                    columns: vec![
                        SourceColumn::new("id", "int"),
                        SourceColumn::new("shipped_at", "datetime"),
                    ],
                },
                SourceTable {
                    name: "geo".to_string(),
                    columns: vec![
                        SourceColumn::new("id", "int"),
                        SourceColumn::new("location", "point"),
                    ],
                },
            ],
        })
    }

    #[test]
    fn test_plan_table() {
        let columns = vec![
            SourceColumn::new("id", "int"),
            SourceColumn::new("email", "varchar"),
            SourceColumn::new("created_at", "timestamp"),
        ];
        let plan = plan_table(&config(), "users", &columns).unwrap();

        assert_eq!(plan.table_name, "users");
        assert_eq!(plan.partitioning_field(), Some("created_at"));
        assert_eq!(plan.definition.table_reference.to_string(), "proj.ds.users");
        assert_eq!(
            plan.projection,
            "SELECT id, SHA2(CONCAT(email, 'testsalt'), 256) AS email, \
             UNIX_TIMESTAMP(created_at) AS created_at FROM users"
        );
    }

    #[test]
    fn test_plan_table_unknown_type() {
        let columns = vec![SourceColumn::new("addr", "inet")];
        let error = plan_table(&config(), "hosts", &columns).unwrap_err();
        assert_eq!(error.unknown_type_name(), Some("INET"));
    }

    #[test]
    fn test_plan_table_without_columns() {
        let error = plan_table(&config(), "empty", &[]).unwrap_err();
        assert!(matches!(error, Mysql2BqError::Configuration { .. }));
        assert!(error.to_string().contains("table 'empty' has no columns"));
    }

    #[test]
    fn test_plan_table_rejects_path_like_names() {
        let columns = vec![SourceColumn::new("id", "int")];
        for name in ["../escaped", "a/b", ""] {
            let result = plan_table(&config(), name, &columns);
            assert!(
                matches!(result, Err(Mysql2BqError::Configuration { .. })),
                "accepted {:?}",
                name
            );
        }
    }

    #[tokio::test]
    async fn test_plan_tables_with_filter() {
        let config = config().with_table_filter(TableFilter::new(
            vec!["users".to_string(), "orders".to_string()],
            vec![],
        ));
        let plans = plan_tables(&inspector(), &config).await.unwrap();

        let names: Vec<_> = plans.iter().map(|p| p.table_name.as_str()).collect();
        assert_eq!(names, vec!["orders", "users"]);
        assert_eq!(plans[0].partitioning_field(), Some("shipped_at"));
    }

    #[tokio::test]
    async fn test_plan_tables_aborts_on_unknown_type() {
        let result = plan_tables(&inspector(), &config()).await;
        assert!(matches!(
            result,
            Err(Mysql2BqError::UnknownType { ref type_name }) if type_name == "POINT"
        ));
    }

    #[tokio::test]
    async fn test_plan_tables_missing_include_is_skipped() {
        let config = config().with_table_filter(TableFilter::new(
            vec!["users".to_string(), "ghost".to_string()],
            vec![],
        ));
        let plans = plan_tables(&inspector(), &config).await.unwrap();
        assert_eq!(plans.len(), 1);
    }

    #[test]
    fn test_manifest() {
        let columns = vec![SourceColumn::new("id", "int")];
        let plan = plan_table(&config(), "ids", &columns).unwrap();
        let manifest = RunManifest::new(&config(), Some("shop".to_string()), &[plan]);

        assert_eq!(manifest.destination, "proj.ds");
        assert_eq!(manifest.tables.len(), 1);
        assert_eq!(manifest.tables[0].destination_table, "proj.ds.ids");
        assert_eq!(manifest.tables[0].partitioning_field, None);

        let json = serde_json::to_value(&manifest).unwrap();
        assert!(json["generated_at"].is_string());
    }
}
