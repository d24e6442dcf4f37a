//! File output for conversion results.
//!
//! Each table plan is written as three files in the output directory:
//! `<table>.table.json` (BigQuery table resource), `<table>.ddl.sql` and
//! `<table>.export.sql`. A `manifest.json` summarizes the run.

use mysql2bq_core::config::validate_table_name;
use mysql2bq_core::pipeline::{RunManifest, TablePlan};
use mysql2bq_core::{Mysql2BqError, Result};
use std::path::{Path, PathBuf};

/// File name of the run manifest
pub const MANIFEST_FILE: &str = "manifest.json";

/// Output paths for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFiles {
    /// `<table>.table.json`
    pub table_resource: PathBuf,
    /// `<table>.ddl.sql`
    pub ddl: PathBuf,
    /// `<table>.export.sql`
    pub export_query: PathBuf,
}

impl TableFiles {
    /// Paths for a table inside `output_dir`.
    pub fn new(output_dir: &Path, table_name: &str) -> Self {
        Self {
            table_resource: output_dir.join(format!("{}.table.json", table_name)),
            ddl: output_dir.join(format!("{}.ddl.sql", table_name)),
            export_query: output_dir.join(format!("{}.export.sql", table_name)),
        }
    }
}

/// Creates the output directory if it does not exist.
pub async fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| Mysql2BqError::Io {
            context: format!("Failed to create output directory {}", output_dir.display()),
            source: e,
        })
}

/// Writes the files for one table plan.
///
/// # Errors
/// Returns a configuration error, before anything is written, if the table
/// name would place files outside `output_dir`.
pub async fn save_plan(plan: &TablePlan, output_dir: &Path) -> Result<TableFiles> {
    validate_table_name(&plan.table_name)?;
    let files = TableFiles::new(output_dir, &plan.table_name);

    save_text(&plan.definition.to_table_resource()?, &files.table_resource).await?;
    save_text(&format!("{}\n", plan.definition.to_ddl()), &files.ddl).await?;
    save_text(&format!("{};\n", plan.projection), &files.export_query).await?;

    tracing::debug!(
        "Wrote table '{}' to {}",
        plan.table_name,
        output_dir.display()
    );

    Ok(files)
}

/// Writes the run manifest.
pub async fn save_manifest(manifest: &RunManifest, output_dir: &Path) -> Result<PathBuf> {
    let json_data = serde_json::to_string_pretty(manifest).map_err(|e| {
        Mysql2BqError::Serialization {
            context: "Failed to serialize run manifest".to_string(),
            source: e,
        }
    })?;

    let path = output_dir.join(MANIFEST_FILE);
    save_text(&json_data, &path).await?;
    Ok(path)
}

/// Saves text data to file.
pub async fn save_text(data: &str, output_path: &Path) -> Result<()> {
    tokio::fs::write(output_path, data)
        .await
        .map_err(|e| Mysql2BqError::Io {
            context: format!("Failed to write to {}", output_path.display()),
            source: e,
        })?;
    Ok(())
}
