//! Export run configuration.
//!
//! Gathers everything a conversion run needs besides the source connection:
//! BigQuery destination, hashing salt, sensitive field list, table filter and
//! output settings.

use crate::Result;
use crate::error::Mysql2BqError;
use crate::filter::TableFilter;
use crate::models::TableId;
use crate::projection::SensitiveFields;
use crate::security::Salt;
use std::path::PathBuf;

/// Default directory for generated table definitions and export queries.
pub const DEFAULT_OUTPUT_DIR: &str = "mysql2bq-out";

/// Configuration for one conversion run.
///
/// # Example
/// ```rust
/// use mysql2bq_core::config::ExportConfig;
/// use mysql2bq_core::security::Salt;
///
/// let config = ExportConfig::new("my-project", "analytics", Salt::from("pepper"))
///     .with_dry_run(true);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.table_id("users").to_string(), "my-project.analytics.users");
/// ```
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// BigQuery project id
    pub project: String,
    /// BigQuery dataset id
    pub dataset: String,
    /// Salt mixed into hashed sensitive columns
    pub salt: Salt,
    /// Columns to hash in export queries
    pub sensitive_fields: SensitiveFields,
    /// Which source tables to convert
    pub table_filter: TableFilter,
    /// Plan and print only; write nothing
    pub dry_run: bool,
    /// Where generated files are written
    pub output_dir: PathBuf,
}

impl ExportConfig {
    /// Creates a configuration with the default sensitive fields, no table
    /// filter and the default output directory.
    pub fn new(project: impl Into<String>, dataset: impl Into<String>, salt: Salt) -> Self {
        Self {
            project: project.into(),
            dataset: dataset.into(),
            salt,
            sensitive_fields: SensitiveFields::default(),
            table_filter: TableFilter::default(),
            dry_run: false,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    /// Builder method to replace the sensitive field list.
    pub fn with_sensitive_fields(mut self, sensitive_fields: SensitiveFields) -> Self {
        self.sensitive_fields = sensitive_fields;
        self
    }

    /// Builder method to set the table filter.
    pub fn with_table_filter(mut self, table_filter: TableFilter) -> Self {
        self.table_filter = table_filter;
        self
    }

    /// Builder method to toggle dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Builder method to set the output directory.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Fully-qualified destination for a source table.
    pub fn table_id(&self, table_name: &str) -> TableId {
        TableId::new(&self.project, &self.dataset, table_name)
    }

    /// Validates configuration values.
    ///
    /// # Errors
    /// Returns error if the project, dataset or salt is empty, if the salt
    /// contains a backslash, or if the project or dataset contains characters
    /// BigQuery does not allow.
    pub fn validate(&self) -> Result<()> {
        if self.project.trim().is_empty() {
            return Err(Mysql2BqError::configuration("project cannot be empty"));
        }

        if self.dataset.trim().is_empty() {
            return Err(Mysql2BqError::configuration("dataset cannot be empty"));
        }

        if self.salt.is_empty() {
            return Err(Mysql2BqError::configuration("salt cannot be empty"));
        }

        // Backslashes in string literals depend on NO_BACKSLASH_ESCAPES
        if self.salt.expose().contains('\\') {
            return Err(Mysql2BqError::configuration(
                "salt cannot contain a backslash",
            ));
        }

        if !self
            .project
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | ':' | '.'))
        {
            return Err(Mysql2BqError::configuration(format!(
                "Invalid project id: {}",
                self.project
            )));
        }

        if !self
            .dataset
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(Mysql2BqError::configuration(format!(
                "Invalid dataset id: {} (letters, digits and underscores only)",
                self.dataset
            )));
        }

        let overlap: Vec<_> = self
            .table_filter
            .included
            .iter()
            .filter(|t| self.table_filter.excluded.contains(t))
            .collect();
        if !overlap.is_empty() {
            tracing::warn!(
                "Tables both included and excluded, inclusion wins: {:?}",
                overlap
            );
        }

        Ok(())
    }
}

/// Checks that a source table name is usable as a BigQuery table id and as
/// an output file stem.
///
/// # Errors
/// Returns error if the name is empty or contains a path separator, `..`
/// or a NUL byte.
pub fn validate_table_name(table_name: &str) -> Result<()> {
    if table_name.is_empty()
        || table_name.contains(['/', '\\', '\0'])
        || table_name.contains("..")
    {
        return Err(Mysql2BqError::configuration(format!(
            "Invalid table name: {:?}",
            table_name
        )));
    }
    Ok(())
}
