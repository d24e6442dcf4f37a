//! Export query generation.
//!
//! Builds the `SELECT` statement used to read rows out of MySQL for loading
//! into BigQuery. Timestamp columns are normalized to Unix epoch seconds and
//! sensitive columns are replaced by a salted SHA-256 digest; every other
//! column is passed through.
//!
//! Table and column names are emitted verbatim. They must already be valid,
//! unquoted MySQL identifiers; names that need quoting produce invalid SQL.

use crate::models::{TargetColumn, TargetType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Column names hashed when no explicit list is configured.
pub const DEFAULT_SENSITIVE_FIELDS: &[&str] = &["email", "first_name", "last_name"];

/// Set of column names whose values must be hashed before export.
///
/// Membership is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensitiveFields(BTreeSet<String>);

impl SensitiveFields {
    /// An empty set: nothing is hashed.
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Checks whether a column name is sensitive.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Iterates over the names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of sensitive names
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks whether nothing is hashed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SensitiveFields {
    fn default() -> Self {
        DEFAULT_SENSITIVE_FIELDS.iter().copied().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SensitiveFields {
    /// Collects names, trimming whitespace and skipping blanks.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|name| name.as_ref().trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        )
    }
}

/// How a single column is rendered in the export query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnTransform {
    /// Converted to Unix epoch seconds
    UnixTimestamp,
    /// Replaced by a salted one-way hash
    SaltedHash,
    /// Selected as is
    PassThrough,
}

impl ColumnTransform {
    /// Picks the transform for a column. Timestamp normalization takes
    /// precedence over hashing.
    pub fn for_column(column: &TargetColumn, sensitive_fields: &SensitiveFields) -> Self {
        if column.target_type == TargetType::Timestamp {
            Self::UnixTimestamp
        } else if sensitive_fields.contains(&column.name) {
            Self::SaltedHash
        } else {
            Self::PassThrough
        }
    }
}

/// Renders a string as a MySQL single-quoted literal.
///
/// Only `'` is escaped, by doubling, which reads the same with or without
/// `NO_BACKSLASH_ESCAPES`. Salts containing `\` are rejected by
/// [`ExportConfig::validate`](crate::config::ExportConfig::validate).
fn quote_literal(value: &str) -> String {
    let escaped = value.replace('\'', "''");
    format!("'{}'", escaped)
}

/// Renders the select-list expression for one column.
pub fn column_expression(
    column: &TargetColumn,
    salt: &str,
    sensitive_fields: &SensitiveFields,
) -> String {
    let name = &column.name;
    match ColumnTransform::for_column(column, sensitive_fields) {
        ColumnTransform::UnixTimestamp => format!("UNIX_TIMESTAMP({name}) AS {name}"),
        ColumnTransform::SaltedHash => {
            format!("SHA2(CONCAT({name}, {}), 256) AS {name}", quote_literal(salt))
        }
        ColumnTransform::PassThrough => name.clone(),
    }
}

/// Generates the export `SELECT` statement for a table.
///
/// Columns keep their schema order and their original names.
///
/// # Example
/// ```rust
/// use mysql2bq_core::models::{TargetColumn, TargetType};
/// use mysql2bq_core::projection::{generate_projection, SensitiveFields};
///
/// let columns = vec![
///     TargetColumn::new("id", TargetType::Integer),
///     TargetColumn::new("email", TargetType::String),
/// ];
/// let query = generate_projection("users", &columns, "s", &SensitiveFields::default());
/// assert_eq!(query, "SELECT id, SHA2(CONCAT(email, 's'), 256) AS email FROM users");
/// ```
pub fn generate_projection(
    table_name: &str,
    columns: &[TargetColumn],
    salt: &str,
    sensitive_fields: &SensitiveFields,
) -> String {
    let select_list = columns
        .iter()
        .map(|column| column_expression(column, salt, sensitive_fields))
        .collect::<Vec<_>>()
        .join(", ");

    format!("SELECT {} FROM {}", select_list, table_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn testtable_columns() -> Vec<TargetColumn> {
        vec![
            TargetColumn::new("id", TargetType::Integer),
            TargetColumn::new("post_id", TargetType::Integer),
            TargetColumn::new("username", TargetType::String),
            TargetColumn::new("first_name", TargetType::String),
            TargetColumn::new("email", TargetType::String),
            TargetColumn::new("created_at", TargetType::Timestamp),
        ]
    }

    #[test]
    fn test_generate_projection() {
        let sensitive: SensitiveFields = ["email"].into_iter().collect();
        let query = generate_projection("testtable", &testtable_columns(), "testsalt", &sensitive);

        assert_eq!(
            query,
            "SELECT id, post_id, username, first_name, \
             SHA2(CONCAT(email, 'testsalt'), 256) AS email, \
             UNIX_TIMESTAMP(created_at) AS created_at FROM testtable"
        );
    }

    #[test]
    fn test_generate_projection_with_default_sensitive_fields() {
        let query = generate_projection(
            "testtable",
            &testtable_columns(),
            "testsalt",
            &SensitiveFields::default(),
        );

        assert!(query.contains("SHA2(CONCAT(first_name, 'testsalt'), 256) AS first_name"));
        assert!(query.contains("SHA2(CONCAT(email, 'testsalt'), 256) AS email"));
        assert!(query.contains(", username, "));
    }

    #[test]
    fn test_timestamp_rule_wins_over_sensitivity() {
        let column = TargetColumn::new("created_at", TargetType::Timestamp);
        let sensitive: SensitiveFields = ["created_at"].into_iter().collect();

        assert_eq!(
            column_expression(&column, "salt", &sensitive),
            "UNIX_TIMESTAMP(created_at) AS created_at"
        );
    }

    #[test]
    fn test_datetime_is_not_normalized() {
        let column = TargetColumn::new("updated_at", TargetType::Datetime);
        assert_eq!(
            column_expression(&column, "salt", &SensitiveFields::none()),
            "updated_at"
        );
    }

    #[test]
    fn test_sensitivity_is_exact_match() {
        let column = TargetColumn::new("Email", TargetType::String);
        assert_eq!(
            column_expression(&column, "salt", &SensitiveFields::default()),
            "Email"
        );
    }

    #[test]
    fn test_salt_is_quoted_as_literal() {
        let column = TargetColumn::new("email", TargetType::String);
        let sensitive: SensitiveFields = ["email"].into_iter().collect();

        assert_eq!(
            column_expression(&column, "o'h", &sensitive),
            "SHA2(CONCAT(email, 'o''h'), 256) AS email"
        );
    }

    #[test]
    fn test_sensitive_fields_parsing_trims_and_skips_blanks() {
        let fields: SensitiveFields = [" email", "", "username ", "  "].into_iter().collect();

        assert_eq!(fields.len(), 2);
        assert!(fields.contains("email"));
        assert!(fields.contains("username"));
        assert_eq!(fields.iter().collect::<Vec<_>>(), vec!["email", "username"]);
    }

    #[test]
    fn test_default_sensitive_fields() {
        let fields = SensitiveFields::default();
        assert_eq!(fields.len(), DEFAULT_SENSITIVE_FIELDS.len());
        for name in DEFAULT_SENSITIVE_FIELDS {
            assert!(fields.contains(name));
        }
        assert!(!fields.contains("username"));
        assert!(SensitiveFields::none().is_empty());
    }
}
