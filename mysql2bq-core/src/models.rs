//! Core data models for source and warehouse schemas.
//!
//! Source-side types describe what schema inspection reads from MySQL;
//! target-side types describe BigQuery columns and tables. All models are
//! serializable so that schema snapshots and table resources can be written
//! to and read from JSON.

use serde::{Deserialize, Serialize};

/// MySQL column type classes recognized by the type mapping table.
///
/// The set is closed: any other type name is carried verbatim in
/// [`SourceType::Other`] so inspection never fails, while mapping does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceType {
    /// `TINYINT`, used by MySQL as a boolean
    TinyInt,
    SmallInt,
    /// `INT` / `INTEGER`
    Integer,
    Timestamp,
    /// `DATETIME`, a date and time without zone
    DateTime,
    VarChar,
    TinyText,
    Text,
    MediumText,
    LongText,
    Enum,
    /// Any type outside the table, e.g. `bigint` or a foreign dialect's `inet`
    Other(String),
}

impl SourceType {
    /// Parses a MySQL type name such as `DATA_TYPE` or `COLUMN_TYPE`.
    ///
    /// Matching is case-insensitive. Display widths (`int(11)`), enum value
    /// lists (`enum('a','b')`) and the `unsigned`/`zerofill` modifiers are not
    /// part of the type class and are ignored.
    ///
    /// # Example
    /// ```rust
    /// use mysql2bq_core::models::SourceType;
    ///
    /// assert_eq!(SourceType::from_mysql("INT(11) UNSIGNED"), SourceType::Integer);
    /// assert_eq!(SourceType::from_mysql("inet"), SourceType::Other("inet".to_string()));
    /// ```
    pub fn from_mysql(type_name: &str) -> Self {
        let lowered = type_name.trim().to_lowercase();
        let base = lowered
            .split('(')
            .next()
            .unwrap_or_default()
            .split_whitespace()
            .filter(|word| !matches!(*word, "unsigned" | "signed" | "zerofill"))
            .collect::<Vec<_>>()
            .join(" ");

        match base.as_str() {
            "tinyint" => Self::TinyInt,
            "smallint" => Self::SmallInt,
            "int" | "integer" => Self::Integer,
            "timestamp" => Self::Timestamp,
            "datetime" => Self::DateTime,
            "varchar" => Self::VarChar,
            "tinytext" => Self::TinyText,
            "text" => Self::Text,
            "mediumtext" => Self::MediumText,
            "longtext" => Self::LongText,
            "enum" => Self::Enum,
            _ => Self::Other(base),
        }
    }

    /// Canonical lowercase MySQL name of this type class
    pub fn as_str(&self) -> &str {
        match self {
            Self::TinyInt => "tinyint",
            Self::SmallInt => "smallint",
            Self::Integer => "int",
            Self::Timestamp => "timestamp",
            Self::DateTime => "datetime",
            Self::VarChar => "varchar",
            Self::TinyText => "tinytext",
            Self::Text => "text",
            Self::MediumText => "mediumtext",
            Self::LongText => "longtext",
            Self::Enum => "enum",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for SourceType {
    fn from(value: String) -> Self {
        Self::from_mysql(&value)
    }
}

impl From<&str> for SourceType {
    fn from(value: &str) -> Self {
        Self::from_mysql(value)
    }
}

impl From<SourceType> for String {
    fn from(value: SourceType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// BigQuery column types produced by the type mapping table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetType {
    Integer,
    Boolean,
    Timestamp,
    Datetime,
    String,
}

impl TargetType {
    /// BigQuery standard SQL type name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Boolean => "BOOLEAN",
            Self::Timestamp => "TIMESTAMP",
            Self::Datetime => "DATETIME",
            Self::String => "STRING",
        }
    }

    /// Whether a column of this type can drive DAY time partitioning.
    ///
    /// BigQuery also partitions on `DATE`, which the mapping never produces.
    pub const fn is_time_partitionable(self) -> bool {
        matches!(self, Self::Timestamp | Self::Datetime)
    }
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// BigQuery column mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    #[default]
    Nullable,
    Required,
    Repeated,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Nullable => write!(f, "NULLABLE"),
            Mode::Required => write!(f, "REQUIRED"),
            Mode::Repeated => write!(f, "REPEATED"),
        }
    }
}

/// Column as reflected from a MySQL table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceColumn {
    /// Column name as reported by the source
    pub name: String,
    /// Type class, without display width or attributes
    #[serde(rename = "type")]
    pub source_type: SourceType,
    /// Whether the column accepts NULL. Defaults to `true` in snapshots.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Default expression, if any
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub autoincrement: bool,
    /// Column comment; empty comments are dropped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn default_nullable() -> bool {
    true
}

impl SourceColumn {
    /// Creates a nullable, non-autoincrement column with no default.
    pub fn new(name: impl Into<String>, source_type: impl Into<SourceType>) -> Self {
        Self {
            name: name.into(),
            source_type: source_type.into(),
            nullable: true,
            default: None,
            autoincrement: false,
            comment: None,
        }
    }

    /// Builder method to set nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Builder method to mark the column as auto-increment.
    pub fn with_autoincrement(mut self, autoincrement: bool) -> Self {
        self.autoincrement = autoincrement;
        self
    }
}

/// BigQuery column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetColumn {
    /// Same as the source column name
    pub name: String,
    #[serde(rename = "type")]
    pub target_type: TargetType,
    /// Always [`Mode::Nullable`] for converted columns
    pub mode: Mode,
}

impl TargetColumn {
    /// Creates a `NULLABLE` column.
    pub fn new(name: impl Into<String>, target_type: TargetType) -> Self {
        Self {
            name: name.into(),
            target_type,
            mode: Mode::Nullable,
        }
    }
}

/// A MySQL table and its reflected columns, in ordinal order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTable {
    pub name: String,
    pub columns: Vec<SourceColumn>,
}

/// Offline snapshot of a MySQL database's tables.
///
/// This is the file format read by [`crate::adapters::JsonInspector`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSchema {
    #[serde(default)]
    pub database: Option<String>,
    pub tables: Vec<SourceTable>,
}

impl SourceSchema {
    /// Looks up a table by exact name.
    pub fn table(&self, name: &str) -> Option<&SourceTable> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Fully-qualified BigQuery table identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableId {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

impl TableId {
    /// Creates a table id from its three parts.
    pub fn new(
        project_id: impl Into<String>,
        dataset_id: impl Into<String>,
        table_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            dataset_id: dataset_id.into(),
            table_id: table_id.into(),
        }
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.project_id, self.dataset_id, self.table_id)
    }
}
