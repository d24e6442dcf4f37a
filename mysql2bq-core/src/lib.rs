//! Core data structures and conversions for mysql2bq.
//!
//! This crate turns MySQL table descriptions into BigQuery table definitions
//! and export queries:
//! - Type mapping from MySQL column types to BigQuery types
//! - Schema conversion, column by column, preserving order
//! - Selection of a time column for daily partitioning
//! - Generation of a `SELECT` that normalizes timestamps and hashes sensitive
//!   columns with a salt
//!
//! # Data Handling Guarantees
//! - Source databases are only read (metadata queries, read-only sessions)
//! - Salts are held in zeroizing buffers and never logged
//! - Connection strings are redacted in logs and errors
//!
//! # Architecture
//! The conversions are synchronous pure functions. Schema inspection sits
//! behind the [`SchemaInspector`] trait so that a live MySQL database and an
//! offline JSON snapshot are interchangeable.

pub mod adapters;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod projection;
pub mod schema;
pub mod security;
pub mod table;
pub mod typemap;

// Re-export commonly used types
pub use adapters::{ConnectionConfig, JsonInspector, SchemaInspector, create_inspector};
pub use config::ExportConfig;
pub use error::{Mysql2BqError, Result};
pub use filter::TableFilter;
pub use logging::init_logging;
pub use models::{
    Mode, SourceColumn, SourceSchema, SourceTable, SourceType, TableId, TargetColumn, TargetType,
};
pub use pipeline::{RunManifest, TablePlan, plan_table, plan_tables};
pub use projection::{DEFAULT_SENSITIVE_FIELDS, SensitiveFields, generate_projection};
pub use schema::{convert_schema, select_partitioning_field};
pub use security::Salt;
pub use table::TableDefinition;
pub use typemap::{TYPE_MAPPING, map_type};
