//! MySQL to BigQuery conversion tool.
//!
//! This binary reads table schemas from MySQL (or a JSON snapshot) and
//! generates BigQuery table definitions plus the MySQL queries that export
//! each table's rows in a BigQuery-ready shape.
//!
//! # Data Handling Guarantees
//! - Read-only database operations only
//! - No credentials or salts logged
//! - Export queries go to stdout, logs to stderr

use clap::Parser;
use mysql2bq::output::{ensure_output_dir, save_manifest, save_plan};
use mysql2bq::{Cli, Command, ConvertArgs, SchemaSource};
use mysql2bq_core::{
    JsonInspector, Result, RunManifest, SchemaInspector, TYPE_MAPPING,
    adapters::create_inspector, error::redact_database_url, init_logging, plan_tables,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.global.verbose, cli.global.quiet)?;

    match &cli.command {
        Command::Convert(args) => convert(args).await,
        Command::Test(args) => test_connection(&args.database_url).await,
        Command::Types => {
            list_type_mappings();
            Ok(())
        }
    }
}

/// Tests database connection without converting anything
async fn test_connection(database_url: &str) -> Result<()> {
    info!("Testing database connection...");
    info!("Target: {}", redact_database_url(database_url));

    let inspector = create_inspector(database_url).await.map_err(|e| {
        error!("Failed to create schema inspector: {}", e);
        e
    })?;

    let result = inspector.test_connection().await;
    inspector.close().await;
    result.map_err(|e| {
        error!("Connection test failed: {}", e);
        e
    })?;

    info!("✓ Connection test successful");
    println!(
        "Connection to database {} successful",
        inspector.database_name().unwrap_or_default()
    );

    Ok(())
}

/// Opens the inspector for the configured schema source
async fn open_inspector(source: &SchemaSource) -> Result<Box<dyn SchemaInspector>> {
    match source {
        SchemaSource::Database(database_url) => {
            info!("Source: {}", redact_database_url(database_url));
            let inspector = create_inspector(database_url).await?;
            if let Err(e) = inspector.test_connection().await {
                inspector.close().await;
                return Err(e);
            }
            Ok(inspector)
        }
        SchemaSource::SnapshotFile(path) => {
            info!("Source: schema snapshot {}", path.display());
            Ok(Box::new(JsonInspector::from_file(path).await?))
        }
    }
}

/// Converts every selected table and writes or prints the results
async fn convert(args: &ConvertArgs) -> Result<()> {
    let source = args.schema_source()?;
    let config = args.export_config()?;

    info!("Starting conversion...");
    info!("Destination: {}.{}", config.project, config.dataset);

    let inspector = open_inspector(&source).await.map_err(|e| {
        error!("Failed to open schema source: {}", e);
        e
    })?;

    // All reflection happens here; the pool is not needed for writing
    let result = plan_tables(inspector.as_ref(), &config).await;
    let source_database = inspector.database_name();
    inspector.close().await;

    let plans = result.map_err(|e| {
        error!("Conversion failed: {}", e);
        e
    })?;

    for plan in &plans {
        println!("-- {}", plan.definition);
        println!("{};", plan.projection);
    }

    if config.dry_run {
        info!("Dry run: {} tables planned, nothing written", plans.len());
        return Ok(());
    }

    ensure_output_dir(&config.output_dir).await?;
    for plan in &plans {
        save_plan(plan, &config.output_dir).await?;
    }

    let manifest = RunManifest::new(&config, source_database, &plans);
    let manifest_path = save_manifest(&manifest, &config.output_dir).await?;

    info!("✓ Converted {} tables", plans.len());
    info!("Output: {}", config.output_dir.display());
    info!("Manifest: {}", manifest_path.display());

    Ok(())
}

/// Prints the fixed MySQL to BigQuery type mapping
fn list_type_mappings() {
    println!("Type Mapping (MySQL -> BigQuery):");
    println!();
    for (source, target) in TYPE_MAPPING {
        println!("  {:<12} {}", source.to_string(), target);
    }
    println!();
    println!("Partitioning:");
    println!("  First TIMESTAMP or DATETIME column, by DAY");
    println!();
    println!("Export Query:");
    println!("  TIMESTAMP columns  UNIX_TIMESTAMP(col) AS col");
    println!("  Sensitive columns  SHA2(CONCAT(col, '<salt>'), 256) AS col");
    println!("  Other columns      col");
}
