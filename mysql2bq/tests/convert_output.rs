//! Conversion from a schema snapshot through to files on disk.

use clap::Parser;
use mysql2bq::output::{MANIFEST_FILE, TableFiles, ensure_output_dir, save_manifest, save_plan};
use mysql2bq::{Cli, Command, SchemaSource};
use mysql2bq_core::{JsonInspector, RunManifest, SchemaInspector, plan_tables};
use std::fs;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
    "database": "crm",
    "tables": [
        {"name": "contacts", "columns": [
            {"name": "id", "type": "int", "nullable": false},
            {"name": "first_name", "type": "varchar"},
            {"name": "last_name", "type": "varchar"},
            {"name": "email", "type": "varchar"},
            {"name": "notes", "type": "text"},
            {"name": "signed_up", "type": "timestamp"}
        ]},
        {"name": "tags", "columns": [
            {"name": "id", "type": "smallint"},
            {"name": "label", "type": "tinytext"}
        ]}
    ]
}"#;

#[tokio::test]
async fn test_convert_snapshot_to_files() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("crm.json");
    fs::write(&snapshot, SNAPSHOT).unwrap();
    let output_dir = dir.path().join("out");

    let cli = Cli::try_parse_from([
        "mysql2bq",
        "convert",
        "--schema-file",
        snapshot.to_str().unwrap(),
        "--project",
        "acme",
        "--dataset",
        "crm",
        "--salt",
        "o'reilly",
        "--excluded-tables",
        "tags",
        "--output-dir",
        output_dir.to_str().unwrap(),
    ])
    .unwrap();
    let Command::Convert(args) = cli.command else {
        panic!("expected convert command");
    };

    let SchemaSource::SnapshotFile(path) = args.schema_source().unwrap() else {
        panic!("expected snapshot source");
    };
    let config = args.export_config().unwrap();
    let inspector = JsonInspector::from_file(path).await.unwrap();

    let plans = plan_tables(&inspector, &config).await.unwrap();
    assert_eq!(plans.len(), 1);

    ensure_output_dir(&config.output_dir).await.unwrap();
    for plan in &plans {
        save_plan(plan, &config.output_dir).await.unwrap();
    }
    let manifest = RunManifest::new(&config, inspector.database_name(), &plans);
    save_manifest(&manifest, &config.output_dir).await.unwrap();

    let files = TableFiles::new(&output_dir, "contacts");
    let export = fs::read_to_string(&files.export_query).unwrap();
    assert_eq!(
        export,
        "SELECT id, SHA2(CONCAT(first_name, 'o''reilly'), 256) AS first_name, \
         SHA2(CONCAT(last_name, 'o''reilly'), 256) AS last_name, \
         SHA2(CONCAT(email, 'o''reilly'), 256) AS email, notes, \
         UNIX_TIMESTAMP(signed_up) AS signed_up FROM contacts;\n"
    );

    let ddl = fs::read_to_string(&files.ddl).unwrap();
    assert_eq!(
        ddl,
        "CREATE TABLE IF NOT EXISTS `acme.crm.contacts` (\n  id INTEGER,\n  first_name STRING,\n  \
         last_name STRING,\n  email STRING,\n  notes STRING,\n  signed_up TIMESTAMP\n)\n\
         PARTITION BY DATE(signed_up);\n"
    );

    assert!(output_dir.join(MANIFEST_FILE).exists());
    assert!(!TableFiles::new(&output_dir, "tags").ddl.exists());
}
