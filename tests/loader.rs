//! Loading tables from directories of scripts.

use sqltable::{LoadFailure, ParserConfig, SourceError, TableLoader};
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, relative: &str, contents: &str) {
    let path = dir.path().join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn test_load_directory_recursively_in_path_order() {
    let dir = TempDir::new().unwrap();
    write(&dir, "sales/Tables/Order.sql", "CREATE TABLE sales.[Order] (Id INT PRIMARY KEY)");
    write(&dir, "dbo/Tables/Customer.sql", "CREATE TABLE Customer (Id INT PRIMARY KEY)");
    write(&dir, "dbo/Views/Summary.sql", "CREATE VIEW dbo.Summary AS SELECT 1 AS X");
    write(&dir, "README.md", "not sql");

    let report = TableLoader::default().load([dir.path()]);

    assert!(report.is_success());
    let names: Vec<_> = report.tables.iter().map(|t| t.qualified_name()).collect();
    assert_eq!(names, vec!["[dbo].[Customer]", "[sales].[Order]"]);
    assert!(report.tables[0].source_file_path.ends_with("Customer.sql"));
    assert_eq!(report.tables[0].source_base_file_name(), Some("Customer"));
}

#[test]
fn test_failures_do_not_stop_other_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a_broken.sql", "CREATE TABLE Broken (Id INT");
    write(&dir, "b_defect.sql", "CREATE TABLE Defect (Id NOT NULL)\nGO\nCREATE TABLE Fine (Id INT)");
    write(&dir, "c_good.sql", "CREATE TABLE Good (Id INT)");

    let missing = dir.path().join("missing");
    let report = TableLoader::default().load([dir.path().to_path_buf(), missing]);

    let names: Vec<_> = report.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Fine", "Good"]);

    assert_eq!(report.failures.len(), 3);
    assert!(matches!(
        &report.failures[0],
        LoadFailure::Source(SourceError::Syntax { .. })
    ));
    assert!(matches!(&report.failures[1], LoadFailure::Table { .. }));
    assert!(matches!(
        &report.failures[2],
        LoadFailure::Source(SourceError::Missing(_))
    ));
    assert!(report.failures[1].to_string().contains("Missing types for Id"));
}

#[test]
fn test_single_file_and_warnings() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "Product.sql",
        "CREATE TABLE Product (Id INT, Code CHAR(4) SPARSE NULL, INDEX IX_Code (Code))",
    );

    let report = TableLoader::new(ParserConfig::default()).load([dir.path().join("Product.sql")]);

    assert_eq!(report.tables.len(), 1);
    let kinds: Vec<_> = report.warnings().map(|d| d.node_type.as_str()).collect();
    assert_eq!(kinds, vec!["ColumnOption", "IndexDefinition"]);
}

#[test]
fn test_byte_order_mark_is_ignored() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "Customer.sql",
        "\u{feff}CREATE TABLE dbo.Customer (Id INT PRIMARY KEY)\nGO\n",
    );

    let report = TableLoader::default().load([dir.path().join("Customer.sql")]);

    assert!(report.is_success(), "failures: {:?}", report.failures);
    assert_eq!(report.tables.len(), 1);
    assert_eq!(report.tables[0].name, "Customer");
    assert_eq!(report.tables[0].primary_key_columns.as_slice(), &["Id"]);
}
