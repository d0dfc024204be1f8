//! # sqltable
//!
//! Turns SQL Server `CREATE TABLE` scripts into a schema model for code
//! generation.
//!
//! The pipeline for one statement is:
//!
//! 1. [`ddl`] parses the script into a syntax tree ([`ast`])
//! 2. [`extract`] walks the tree into a [`Table`]
//! 3. [`resolve`] fills in primary key flags and computed column types
//! 4. [`validate`] rejects tables with nameless or typeless columns
//!
//! [`loader`] runs the pipeline over files and directories.
//!
//! ```
//! use sqltable::{ParserConfig, TableParser};
//!
//! let parser = TableParser::new("Customer.sql", &ParserConfig::default());
//! let outcomes = parser
//!     .parse_source("CREATE TABLE Customer (Id INT IDENTITY PRIMARY KEY, Name NVARCHAR(50) NOT NULL)")
//!     .unwrap();
//! let table = outcomes[0].result.as_ref().unwrap();
//! assert_eq!(table.qualified_name(), "[dbo].[Customer]");
//! assert!(table.is_id_column("Id"));
//! ```

pub mod ast;
pub mod config;
pub mod ddl;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod loader;
pub mod resolve;
pub mod schema;
pub mod validate;

pub use crate::config::ParserConfig;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, Result, SourceError, TableError};
pub use extract::{process_create_table, TableExtractor, TableOutcome};
pub use loader::{LoadFailure, LoadReport, TableLoader, TableParser};
pub use schema::{ConstraintType, PrimaryKeyColumns, Table, TableColumn};
