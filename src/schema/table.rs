//! Table model produced by the extractor.

use super::column::TableColumn;
use super::primary_key::{names_match, PrimaryKeyColumns};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A table extracted from one `CREATE TABLE` statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Schema name
    pub schema: String,
    /// Name of table
    pub name: String,
    /// Columns in declaration order
    #[serde(default)]
    pub columns: Vec<TableColumn>,
    /// Primary key column names, sorted and deduplicated
    #[serde(default)]
    pub primary_key_columns: PrimaryKeyColumns,
    /// File the statement was read from
    #[serde(default)]
    pub source_file_path: String,
    /// Where a generator wrote the rendering of this table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file_path: Option<String>,
    /// Original statement text
    #[serde(default)]
    pub sql: String,
}

impl Table {
    pub fn new(schema: impl Into<String>, name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            sql: sql.into(),
            ..Default::default()
        }
    }

    /// `[schema].[name]`
    pub fn qualified_name(&self) -> String {
        format!("[{}].[{}]", self.schema, self.name)
    }

    pub fn multiple_primary_keys(&self) -> bool {
        self.primary_key_columns.len() > 1
    }

    pub fn has_identity_column(&self) -> bool {
        self.columns.iter().any(TableColumn::is_identity)
    }

    /// First column whose name matches case-insensitively.
    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|column| names_match(&column.name, name))
    }

    /// Tells whether the column name is part of the primary key.
    pub fn is_primary_key(&self, column_name: &str) -> bool {
        self.primary_key_columns.contains(column_name)
    }

    /// Tells whether any column has the given data type (case-insensitive).
    pub fn contains_data_type(&self, data_type: &str) -> bool {
        self.columns
            .iter()
            .any(|column| column.data_type.eq_ignore_ascii_case(data_type))
    }

    pub fn contains_not_null(&self) -> bool {
        self.columns.iter().any(TableColumn::is_not_null)
    }

    pub fn contains_primary_key(&self) -> bool {
        self.columns.iter().any(TableColumn::is_primary_key)
    }

    pub fn contains_identity(&self) -> bool {
        self.has_identity_column()
    }

    /// Tells whether the named column acts as the entity id.
    ///
    /// With a composite key the identity column wins; without one the first
    /// key column (in key order) is the id. Otherwise the column's own primary
    /// key flag decides. Unknown column names are never the id.
    pub fn is_id_column(&self, name: &str) -> bool {
        let Some(column) = self.column(name) else {
            return false;
        };

        if self.multiple_primary_keys() {
            if self.has_identity_column() {
                return column.is_identity();
            }
            return self
                .primary_key_columns
                .first()
                .is_some_and(|first| names_match(&column.name, first));
        }

        column.is_primary_key()
    }

    pub fn source_folder(&self) -> Option<&Path> {
        Path::new(&self.source_file_path).parent()
    }

    pub fn source_file_name(&self) -> Option<&str> {
        Path::new(&self.source_file_path)
            .file_name()
            .and_then(|name| name.to_str())
    }

    pub fn source_base_file_name(&self) -> Option<&str> {
        Path::new(&self.source_file_path)
            .file_stem()
            .and_then(|name| name.to_str())
    }

    pub fn output_folder(&self) -> Option<&Path> {
        self.output_file_path.as_deref().and_then(|path| Path::new(path).parent())
    }

    pub fn output_file_name(&self) -> Option<&str> {
        self.output_file_path
            .as_deref()
            .and_then(|path| Path::new(path).file_name())
            .and_then(|name| name.to_str())
    }

    pub fn output_base_file_name(&self) -> Option<&str> {
        self.output_file_path
            .as_deref()
            .and_then(|path| Path::new(path).file_stem())
            .and_then(|name| name.to_str())
    }

    /// One-line summary for logs: `[schema].[name] Columns: N pk1,pk2`.
    pub fn diagnostic_string(&self) -> String {
        let primary_key_columns = self
            .primary_key_columns
            .iter()
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{} Columns: {} {}",
            self.qualified_name(),
            self.columns.len(),
            primary_key_columns
        )
    }
}
