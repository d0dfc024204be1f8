//! SQL Server type names to Rust types.

use crate::error::{CodegenError, Result};
use sqltable::TableColumn;
use std::collections::HashMap;
use syn::Type;

/// Rust type used for SQL types missing from the map.
pub const FALLBACK_RUST_TYPE: &str = "String";

/// Built-in mapping. Literal type names (`Integer`, `UnicodeString`, ...)
/// cover computed columns typed by a `CASE` literal.
const BUILTIN_TYPES: &[(&str, &str)] = &[
    ("BIT", "bool"),
    ("TINYINT", "u8"),
    ("SMALLINT", "i16"),
    ("INT", "i32"),
    ("BIGINT", "i64"),
    ("REAL", "f32"),
    ("FLOAT", "f64"),
    ("DECIMAL", "f64"),
    ("NUMERIC", "f64"),
    ("MONEY", "f64"),
    ("SMALLMONEY", "f64"),
    ("CHAR", "String"),
    ("VARCHAR", "String"),
    ("NCHAR", "String"),
    ("NVARCHAR", "String"),
    ("TEXT", "String"),
    ("NTEXT", "String"),
    ("SYSNAME", "String"),
    ("XML", "String"),
    ("DATE", "chrono::NaiveDate"),
    ("TIME", "chrono::NaiveTime"),
    ("DATETIME", "chrono::NaiveDateTime"),
    ("DATETIME2", "chrono::NaiveDateTime"),
    ("SMALLDATETIME", "chrono::NaiveDateTime"),
    ("DATETIMEOFFSET", "chrono::DateTime<chrono::FixedOffset>"),
    ("UNIQUEIDENTIFIER", "uuid::Uuid"),
    ("BINARY", "Vec<u8>"),
    ("VARBINARY", "Vec<u8>"),
    ("IMAGE", "Vec<u8>"),
    ("ROWVERSION", "Vec<u8>"),
    ("TIMESTAMP", "Vec<u8>"),
    ("INTEGER", "i32"),
    ("STRING", "String"),
    ("UNICODESTRING", "String"),
];

#[derive(Debug, Clone)]
pub struct TypeMap {
    types: HashMap<String, String>,
}

impl Default for TypeMap {
    fn default() -> Self {
        Self {
            types: BUILTIN_TYPES
                .iter()
                .map(|(sql_type, rust_type)| (sql_type.to_string(), rust_type.to_string()))
                .collect(),
        }
    }
}

impl TypeMap {
    /// Add or replace a mapping. SQL type names are case-insensitive.
    pub fn insert(&mut self, sql_type: &str, rust_type: &str) -> Result<()> {
        syn::parse_str::<Type>(rust_type).map_err(|_| CodegenError::InvalidType {
            sql_type: sql_type.to_string(),
            rust_type: rust_type.to_string(),
        })?;
        self.types
            .insert(sql_type.to_ascii_uppercase(), rust_type.to_string());
        Ok(())
    }

    pub fn contains(&self, sql_type: &str) -> bool {
        self.types.contains_key(&sql_type.to_ascii_uppercase())
    }

    pub fn rust_type_name(&self, sql_type: &str) -> &str {
        self.types
            .get(&sql_type.to_ascii_uppercase())
            .map(String::as_str)
            .unwrap_or(FALLBACK_RUST_TYPE)
    }

    /// Field type for a column: `Option<T>` unless the column can never be
    /// null (NOT NULL, primary key or identity).
    pub fn rust_type(&self, column: &TableColumn) -> Result<Type> {
        if !self.contains(&column.data_type) {
            log::warn!(
                "No Rust type for {} on column {}, using {}",
                column.data_type,
                column.name,
                FALLBACK_RUST_TYPE
            );
        }

        let rust_type = self.rust_type_name(&column.data_type);
        let rust_type = if is_nullable(column) {
            format!("Option<{}>", rust_type)
        } else {
            rust_type.to_string()
        };

        syn::parse_str::<Type>(&rust_type).map_err(|_| CodegenError::InvalidType {
            sql_type: column.data_type.clone(),
            rust_type,
        })
    }
}

pub fn is_nullable(column: &TableColumn) -> bool {
    !(column.is_not_null() || column.is_primary_key() || column.is_identity())
}
