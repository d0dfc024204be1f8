//! Column model produced by the extractor.

use super::constraint::ConstraintType;
use serde::{Deserialize, Serialize};

/// A column of a [`Table`](super::Table).
///
/// Stored flags describe what the DDL said; the `is_*` methods derive the
/// effective column properties from them. Only the extractor and the resolver
/// write to a column; after validation it is treated as read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    /// Column name
    #[serde(default)]
    pub name: String,
    /// Canonical SQL data type name (e.g. "VARCHAR", "INT")
    #[serde(default)]
    pub data_type: String,
    /// First data type argument (length or precision), meaning is type dependent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type_extra_info1: Option<u32>,
    /// Second data type argument (scale), meaning is type dependent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type_extra_info2: Option<u32>,
    /// Derived column (`name AS expression`)
    #[serde(default)]
    pub computed: bool,
    /// Column (or literal type token, e.g. for `CONVERT([date], ...)`) whose
    /// data type a computed column takes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_column: Option<String>,
    /// Last inline constraint seen on the declaration
    #[serde(default)]
    pub constraint_type: ConstraintType,
    #[serde(default)]
    pub is_primary_key_explicit: bool,
    #[serde(default)]
    pub is_identity_column_explicit: bool,
    /// Original declaration text
    #[serde(default)]
    pub sql: String,
}

impl TableColumn {
    /// Create an empty column for the given declaration text.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            ..Default::default()
        }
    }

    /// Create an empty computed column for the given declaration text.
    pub fn computed(sql: impl Into<String>) -> Self {
        Self {
            computed: true,
            ..Self::new(sql)
        }
    }

    pub fn is_primary_key(&self) -> bool {
        self.is_primary_key_explicit || self.is_primary_key_constraint()
    }

    pub fn is_identity(&self) -> bool {
        self.is_identity_column_explicit || self.is_identity_constraint()
    }

    pub fn is_primary_key_constraint(&self) -> bool {
        self.constraint_type == ConstraintType::PrimaryKey
    }

    pub fn is_identity_constraint(&self) -> bool {
        self.constraint_type == ConstraintType::Identity
    }

    pub fn is_null(&self) -> bool {
        self.constraint_type == ConstraintType::Null
    }

    pub fn is_not_null(&self) -> bool {
        self.constraint_type == ConstraintType::NotNull
    }

    pub fn is_default(&self) -> bool {
        self.constraint_type == ConstraintType::Default
    }

    pub fn is_foreign_key(&self) -> bool {
        self.constraint_type == ConstraintType::ForeignKey
    }

    pub fn is_row_guid_col(&self) -> bool {
        self.constraint_type == ConstraintType::RowGuidCol
    }

    pub fn is_unique(&self) -> bool {
        self.constraint_type == ConstraintType::Unique
    }

    pub fn is_check(&self) -> bool {
        self.constraint_type == ConstraintType::Check
    }

    /// Non-blank reference column, if any.
    pub fn reference(&self) -> Option<&str> {
        self.reference_column
            .as_deref()
            .filter(|reference| !reference.trim().is_empty())
    }

    /// One-line summary for logs.
    ///
    /// `{data_type,-20} {name,-20} {PRIMARY} {IDENTITY} {READONLY} {NULL} {NOT NULL}`,
    /// with absent flags rendered as empty strings.
    pub fn diagnostic_string(&self) -> String {
        let primary_key = if self.is_primary_key() { "PRIMARY" } else { "" };
        let identity = if self.is_identity() { "IDENTITY" } else { "" };
        let read_only = if self.computed { "READONLY" } else { "" };
        let nullable = if self.is_null() { "NULL" } else { "" };
        let not_nullable = if self.is_not_null() { "NOT NULL" } else { "" };

        format!(
            "{:<20} {:<20} {} {} {} {} {}",
            self.data_type, self.name, primary_key, identity, read_only, nullable, not_nullable
        )
    }
}
