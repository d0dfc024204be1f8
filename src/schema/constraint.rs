//! Inline constraint kinds recorded on a column.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The single inline constraint retained for a column.
///
/// A column declaration may carry several inline constraints in the source;
/// only the last one seen is kept (see `TableColumn::constraint_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConstraintType {
    #[default]
    None,
    Null,
    NotNull,
    Default,
    PrimaryKey,
    ForeignKey,
    Identity,
    RowGuidCol,
    Unique,
    Check,
}

impl ConstraintType {
    pub fn is_none(&self) -> bool {
        matches!(self, ConstraintType::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintType::None => "None",
            ConstraintType::Null => "Null",
            ConstraintType::NotNull => "NotNull",
            ConstraintType::Default => "Default",
            ConstraintType::PrimaryKey => "PrimaryKey",
            ConstraintType::ForeignKey => "ForeignKey",
            ConstraintType::Identity => "Identity",
            ConstraintType::RowGuidCol => "RowGuidCol",
            ConstraintType::Unique => "Unique",
            ConstraintType::Check => "Check",
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
