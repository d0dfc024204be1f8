//! Schema model: tables, columns and their derived properties.

pub mod column;
pub mod constraint;
pub mod primary_key;
pub mod table;

pub use column::TableColumn;
pub use constraint::ConstraintType;
pub use primary_key::{names_match, PrimaryKeyColumns};
pub use table::Table;
