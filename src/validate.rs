//! Structural checks on a resolved table.

use crate::error::TableError;
use crate::schema::Table;

/// Fail the table when any column lacks a name or a data type.
///
/// Both checks always run so the error lists every offending column.
pub fn validate(table: &Table) -> Result<(), TableError> {
    let missing_names: Vec<String> = table
        .columns
        .iter()
        .filter(|column| column.name.trim().is_empty())
        .map(|column| column.sql.clone())
        .collect();

    let missing_types: Vec<String> = table
        .columns
        .iter()
        .filter(|column| column.data_type.trim().is_empty())
        .map(|column| column.name.clone())
        .collect();

    if missing_names.is_empty() && missing_types.is_empty() {
        return Ok(());
    }

    Err(TableError::StructuralDefect {
        schema: table.schema.clone(),
        name: table.name.clone(),
        summary: table.diagnostic_string(),
        missing_names,
        missing_types,
    })
}
