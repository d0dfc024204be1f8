//! Cross-column resolution.
//!
//! Runs after extraction on the table's own data, never on the syntax tree:
//!
//! 1. every primary key name flags the first column with a matching name
//! 2. every computed column with a reference takes the referenced column's
//!    data type, or the reference itself when no column matches (a type token
//!    such as `date` from `CONVERT([date], ...)`)
//!
//! Running it twice leaves the table unchanged.

use crate::schema::{names_match, Table};

pub fn resolve(table: &mut Table) {
    mark_primary_keys(table);
    propagate_reference_types(table);
}

fn mark_primary_keys(table: &mut Table) {
    let Table {
        columns,
        primary_key_columns,
        ..
    } = table;

    for key in primary_key_columns.iter() {
        if let Some(column) = columns.iter_mut().find(|column| names_match(&column.name, key)) {
            column.is_primary_key_explicit = true;
        }
    }
}

fn propagate_reference_types(table: &mut Table) {
    // A reference to a later computed column settles on a following pass
    for _ in 0..table.columns.len() {
        if !propagate_once(table) {
            break;
        }
    }
}

/// One declaration-order pass. Returns whether any type changed.
fn propagate_once(table: &mut Table) -> bool {
    let mut changed = false;
    for index in 0..table.columns.len() {
        let Some(reference) = table.columns[index].reference().map(str::to_string) else {
            continue;
        };

        let data_type = match table.column(&reference) {
            Some(referenced) => referenced.data_type.clone(),
            None => reference,
        };
        if table.columns[index].data_type != data_type {
            log::debug!(
                "{} {} takes type {} from {}",
                table.qualified_name(),
                table.columns[index].name,
                data_type,
                table.columns[index].reference().unwrap_or_default()
            );
            table.columns[index].data_type = data_type;
            changed = true;
        }
    }
    changed
}
