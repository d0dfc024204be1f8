//! JSON documents for tables.
//!
//! Keys are camelCase and default values (null, `false`, `0`, constraint
//! type `None`) are left out. Derived flags such as `isPrimaryKey` are
//! written alongside the stored fields so consumers need not recompute them.

use crate::error::Result;
use serde_json::{Map, Value};
use sqltable::{ConstraintType, Table, TableColumn};

/// The document for one table.
pub fn table_document(table: &Table) -> Result<Value> {
    let mut document = serde_json::to_value(table)?;

    if let Value::Object(object) = &mut document {
        let derived = [
            ("multiplePrimaryKeys", Value::from(table.multiple_primary_keys())),
            ("hasIdentityColumn", Value::from(table.has_identity_column())),
            ("sourceFolder", path_value(table.source_folder().map(|p| p.to_string_lossy()))),
            ("sourceFileName", path_value(table.source_file_name().map(Into::into))),
            ("sourceBaseFileName", path_value(table.source_base_file_name().map(Into::into))),
            ("outputFolder", path_value(table.output_folder().map(|p| p.to_string_lossy()))),
            ("outputFileName", path_value(table.output_file_name().map(Into::into))),
            ("outputBaseFileName", path_value(table.output_base_file_name().map(Into::into))),
        ];
        for (key, value) in derived {
            object.insert(key.to_string(), value);
        }

        if let Some(Value::Array(columns)) = object.get_mut("columns") {
            for (value, column) in columns.iter_mut().zip(&table.columns) {
                if let Value::Object(column_object) = value {
                    insert_column_flags(column_object, column);
                }
            }
        }
    }

    prune_defaults(&mut document);
    Ok(document)
}

/// Pretty-printed document for one table.
pub fn to_json(table: &Table) -> Result<String> {
    Ok(serde_json::to_string_pretty(&table_document(table)?)?)
}

fn path_value(path: Option<std::borrow::Cow<'_, str>>) -> Value {
    path.filter(|p| !p.is_empty())
        .map(|p| Value::String(p.into_owned()))
        .unwrap_or(Value::Null)
}

fn insert_column_flags(object: &mut Map<String, Value>, column: &TableColumn) {
    let flags = [
        ("isPrimaryKey", column.is_primary_key()),
        ("isIdentity", column.is_identity()),
        ("isPrimaryKeyConstraint", column.is_primary_key_constraint()),
        ("isIdentityConstraint", column.is_identity_constraint()),
        ("isNull", column.is_null()),
        ("isNotNull", column.is_not_null()),
        ("isDefault", column.is_default()),
        ("isForeignKey", column.is_foreign_key()),
        ("isRowGuidCol", column.is_row_guid_col()),
        ("isUnique", column.is_unique()),
        ("isCheck", column.is_check()),
    ];
    for (key, flag) in flags {
        object.insert(key.to_string(), Value::Bool(flag));
    }
}

fn prune_defaults(value: &mut Value) {
    match value {
        Value::Object(object) => {
            object.retain(|key, value| !is_default(key, value));
            object.values_mut().for_each(prune_defaults);
        }
        Value::Array(items) => items.iter_mut().for_each(prune_defaults),
        _ => {}
    }
}

fn is_default(key: &str, value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => key == "constraintType" && text == ConstraintType::None.as_str(),
        _ => false,
    }
}
