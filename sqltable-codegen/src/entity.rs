//! Entity definition structures

use crate::error::{CodegenError, Result};
use crate::type_mapping::{is_nullable, TypeMap};
use proc_macro2::{Ident, Span};
use sqltable::Table;
use std::collections::HashSet;
use syn::Type;

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// Entity definition built from a parsed table
#[derive(Debug, Clone)]
pub struct EntityDefinition {
    /// Struct name, PascalCase of the table name
    pub name: Ident,
    /// Module and file stem, snake_case of the table name
    pub module_name: String,
    /// `module_name` as an identifier, escaped if it is a keyword
    pub module: Ident,
    pub schema_name: String,
    pub table_name: String,
    pub fields: Vec<FieldDefinition>,
    /// Primary key column names as declared
    pub primary_key: Vec<String>,
    /// Table diagnostic string, rendered as the struct doc comment
    pub doc: String,
}

/// Field definition within an entity
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub name: Ident,
    pub ty: Type,
    /// Column name in the database
    pub column_name: String,
    pub is_primary_key: bool,
    pub is_nullable: bool,
    pub is_auto_increment: bool,
    pub is_computed: bool,
    pub doc: String,
}

impl EntityDefinition {
    pub fn from_table(table: &Table, type_map: &TypeMap) -> Result<Self> {
        let mut used = HashSet::new();
        let mut fields = Vec::with_capacity(table.columns.len());

        for column in &table.columns {
            // Deduplicate on the emitted identifier, escaping included
            let base = to_snake_case(&column.name);
            let mut name = rust_ident(&base, &column.name)?;
            let mut suffix = 2;
            while used.contains(&name.to_string()) {
                name = rust_ident(&format!("{}_{}", base, suffix), &column.name)?;
                suffix += 1;
            }
            used.insert(name.to_string());

            fields.push(FieldDefinition {
                name,
                ty: type_map.rust_type(column)?,
                column_name: column.name.clone(),
                is_primary_key: column.is_primary_key(),
                is_nullable: is_nullable(column),
                is_auto_increment: column.is_identity(),
                is_computed: column.computed,
                doc: column.diagnostic_string().trim_end().to_string(),
            });
        }

        let module_name = to_snake_case(&table.name);
        Ok(Self {
            name: rust_ident(&to_pascal_case(&table.name), &table.name)?,
            module: rust_ident(&module_name, &table.name)?,
            module_name,
            schema_name: table.schema.clone(),
            table_name: table.name.clone(),
            fields,
            primary_key: table.primary_key_columns.as_slice().to_vec(),
            doc: table.diagnostic_string().trim_end().to_string(),
        })
    }

    pub fn primary_key_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.is_primary_key)
    }

    pub fn identity_field(&self) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.is_auto_increment)
    }

    pub fn computed_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.is_computed)
    }
}

/// `order_line`, `Order Line` and `orderLine` all become `OrderLine`.
pub fn to_pascal_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            }
        })
        .collect()
}

/// `OrderId` becomes `order_id`, `RowGUID` becomes `row_guid`.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut snake = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !snake.ends_with('_') {
                snake.push('_');
            }
            continue;
        }
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary && !snake.ends_with('_') {
                snake.push('_');
            }
        }
        snake.push(c.to_ascii_lowercase());
    }

    snake.trim_matches('_').to_string()
}

/// Identifier for `candidate`, escaping keywords. `original` is the SQL name
/// it was derived from, for error reporting.
fn rust_ident(candidate: &str, original: &str) -> Result<Ident> {
    if candidate.is_empty() {
        return Err(CodegenError::InvalidIdentifier(original.to_string()));
    }

    let candidate = if candidate.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", candidate)
    } else {
        candidate.to_string()
    };

    if NON_RAW_KEYWORDS.contains(&candidate.as_str()) {
        Ok(Ident::new(&format!("{}_", candidate), Span::call_site()))
    } else if KEYWORDS.contains(&candidate.as_str()) {
        Ok(Ident::new_raw(&candidate, Span::call_site()))
    } else {
        Ok(Ident::new(&candidate, Span::call_site()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqltable::{ConstraintType, TableColumn};

    #[test]
    fn test_case_conversions() {
        assert_eq!(to_pascal_case("order_line"), "OrderLine");
        assert_eq!(to_pascal_case("Order Line"), "OrderLine");
        assert_eq!(to_pascal_case("orderLine"), "OrderLine");

        assert_eq!(to_snake_case("OrderId"), "order_id");
        assert_eq!(to_snake_case("RowGUID"), "row_guid");
        assert_eq!(to_snake_case("HTTPStatus"), "http_status");
        assert_eq!(to_snake_case("Address Line 2"), "address_line_2");
        assert_eq!(to_snake_case("ID"), "id");
        assert_eq!(to_snake_case("Line2Total"), "line2_total");
    }

    #[test]
    fn test_keywords_and_digits_are_escaped() {
        assert_eq!(rust_ident("type", "Type").unwrap().to_string(), "r#type");
        assert_eq!(rust_ident("self", "Self").unwrap().to_string(), "self_");
        assert_eq!(rust_ident("1st", "1st").unwrap().to_string(), "_1st");
        assert!(matches!(
            rust_ident("", "¤"),
            Err(CodegenError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_from_table() {
        let mut table = Table::new("sales", "order_line", "");
        table.columns = vec![
            TableColumn {
                name: "OrderId".to_string(),
                data_type: "INT".to_string(),
                is_primary_key_explicit: true,
                ..Default::default()
            },
            TableColumn {
                name: "Type".to_string(),
                data_type: "VARCHAR".to_string(),
                constraint_type: ConstraintType::NotNull,
                ..Default::default()
            },
            TableColumn {
                name: "order_id".to_string(),
                data_type: "INT".to_string(),
                computed: true,
                ..Default::default()
            },
        ];
        table.primary_key_columns.insert("OrderId");

        let entity = EntityDefinition::from_table(&table, &TypeMap::default()).unwrap();

        assert_eq!(entity.name.to_string(), "OrderLine");
        assert_eq!(entity.module_name, "order_line");
        assert_eq!(entity.primary_key, vec!["OrderId".to_string()]);

        let names: Vec<_> = entity.fields.iter().map(|f| f.name.to_string()).collect();
        assert_eq!(names, vec!["order_id", "r#type", "order_id_2"]);
        assert!(entity.fields[0].is_primary_key);
        assert!(!entity.fields[1].is_nullable);
        assert!(entity.fields[2].is_nullable);
        assert_eq!(entity.computed_fields().count(), 1);
        assert!(entity.identity_field().is_none());
    }

    #[test]
    fn test_escaped_names_do_not_collide() {
        let mut table = Table::new("dbo", "Node", "");
        table.columns = ["self", "self_", "1st", "_1st"]
            .iter()
            .map(|name| TableColumn {
                name: name.to_string(),
                data_type: "INT".to_string(),
                ..Default::default()
            })
            .collect();

        let entity = EntityDefinition::from_table(&table, &TypeMap::default()).unwrap();

        let names: Vec<_> = entity.fields.iter().map(|f| f.name.to_string()).collect();
        assert_eq!(names, vec!["self_", "self_2", "_1st", "_1st_2"]);
    }
}
