//! Code generation writer

use crate::entity::EntityDefinition;
use proc_macro2::TokenStream;
use quote::quote;

#[derive(Debug, Default)]
pub struct EntityWriter;

impl EntityWriter {
    pub fn new() -> Self {
        Self
    }

    /// Generate the source file for one entity
    pub fn generate_entity_code(&self, entity: &EntityDefinition) -> String {
        let header = format!(
            "// Generated by sqltable-codegen from [{}].[{}]\n\
             // This file is generated - do not edit manually\n\n",
            entity.schema_name, entity.table_name
        );
        header + &format_code(&self.entity_tokens(entity).to_string())
    }

    /// Generate the module file that declares every entity
    pub fn generate_context_code(&self, database: &str, entities: &[EntityDefinition]) -> String {
        let header = format!(
            "// Generated by sqltable-codegen for database {}\n\
             // This file is generated - do not edit manually\n\n",
            database
        );
        header + &format_code(&self.context_tokens(database, entities).to_string())
    }

    fn entity_tokens(&self, entity: &EntityDefinition) -> TokenStream {
        let entity_name = &entity.name;
        let entity_doc = format!(" {}", entity.doc);
        let schema_name = &entity.schema_name;
        let table_name = &entity.table_name;
        let primary_key = &entity.primary_key;

        let fields = entity.fields.iter().map(|f| {
            let field_name = &f.name;
            let field_type = &f.ty;
            let column_name = f.column_name.as_str();
            let doc = format!(" {}", f.doc);
            quote! {
                #[doc = #doc]
                #[serde(rename = #column_name)]
                pub #field_name: #field_type,
            }
        });

        let identity_column = match entity.identity_field() {
            Some(f) => {
                let column_name = f.column_name.as_str();
                quote! { Some(#column_name) }
            }
            None => quote! { None },
        };

        let computed_columns = entity.computed_fields().map(|f| f.column_name.as_str());

        quote! {
            use serde::{Deserialize, Serialize};

            #[doc = #entity_doc]
            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            pub struct #entity_name {
                #(#fields)*
            }

            impl #entity_name {
                pub const SCHEMA_NAME: &'static str = #schema_name;
                pub const TABLE_NAME: &'static str = #table_name;
                pub const PRIMARY_KEY: &'static [&'static str] = &[#(#primary_key),*];
                pub const IDENTITY_COLUMN: Option<&'static str> = #identity_column;
                pub const COMPUTED_COLUMNS: &'static [&'static str] = &[#(#computed_columns),*];
            }
        }
    }

    fn context_tokens(&self, database: &str, entities: &[EntityDefinition]) -> TokenStream {
        let modules: Vec<_> = entities.iter().map(|e| &e.module).collect();
        let names = entities.iter().map(|e| &e.name);
        let schemas = entities.iter().map(|e| e.schema_name.as_str());
        let tables = entities.iter().map(|e| e.table_name.as_str());

        quote! {
            #(pub mod #modules;)*

            #(pub use #modules::#names;)*

            pub const DATABASE_NAME: &str = #database;

            /// `(schema, table)` for every generated entity
            pub const TABLES: &[(&str, &str)] = &[#((#schemas, #tables)),*];
        }
    }
}

/// Format Rust code using rustfmt, returning it unchanged when rustfmt is
/// unavailable or rejects it
fn format_code(code: &str) -> String {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let child = Command::new("rustfmt")
        .args(["--edition", "2021", "--emit", "stdout"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(err) => {
            log::debug!("rustfmt not available: {}", err);
            return code.to_string();
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        if let Err(err) = stdin.write_all(code.as_bytes()) {
            log::debug!("rustfmt stdin: {}", err);
        }
    }

    match child.wait_with_output() {
        Ok(output) if output.status.success() => {
            String::from_utf8(output.stdout).unwrap_or_else(|_| code.to_string())
        }
        Ok(output) => {
            log::debug!("rustfmt failed: {}", String::from_utf8_lossy(&output.stderr));
            code.to_string()
        }
        Err(err) => {
            log::debug!("rustfmt failed: {}", err);
            code.to_string()
        }
    }
}
