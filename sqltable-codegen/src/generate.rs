//! Generation actions over a set of loaded tables.

use crate::entity::EntityDefinition;
use crate::error::Result;
use crate::json;
use crate::output::{write_output_file, Placeholders};
use crate::type_mapping::TypeMap;
use crate::writer::EntityWriter;
use sqltable::Table;
use std::path::PathBuf;

/// File written for the context action when the output path is a directory.
const CONTEXT_FILE_NAME: &str = "mod.rs";

pub struct Generator {
    database: String,
    output_template: String,
    type_map: TypeMap,
    writer: EntityWriter,
}

impl Generator {
    pub fn new(
        database: impl Into<String>,
        output_template: impl Into<String>,
        type_map: TypeMap,
    ) -> Self {
        Self {
            database: database.into(),
            output_template: output_template.into(),
            type_map,
            writer: EntityWriter::new(),
        }
    }

    /// One Rust file per table. Each table's `output_file_path` is set to the
    /// file written for it.
    pub fn entities(&self, tables: &mut [Table]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(tables.len());

        for table in tables.iter_mut() {
            let entity = EntityDefinition::from_table(table, &self.type_map)?;
            let path = self
                .placeholders(table, &entity.module_name)
                .output_path(&self.output_template, &entity.module_name, "rs");

            let contents = self.writer.generate_entity_code(&entity);
            log::debug!("{}", contents);
            write_output_file(&path, &contents)?;

            table.output_file_path = Some(path.to_string_lossy().into_owned());
            written.push(path);
        }
        Ok(written)
    }

    /// One module file declaring every table's entity.
    pub fn context(&self, tables: &[Table]) -> Result<PathBuf> {
        let entities = tables
            .iter()
            .map(|table| EntityDefinition::from_table(table, &self.type_map))
            .collect::<Result<Vec<_>>>()?;

        let template = Placeholders::database(&self.database).expand(&self.output_template);
        let path = PathBuf::from(template);
        let path = if path.is_dir() {
            path.join(CONTEXT_FILE_NAME)
        } else {
            path
        };

        let contents = self.writer.generate_context_code(&self.database, &entities);
        log::debug!("{}", contents);
        write_output_file(&path, &contents)?;
        Ok(path)
    }

    /// One JSON document per table, always with a `.json` extension.
    pub fn json(&self, tables: &mut [Table]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(tables.len());

        for table in tables.iter_mut() {
            let entity = crate::entity::to_snake_case(&table.name);
            let path = self
                .placeholders(table, &entity)
                .output_path(&self.output_template, &table.name, "json")
                .with_extension("json");

            table.output_file_path = Some(path.to_string_lossy().into_owned());
            write_output_file(&path, &json::to_json(table)?)?;
            written.push(path);
        }
        Ok(written)
    }

    fn placeholders<'a>(&'a self, table: &'a Table, entity: &'a str) -> Placeholders<'a> {
        Placeholders {
            database: &self.database,
            schema: &table.schema,
            table: &table.name,
            entity,
        }
    }
}
