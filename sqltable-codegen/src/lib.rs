//! sqltable Codegen Library
//!
//! Turns tables parsed by `sqltable` into generated output: one Rust entity
//! file per table, a context module declaring all of them, or one JSON
//! document per table. The binary wires these to the command line.

pub mod entity;
pub mod error;
pub mod generate;
pub mod json;
pub mod output;
pub mod settings;
pub mod type_mapping;
pub mod writer;

pub use entity::{EntityDefinition, FieldDefinition};
pub use error::{CodegenError, Result};
pub use generate::Generator;
pub use settings::CodegenSettings;
pub use type_mapping::TypeMap;
pub use writer::EntityWriter;
