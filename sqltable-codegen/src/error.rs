//! Error types for codegen

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read settings {}: {source}", .path.display())]
    SettingsIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings {}: {source}", .path.display())]
    Settings {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A type map entry that is not a Rust type
    #[error("invalid Rust type `{rust_type}` for SQL type {sql_type}")]
    InvalidType { sql_type: String, rust_type: String },

    #[error("cannot derive a Rust identifier from `{0}`")]
    InvalidIdentifier(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CodegenError>;
