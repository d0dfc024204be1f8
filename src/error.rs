//! Error types for table extraction and loading.

use std::path::PathBuf;
use thiserror::Error;

pub use config::ConfigError;

/// A table that cannot be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Columns without a name or data type after extraction.
    #[error("{}", structural_defect_message(.summary, .missing_names, .missing_types))]
    StructuralDefect {
        schema: String,
        name: String,
        /// Table diagnostic string
        summary: String,
        /// Declaration text of every column without a name
        missing_names: Vec<String>,
        /// Name of every column without a data type
        missing_types: Vec<String>,
    },
}

fn structural_defect_message(
    summary: &str,
    missing_names: &[String],
    missing_types: &[String],
) -> String {
    let mut parts = Vec::new();
    if !missing_names.is_empty() {
        parts.push(format!(
            "Missing names for {} in {}",
            missing_names.join(", "),
            summary
        ));
    }
    if !missing_types.is_empty() {
        parts.push(format!(
            "Missing types for {} in {}",
            missing_types.join(", "),
            summary
        ));
    }
    parts.join("; ")
}

/// A source file that cannot be read or parsed. Other files are unaffected.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("syntax error in {} at line {line}: {message}", .path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("path does not exist: {}", .0.display())]
    Missing(PathBuf),
}

impl SourceError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            SourceError::Io { path, .. } | SourceError::Syntax { path, .. } => path,
            SourceError::Missing(path) => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
