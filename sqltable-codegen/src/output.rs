//! Output path templating and file writing.
//!
//! Output paths may contain `{Database}`, `{Schema}`, `{Table}` and
//! `{Entity}` (the snake_case module name). When the expanded path names an
//! existing directory, a per-table file name is appended.

use crate::error::{CodegenError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(Database|Schema|Table|Entity)\}").expect("placeholder pattern is valid")
});

/// Values substituted into an output path template.
#[derive(Debug, Clone, Copy, Default)]
pub struct Placeholders<'a> {
    pub database: &'a str,
    pub schema: &'a str,
    pub table: &'a str,
    pub entity: &'a str,
}

impl<'a> Placeholders<'a> {
    pub fn database(database: &'a str) -> Self {
        Self {
            database,
            ..Default::default()
        }
    }

    /// Replace every known placeholder; unknown `{...}` text is kept.
    pub fn expand(&self, template: &str) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| match &caps[1] {
                "Database" => self.database.to_string(),
                "Schema" => self.schema.to_string(),
                "Table" => self.table.to_string(),
                _ => self.entity.to_string(),
            })
            .into_owned()
    }

    /// Expand `template`; if the result is an existing directory, append
    /// `{file_stem}.{extension}`.
    pub fn output_path(&self, template: &str, file_stem: &str, extension: &str) -> PathBuf {
        let path = PathBuf::from(self.expand(template));
        if path.is_dir() {
            path.join(format!("{}.{}", file_stem, extension))
        } else {
            path
        }
    }
}

/// Write `contents`, creating parent directories as needed.
pub fn write_output_file(path: &Path, contents: &str) -> Result<()> {
    let io_error = |source: std::io::Error| CodegenError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, contents).map_err(io_error)?;

    log::info!("Generated {}", path.display());
    Ok(())
}
