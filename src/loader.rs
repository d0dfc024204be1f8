//! Loading tables from `.sql` files and directories.
//!
//! [`TableParser`] handles one file; [`TableLoader`] walks any mix of files
//! and directories and gathers every table, failure and diagnostic into a
//! [`LoadReport`]. A failing table or file never stops the others.

use crate::config::ParserConfig;
use crate::ddl;
use crate::diagnostics::Diagnostic;
use crate::error::{SourceError, TableError};
use crate::extract::{process_create_table, TableOutcome};
use crate::schema::Table;
use std::fs;
use std::path::{Path, PathBuf};

/// Directories never searched for scripts.
const SKIPPED_DIRS: &[&str] = &["target", ".git", "node_modules", "bin", "obj"];

/// Parses the `CREATE TABLE` statements of one file.
#[derive(Debug, Clone)]
pub struct TableParser {
    path: PathBuf,
    config: ParserConfig,
}

impl TableParser {
    pub fn new(path: impl Into<PathBuf>, config: &ParserConfig) -> Self {
        Self {
            path: path.into(),
            config: config.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file and process every table in it, in source order.
    pub fn parse_sql_for_tables(&self) -> Result<Vec<TableOutcome>, SourceError> {
        let source = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.parse_source(&source)
    }

    /// Process already loaded script text as if it came from this file.
    pub fn parse_source(&self, source: &str) -> Result<Vec<TableOutcome>, SourceError> {
        let statements = ddl::parse_create_tables(source, &self.config.default_schema)
            .map_err(|err| SourceError::Syntax {
                path: self.path.clone(),
                line: err.line,
                message: err.message,
            })?;

        let file_path = self.path.to_string_lossy();
        Ok(statements
            .iter()
            .map(|statement| process_create_table(statement, &file_path, &self.config))
            .collect())
    }
}

#[derive(Debug)]
pub enum LoadFailure {
    /// A table failed validation; its siblings in the file are unaffected
    Table { path: PathBuf, error: TableError },
    /// The whole file could not be used
    Source(SourceError),
}

impl std::fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadFailure::Table { path, error } => write!(f, "{}: {}", path.display(), error),
            LoadFailure::Source(error) => write!(f, "{}", error),
        }
    }
}

/// Everything a load produced.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub tables: Vec<Table>,
    pub failures: Vec<LoadFailure>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|diagnostic| diagnostic.is_warning())
    }
}

/// Loads tables from files and directories.
#[derive(Debug, Clone, Default)]
pub struct TableLoader {
    config: ParserConfig,
}

impl TableLoader {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Load every `.sql` file named by `paths`. Directories are searched
    /// recursively; missing paths are reported as failures.
    pub fn load<I, P>(&self, paths: I) -> LoadReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = LoadReport::default();

        for path in paths {
            let path = path.as_ref();
            if path.is_dir() {
                match find_sql_files(path) {
                    Ok(files) => {
                        for file in files {
                            self.load_file(&file, &mut report);
                        }
                    }
                    Err(err) => {
                        log::error!("{}", err);
                        report.failures.push(LoadFailure::Source(err));
                    }
                }
            } else if path.is_file() {
                self.load_file(path, &mut report);
            } else {
                log::error!("Missing path {}", path.display());
                report
                    .failures
                    .push(LoadFailure::Source(SourceError::Missing(path.to_path_buf())));
            }
        }

        log::info!(
            "Loaded {} table(s), {} failure(s)",
            report.tables.len(),
            report.failures.len()
        );
        report
    }

    fn load_file(&self, path: &Path, report: &mut LoadReport) {
        if self.config.diagnostic_mode {
            log::debug!("**************************");
            log::debug!("Parsing {}", path.display());
            log::debug!("**************************");
        }

        let outcomes = match TableParser::new(path, &self.config).parse_sql_for_tables() {
            Ok(outcomes) => outcomes,
            Err(err) => {
                log::error!("{}", err);
                report.failures.push(LoadFailure::Source(err));
                return;
            }
        };

        for outcome in outcomes {
            report.diagnostics.extend(outcome.diagnostics);
            match outcome.result {
                Ok(table) => {
                    log::debug!("{}", table.diagnostic_string());
                    for column in &table.columns {
                        log::debug!("{:<60} {}", column.diagnostic_string(), column.sql);
                    }
                    report.tables.push(table);
                }
                Err(error) => {
                    log::error!("{}: {}", path.display(), error);
                    report.failures.push(LoadFailure::Table {
                        path: path.to_path_buf(),
                        error,
                    });
                }
            }
        }
    }
}

/// All `.sql` files under `dir`, recursively, in sorted path order.
pub fn find_sql_files(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let mut files = Vec::new();
    find_sql_files_recursive(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn find_sql_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), SourceError> {
    let io_error = |source: std::io::Error| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();

        if path.is_dir() {
            let skipped = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| SKIPPED_DIRS.contains(&name));
            if !skipped {
                find_sql_files_recursive(&path, files)?;
            }
        } else if is_sql_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_sql_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("sql"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_source_keeps_sibling_tables() {
        let parser = TableParser::new("db/mixed.sql", &ParserConfig::default());
        let outcomes = parser
            .parse_source(
                "CREATE TABLE Good (Id INT PRIMARY KEY)\nGO\n\
                 CREATE TABLE Bad (Id NOT NULL)\nGO\n\
                 CREATE TABLE AlsoGood (Name VARCHAR(10))",
            )
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_ok());
        assert!(!outcomes[1].is_ok());
        assert!(outcomes[2].is_ok());

        let good = outcomes[0].result.as_ref().unwrap();
        assert_eq!(good.source_file_path, "db/mixed.sql");
    }

    #[test]
    fn test_parse_source_syntax_error() {
        let parser = TableParser::new("broken.sql", &ParserConfig::default());
        let err = parser.parse_source("CREATE TABLE T (A INT").unwrap_err();
        match err {
            SourceError::Syntax { path, line, .. } => {
                assert_eq!(path, PathBuf::from("broken.sql"));
                assert_eq!(line, 1);
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_find_sql_files_is_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b/nested")).unwrap();
        fs::create_dir_all(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("b/nested/z.sql"), "").unwrap();
        fs::write(dir.path().join("a.SQL"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("target/skip.sql"), "").unwrap();

        let files = find_sql_files(dir.path()).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|file| file.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![PathBuf::from("a.SQL"), PathBuf::from("b/nested/z.sql")]
        );
    }

    #[test]
    fn test_missing_path_is_a_failure() {
        let loader = TableLoader::default();
        let report = loader.load(["definitely/not/here.sql"]);

        assert!(report.tables.is_empty());
        assert!(!report.is_success());
        assert!(matches!(
            &report.failures[0],
            LoadFailure::Source(SourceError::Missing(_))
        ));
    }
}
