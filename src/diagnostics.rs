//! Advisory diagnostics raised while extracting a table.
//!
//! Nothing here is fatal. Unknown syntax becomes a [`Severity::Warning`],
//! diagnostic mode adds [`Severity::Debug`] traces of what was extracted.
//! Every diagnostic is forwarded to the `log` facade and also kept so callers
//! can inspect them after the table is produced.

use crate::ast::Node;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Node kind for unknown syntax, empty for traces
    pub node_type: String,
    pub sql: String,
    pub file_path: String,
    pub message: String,
}

impl Diagnostic {
    pub fn unknown_node(node_type: &str, sql: &str, file_path: &str) -> Self {
        Self {
            severity: Severity::Warning,
            node_type: node_type.to_string(),
            sql: sql.to_string(),
            file_path: file_path.to_string(),
            message: format!("UNKNOWN {} {} in {}", node_type, sql, file_path),
        }
    }

    pub fn trace(message: impl Into<String>, file_path: &str) -> Self {
        Self {
            severity: Severity::Debug,
            node_type: String::new(),
            sql: String::new(),
            file_path: file_path.to_string(),
            message: message.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Per-statement diagnostic sink.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    file_path: String,
    diagnostic_mode: bool,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(file_path: impl Into<String>, diagnostic_mode: bool) -> Self {
        Self {
            file_path: file_path.into(),
            diagnostic_mode,
            entries: Vec::new(),
        }
    }

    pub fn diagnostic_mode(&self) -> bool {
        self.diagnostic_mode
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Report a node the extractor has no rule for.
    pub fn unknown(&mut self, node: &Node) {
        self.unknown_syntax(node.type_name(), node.sql());
    }

    pub fn unknown_syntax(&mut self, node_type: &str, sql: &str) {
        let diagnostic = Diagnostic::unknown_node(node_type, sql, &self.file_path);
        log::warn!("{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    /// Record a debug trace. No-op unless diagnostic mode is on.
    pub fn trace(&mut self, message: impl Into<String>) {
        if !self.diagnostic_mode {
            return;
        }
        let diagnostic = Diagnostic::trace(message, &self.file_path);
        log::debug!("{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.is_warning())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
