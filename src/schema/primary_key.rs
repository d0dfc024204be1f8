//! Primary key accumulation for a table under construction.
//!
//! Primary key names arrive from several places while a `CREATE TABLE` is
//! walked: table-level `PRIMARY KEY (...)` constraints, inline composite keys
//! and single-column `PRIMARY KEY` shorthands. [`PrimaryKeyColumns`] owns the
//! merged result and keeps it normalized after every merge:
//!
//! - sorted case-insensitively (ties broken by the original text)
//! - free of case-insensitive duplicates, keeping the casing seen first

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Compare two SQL identifiers the way the schema model does (ASCII case-insensitive).
pub fn names_match(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right)
}

fn compare_names(left: &String, right: &String) -> Ordering {
    left.to_ascii_lowercase()
        .cmp(&right.to_ascii_lowercase())
        .then_with(|| left.cmp(right))
}

/// Sorted, case-insensitively unique list of primary key column names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PrimaryKeyColumns {
    names: Vec<String>,
}

impl PrimaryKeyColumns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge names into the key, then re-sort.
    ///
    /// Blank names are not column names and are dropped.
    pub fn merge<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if name.trim().is_empty() || self.contains(&name) {
                continue;
            }
            self.names.push(name);
        }
        self.names.sort_by(compare_names);
    }

    /// Merge a single name.
    pub fn insert(&mut self, name: impl Into<String>) {
        self.merge(std::iter::once(name.into()));
    }

    /// Case-insensitive membership.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| names_match(existing, name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }
}

impl From<Vec<String>> for PrimaryKeyColumns {
    fn from(names: Vec<String>) -> Self {
        let mut columns = PrimaryKeyColumns::new();
        columns.merge(names);
        columns
    }
}

impl From<PrimaryKeyColumns> for Vec<String> {
    fn from(columns: PrimaryKeyColumns) -> Self {
        columns.names
    }
}

impl<'a> IntoIterator for &'a PrimaryKeyColumns {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}
