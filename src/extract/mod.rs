//! Statement to table extraction.
//!
//! [`TableExtractor`] walks one [`CreateTableStatement`] and builds a
//! partially populated [`Table`]: columns in declaration order plus the
//! merged primary key. Cross-column facts (key flags, computed column types)
//! are left to [`crate::resolve`]; [`process_create_table`] runs the whole
//! extract, resolve, validate pipeline for one statement.

mod column;
mod computed;

use crate::ast::{CreateTableStatement, Node, PrimaryKeyConstraint};
use crate::config::ParserConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::TableError;
use crate::schema::{PrimaryKeyColumns, Table};

pub use column::extract_column;
pub use computed::extract_computed_column;

/// Walks `CREATE TABLE` statements for one source file.
#[derive(Debug)]
pub struct TableExtractor {
    diagnostics: Diagnostics,
}

impl TableExtractor {
    pub fn new(config: &ParserConfig, file_path: impl Into<String>) -> Self {
        Self {
            diagnostics: Diagnostics::new(file_path, config.diagnostic_mode),
        }
    }

    /// Build the table for one statement. Unknown children are reported and skipped.
    pub fn extract(&mut self, statement: &CreateTableStatement) -> Table {
        let mut table = Table::new(
            statement.schema_name.clone(),
            statement.object_name.clone(),
            statement.source_text.clone(),
        );
        self.diagnostics
            .trace(format!("{} {}", table.qualified_name(), statement.definition.sql));

        for child in &statement.definition.children {
            match child {
                Node::ColumnDefinition(definition) => {
                    let column = extract_column(
                        definition,
                        &mut table.primary_key_columns,
                        &mut self.diagnostics,
                    );
                    table.columns.push(column);
                }
                Node::ComputedColumnDefinition(definition) => {
                    let column = extract_computed_column(definition, &mut self.diagnostics);
                    table.columns.push(column);
                }
                Node::PrimaryKeyConstraint(constraint) => {
                    let names = primary_key_names(constraint, &mut self.diagnostics);
                    table.primary_key_columns.merge(names);
                }
                Node::Constraint(_) => {}
                other => self.diagnostics.unknown(other),
            }
        }

        table
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_vec()
    }
}

/// Column names listed by a table-level `PRIMARY KEY`.
fn primary_key_names(
    constraint: &PrimaryKeyConstraint,
    diagnostics: &mut Diagnostics,
) -> Vec<String> {
    let mut names = Vec::new();
    for child in &constraint.children {
        match child {
            Node::IndexedColumn(column) => names.push(column.name.clone()),
            Node::Identifier(_) | Node::IndexOption(_) => {}
            other => diagnostics.unknown(other),
        }
    }
    names
}

/// Merge an inline key into the table key.
///
/// With an indexed column list those names are the key. Without one the
/// declaring column is the key; the returned flag tells the caller to mark it.
pub(crate) fn merge_inline_primary_key(
    constraint: &PrimaryKeyConstraint,
    column_name: &str,
    key: &mut PrimaryKeyColumns,
) -> bool {
    let listed: Vec<&str> = constraint
        .indexed_columns()
        .map(|column| column.name.as_str())
        .collect();

    if listed.is_empty() {
        key.insert(column_name);
        true
    } else {
        key.merge(listed);
        false
    }
}

/// Result of running one statement through the pipeline.
#[derive(Debug)]
pub struct TableOutcome {
    pub result: Result<Table, TableError>,
    pub diagnostics: Vec<Diagnostic>,
}

impl TableOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Extract, resolve and validate one statement.
pub fn process_create_table(
    statement: &CreateTableStatement,
    file_path: &str,
    config: &ParserConfig,
) -> TableOutcome {
    let mut extractor = TableExtractor::new(config, file_path);
    let mut table = extractor.extract(statement);
    table.source_file_path = file_path.to_string();

    crate::resolve::resolve(&mut table);
    let result = crate::validate::validate(&table).map(|()| table);

    TableOutcome {
        result,
        diagnostics: extractor.into_diagnostics(),
    }
}


#[cfg(test)]
mod tests {
    use super::test_nodes::*;
    use super::*;
    use crate::schema::ConstraintType;

    fn customer() -> CreateTableStatement {
        statement(
            "dbo",
            "Customer",
            vec![
                column(
                    vec![ident("Id"), data_type("INT", None, None), identity()],
                    "Id INT IDENTITY",
                ),
                column(
                    vec![
                        ident("Status"),
                        data_type("CHAR", Some(1), None),
                        constraint(ConstraintType::NotNull),
                    ],
                    "Status CHAR(1) NOT NULL",
                ),
                primary_key(vec![ident("PK_Customer"), indexed("Id")]),
            ],
        )
    }

    #[test]
    fn test_extract_columns_in_order() {
        let config = ParserConfig::default();
        let mut extractor = TableExtractor::new(&config, "Customer.sql");
        let table = extractor.extract(&customer());

        assert_eq!(table.schema, "dbo");
        assert_eq!(table.name, "Customer");
        let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "Status"]);
        assert_eq!(table.columns[1].data_type_extra_info1, Some(1));
        assert_eq!(table.primary_key_columns.as_slice(), &["Id"]);
        assert!(extractor.diagnostics().is_empty());
    }

    #[test]
    fn test_generic_table_constraint_is_ignored() {
        let config = ParserConfig::default();
        let mut extractor = TableExtractor::new(&config, "a.sql");
        let table = extractor.extract(&statement(
            "dbo",
            "A",
            vec![
                column(vec![ident("X"), data_type("INT", None, None)], "X INT"),
                constraint(ConstraintType::Unique),
            ],
        ));

        assert_eq!(table.columns.len(), 1);
        assert!(extractor.diagnostics().is_empty());
    }

    #[test]
    fn test_unknown_table_element_is_reported() {
        let config = ParserConfig::default();
        let mut extractor = TableExtractor::new(&config, "a.sql");
        let table = extractor.extract(&statement(
            "dbo",
            "A",
            vec![
                column(vec![ident("X"), data_type("INT", None, None)], "X INT"),
                Node::unknown("IndexDefinition", "INDEX IX_X (X)"),
            ],
        ));

        assert_eq!(table.columns.len(), 1);
        let diagnostics = extractor.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "UNKNOWN IndexDefinition INDEX IX_X (X) in a.sql"
        );
    }

    #[test]
    fn test_unknown_primary_key_child_is_reported() {
        let config = ParserConfig::default();
        let mut extractor = TableExtractor::new(&config, "a.sql");
        let table = extractor.extract(&statement(
            "dbo",
            "A",
            vec![primary_key(vec![
                indexed("B"),
                Node::unknown("PartitionSpecification", "ON ps(B)"),
                indexed("a"),
            ])],
        ));

        assert_eq!(table.primary_key_columns.as_slice(), &["a", "B"]);
        assert_eq!(extractor.diagnostics().warnings().count(), 1);
    }

    #[test]
    fn test_process_create_table_resolves_and_validates() {
        let outcome = process_create_table(&customer(), "db/Customer.sql", &ParserConfig::default());
        let table = outcome.result.unwrap();

        assert_eq!(table.source_file_path, "db/Customer.sql");
        let id = table.column("Id").unwrap();
        assert!(id.is_primary_key());
        assert!(id.is_identity());
        assert!(table.column("Status").unwrap().is_not_null());
    }

    #[test]
    fn test_process_create_table_reports_structural_defect() {
        let broken = statement(
            "dbo",
            "Broken",
            vec![column(vec![data_type("INT", None, None)], "INT")],
        );
        let outcome = process_create_table(&broken, "b.sql", &ParserConfig::default());

        match outcome.result {
            Err(TableError::StructuralDefect { name, missing_names, .. }) => {
                assert_eq!(name, "Broken");
                assert_eq!(missing_names, vec!["INT".to_string()]);
            }
            other => panic!("expected structural defect, got {:?}", other),
        }
    }

    #[test]
    fn test_diagnostic_mode_traces_columns() {
        let config = ParserConfig::default().with_diagnostic_mode(true);
        let outcome = process_create_table(&customer(), "c.sql", &config);

        assert!(outcome.is_ok());
        // table + two columns
        assert_eq!(outcome.diagnostics.len(), 3);
        assert!(outcome.diagnostics.iter().all(|d| !d.is_warning()));
        assert!(outcome.diagnostics[1].message.starts_with("INT Id"));
    }
}
