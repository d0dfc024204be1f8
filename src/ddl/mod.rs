//! T-SQL DDL front-end.
//!
//! Turns a script into [`Statement`]s: every `CREATE TABLE` becomes a full
//! [`CreateTableStatement`] tree, anything else is kept as raw text so the
//! caller can skip it. Batches separated by `GO` lines are handled as one
//! stream.
//!
//! ```
//! use sqltable::ddl::{parse_statements, Statement};
//!
//! let statements = parse_statements("CREATE TABLE T (Id INT PRIMARY KEY)", "dbo").unwrap();
//! match &statements[0] {
//!     Statement::CreateTable(table) => assert_eq!(table.schema_name, "dbo"),
//!     Statement::Other { .. } => unreachable!(),
//! }
//! ```

mod parser;
mod scanner;
mod token;

pub use parser::Parser;
pub use scanner::Scanner;
pub use token::{Token, TokenKind};

use crate::ast::CreateTableStatement;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateTable(CreateTableStatement),
    /// Any statement other than `CREATE TABLE`, unparsed
    Other { sql: String },
}

/// Parse a script. Tables without a schema get `default_schema`.
pub fn parse_statements(source: &str, default_schema: &str) -> Result<Vec<Statement>, ParseError> {
    let tokens = Scanner::new(source).tokenize()?;
    Parser::new(source, tokens, default_schema).statements()
}

/// Only the `CREATE TABLE` statements of a script, in source order.
pub fn parse_create_tables(
    source: &str,
    default_schema: &str,
) -> Result<Vec<CreateTableStatement>, ParseError> {
    Ok(parse_statements(source, default_schema)?
        .into_iter()
        .filter_map(|statement| match statement {
            Statement::CreateTable(table) => Some(table),
            Statement::Other { .. } => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{LiteralType, Node};
    use crate::schema::ConstraintType;

    fn single_table(source: &str) -> CreateTableStatement {
        let mut tables = parse_create_tables(source, "dbo").unwrap();
        assert_eq!(tables.len(), 1, "expected one table in {}", source);
        tables.remove(0)
    }

    fn column_children(node: &Node) -> &[Node] {
        match node {
            Node::ColumnDefinition(definition) => &definition.children,
            Node::ComputedColumnDefinition(definition) => &definition.children,
            other => panic!("not a column: {:?}", other),
        }
    }

    #[test]
    fn test_table_names() {
        assert_eq!(single_table("CREATE TABLE T (A INT)").schema_name, "dbo");

        let table = single_table("CREATE TABLE [sales].[Order Line] (A INT)");
        assert_eq!(table.schema_name, "sales");
        assert_eq!(table.object_name, "Order Line");

        let table = single_table("CREATE TABLE Shop.audit.Log (A INT)");
        assert_eq!(table.schema_name, "audit");
        assert_eq!(table.object_name, "Log");

        let table = single_table("CREATE TABLE Shop..Log (A INT)");
        assert_eq!(table.schema_name, "dbo");
    }

    #[test]
    fn test_other_statements_are_skipped() {
        let source = "SET ANSI_NULLS ON\nGO\nCREATE TABLE T (A INT)\nGO\n\
                      CREATE PROCEDURE P AS BEGIN CREATE TABLE #tmp (X INT) END\nGO\n\
                      CREATE INDEX IX ON T (A);";
        let statements = parse_statements(source, "dbo").unwrap();

        let kinds: Vec<_> = statements
            .iter()
            .map(|statement| match statement {
                Statement::CreateTable(table) => format!("table {}", table.object_name),
                Statement::Other { sql } => format!("other {}", sql.split_whitespace().next().unwrap_or("")),
            })
            .collect();
        assert_eq!(kinds, vec!["other SET", "table T", "other CREATE", "other CREATE"]);
    }

    #[test]
    fn test_source_text_covers_statement() {
        let table = single_table("-- header\nCREATE TABLE T (A INT) ON [PRIMARY];\nGO");
        assert_eq!(table.source_text, "CREATE TABLE T (A INT) ON [PRIMARY]");
        assert_eq!(table.definition.sql, "(A INT)");
    }

    #[test]
    fn test_column_definition_children() {
        let table = single_table(
            "CREATE TABLE T ([Id] INT IDENTITY(1,1) NOT NULL, Price DECIMAL(18, 2) NULL, Body NVARCHAR(MAX) COLLATE Latin1_General_CI_AS)",
        );
        let columns = &table.definition.children;
        assert_eq!(columns.len(), 3);

        let id = column_children(&columns[0]);
        assert!(matches!(&id[0], Node::Identifier(i) if i.value == "Id"));
        assert!(matches!(&id[1], Node::DataType(d) if d.type_name() == "INT"));
        assert!(matches!(&id[2], Node::ColumnIdentity(m) if m.sql == "IDENTITY(1,1)"));
        assert!(matches!(&id[3], Node::Constraint(c) if c.kind == ConstraintType::NotNull));
        assert_eq!(columns[0].sql(), "[Id] INT IDENTITY(1,1) NOT NULL");

        let price = column_children(&columns[1]);
        match &price[1] {
            Node::DataType(d) => {
                assert_eq!(d.argument1, Some(18));
                assert_eq!(d.argument2, Some(2));
            }
            other => panic!("unexpected {:?}", other),
        }

        let body = column_children(&columns[2]);
        match &body[1] {
            Node::DataType(d) => {
                assert!(d.is_maximum);
                assert_eq!(d.argument1, None);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(&body[2], Node::Collation(_)));
    }

    #[test]
    fn test_schema_qualified_data_type() {
        let table = single_table("CREATE TABLE T (Phone [dbo].[PhoneNumber] NULL)");
        let children = column_children(&table.definition.children[0]);
        match &children[1] {
            Node::DataType(d) => {
                assert_eq!(d.object_identifier.schema_name.as_deref(), Some("dbo"));
                assert_eq!(d.type_name(), "PhoneNumber");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_inline_constraints() {
        let table = single_table(
            "CREATE TABLE T (\
               Id INT CONSTRAINT PK_T PRIMARY KEY CLUSTERED,\
               Code CHAR(2) NOT NULL CONSTRAINT DF_Code DEFAULT ('XX') UNIQUE,\
               ParentId INT REFERENCES dbo.T (Id) ON DELETE NO ACTION,\
               Qty INT CHECK (Qty > 0),\
               Guid UNIQUEIDENTIFIER ROWGUIDCOL)",
        );
        let columns = &table.definition.children;

        match &column_children(&columns[0])[2] {
            Node::PrimaryKeyConstraint(pk) => {
                assert!(matches!(&pk.children[0], Node::Identifier(i) if i.value == "PK_T"));
                assert_eq!(pk.indexed_columns().count(), 0);
            }
            other => panic!("unexpected {:?}", other),
        }

        let kinds = |node: &Node| -> Vec<ConstraintType> {
            column_children(node)
                .iter()
                .filter_map(|child| match child {
                    Node::Constraint(c) => Some(c.kind),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(
            kinds(&columns[1]),
            vec![ConstraintType::NotNull, ConstraintType::Default, ConstraintType::Unique]
        );
        assert_eq!(kinds(&columns[2]), vec![ConstraintType::ForeignKey]);
        assert_eq!(kinds(&columns[3]), vec![ConstraintType::Check]);
        assert_eq!(kinds(&columns[4]), vec![ConstraintType::RowGuidCol]);
    }

    #[test]
    fn test_table_level_constraints() {
        let table = single_table(
            "CREATE TABLE T (A INT, B INT,\
               CONSTRAINT PK_T PRIMARY KEY CLUSTERED (A ASC, B DESC) WITH (FILLFACTOR = 80) ON [PRIMARY],\
               CONSTRAINT FK_T FOREIGN KEY (B) REFERENCES Other (Id),\
               INDEX IX_T NONCLUSTERED (B))",
        );
        let children = &table.definition.children;
        assert_eq!(children.len(), 5);

        match &children[2] {
            Node::PrimaryKeyConstraint(pk) => {
                let names: Vec<_> = pk.indexed_columns().map(|c| c.name.as_str()).collect();
                assert_eq!(names, vec!["A", "B"]);
                let options = pk
                    .children
                    .iter()
                    .filter(|child| matches!(child, Node::IndexOption(_)))
                    .count();
                assert_eq!(options, 2);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(&children[3], Node::Constraint(c) if c.kind == ConstraintType::ForeignKey));
        assert_eq!(children[4].type_name(), "IndexDefinition");
    }

    #[test]
    fn test_hash_key_and_constraint_leftovers() {
        let table = single_table(
            "CREATE TABLE T (Id INT NOT NULL,\
               CONSTRAINT PK_T PRIMARY KEY NONCLUSTERED HASH (Id) WITH (BUCKET_COUNT = 8),\
               CONSTRAINT DF_T DEFAULT 0 FOR Id)",
        );
        let children = &table.definition.children;
        assert_eq!(children.len(), 4);

        match &children[1] {
            Node::PrimaryKeyConstraint(pk) => {
                let names: Vec<_> = pk.indexed_columns().map(|c| c.name.as_str()).collect();
                assert_eq!(names, vec!["Id"]);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(&children[2], Node::Constraint(c) if c.kind == ConstraintType::Default));
        assert_eq!(children[3].type_name(), "ConstraintOption");
        assert_eq!(children[3].sql(), "FOR Id");
    }

    #[test]
    fn test_computed_columns() {
        let table = single_table(
            "CREATE TABLE T (\
               FullName AS ISNULL(FirstName, ''),\
               OrderDay AS CONVERT([date], OrderedAt) PERSISTED NOT NULL,\
               Total AS ([Qty] * [Price]),\
               Label AS CASE Status WHEN 'A' THEN 1 ELSE 0 END,\
               Copy AS (Original))",
        );
        let columns = &table.definition.children;

        match &column_children(&columns[0])[1] {
            Node::FunctionCall(call) => {
                assert_eq!(call.function_name, "ISNULL");
                assert!(matches!(&call.arguments[0], Node::ColumnRef(c) if c.column_name == "FirstName"));
                assert!(matches!(&call.arguments[1], Node::Literal(l) if l.literal_type == LiteralType::String));
            }
            other => panic!("unexpected {:?}", other),
        }

        let order_day = column_children(&columns[1]);
        match &order_day[1] {
            Node::FunctionCall(call) => {
                assert!(matches!(&call.arguments[0], Node::DataType(d) if d.type_name() == "date"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(&order_day[2], Node::Constraint(c) if c.kind == ConstraintType::NotNull));

        assert_eq!(column_children(&columns[2])[1].type_name(), "BinaryExpression");

        match &column_children(&columns[3])[1] {
            Node::Case(case) => {
                assert!(case.operand.is_some());
                assert_eq!(case.when_clauses.len(), 1);
                assert!(matches!(&case.when_clauses[0].then, Node::Literal(l) if l.literal_type == LiteralType::Integer));
                assert!(case.else_result.is_some());
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(matches!(&column_children(&columns[4])[1], Node::ColumnRef(c) if c.column_name == "Original"));
    }

    #[test]
    fn test_searched_case_condition() {
        let table = single_table(
            "CREATE TABLE T (Kind AS CASE WHEN Amount IS NOT NULL AND Amount > 0 THEN N'credit' END)",
        );
        match &column_children(&table.definition.children[0])[1] {
            Node::Case(case) => {
                assert!(case.operand.is_none());
                assert_eq!(case.when_clauses[0].when.type_name(), "BinaryExpression");
                assert!(matches!(&case.when_clauses[0].then, Node::Literal(l) if l.literal_type == LiteralType::UnicodeString));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_column_options() {
        let table = single_table("CREATE TABLE T (Note NVARCHAR(10) SPARSE NULL)");
        let children = column_children(&table.definition.children[0]);
        assert_eq!(children[2].type_name(), "ColumnOption");
        assert_eq!(children[2].sql(), "SPARSE");
        assert!(matches!(&children[3], Node::Constraint(c) if c.kind == ConstraintType::Null));
    }

    #[test]
    fn test_column_without_type() {
        let table = single_table("CREATE TABLE T (Id NOT NULL)");
        let children = column_children(&table.definition.children[0]);
        assert_eq!(children.len(), 2);
        assert!(matches!(&children[1], Node::Constraint(_)));
    }

    #[test]
    fn test_trailing_comma_is_accepted() {
        let table = single_table("CREATE TABLE T (A INT, B INT,)");
        assert_eq!(table.definition.children.len(), 2);
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = parse_statements("CREATE TABLE T\n(\n  A INT,\n  B DECIMAL(18, 2\n", "dbo").unwrap_err();
        assert!(err.line >= 4, "line was {}", err.line);
    }
}
