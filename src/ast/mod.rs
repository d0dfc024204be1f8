//! Syntax tree consumed by the extractor.
//!
//! The grammar front-end ([`crate::ddl`]) produces one [`CreateTableStatement`]
//! per `CREATE TABLE`. Everything below the statement is a [`Node`], a closed
//! set of the constructs the extractor understands plus an [`Node::Unknown`]
//! catch-all for everything else. Every node keeps its original source text so
//! diagnostics can quote it.

use crate::schema::ConstraintType;
use std::fmt;

/// One parsed `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableStatement {
    pub schema_name: String,
    pub object_name: String,
    pub source_text: String,
    pub definition: TableDefinition,
}

/// The parenthesized element list of a `CREATE TABLE`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDefinition {
    pub children: Vec<Node>,
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    ColumnDefinition(ColumnDefinition),
    ComputedColumnDefinition(ComputedColumnDefinition),
    PrimaryKeyConstraint(PrimaryKeyConstraint),
    Constraint(Constraint),
    Identifier(Identifier),
    DataType(DataTypeSpecification),
    ColumnIdentity(Marker),
    Collation(Marker),
    IndexedColumn(IndexedColumn),
    IndexOption(Marker),
    Case(CaseExpression),
    FunctionCall(FunctionCall),
    ColumnRef(ColumnRef),
    Literal(Literal),
    Unknown(UnknownNode),
}

impl Node {
    /// Node kind name used in diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Node::ColumnDefinition(_) => "ColumnDefinition",
            Node::ComputedColumnDefinition(_) => "ComputedColumnDefinition",
            Node::PrimaryKeyConstraint(_) => "PrimaryKeyConstraint",
            Node::Constraint(_) => "Constraint",
            Node::Identifier(_) => "Identifier",
            Node::DataType(_) => "DataTypeSpecification",
            Node::ColumnIdentity(_) => "ColumnIdentity",
            Node::Collation(_) => "Collation",
            Node::IndexedColumn(_) => "IndexedColumn",
            Node::IndexOption(_) => "IndexOption",
            Node::Case(_) => "CaseExpression",
            Node::FunctionCall(_) => "FunctionCallExpression",
            Node::ColumnRef(_) => "ColumnRefExpression",
            Node::Literal(_) => "LiteralExpression",
            Node::Unknown(node) => &node.type_name,
        }
    }

    /// Original source text of the node.
    pub fn sql(&self) -> &str {
        match self {
            Node::ColumnDefinition(node) => &node.sql,
            Node::ComputedColumnDefinition(node) => &node.sql,
            Node::PrimaryKeyConstraint(node) => &node.sql,
            Node::Constraint(node) => &node.sql,
            Node::Identifier(node) => &node.sql,
            Node::DataType(node) => &node.sql,
            Node::ColumnIdentity(node) | Node::Collation(node) | Node::IndexOption(node) => {
                &node.sql
            }
            Node::IndexedColumn(node) => &node.sql,
            Node::Case(node) => &node.sql,
            Node::FunctionCall(node) => &node.sql,
            Node::ColumnRef(node) => &node.sql,
            Node::Literal(node) => &node.sql,
            Node::Unknown(node) => &node.sql,
        }
    }

    pub fn unknown(type_name: impl Into<String>, sql: impl Into<String>) -> Self {
        Node::Unknown(UnknownNode {
            type_name: type_name.into(),
            sql: sql.into(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub children: Vec<Node>,
    pub sql: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedColumnDefinition {
    pub children: Vec<Node>,
    pub sql: String,
}

/// `PRIMARY KEY` constraint, inline or table level.
///
/// Children are the optional constraint name ([`Node::Identifier`]), the
/// indexed columns and any index options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryKeyConstraint {
    pub children: Vec<Node>,
    pub sql: String,
}

impl PrimaryKeyConstraint {
    pub fn indexed_columns(&self) -> impl Iterator<Item = &IndexedColumn> {
        self.children.iter().filter_map(|child| match child {
            Node::IndexedColumn(column) => Some(column),
            _ => None,
        })
    }
}

/// Any constraint other than `PRIMARY KEY`, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub kind: ConstraintType,
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub value: String,
    pub sql: String,
}

/// Possibly schema-qualified object name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectIdentifier {
    pub schema_name: Option<String>,
    pub object_name: String,
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema_name {
            Some(schema) => write!(f, "{}.{}", schema, self.object_name),
            None => f.write_str(&self.object_name),
        }
    }
}

/// Data type reference such as `DECIMAL(18, 2)` or `[dbo].[Phone]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTypeSpecification {
    pub object_identifier: ObjectIdentifier,
    pub argument1: Option<u32>,
    pub argument2: Option<u32>,
    /// `(MAX)` length
    pub is_maximum: bool,
    pub sql: String,
}

impl DataTypeSpecification {
    /// Canonical type name: the object name without schema.
    pub fn type_name(&self) -> &str {
        &self.object_identifier.object_name
    }
}

/// Syntax element without a payload (identity, collation, index option).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marker {
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedColumn {
    pub name: String,
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhenClause {
    pub when: Node,
    pub then: Node,
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseExpression {
    pub operand: Option<Box<Node>>,
    pub when_clauses: Vec<WhenClause>,
    pub else_result: Option<Box<Node>>,
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub function_name: String,
    pub arguments: Vec<Node>,
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub column_name: String,
    pub sql: String,
}

/// Declared type of a literal, named the way the schema model reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralType {
    Integer,
    Numeric,
    Real,
    String,
    UnicodeString,
    Binary,
    Money,
    Null,
}

impl LiteralType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiteralType::Integer => "Integer",
            LiteralType::Numeric => "Numeric",
            LiteralType::Real => "Real",
            LiteralType::String => "String",
            LiteralType::UnicodeString => "UnicodeString",
            LiteralType::Binary => "Binary",
            LiteralType::Money => "Money",
            LiteralType::Null => "Null",
        }
    }
}

impl fmt::Display for LiteralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub literal_type: LiteralType,
    pub value: String,
    pub sql: String,
}

/// Anything the extractor has no dispatch arm for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNode {
    pub type_name: String,
    pub sql: String,
}
