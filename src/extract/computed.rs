use crate::ast::{CaseExpression, ComputedColumnDefinition, FunctionCall, Node};
use crate::diagnostics::Diagnostics;
use crate::schema::TableColumn;

/// Fallback type for expressions whose type cannot be inferred.
const FALLBACK_TYPE: &str = "VARCHAR";

/// Build a column from a computed column definition (`name AS expression`).
///
/// The column's type is either known directly (case expressions) or
/// recorded as a `reference_column` that the resolver turns into a type.
pub fn extract_computed_column(
    definition: &ComputedColumnDefinition,
    diagnostics: &mut Diagnostics,
) -> TableColumn {
    let mut column = TableColumn::computed(definition.sql.clone());

    for child in &definition.children {
        match child {
            Node::Identifier(identifier) => column.name = identifier.value.clone(),
            Node::Case(expression) => column.data_type = case_data_type(expression, diagnostics),
            Node::FunctionCall(call) => {
                column.reference_column = function_reference(call, diagnostics)
            }
            Node::ColumnRef(reference) => {
                column.reference_column = Some(reference.column_name.clone())
            }
            Node::Constraint(_) | Node::PrimaryKeyConstraint(_) => {}
            other => {
                diagnostics.unknown(other);
                column.data_type = FALLBACK_TYPE.to_string();
            }
        }
    }

    diagnostics.trace(format!("{} {}", column.name, column.sql));
    column
}

/// Type of a case expression, taken from the first WHEN clause only.
fn case_data_type(expression: &CaseExpression, diagnostics: &mut Diagnostics) -> String {
    match expression.when_clauses.first() {
        Some(clause) => match &clause.then {
            Node::Literal(literal) => literal.literal_type.to_string(),
            _ => FALLBACK_TYPE.to_string(),
        },
        None => {
            diagnostics.unknown_syntax("CaseExpression", &expression.sql);
            FALLBACK_TYPE.to_string()
        }
    }
}

/// Reference column named by a function call's first argument.
fn function_reference(call: &FunctionCall, diagnostics: &mut Diagnostics) -> Option<String> {
    let first = call.arguments.first();
    match call.function_name.to_uppercase().as_str() {
        "ISNULL" | "CONVERT" => {
            first.and_then(|argument| argument_reference(argument, diagnostics))
        }
        _ => {
            let reference = first
                .and_then(|argument| argument_reference(argument, diagnostics))
                .filter(|name| !name.trim().is_empty());
            if reference.is_none() {
                diagnostics.unknown_syntax("FunctionCallExpression", &call.sql);
            }
            reference
        }
    }
}

/// Column name of a column reference, or type name of a data type
/// specification (`CONVERT([date], ...)`). Anything else is reported.
fn argument_reference(argument: &Node, diagnostics: &mut Diagnostics) -> Option<String> {
    match argument {
        Node::ColumnRef(reference) => Some(reference.column_name.clone()),
        Node::DataType(specification) => Some(specification.type_name().to_string()),
        other => {
            diagnostics.unknown(other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CaseExpression, LiteralType, WhenClause};
    use crate::extract::test_nodes::*;
    use crate::schema::ConstraintType;

    fn run(node: Node) -> (TableColumn, Diagnostics) {
        let Node::ComputedColumnDefinition(definition) = node else {
            panic!("not a computed column");
        };
        let mut diagnostics = Diagnostics::new("t.sql", false);
        let column = extract_computed_column(&definition, &mut diagnostics);
        (column, diagnostics)
    }

    fn case(when_clauses: Vec<WhenClause>) -> Node {
        Node::Case(CaseExpression {
            operand: Some(Box::new(column_ref("Status"))),
            when_clauses,
            else_result: None,
            sql: "CASE [Status] ... END".to_string(),
        })
    }

    fn when(then: Node) -> WhenClause {
        WhenClause {
            when: literal(LiteralType::String, "'A'"),
            then,
            sql: "WHEN ...".to_string(),
        }
    }

    #[test]
    fn test_isnull_takes_first_argument() {
        let (column, diagnostics) = run(computed(
            vec![
                ident("FullName"),
                call("ISNULL", vec![column_ref("FirstName"), literal(LiteralType::String, "''")]),
            ],
            "FullName AS ISNULL(FirstName, '')",
        ));

        assert!(column.computed);
        assert_eq!(column.name, "FullName");
        assert_eq!(column.reference_column.as_deref(), Some("FirstName"));
        assert_eq!(column.data_type, "");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_convert_yields_type_token() {
        let (column, _) = run(computed(
            vec![
                ident("OrderDay"),
                call("convert", vec![data_type("date", None, None), column_ref("OrderedAt")]),
            ],
            "OrderDay AS CONVERT([date], OrderedAt)",
        ));

        assert_eq!(column.reference_column.as_deref(), Some("date"));
    }

    #[test]
    fn test_other_function_with_column_argument() {
        let (column, diagnostics) = run(computed(
            vec![ident("Upper"), call("UPPER", vec![column_ref("Name")])],
            "Upper AS UPPER(Name)",
        ));

        assert_eq!(column.reference_column.as_deref(), Some("Name"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_other_function_without_reference_is_reported() {
        let (column, diagnostics) = run(computed(
            vec![ident("Now"), call("GETDATE", vec![])],
            "Now AS GETDATE()",
        ));

        assert_eq!(column.reference_column, None);
        let warnings: Vec<_> = diagnostics.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].node_type, "FunctionCallExpression");
    }

    #[test]
    fn test_unrecognised_first_argument_reported_twice_for_other_functions() {
        let (column, diagnostics) = run(computed(
            vec![
                ident("Len"),
                call("LEN", vec![literal(LiteralType::String, "'abc'")]),
            ],
            "Len AS LEN('abc')",
        ));

        assert_eq!(column.reference_column, None);
        let kinds: Vec<_> = diagnostics.warnings().map(|d| d.node_type.as_str()).collect();
        assert_eq!(kinds, vec!["LiteralExpression", "FunctionCallExpression"]);
    }

    #[test]
    fn test_isnull_with_unrecognised_argument_reported_once() {
        let (column, diagnostics) = run(computed(
            vec![
                ident("X"),
                call("ISNULL", vec![literal(LiteralType::Integer, "1"), column_ref("Y")]),
            ],
            "X AS ISNULL(1, Y)",
        ));

        assert_eq!(column.reference_column, None);
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn test_case_uses_first_literal_type() {
        let (column, _) = run(computed(
            vec![
                ident("Flag"),
                case(vec![
                    when(literal(LiteralType::Integer, "1")),
                    when(literal(LiteralType::String, "'x'")),
                ]),
            ],
            "Flag AS CASE Status WHEN 'A' THEN 1 WHEN 'B' THEN 'x' END",
        ));

        assert_eq!(column.data_type, "Integer");
        assert_eq!(column.reference_column, None);
    }

    #[test]
    fn test_case_with_non_literal_result_is_varchar() {
        let (column, diagnostics) = run(computed(
            vec![ident("Label"), case(vec![when(column_ref("Name"))])],
            "Label AS CASE Status WHEN 'A' THEN Name END",
        ));

        assert_eq!(column.data_type, "VARCHAR");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_case_without_when_is_reported() {
        let (column, diagnostics) = run(computed(vec![ident("Label"), case(vec![])], "Label AS CASE END"));

        assert_eq!(column.data_type, "VARCHAR");
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn test_column_reference_and_constraint() {
        let (column, diagnostics) = run(computed(
            vec![
                ident("Copy"),
                column_ref("Original"),
                constraint(ConstraintType::NotNull),
            ],
            "Copy AS Original PERSISTED NOT NULL",
        ));

        assert_eq!(column.reference_column.as_deref(), Some("Original"));
        assert_eq!(column.constraint_type, ConstraintType::None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_expression_falls_back_to_varchar() {
        let (column, diagnostics) = run(computed(
            vec![ident("Total"), Node::unknown("BinaryExpression", "[Qty] * [Price]")],
            "Total AS [Qty] * [Price]",
        ));

        assert_eq!(column.data_type, "VARCHAR");
        assert_eq!(column.reference_column, None);
        assert_eq!(diagnostics.warnings().count(), 1);
    }
}
