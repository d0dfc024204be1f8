use super::merge_inline_primary_key;
use crate::ast::{ColumnDefinition, Node};
use crate::diagnostics::Diagnostics;
use crate::schema::{PrimaryKeyColumns, TableColumn};

/// Build a column from a regular column definition.
///
/// Inline `PRIMARY KEY` constraints are merged into `key`, which belongs to
/// the table under construction.
pub fn extract_column(
    definition: &ColumnDefinition,
    key: &mut PrimaryKeyColumns,
    diagnostics: &mut Diagnostics,
) -> TableColumn {
    let mut column = TableColumn::new(definition.sql.clone());

    for child in &definition.children {
        match child {
            Node::Identifier(identifier) => column.name = identifier.value.clone(),
            Node::DataType(specification) => {
                column.data_type = specification.type_name().to_string();
                column.data_type_extra_info1 = specification.argument1;
                column.data_type_extra_info2 = specification.argument2;
            }
            Node::ColumnIdentity(_) => column.is_identity_column_explicit = true,
            Node::PrimaryKeyConstraint(constraint) => {
                if merge_inline_primary_key(constraint, &column.name, key) {
                    column.is_primary_key_explicit = true;
                }
            }
            // last one wins
            Node::Constraint(constraint) => column.constraint_type = constraint.kind,
            Node::Collation(_) => {}
            other => diagnostics.unknown(other),
        }
    }

    diagnostics.trace(format!(
        "{} {} {}",
        column.data_type, column.name, column.sql
    ));
    column
}
