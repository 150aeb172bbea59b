//! Classification and formatting rules for diagram entities.
//!
//! Everything in here is a pure function over immutable inputs; all
//! variability is config-driven branching. None of the rules can fail.

use super::{AttributeKey, ColumnData, ConstraintData, RelationType, TableData};
use crate::config::ErdConfig;
use crate::database::{ColumnInfo, ConstraintInfo, TableDetail};

/// Mermaid cannot embed a raw double quote inside a quoted description.
const QUOT_ESCAPE: &str = "#quot;";

/// Classify the cardinality of a foreign key relationship.
///
/// A FK column that is itself the sole primary key of the referencing
/// table pins the relationship to one row on both sides. Every other
/// combination, including composite referenced keys, stays many-to-one.
pub fn get_relation(constraint: &ConstraintInfo) -> RelationType {
    if constraint.is_primary && !constraint.has_multiple_pk {
        RelationType::OneToOne
    } else {
        RelationType::ManyToOne
    }
}

/// Classify the key role shown next to a column. Primary wins over
/// foreign when a column is both.
pub fn get_attribute_key(column: &ColumnInfo) -> AttributeKey {
    if column.is_primary {
        AttributeKey::Primary
    } else if column.is_foreign {
        AttributeKey::Foreign
    } else {
        AttributeKey::None
    }
}

/// Assemble the renderer view of one column.
pub fn get_column_data(config: &ErdConfig, column: &ColumnInfo) -> ColumnData {
    let attribute_key = if config.omit_attribute_keys {
        AttributeKey::None
    } else {
        get_attribute_key(column)
    };

    let mut fragments: Vec<String> = Vec::new();
    if config.shows_enum_values() && !column.enum_values.is_empty() {
        fragments.push(format!("<{}>", column.enum_values));
    }
    if config.shows_column_comments() && !column.comment.is_empty() {
        fragments.push(column.comment.replace('"', QUOT_ESCAPE));
    }

    ColumnData {
        name: column.name.clone(),
        data_type: column.data_type.clone(),
        attribute_key,
        description: fragments.join(" "),
    }
}

/// Whether a constraint should be left out of the diagram.
///
/// Never skips when show-all-constraints is set; otherwise skips unless
/// both endpoint tables are already part of the diagram.
pub fn should_skip_constraint(
    config: &ErdConfig,
    tables: &[TableData],
    constraint: &ConstraintInfo,
) -> bool {
    if config.show_all_constraints {
        return false;
    }

    !(table_name_in_slice(tables, &constraint.pk_table)
        && table_name_in_slice(tables, &constraint.fk_table))
}

/// Assemble the renderer view of one constraint.
pub fn get_constraint_data(config: &ErdConfig, constraint: &ConstraintInfo) -> ConstraintData {
    let constraint_label = if config.omit_constraint_labels {
        String::new()
    } else {
        constraint.column_name.clone()
    };

    ConstraintData {
        fk_table_name: get_table_name_from_ref(config, &constraint.fk_table),
        pk_table_name: get_table_name_from_ref(config, &constraint.pk_table),
        relation: get_relation(constraint),
        constraint_label,
    }
}

/// Display name of a table.
///
/// With the schema prefix enabled the name becomes `schema<sep>name`; a
/// full-stop separator additionally quotes the whole name, since an
/// unescaped dot is a scope operator in mermaid.
pub fn get_table_name(config: &ErdConfig, table: &TableDetail) -> String {
    if !config.show_schema_prefix {
        return table.name.clone();
    }

    combine_table_name(&table.schema, &table.name, &config.schema_prefix_separator)
}

/// Display name for a constraint endpoint, which is only known as a
/// string. Accepts both `table` and `schema.table` forms.
pub fn get_table_name_from_ref(config: &ErdConfig, table_ref: &str) -> String {
    let (schema, name) = match table_ref.split_once('.') {
        Some((schema, name)) => (schema, name),
        None => ("", table_ref),
    };

    if !config.show_schema_prefix || schema.is_empty() {
        return name.to_string();
    }

    combine_table_name(schema, name, &config.schema_prefix_separator)
}

fn combine_table_name(schema: &str, name: &str, separator: &str) -> String {
    if separator == "." {
        format!("\"{schema}.{name}\"")
    } else {
        format!("{schema}{separator}{name}")
    }
}

/// Exact display-name membership test; used for duplicate tracking and
/// constraint endpoint checks.
pub fn table_name_in_slice(tables: &[TableData], name: &str) -> bool {
    tables.iter().any(|table| table.name == name)
}
