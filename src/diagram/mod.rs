//! Diagram model builder.
//!
//! Converts loaded table results into renderer-ready entities: per-column
//! attribute data and per-constraint relationship data. A stateless
//! transform; the only accumulated state is the list of already-built
//! tables used for duplicate and endpoint membership checks.

mod mermaid;
mod util;

pub use mermaid::to_mermaid;
pub use util::*;

use crate::config::ErdConfig;
use crate::database::{AnalysisResult, ConstraintInfo};
use ahash::AHashSet;

/// Key role annotation next to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKey {
    Primary,
    Foreign,
    None,
}

impl AttributeKey {
    /// Mermaid attribute key marker; empty for plain columns.
    pub fn as_mermaid(self) -> &'static str {
        match self {
            AttributeKey::Primary => "PK",
            AttributeKey::Foreign => "FK",
            AttributeKey::None => "",
        }
    }
}

/// Relationship cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationType {
    OneToOne,
    ManyToOne,
}

impl RelationType {
    /// Mermaid ERD notation, written fk-side first.
    pub fn as_mermaid(self) -> &'static str {
        match self {
            RelationType::OneToOne => "||--||",
            RelationType::ManyToOne => "}o--||",
        }
    }
}

/// Renderer view of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnData {
    pub name: String,
    pub data_type: String,
    pub attribute_key: AttributeKey,
    pub description: String,
}

/// Renderer view of one table.
#[derive(Debug, Clone)]
pub struct TableData {
    /// Display name (possibly schema-prefixed and quoted)
    pub name: String,
    pub columns: Vec<ColumnData>,
}

/// Renderer view of one relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintData {
    pub fk_table_name: String,
    pub pk_table_name: String,
    pub relation: RelationType,
    pub constraint_label: String,
}

/// The complete diagram model handed to the renderer.
#[derive(Debug, Clone)]
pub struct ErdDiagramData {
    pub tables: Vec<TableData>,
    pub constraints: Vec<ConstraintData>,
}

/// Build the diagram model from an analysis result.
///
/// Tables whose display names collide (schema prefix disabled) are only
/// emitted once. Constraints are collected across all tables, deduplicated
/// on the full constraint value, and filtered so that only relationships
/// between diagrammed tables remain (unless show-all-constraints is set).
pub fn build_diagram_data(config: &ErdConfig, result: &AnalysisResult) -> ErdDiagramData {
    let mut tables: Vec<TableData> = Vec::new();
    let mut seen_constraints: AHashSet<ConstraintInfo> = AHashSet::new();
    let mut all_constraints: Vec<ConstraintInfo> = Vec::new();

    for table_result in &result.tables {
        let name = get_table_name(config, &table_result.table);
        if table_name_in_slice(&tables, &name) {
            continue;
        }

        let columns = table_result
            .columns
            .iter()
            .map(|column| get_column_data(config, column))
            .collect();
        tables.push(TableData { name, columns });

        for constraint in &table_result.constraints {
            if seen_constraints.insert(constraint.clone()) {
                all_constraints.push(constraint.clone());
            }
        }
    }

    let constraints = all_constraints
        .iter()
        .filter(|constraint| !should_skip_constraint(config, &tables, constraint))
        .map(|constraint| get_constraint_data(config, constraint))
        .collect();

    ErdDiagramData {
        tables,
        constraints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{ColumnInfo, TableDetail, TableResult};

    fn table_result(schema: &str, name: &str, constraints: Vec<ConstraintInfo>) -> TableResult {
        TableResult {
            table: TableDetail {
                schema: schema.to_string(),
                name: name.to_string(),
            },
            columns: vec![ColumnInfo {
                name: "id".to_string(),
                data_type: "INTEGER".to_string(),
                is_primary: true,
                ..ColumnInfo::default()
            }],
            constraints,
        }
    }

    #[test]
    fn test_duplicate_display_names_collapse() {
        // Two schemas with the same table name collide without the prefix
        let result = AnalysisResult {
            tables: vec![
                table_result("a", "users", vec![]),
                table_result("b", "users", vec![]),
            ],
        };

        let data = build_diagram_data(&ErdConfig::default(), &result);
        assert_eq!(data.tables.len(), 1);

        let prefixed = ErdConfig {
            show_schema_prefix: true,
            ..ErdConfig::default()
        };
        let data = build_diagram_data(&prefixed, &result);
        assert_eq!(data.tables.len(), 2);
    }

    #[test]
    fn test_constraints_reported_by_both_tables_dedupe() {
        let fk = ConstraintInfo {
            fk_table: "orders".to_string(),
            pk_table: "users".to_string(),
            column_name: "user_id".to_string(),
            constraint_name: "orders_user_id_fkey".to_string(),
            is_primary: false,
            has_multiple_pk: false,
        };
        let result = AnalysisResult {
            tables: vec![
                table_result("s", "orders", vec![fk.clone()]),
                table_result("s", "users", vec![fk.clone()]),
            ],
        };

        let data = build_diagram_data(&ErdConfig::default(), &result);
        assert_eq!(data.constraints.len(), 1);
        assert_eq!(data.constraints[0].constraint_label, "user_id");
        assert_eq!(data.constraints[0].relation, RelationType::ManyToOne);
    }

    #[test]
    fn test_unselected_endpoint_filters_constraint() {
        let fk = ConstraintInfo {
            fk_table: "orders".to_string(),
            pk_table: "products".to_string(),
            column_name: "product_id".to_string(),
            ..ConstraintInfo::default()
        };
        let result = AnalysisResult {
            tables: vec![table_result("s", "orders", vec![fk])],
        };

        let data = build_diagram_data(&ErdConfig::default(), &result);
        assert!(data.constraints.is_empty());

        let show_all = ErdConfig {
            show_all_constraints: true,
            ..ErdConfig::default()
        };
        let data = build_diagram_data(&show_all, &result);
        assert_eq!(data.constraints.len(), 1);
    }
}
