//! Mermaid erDiagram output.

use super::ErdDiagramData;

/// Serialize a diagram model into mermaid erDiagram syntax.
pub fn to_mermaid(data: &ErdDiagramData, enclose_with_backticks: bool) -> String {
    let mut output = String::new();

    if enclose_with_backticks {
        output.push_str("```mermaid\n");
    }
    output.push_str("erDiagram\n");

    for table in &data.tables {
        output.push_str(&format!("    {} {{\n", table.name));

        for column in &table.columns {
            output.push_str(&format!("        {} {}", column.data_type, column.name));
            let key = column.attribute_key.as_mermaid();
            if !key.is_empty() {
                output.push_str(&format!(" {key}"));
            }
            if !column.description.is_empty() {
                output.push_str(&format!(" \"{}\"", column.description));
            }
            output.push('\n');
        }

        output.push_str("    }\n");
    }

    if !data.constraints.is_empty() {
        output.push('\n');
    }

    for constraint in &data.constraints {
        output.push_str(&format!(
            "    {} {} {} : \"{}\"\n",
            constraint.fk_table_name,
            constraint.relation.as_mermaid(),
            constraint.pk_table_name,
            constraint.constraint_label
        ));
    }

    if enclose_with_backticks {
        output.push_str("```\n");
    }

    output
}
