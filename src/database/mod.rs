//! Core data model for database introspection results.
//!
//! This module provides:
//! - Descriptors for tables, columns, and foreign key constraints
//! - The per-run `AnalysisResult` aggregate consumed by the diagram builder
//! - Parsing of `schema.table` strings against a known schema list

mod connector;
mod duckdb;

pub use connector::*;
pub use self::duckdb::DuckDbConnector;

use std::fmt;

/// A table identified by its schema and name.
///
/// Identity is the (schema, name) pair; ordering is lexicographic on the
/// same pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TableDetail {
    pub schema: String,
    pub name: String,
}

impl fmt::Display for TableDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// A single column as reported by the metadata provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Column type (as string for display)
    pub data_type: String,
    /// Whether this column is part of the table's primary key
    pub is_primary: bool,
    /// Whether this column is part of a foreign key
    pub is_foreign: bool,
    /// Enum member values, comma-joined; empty for non-enum columns
    pub enum_values: String,
    /// Column comment; may be empty
    pub comment: String,
}

/// A foreign key relationship between two tables.
///
/// Bridges the referencing (fk) and referenced (pk) table by name; it is
/// not owned by a single table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ConstraintInfo {
    /// Referencing table (the one holding the FK column)
    pub fk_table: String,
    /// Referenced table
    pub pk_table: String,
    /// FK column name on the referencing side
    pub column_name: String,
    /// Constraint name as reported by the database
    pub constraint_name: String,
    /// The FK column is also part of the referencing table's primary key
    pub is_primary: bool,
    /// The referenced table has a composite primary key
    pub has_multiple_pk: bool,
}

/// Columns and constraints loaded for one selected table.
#[derive(Debug, Clone)]
pub struct TableResult {
    pub table: TableDetail,
    /// Columns sorted ascending by name
    pub columns: Vec<ColumnInfo>,
    pub constraints: Vec<ConstraintInfo>,
}

/// Final output of the selection/loading pipeline, sole input to the
/// diagram builder. Tables are sorted by (schema, name).
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub tables: Vec<TableResult>,
}

/// Error raised when a configured `schema.table` string cannot be resolved.
///
/// This is a soft failure at the pipeline level: the analyzer logs it and
/// substitutes a placeholder descriptor instead of aborting the run.
#[derive(Debug, thiserror::Error)]
#[error("could not parse table name {0:?}")]
pub struct TableNameError(pub String);

/// Parse a `schema.table` string into a [`TableDetail`], scoped by the list
/// of known schemas.
///
/// The longest known schema that prefixes the value (followed by a dot)
/// wins, which keeps schemas containing dots unambiguous. Without a schema
/// match the value is split at the first dot. A value with no separator at
/// all cannot be resolved.
pub fn parse_table_name(value: &str, schemas: &[String]) -> Result<TableDetail, TableNameError> {
    let mut best: Option<&String> = None;
    for schema in schemas {
        if value.len() > schema.len() + 1
            && value.starts_with(schema.as_str())
            && value.as_bytes()[schema.len()] == b'.'
            && best.map_or(true, |b| schema.len() > b.len())
        {
            best = Some(schema);
        }
    }

    if let Some(schema) = best {
        return Ok(TableDetail {
            schema: schema.clone(),
            name: value[schema.len() + 1..].to_string(),
        });
    }

    match value.split_once('.') {
        Some((schema, name)) if !schema.is_empty() && !name.is_empty() => Ok(TableDetail {
            schema: schema.to_string(),
            name: name.to_string(),
        }),
        _ => Err(TableNameError(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_known_schema() {
        let schemas = vec!["public".to_string()];
        let result = parse_table_name("public.users", &schemas).unwrap();
        assert_eq!(result.schema, "public");
        assert_eq!(result.name, "users");
    }

    #[test]
    fn test_parse_prefers_longest_schema_match() {
        // A schema name containing a dot must win over the first-dot split
        let schemas = vec!["app".to_string(), "app.audit".to_string()];
        let result = parse_table_name("app.audit.events", &schemas).unwrap();
        assert_eq!(result.schema, "app.audit");
        assert_eq!(result.name, "events");
    }

    #[test]
    fn test_parse_falls_back_to_first_dot() {
        let schemas: Vec<String> = vec![];
        let result = parse_table_name("sales.orders", &schemas).unwrap();
        assert_eq!(result.schema, "sales");
        assert_eq!(result.name, "orders");
    }

    #[test]
    fn test_parse_without_separator_fails() {
        let schemas = vec!["public".to_string()];
        let err = parse_table_name("users", &schemas).unwrap_err();
        assert!(err.to_string().contains("users"));
    }

    #[test]
    fn test_parse_empty_parts_fail() {
        let schemas: Vec<String> = vec![];
        assert!(parse_table_name(".users", &schemas).is_err());
        assert!(parse_table_name("public.", &schemas).is_err());
    }

    #[test]
    fn test_table_detail_display() {
        let table = TableDetail {
            schema: "public".to_string(),
            name: "users".to_string(),
        };
        assert_eq!(table.to_string(), "public.users");
    }
}
