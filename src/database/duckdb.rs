//! DuckDB metadata provider.
//!
//! Introspects a DuckDB database file through the built-in catalog table
//! functions (`duckdb_schemas()`, `duckdb_tables()`, `duckdb_columns()`,
//! `duckdb_constraints()`) and maps the raw facts onto the provider data
//! model. The file is opened read-only.

use super::{ColumnInfo, Connector, ConstraintInfo, TableDetail};
use anyhow::{bail, Context, Result};
use duckdb::{params, params_from_iter, AccessMode, Config, Connection};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

/// Matches the member list of a DuckDB enum type, e.g. `ENUM('a', 'b')`
static ENUM_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^ENUM\s*\((.+)\)$").unwrap());

/// Metadata provider backed by a DuckDB database file.
pub struct DuckDbConnector {
    path: PathBuf,
    conn: Option<Connection>,
}

impl DuckDbConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: None,
        }
    }

    fn conn(&self) -> Result<&Connection> {
        match &self.conn {
            Some(conn) => Ok(conn),
            None => bail!("duckdb connector is not connected"),
        }
    }

    /// Column names of the table's primary key, in no particular order.
    fn primary_key_columns(&self, schema: &str, table: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT unnest(constraint_column_names) \
             FROM duckdb_constraints() \
             WHERE schema_name = ? AND table_name = ? AND constraint_type = 'PRIMARY KEY'",
        )?;
        let rows = stmt.query_map(params![schema, table], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Column names participating in any foreign key of the table.
    fn foreign_key_columns(&self, schema: &str, table: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT unnest(constraint_column_names) \
             FROM duckdb_constraints() \
             WHERE schema_name = ? AND table_name = ? AND constraint_type = 'FOREIGN KEY'",
        )?;
        let rows = stmt.query_map(params![schema, table], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl Connector for DuckDbConnector {
    fn connect(&mut self) -> Result<()> {
        let config = Config::default().access_mode(AccessMode::ReadOnly)?;
        let conn = Connection::open_with_flags(&self.path, config)
            .with_context(|| format!("failed to open duckdb database {}", self.path.display()))?;
        self.conn = Some(conn);
        Ok(())
    }

    fn close(&mut self) {
        self.conn = None;
    }

    fn get_schemas(&mut self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT schema_name FROM duckdb_schemas() WHERE NOT internal ORDER BY schema_name",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_tables(&mut self, schemas: &[String]) -> Result<Vec<TableDetail>> {
        if schemas.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.conn()?;
        let placeholders = vec!["?"; schemas.len()].join(", ");
        let sql = format!(
            "SELECT schema_name, table_name FROM duckdb_tables() \
             WHERE NOT internal AND schema_name IN ({placeholders}) \
             ORDER BY schema_name, table_name"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(schemas.iter()), |row| {
            Ok(TableDetail {
                schema: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_columns(&mut self, table: &TableDetail) -> Result<Vec<ColumnInfo>> {
        let pk_columns = self.primary_key_columns(&table.schema, &table.name)?;
        let fk_columns = self.foreign_key_columns(&table.schema, &table.name)?;

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT column_name, data_type, comment FROM duckdb_columns() \
             WHERE schema_name = ? AND table_name = ? \
             ORDER BY column_index",
        )?;
        let rows = stmt.query_map(params![table.schema, table.name], |row| {
            let name: String = row.get(0)?;
            let data_type: String = row.get(1)?;
            let comment: Option<String> = row.get(2)?;
            Ok((name, data_type, comment))
        })?;

        let mut columns = Vec::new();
        for row in rows {
            let (name, data_type, comment) = row?;
            columns.push(ColumnInfo {
                is_primary: pk_columns.contains(&name),
                is_foreign: fk_columns.contains(&name),
                enum_values: extract_enum_values(&data_type),
                comment: comment.unwrap_or_default(),
                name,
                data_type,
            });
        }
        Ok(columns)
    }

    fn get_constraints(&mut self, table: &TableDetail) -> Result<Vec<ConstraintInfo>> {
        let pk_columns = self.primary_key_columns(&table.schema, &table.name)?;

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT unnest(constraint_column_names), constraint_name, referenced_table \
             FROM duckdb_constraints() \
             WHERE schema_name = ? AND table_name = ? AND constraint_type = 'FOREIGN KEY'",
        )?;
        let rows = stmt.query_map(params![table.schema, table.name], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        let raw = rows.collect::<Result<Vec<_>, _>>()?;

        let mut constraints = Vec::new();
        for (column_name, constraint_name, referenced_table) in raw {
            // Referenced tables are reported unqualified; FK targets are
            // resolved within the same schema.
            let referenced_pk = self.primary_key_columns(&table.schema, &referenced_table)?;
            constraints.push(ConstraintInfo {
                fk_table: table.name.clone(),
                pk_table: referenced_table,
                is_primary: pk_columns.contains(&column_name),
                has_multiple_pk: referenced_pk.len() > 1,
                column_name,
                constraint_name,
            });
        }
        Ok(constraints)
    }
}

/// Pull the comma-joined member list out of an enum type string.
///
/// `ENUM('small', 'large')` becomes `small,large`; anything that is not an
/// enum type yields the empty string.
fn extract_enum_values(data_type: &str) -> String {
    let Some(captures) = ENUM_TYPE_RE.captures(data_type.trim()) else {
        return String::new();
    };

    captures[1]
        .split(',')
        .map(|v| v.trim().trim_matches('\''))
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_enum_values() {
        assert_eq!(extract_enum_values("ENUM('a', 'b')"), "a,b");
        assert_eq!(extract_enum_values("enum('x')"), "x");
        assert_eq!(extract_enum_values("VARCHAR"), "");
        assert_eq!(extract_enum_values("INTEGER"), "");
    }

    #[test]
    fn test_unconnected_calls_fail() {
        let mut connector = DuckDbConnector::new("unopened.duckdb");
        assert!(connector.get_schemas().is_err());
    }
}
