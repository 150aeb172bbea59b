//! Metadata provider abstraction.
//!
//! Every supported database engine implements [`Connector`]; the
//! [`ConnectorFactory`] picks an implementation by inspecting the
//! connection string's scheme. Provider failures are opaque to the
//! pipeline and never retried.

use super::{ColumnInfo, ConstraintInfo, TableDetail};
use anyhow::{bail, Result};
use std::path::Path;

/// Fatal pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    /// No usable connection string could be resolved
    #[error("no usable connection string: {0}")]
    Configuration(String),
    /// The provider reported zero schemas and no override was set
    #[error("no schemas available")]
    NoSchemasAvailable,
    /// An introspection call failed (engine-specific, opaque)
    #[error("database introspection failed: {0}")]
    Provider(anyhow::Error),
    /// An interactive prompt failed or was cancelled
    #[error("interactive prompt aborted: {0}")]
    Interaction(String),
}

/// Capability interface over one database engine's catalog.
pub trait Connector {
    /// Open the underlying connection
    fn connect(&mut self) -> Result<()>;
    /// Release the underlying connection; safe to call more than once
    fn close(&mut self);
    /// List the available schema names
    fn get_schemas(&mut self) -> Result<Vec<String>>;
    /// List all tables in the given schemas
    fn get_tables(&mut self, schemas: &[String]) -> Result<Vec<TableDetail>>;
    /// Fetch column descriptors for one table
    fn get_columns(&mut self, table: &TableDetail) -> Result<Vec<ColumnInfo>>;
    /// Fetch foreign key constraint descriptors for one table
    fn get_constraints(&mut self, table: &TableDetail) -> Result<Vec<ConstraintInfo>>;
}

/// Builds a [`Connector`] for a connection string.
pub trait ConnectorFactory {
    fn new_connector(&self, connection_string: &str) -> Result<Box<dyn Connector>>;
}

/// Factory for the engines this binary ships with.
///
/// Recognized forms: `duckdb://<path>`, or a bare path ending in
/// `.duckdb` / `.db`.
#[derive(Debug, Default)]
pub struct StandardConnectorFactory;

impl ConnectorFactory for StandardConnectorFactory {
    fn new_connector(&self, connection_string: &str) -> Result<Box<dyn Connector>> {
        if let Some(path) = connection_string.strip_prefix("duckdb://") {
            return Ok(Box::new(super::DuckDbConnector::new(path)));
        }

        if let Some((scheme, _)) = connection_string.split_once("://") {
            bail!("unsupported connection scheme {scheme:?} (supported: duckdb)");
        }

        let ext = Path::new(connection_string)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        if matches!(ext, "duckdb" | "db") {
            return Ok(Box::new(super::DuckDbConnector::new(connection_string)));
        }

        bail!("could not determine database engine from {connection_string:?} (supported: duckdb)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_accepts_duckdb_scheme() {
        let factory = StandardConnectorFactory;
        assert!(factory.new_connector("duckdb:///tmp/test.duckdb").is_ok());
    }

    #[test]
    fn test_factory_accepts_bare_duckdb_path() {
        let factory = StandardConnectorFactory;
        assert!(factory.new_connector("warehouse.duckdb").is_ok());
        assert!(factory.new_connector("warehouse.db").is_ok());
    }

    #[test]
    fn test_factory_rejects_unknown_scheme() {
        let factory = StandardConnectorFactory;
        let err = factory
            .new_connector("postgresql://localhost/app")
            .err()
            .unwrap();
        assert!(err.to_string().contains("postgresql"));
    }

    #[test]
    fn test_factory_rejects_unrecognized_path() {
        let factory = StandardConnectorFactory;
        assert!(factory.new_connector("dump.sql").is_err());
    }
}
