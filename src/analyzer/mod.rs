//! Selection and loading pipeline.
//!
//! Resolves which schemas and tables participate in the diagram and loads
//! their columns and constraints. One consistent precedence rule
//! throughout: explicit configuration wins; otherwise ask the metadata
//! provider; when the provider yields more than one option and no
//! "use all" override is set, ask the user.

mod questioner;

pub use questioner::{Questioner, TerminalQuestioner};

use crate::config::ErdConfig;
use crate::database::{
    parse_table_name, AnalysisResult, AnalyzeError, Connector, ConnectorFactory, TableDetail,
    TableResult,
};
use crate::presentation::LoadingSpinner;

/// Runs the full selection/loading pipeline for one analysis run.
pub struct Analyzer {
    config: ErdConfig,
    connector_factory: Box<dyn ConnectorFactory>,
    questioner: Box<dyn Questioner>,
    spinner: LoadingSpinner,
}

impl Analyzer {
    pub fn new(
        config: ErdConfig,
        connector_factory: Box<dyn ConnectorFactory>,
        questioner: Box<dyn Questioner>,
    ) -> Self {
        Self {
            config,
            connector_factory,
            questioner,
            spinner: LoadingSpinner::new(true),
        }
    }

    /// Disable the loading spinner (tests, quiet mode).
    pub fn quiet(mut self) -> Self {
        self.spinner = LoadingSpinner::new(false);
        self
    }

    /// Resolve the selection, load columns and constraints, and return the
    /// sorted analysis result. The connection is closed on every exit
    /// path, error paths included.
    pub fn analyze(&mut self) -> Result<AnalysisResult, AnalyzeError> {
        let connection_string = self.connection_string()?;

        let mut connector = self
            .connector_factory
            .new_connector(&connection_string)
            .map_err(AnalyzeError::Provider)?;

        self.spinner.start("Connecting to database");
        let connected = connector.connect();
        self.spinner.stop();
        connected.map_err(AnalyzeError::Provider)?;

        let result = self.run_connected(connector.as_mut());
        connector.close();
        result
    }

    fn run_connected(
        &mut self,
        connector: &mut dyn Connector,
    ) -> Result<AnalysisResult, AnalyzeError> {
        let selected_schemas = self.schemas(connector)?;
        let mut selected_tables = self.tables(connector, &selected_schemas)?;
        // sort the tables so the output is deterministic
        sort_tables(&mut selected_tables);

        let tables = self.columns_and_constraints(connector, &selected_tables)?;
        Ok(AnalysisResult { tables })
    }

    /// The configured connection string, or whatever the interactive
    /// prompt yields.
    pub fn connection_string(&mut self) -> Result<String, AnalyzeError> {
        if !self.config.connection_string.is_empty() {
            return Ok(self.config.connection_string.clone());
        }

        self.questioner
            .ask_connection_question(&self.config.connection_string_suggestions)
            .map_err(|err| AnalyzeError::Configuration(err.to_string()))
    }

    /// Resolve the schema selection.
    pub fn schemas(&mut self, connector: &mut dyn Connector) -> Result<Vec<String>, AnalyzeError> {
        if !self.config.schemas.is_empty() {
            return Ok(self.config.schemas.clone());
        }

        self.spinner.start("Getting schemas");
        let schemas = connector.get_schemas();
        self.spinner.stop();
        let schemas = schemas.map_err(|err| {
            eprintln!("Getting schemas failed: {err}");
            AnalyzeError::Provider(err)
        })?;

        eprintln!("Got {} schemas", schemas.len());
        if self.config.use_all_schemas {
            return Ok(schemas);
        }

        match schemas.len() {
            0 => Err(AnalyzeError::NoSchemasAvailable),
            1 => Ok(schemas),
            _ => self
                .questioner
                .ask_schema_question(&schemas)
                .map_err(|err| AnalyzeError::Interaction(err.to_string())),
        }
    }

    /// Resolve the table selection within the selected schemas.
    pub fn tables(
        &mut self,
        connector: &mut dyn Connector,
        selected_schemas: &[String],
    ) -> Result<Vec<TableDetail>, AnalyzeError> {
        if !self.config.selected_tables.is_empty() {
            let configured = self.config.selected_tables.clone();
            return Ok(parse_table_names(&configured, selected_schemas));
        }

        self.spinner.start("Getting tables");
        let tables = connector.get_tables(selected_schemas);
        self.spinner.stop();
        let tables = tables.map_err(|err| {
            eprintln!("Getting tables failed: {err}");
            AnalyzeError::Provider(err)
        })?;

        if tables.is_empty() {
            // A schema without tables is valid; the diagram is just empty
            eprintln!("No tables found");
        } else {
            eprintln!("Got {} tables", tables.len());
        }

        if self.config.use_all_tables || tables.is_empty() {
            return Ok(tables);
        }

        let table_names: Vec<String> = tables.iter().map(|table| table.to_string()).collect();
        let chosen = self
            .questioner
            .ask_table_question(&table_names)
            .map_err(|err| AnalyzeError::Interaction(err.to_string()))?;
        Ok(parse_table_names(&chosen, selected_schemas))
    }

    /// Load columns and constraints for each selected table, in the given
    /// order. The first provider failure aborts the whole load; partial
    /// results are discarded.
    pub fn columns_and_constraints(
        &mut self,
        connector: &mut dyn Connector,
        selected_tables: &[TableDetail],
    ) -> Result<Vec<TableResult>, AnalyzeError> {
        let mut table_results = Vec::with_capacity(selected_tables.len());

        self.spinner.start("Getting columns and constraints");
        for table in selected_tables {
            let mut columns = match connector.get_columns(table) {
                Ok(columns) => columns,
                Err(err) => {
                    self.spinner.stop();
                    eprintln!("Getting columns failed: {err}");
                    return Err(AnalyzeError::Provider(err));
                }
            };

            let constraints = match connector.get_constraints(table) {
                Ok(constraints) => constraints,
                Err(err) => {
                    self.spinner.stop();
                    eprintln!("Getting constraints failed: {err}");
                    return Err(AnalyzeError::Provider(err));
                }
            };

            columns.sort_by(|a, b| a.name.cmp(&b.name));
            table_results.push(TableResult {
                table: table.clone(),
                columns,
                constraints,
            });
        }
        self.spinner.stop();

        let column_count: usize = table_results.iter().map(|t| t.columns.len()).sum();
        let constraint_count: usize = table_results.iter().map(|t| t.constraints.len()).sum();
        eprintln!("Got {column_count} columns and {constraint_count} constraints");

        Ok(table_results)
    }
}

/// Parse configured or chosen `schema.table` strings.
///
/// A value that cannot be resolved is a soft failure: it is logged and a
/// placeholder descriptor takes its slot, the pipeline keeps going.
fn parse_table_names(values: &[String], schemas: &[String]) -> Vec<TableDetail> {
    values
        .iter()
        .map(|value| match parse_table_name(value, schemas) {
            Ok(table) => table,
            Err(err) => {
                eprintln!("Warning: {err}");
                TableDetail::default()
            }
        })
        .collect()
}

/// Stable sort by (schema, name).
fn sort_tables(tables: &mut [TableDetail]) {
    tables.sort_by(|a, b| (&a.schema, &a.name).cmp(&(&b.schema, &b.name)));
}
