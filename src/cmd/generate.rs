//! Generate command: resolve the config, run the analyzer, build the
//! diagram and write it out.

use crate::analyzer::{Analyzer, TerminalQuestioner};
use crate::config::ErdConfig;
use crate::database::StandardConnectorFactory;
use crate::diagram::{build_diagram_data, to_mermaid};
use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

/// Introspect a database and generate a mermaid erDiagram
#[derive(Args, Debug)]
#[command(after_help = "Examples:
  db2erd generate -c duckdb://warehouse.duckdb --use-all-tables
  db2erd generate -c warehouse.duckdb -t main.users -t main.orders -o erd.mmd
  db2erd generate --show-schema-prefix --schema-prefix-separator .")]
pub struct GenerateArgs {
    /// Connection string (e.g. duckdb://warehouse.duckdb); prompted
    /// interactively if not given here or in the config file
    #[arg(short, long)]
    pub connection: Option<String>,

    /// Config file (default: .db2erd.yaml in cwd, then home)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Schema to include (repeatable); skips schema introspection
    #[arg(short = 's', long = "schema")]
    pub schemas: Vec<String>,

    /// Use every available schema without prompting
    #[arg(long)]
    pub use_all_schemas: bool,

    /// Table to include as schema.table (repeatable); skips table
    /// introspection
    #[arg(short = 't', long = "table")]
    pub tables: Vec<String>,

    /// Use every table without prompting
    #[arg(long)]
    pub use_all_tables: bool,

    /// Column description sources: enumValues, columnComments
    #[arg(long, value_delimiter = ',')]
    pub show_descriptions: Vec<String>,

    /// Do not render PK/FK attribute key markers
    #[arg(long)]
    pub omit_attribute_keys: bool,

    /// Render relationships without column labels
    #[arg(long)]
    pub omit_constraint_labels: bool,

    /// Render constraints even when an endpoint table is not selected
    #[arg(long)]
    pub show_all_constraints: bool,

    /// Prefix table names with their schema
    #[arg(long)]
    pub show_schema_prefix: bool,

    /// Separator between schema prefix and table name
    #[arg(long)]
    pub schema_prefix_separator: Option<String>,

    /// Wrap the output in a ```mermaid code fence
    #[arg(long)]
    pub enclose_with_backticks: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the generate command.
pub fn run(args: GenerateArgs) -> Result<()> {
    let config = resolve_config(&args)?;

    let questioner = TerminalQuestioner::new()?;
    let mut analyzer = Analyzer::new(
        config.clone(),
        Box::new(StandardConnectorFactory),
        Box::new(questioner),
    );

    let result = analyzer.analyze()?;
    let data = build_diagram_data(&config, &result);
    let document = to_mermaid(&data, config.enclose_with_mermaid_backticks);

    if config.output_file_name.is_empty() {
        std::io::stdout()
            .write_all(document.as_bytes())
            .context("failed to write diagram to stdout")?;
    } else {
        std::fs::write(&config.output_file_name, &document)
            .with_context(|| format!("failed to write {}", config.output_file_name))?;
        eprintln!(
            "Wrote {} ({} tables, {} relationships)",
            config.output_file_name,
            data.tables.len(),
            data.constraints.len()
        );
    }

    Ok(())
}

/// Load the config file (if any) and overlay the CLI flags on top.
fn resolve_config(args: &GenerateArgs) -> Result<ErdConfig> {
    let mut config = ErdConfig::load(args.config.as_deref())?;

    if let Some(connection) = &args.connection {
        config.connection_string = connection.clone();
    }
    if !args.schemas.is_empty() {
        config.schemas = args.schemas.clone();
    }
    if args.use_all_schemas {
        config.use_all_schemas = true;
    }
    if !args.tables.is_empty() {
        config.selected_tables = args.tables.clone();
    }
    if args.use_all_tables {
        config.use_all_tables = true;
    }
    if !args.show_descriptions.is_empty() {
        config.show_descriptions = args.show_descriptions.clone();
    }
    if args.omit_attribute_keys {
        config.omit_attribute_keys = true;
    }
    if args.omit_constraint_labels {
        config.omit_constraint_labels = true;
    }
    if args.show_all_constraints {
        config.show_all_constraints = true;
    }
    if args.show_schema_prefix {
        config.show_schema_prefix = true;
    }
    if let Some(separator) = &args.schema_prefix_separator {
        config.schema_prefix_separator = separator.clone();
    }
    if args.enclose_with_backticks {
        config.enclose_with_mermaid_backticks = true;
    }
    if let Some(output) = &args.output {
        config.output_file_name = output.display().to_string();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: GenerateArgs,
    }

    fn empty_args() -> GenerateArgs {
        TestCli::parse_from(["db2erd"]).args
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = GenerateArgs {
            connection: Some("duckdb://x.duckdb".to_string()),
            use_all_tables: true,
            schema_prefix_separator: Some(".".to_string()),
            output: Some(PathBuf::from("erd.mmd")),
            ..empty_args()
        };

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.connection_string, "duckdb://x.duckdb");
        assert!(config.use_all_tables);
        assert_eq!(config.schema_prefix_separator, ".");
        assert_eq!(config.output_file_name, "erd.mmd");
    }

    #[test]
    fn test_unset_flags_keep_defaults() {
        let config = resolve_config(&empty_args()).unwrap();
        assert!(config.connection_string.is_empty());
        assert!(!config.use_all_schemas);
        assert_eq!(config.schema_prefix_separator, "_");
    }
}
