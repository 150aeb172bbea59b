mod generate;

pub use generate::GenerateArgs;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

#[derive(Parser)]
#[command(name = "db2erd")]
#[command(version)]
#[command(about = "Generate a mermaid ER diagram from a database", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Introspect a database and generate a mermaid erDiagram
    Generate(GenerateArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => generate::run(args),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "db2erd", &mut io::stdout());
            Ok(())
        }
    }
}
