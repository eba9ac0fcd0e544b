mod commands;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "evr-table",
    version,
    about = "Render validation results into table content blocks"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a results file (JSON or YAML) into a table content block
    Render {
        file: PathBuf,

        /// Rendering config (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Leave column names out of expectation descriptions
        #[arg(long)]
        no_column_name: bool,
    },
    /// Check a results file against the input schema
    Validate { file: PathBuf },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Text,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Render {
            file,
            config,
            format,
            no_column_name,
        } => commands::render(&file, config.as_deref(), format, no_column_name),
        Command::Validate { file } => commands::validate(&file),
    }
}
