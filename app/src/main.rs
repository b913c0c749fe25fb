#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use command::{
    CommandStrategy, ConvertInput, ConvertStrategy, InitStrategy, TemplateStrategy,
    VersionStrategy,
};

#[derive(Parser)]
#[command(name = "caselog")]
#[command(about = "Convert clinical case extracts to case-log format", long_about = None)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a directory of CaseList/ProcedureList CSV pairs
    Convert {
        /// Directory containing the CSV pairs
        input_dir: PathBuf,

        /// Output CSV file path
        output: PathBuf,

        /// Config file path (default: ~/caselog/config.json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write a validation report (.json for JSON, otherwise text)
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Also export the form-client JSON document
        #[arg(long, value_name = "FILE")]
        web_json: Option<PathBuf>,

        /// Resident id stamped into the web export
        #[arg(long)]
        resident_id: Option<String>,

        /// JSON file with program information embedded in the web export
        #[arg(long, value_name = "FILE")]
        program_info: Option<PathBuf>,
    },
    /// Write a template of the form-client JSON format
    Template {
        /// Output template file path
        output: PathBuf,
    },
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Convert {
            input_dir,
            output,
            config,
            report,
            web_json,
            resident_id,
            program_info,
        } => ConvertStrategy.execute(ConvertInput {
            input_dir,
            output,
            config,
            report,
            web_json,
            resident_id,
            program_info,
        }),
        Commands::Template { output } => TemplateStrategy.execute(output),
        Commands::Init => InitStrategy.execute(()),
        Commands::Version => VersionStrategy.execute(()),
    }
}
