//! SchemX CLI
//!
//! Command-line interface for SchemX workspaces and projects

use clap::{Parser, Subcommand, ValueEnum};
use schemx_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    /// Human-readable log lines on stderr
    Human,
    /// JSON log lines on stderr
    Json,
    /// No log output
    Off,
}

impl From<LogFormat> for Profile {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Human => Profile::Development,
            LogFormat::Json => Profile::Production,
            LogFormat::Off => Profile::Test,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "schemx")]
#[command(about = "SchemX - schematic project tool", long_about = None)]
struct Cli {
    /// Log output format (RUST_LOG overrides the level)
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Workspace operations
    Workspace(commands::workspace::WorkspaceArgs),
    /// Project operations
    Project(commands::project::ProjectArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_format.into());

    let result = match cli.command {
        Commands::Workspace(args) => commands::workspace::execute(args),
        Commands::Project(args) => commands::project::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
