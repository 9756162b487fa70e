//! `linkfield` command line entry point.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use linkfield::diagnostics;

/// Environment variable holding the log filter, `warn` when unset.
const LOG_ENV: &str = "LINKFIELD_LOG";

/// Command line arguments.
#[derive(Parser)]
#[command(name = "linkfield", about = "Resolve and validate stored link field values")]
struct Cli {
    /// Directory containing .linkfield.toml
    #[arg(long, global = true, default_value = ".")]
    config: PathBuf,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Print the href of each link in a JSON file (`-` for stdin)
    Href {
        /// JSON file holding a link or an array of links
        file: PathBuf,
    },
    /// Print the display text of each link in a JSON file (`-` for stdin)
    Text {
        /// JSON file holding a link or an array of links
        file: PathBuf,
    },
    /// Validate each link in a JSON file (`-` for stdin)
    Validate {
        /// JSON file holding a link or an array of links
        file: PathBuf,
        /// Treat the field as required
        #[arg(long)]
        required: bool,
    },
    /// Validate every link found in the JSON documents under a directory
    Check {
        /// Directory to scan
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Treat every link field as required
        #[arg(long)]
        required: bool,
    },
    /// Print the link object type definition as JSON
    Schema {
        /// Show the text sub-field
        #[arg(long)]
        text: bool,
        /// Restrict the built-in link types, comma separated
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
    },
    /// List the link types offered by the type selector
    Types {
        /// Restrict the built-in link types, comma separated
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let root = cli.config;

    let result = match cli.command {
        Commands::Href { file } => commands::href(&root, &file),
        Commands::Text { file } => commands::text(&root, &file),
        Commands::Validate { file, required } => commands::validate(&root, &file, required),
        Commands::Check { dir, required } => commands::check(&root, &dir, required),
        Commands::Schema { text, types } => commands::schema(&root, text, &types),
        Commands::Types { types } => commands::types(&root, &types),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}

/// Log to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
