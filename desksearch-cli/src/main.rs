use anyhow::Result;
use clap::{Parser, Subcommand};
use desksearch_core::{init_logging, IdCoercion, JsonFileStore, SearchConfig, SearchEngine};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{error, info};

mod commands;
mod prompt;

use commands::*;
use prompt::Session;

#[derive(Parser)]
#[command(name = "desksearch")]
#[command(about = "Search users, tickets and organizations")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "desksearch.toml", env = "DESKSEARCH_CONFIG")]
    config: PathBuf,

    /// Directory holding users.json, tickets.json and organizations.json
    #[arg(short = 'D', long)]
    data_dir: Option<PathBuf>,

    /// Read non-numeric `_id` values as their leading integer (0 if none)
    #[arg(long)]
    legacy_ids: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive search prompt (the default)
    Interactive,
    /// Run a single search
    Search {
        /// users, tickets, organizations, or 1-3
        record_type: String,
        /// Field to match on
        field: String,
        /// Value to look for; an empty string matches empty fields
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// List searchable fields
    Fields {
        /// Only this record type
        record_type: Option<String>,
    },
    /// Compare the data files against the declared fields
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SearchConfig::load(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    if cli.legacy_ids {
        config.query.id_coercion = IdCoercion::Legacy;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    config.validate()?;

    init_logging(&config.logging)?;
    info!(
        data_dir = %config.data.data_dir.display(),
        id_coercion = ?config.query.id_coercion,
        "DeskSearch v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let store = JsonFileStore::new(config.data.data_dir.clone());
    let engine = SearchEngine::from_config(store, &config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            let stdin = io::stdin();
            Session::new(&engine, stdin.lock(), &mut out)
                .run()
                .map_err(anyhow::Error::from)
        }
        Commands::Search {
            record_type,
            field,
            value,
        } => execute_search(&engine, &mut out, &record_type, &field, &value),
        Commands::Fields { record_type } => execute_fields(&engine, &mut out, record_type.as_deref()),
        Commands::Check => execute_check(&engine, &mut out),
    };
    out.flush()?;

    match result {
        Ok(_) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {}", e);
            Err(e)
        }
    }
}
