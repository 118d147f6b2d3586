//! Credvault CLI — manage and query a local verifiable credential wallet.
//!
//! Subcommands: init, import, list, show, find, query, remove.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::{BackendKind, LogFormat, LoggingConfig, WalletConfig};

/// Credvault — holder-side verifiable credential wallet.
#[derive(Parser, Debug)]
#[command(name = "credvault", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "credvault.toml")]
    config: PathBuf,

    /// Override the storage backend.
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendKind>,

    /// Override the data directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Save credentials from a JSON file.
    Import(commands::import::ImportArgs),
    /// List stored credentials.
    List(commands::list::ListArgs),
    /// Print one credential by id.
    Show(commands::show::ShowArgs),
    /// Find credentials by context and type.
    Find(commands::find::FindArgs),
    /// Select credentials with a JSON proof query.
    Query(commands::query::QueryArgs),
    /// Delete a credential by id.
    Remove(commands::remove::RemoveArgs),
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Init never reads the existing file, so `--force` can replace a broken one
    if let Commands::Init(args) = &cli.command {
        let mut logging = LoggingConfig::default();
        if let Some(ref level) = cli.log_level {
            logging.level = level.clone();
        }
        init_tracing(&logging);
        return commands::init::run(args, &cli.config);
    }

    let mut config = WalletConfig::load(&cli.config)?;

    // Apply CLI overrides
    if let Some(backend) = cli.backend {
        config.storage.backend = backend;
    }
    if let Some(ref data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config.logging);

    let wallet = commands::open_wallet(&config.storage)?;

    match &cli.command {
        Commands::Init(_) => Ok(()),
        Commands::Import(args) => commands::import::run(args, &wallet).await,
        Commands::List(args) => commands::list::run(args, &wallet).await,
        Commands::Show(args) => commands::show::run(args, &wallet).await,
        Commands::Find(args) => commands::find::run(args, &wallet).await,
        Commands::Query(args) => commands::query::run(args, &wallet).await,
        Commands::Remove(args) => commands::remove::run(args, &wallet).await,
    }
}
