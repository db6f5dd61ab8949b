//! settle - command-line front end for the configuration store
//!
//! Loads a settings file into a [`ConfigStore`], runs one command against it
//! and flushes any pending save before exiting.

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use settle::{
    Result,
    cli::{CliService, formatting::format_error},
    config::{ConfigPaths, load_defaults},
    config_store::{ConfigStore, PersistenceFormat, StoreOptions},
    tracing_config,
};
use tracing::{debug, instrument};

/// Inspect and edit a settle configuration file
#[derive(Parser, Debug)]
#[command(name = "settle", version, about)]
struct Args {
    /// Settings file to operate on (default: $XDG_CONFIG_HOME/settle/settings.json)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// File holding the default settings, in the same format
    #[arg(short, long)]
    defaults: Option<PathBuf>,

    /// On-disk format of the settings file
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Also write logs to the rolling log file under ~/.settle/logs
    #[arg(long)]
    log_file: bool,

    /// Command category (e.g. "config")
    category: Option<String>,

    /// Command within the category (e.g. "get")
    command: Option<String>,

    /// Arguments passed to the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Toml,
}

impl From<Format> for PersistenceFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => PersistenceFormat::Json,
            Format::Toml => PersistenceFormat::Toml,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let _log_guard = if args.log_file {
        Some(tracing_config::init_with_file()?)
    } else {
        tracing_config::init()?;
        None
    };

    let store = open_store(&args)?;
    let service = CliService::new(store.clone());

    let Some(category) = args.category.as_deref() else {
        println!("{}", service.help());
        return Ok(());
    };

    let Some(command) = args.command.as_deref() else {
        println!("{}", service.category_help(category)?);
        return Ok(());
    };

    let result = service.execute_command(category, command, &args.args);
    if store.flush()? {
        debug!("Flushed pending save before exit");
    }

    let output = result?;
    if !output.trim().is_empty() {
        println!("{output}");
    }

    Ok(())
}

#[instrument(skip(args), fields(file = ?args.file, format = ?args.format))]
fn open_store(args: &Args) -> Result<ConfigStore> {
    let path = match &args.file {
        Some(path) => path.clone(),
        None => ConfigPaths::default_store()?,
    };
    let format = PersistenceFormat::from(args.format);
    let defaults = load_defaults(args.defaults.as_deref(), format)?;

    let store = ConfigStore::new(
        defaults,
        StoreOptions::new().persistence_path(path).format(format),
    )?;

    Ok(store)
}
