//! Pinnote CLI - a small local note pad.

use clap::Parser;
use pinnote::cli::{Cli, Commands, ConfigCommands};
use pinnote::commands::{self, Output};
use pinnote::config::{ConfigOverrides, ConfigPaths, OutputFormat, resolve_config};
use pinnote::storage::{FileBackend, NoteStore, StorageBackend, default_data_dir};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `pinnote=debug`.
const LOG_ENV: &str = "PINNOTE_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let human = cli.human_readable;
    let result = resolve_data_dir(cli.data_dir)
        .and_then(|data_dir| run_command(cli.command, &data_dir, human));

    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Install a stderr subscriber. `PINNOTE_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. in tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Resolve the data directory: --data-dir / PINNOTE_DATA_DIR > platform default.
fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf, pinnote::Error> {
    match explicit {
        Some(path) => Ok(path),
        None => default_data_dir(),
    }
}

fn run_command(command: Commands, data_dir: &Path, human_flag: bool) -> Result<(), pinnote::Error> {
    debug!(command = command.name(), data_dir = %data_dir.display(), "run");

    let mut overrides = ConfigOverrides::new();
    if human_flag {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }
    if let Some(escape) = command.csv_escape_override() {
        overrides = overrides.with_csv_escape(escape);
    }
    let paths = ConfigPaths::for_data_dir(data_dir);

    // Runs before resolution so a broken session config can be repaired
    if let Commands::Config {
        command: ConfigCommands::Set { key, value },
    } = &command
    {
        let result = commands::config_set(data_dir, key, value)?;
        let human = match resolve_config(&paths, &overrides) {
            Ok(config) => config.output_format() == OutputFormat::Human,
            Err(_) => human_flag,
        };
        output(&result, human);
        return Ok(());
    }

    let config = resolve_config(&paths, &overrides)?;
    let human = config.output_format() == OutputFormat::Human;

    if let Commands::Config { command } = &command {
        match command {
            ConfigCommands::Get { key } => {
                let result = commands::config_get(&paths, &overrides, key)?;
                output(&result, human);
            }
            ConfigCommands::List => {
                let result = commands::config_list(&paths, &overrides)?;
                output(&result, human);
            }
            // Handled above
            ConfigCommands::Set { .. } => {}
        }
        return Ok(());
    }

    let Some(intent) = command.into_intent(config.csv_mode()) else {
        return Ok(());
    };

    let mut store = NoteStore::new(FileBackend::new(data_dir)).with_id_space(config.id_space());
    debug!(
        backend = store.backend().backend_type(),
        location = %store.backend().location(),
        id_space = store.id_space(),
        "opened store"
    );
    let outcome = commands::dispatch(&mut store, intent)?;
    debug!(refresh = ?outcome.refresh, "done");

    output(&outcome.result, human);
    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
