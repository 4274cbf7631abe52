//! tdash - Terminal dashboard for a Tesla vehicle backend.

use clap::Parser;
use std::io::BufRead;
use std::path::Path;
use std::process;
use std::time::Instant;
use tesla_dash::action_log::{self, ActionLog};
use tesla_dash::api::{ApiClient, VehicleCommand};
use tesla_dash::cli::{Cli, Commands, ConfigCommands, KeyCommands};
use tesla_dash::commands::{self, CarriesWarnings, Output};
use tesla_dash::config::{ConfigOverrides, OutputFormat, ResolvedConfig, resolve_config};
use tesla_dash::session::{Mode, SessionController};
use tesla_dash::storage::{KdlFileStore, KeyValueStore, MemoryStore, resolve_data_dir};
use tesla_dash::{Error, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the tracing filter.
const LOG_ENV: &str = "TDASH_LOG";

type Session = SessionController<Box<dyn KeyValueStore>>;

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let human_flag = cli.human_readable;

    // Determine data dir: --data-dir flag > TDASH_DATA_DIR env > platform data dir
    let data_dir = match resolve_data_dir(cli.data_dir.clone()) {
        Ok(dir) => dir,
        Err(e) => exit_with_error(&e, human_flag),
    };

    let mut overrides = ConfigOverrides::new();
    if let Some(url) = cli.base_url.clone() {
        overrides = overrides.with_base_url(url);
    }
    if human_flag {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }
    let config = match resolve_config(&data_dir, &overrides) {
        Ok(config) => config,
        Err(e) => exit_with_error(&e, human_flag),
    };
    let human = config.human();

    // Serialize command for logging
    let (cmd_name, args_json) = serialize_command(&cli.command);

    let start = Instant::now();
    let result = run_command(cli.command, &data_dir, &config, cli.ephemeral);
    let duration = start.elapsed().as_millis() as u64;

    // `config set action-log ...` applies to its own invocation.
    let log_enabled = if cmd_name == "config set" && result.is_ok() {
        resolve_config(&data_dir, &overrides)
            .map(|c| c.action_log_enabled())
            .unwrap_or_else(|_| config.action_log_enabled())
    } else {
        config.action_log_enabled()
    };

    if log_enabled {
        let mut entry = ActionLog::new(&cmd_name, &args_json);
        entry.duration_ms = duration;
        match &result {
            Ok(mode) => entry.mode = mode.map(|m| m.to_string()),
            Err(e) => {
                entry.success = false;
                entry.error = Some(e.to_string());
            }
        }
        action_log::log_action(&data_dir, &entry);
    }

    if let Err(e) = result {
        exit_with_error(&e, human);
    }
}

/// Install the stderr subscriber. `TDASH_LOG` takes an `EnvFilter` directive.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn exit_with_error(e: &Error, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
    process::exit(1);
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

/// Open the session store: state.kdl, or an in-memory map for `--ephemeral`.
fn load_session(data_dir: &Path, ephemeral: bool) -> (Session, Vec<Error>) {
    let store: Box<dyn KeyValueStore> = if ephemeral {
        Box::new(MemoryStore::new())
    } else {
        Box::new(KdlFileStore::open(data_dir))
    };
    tracing::debug!(store = %store.location(), "loading session");
    SessionController::initialize(store)
}

/// Run one command, printing its output. Returns the session mode when a session was loaded.
fn run_command(
    command: Commands,
    data_dir: &Path,
    config: &ResolvedConfig,
    ephemeral: bool,
) -> Result<Option<Mode>> {
    let human = config.human();
    let client = || ApiClient::new(config.base_url(), config.timeout());

    let session = match command {
        Commands::Config { command } => {
            match command {
                ConfigCommands::Get { name } => output(&commands::config_get(config, &name)?, human),
                ConfigCommands::Set { name, value } => {
                    output(&commands::config_set(data_dir, &name, &value)?, human)
                }
                ConfigCommands::List => output(&commands::config_list(config), human),
            }
            return Ok(None);
        }
        Commands::Status => {
            let (session, warnings) = load_session(data_dir, ephemeral);
            output(&commands::status(&session, &warnings), human);
            session
        }
        Commands::Toggle => {
            let (mut session, warnings) = load_session(data_dir, ephemeral);
            let result = commands::toggle(&mut session).with_load_warnings(&warnings);
            output(&result, human);
            session
        }
        Commands::Key {
            command: KeyCommands::Set { key, .. },
        } => {
            let key = match key {
                Some(key) => key,
                None => read_key_from_stdin()?,
            };
            let (mut session, warnings) = load_session(data_dir, ephemeral);
            let result = commands::key_set(&mut session, &key)?.with_load_warnings(&warnings);
            output(&result, human);
            session
        }
        Commands::Stats => {
            let (session, warnings) = load_session(data_dir, ephemeral);
            let result = commands::stats(&session, &client())?.with_load_warnings(&warnings);
            output(&result, human);
            session
        }
        Commands::Camera => {
            let (session, warnings) = load_session(data_dir, ephemeral);
            let result = commands::camera(&session, &client())?.with_load_warnings(&warnings);
            output(&result, human);
            session
        }
        Commands::Lock => {
            let (session, warnings) = load_session(data_dir, ephemeral);
            let result = commands::vehicle_command(&session, &client(), VehicleCommand::Lock)?
                .with_load_warnings(&warnings);
            output(&result, human);
            session
        }
        Commands::Unlock => {
            let (session, warnings) = load_session(data_dir, ephemeral);
            let result = commands::vehicle_command(&session, &client(), VehicleCommand::Unlock)?
                .with_load_warnings(&warnings);
            output(&result, human);
            session
        }
    };

    Ok(Some(session.state().mode()))
}

/// Read the API key from the first line of standard input.
fn read_key_from_stdin() -> Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Command name and arguments for the action log.
fn serialize_command(command: &Commands) -> (String, serde_json::Value) {
    match command {
        Commands::Status => ("status".to_string(), serde_json::json!({})),
        Commands::Toggle => ("toggle".to_string(), serde_json::json!({})),
        Commands::Key { command } => match command {
            KeyCommands::Set { key, stdin } => (
                "key set".to_string(),
                serde_json::json!({ "key": key, "stdin": stdin }),
            ),
        },
        Commands::Stats => ("stats".to_string(), serde_json::json!({})),
        Commands::Camera => ("camera".to_string(), serde_json::json!({})),
        Commands::Lock => ("lock".to_string(), serde_json::json!({})),
        Commands::Unlock => ("unlock".to_string(), serde_json::json!({})),
        Commands::Config { command } => match command {
            ConfigCommands::Get { name } => {
                ("config get".to_string(), serde_json::json!({ "name": name }))
            }
            ConfigCommands::Set { name, value } => (
                "config set".to_string(),
                serde_json::json!({ "name": name, "value": value }),
            ),
            ConfigCommands::List => ("config list".to_string(), serde_json::json!({})),
        },
    }
}
