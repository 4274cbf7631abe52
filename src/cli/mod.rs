//! CLI argument definitions for tdash.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tdash - Terminal dashboard for a Tesla vehicle backend.
///
/// Start with `tdash status` to see the current session, then `tdash toggle`
/// and `tdash key set` to switch to the real vehicle.
#[derive(Parser, Debug)]
#[command(name = "tdash")]
#[command(author, version, about = "Vehicle dashboard with a developer/real session", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Directory holding state.kdl, config.kdl and action.log.
    /// Can also be set via TDASH_DATA_DIR environment variable.
    #[arg(long = "data-dir", global = true, env = "TDASH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Backend base URL including the /api prefix (overrides config and TDASH_BASE_URL)
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Keep the session in memory only; nothing is read from or written to state.kdl
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the session mode, credential status and banner message
    Status,

    /// Switch between developer and real mode.
    ///
    /// Leaving real mode forgets the stored API key.
    Toggle,

    /// API key management
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },

    /// Fetch a telemetry snapshot and render the dashboard widgets
    Stats,

    /// Show the camera feed URL
    Camera,

    /// Lock the vehicle
    Lock,

    /// Unlock the vehicle
    Unlock,

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// API key subcommands
#[derive(Subcommand, Debug)]
pub enum KeyCommands {
    /// Submit an API key; switches to real mode if needed
    Set {
        /// The API key (omit and pass --stdin to read it from standard input)
        #[arg(required_unless_present = "stdin", conflicts_with = "stdin")]
        key: Option<String>,

        /// Read the API key from the first line of standard input
        #[arg(long)]
        stdin: bool,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key (base-url, timeout-secs, output-format, action-log)
        name: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        name: String,
        /// Configuration value
        value: String,
    },

    /// List all configuration values with their sources
    List,
}
