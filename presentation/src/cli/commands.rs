//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use promptlog_domain::CaptureToggle;
use std::path::PathBuf;

/// Capture toggle names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToggleArg {
    /// The final prompt sent to the model
    Prompt,
    /// The chat message history
    History,
    /// World info, characters, groups, and chat metadata
    Context,
}

impl From<ToggleArg> for CaptureToggle {
    fn from(arg: ToggleArg) -> Self {
        match arg {
            ToggleArg::Prompt => CaptureToggle::Prompt,
            ToggleArg::History => CaptureToggle::History,
            ToggleArg::Context => CaptureToggle::Context,
        }
    }
}

/// CLI arguments for promptlog
#[derive(Parser, Debug)]
#[command(name = "promptlog")]
#[command(author, version, about = "Prompt logger - capture generation events into an append-only log")]
#[command(long_about = r#"
promptlog records what a chat host sends to the model.

Host events are read as newline-delimited JSON envelopes:
  {"event": "generation_ended", "payload": {...}, "context": {...}}

Each matching event becomes one JSON line in the prompt log, holding the
fields enabled by the capture toggles (prompt, history, context).

Configuration files are loaded from (in priority order):
1. PROMPTLOG_<SECTION>__<KEY>   Environment overrides
2. --config <path>              Explicit config file
3. ./promptlog.toml             Project-level config
4. ~/.config/promptlog/config.toml   Global config

Example:
  host-bridge | promptlog capture
  promptlog view
  promptlog settings --disable context
  promptlog export --out ~/Downloads
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Capture host events into the log
    Capture {
        /// Read events from this file instead of stdin
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Show the log in human-readable form
    View,

    /// Remove every record from the log
    Clear,

    /// Save a copy of the raw log
    Export {
        /// Directory to write the export into
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Show or change the capture toggles
    Settings {
        /// Turn a field category on
        #[arg(long, value_enum, value_name = "FIELD")]
        enable: Vec<ToggleArg>,

        /// Turn a field category off
        #[arg(long, value_enum, value_name = "FIELD")]
        disable: Vec<ToggleArg>,
    },
}
