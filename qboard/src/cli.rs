use std::{fmt, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use serde::Deserialize;

use crate::view::SortKey;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Where questions are kept
    #[arg(long, value_enum, env = "QBOARD_BACKEND", global = true)]
    pub backend: Option<Backend>,

    /// Directory of the local store
    #[arg(long, env = "QBOARD_STORE_DIR", global = true)]
    pub store_dir: Option<PathBuf>,

    /// Remote document store URL
    #[arg(long, env = "QBOARD_REMOTE_URL", global = true)]
    pub remote_url: Option<String>,

    /// Remote document store access token
    #[arg(long, env = "QBOARD_REMOTE_TOKEN", hide_env_values = true, global = true)]
    pub remote_token: Option<String>,

    /// Remote collection holding the questions
    #[arg(long, env = "QBOARD_COLLECTION", global = true)]
    pub collection: Option<String>,

    /// Endpoint receiving usage events (remote backend only)
    #[arg(long, env = "QBOARD_TELEMETRY_URL", global = true)]
    pub telemetry_url: Option<String>,

    /// Write the rendered board to this file
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Log verbosity
    #[arg(short, long, value_name = "LEVEL", default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Ask a new question
    Ask {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        detail: String,
    },
    /// Answer an existing question
    Answer {
        /// Id of the question to answer
        id: String,
        /// Answer text
        text: String,
    },
    /// Render the board
    List {
        /// Only show questions containing this text
        #[arg(short, long)]
        search: Option<String>,
        /// Order of the listed questions
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// JSON file on this machine
    #[default]
    Local,
    /// Remote document collection
    Remote,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl From<LogLevel> for LevelFilter {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Off => LevelFilter::Off,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}
