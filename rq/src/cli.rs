//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{Effect, Priority};

/// rq - render job queue simulator
#[derive(Parser)]
#[command(
    name = "rq",
    about = "Single-worker render job queue with per-segment supersession",
    version,
    after_help = "Logs are written to: ~/.local/share/renderqueue/logs/renderqueue.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Run the scripted edit session and print the results
    Demo {
        /// Multiply every effect duration by this factor
        #[arg(short, long, default_value = "1.0")]
        speed: f64,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Submit jobs in order, wait for the queue to drain, print the results
    Run {
        /// Jobs as SEGMENT:EFFECT[:PRIORITY], e.g. seg_001:blur:high
        #[arg(value_name = "JOB", required = true)]
        jobs: Vec<JobSpec>,

        /// Multiply every effect duration by this factor
        #[arg(short, long, default_value = "1.0")]
        speed: f64,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the effect duration table in use
    Effects {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// A job given on the command line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobSpec {
    pub segment_id: String,
    pub effect: Effect,
    pub priority: Priority,
}

impl std::str::FromStr for JobSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let segment_id = parts.next().unwrap_or_default().trim();
        if segment_id.is_empty() {
            return Err(format!("Missing segment in '{}'. Use SEGMENT:EFFECT[:PRIORITY]", s));
        }
        let effect = parts
            .next()
            .ok_or_else(|| format!("Missing effect in '{}'. Use SEGMENT:EFFECT[:PRIORITY]", s))?
            .parse::<Effect>()?;
        let priority = match parts.next() {
            Some(p) => p.parse::<Priority>()?,
            None => Priority::default(),
        };
        if parts.next().is_some() {
            return Err(format!("Too many fields in '{}'. Use SEGMENT:EFFECT[:PRIORITY]", s));
        }
        Ok(Self {
            segment_id: segment_id.to_string(),
            effect,
            priority,
        })
    }
}

/// Output format for report commands
#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
