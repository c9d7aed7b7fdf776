//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

use crate::error::{Error, Result};
use crate::surgery::{parse_date, start_of_day};

/// Plan command arguments.
#[derive(Debug, Args)]
pub struct PlanCommand {
    /// Surgery type (LASIK, Cataract, PRK, ICL or a configured plan)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub surgery_type: String,

    /// Surgery date (YYYY-MM-DD)
    #[arg(short, long, value_name = "DATE")]
    pub date: String,

    /// Evaluate at this instant (RFC 3339) instead of the current time
    #[arg(long, value_name = "RFC3339", conflicts_with = "today")]
    pub now: Option<String>,

    /// Evaluate at midnight UTC of this date
    #[arg(long, value_name = "DATE")]
    pub today: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl PlanCommand {
    /// Plan key for the requested type; known types are matched
    /// case-insensitively.
    #[must_use]
    pub fn plan_key(&self) -> String {
        crate::config::plan_key(self.surgery_type.trim())
    }

    /// The instant to evaluate the plan at, if one was given.
    ///
    /// # Errors
    ///
    /// Returns an error if `--now` or `--today` does not parse.
    pub fn evaluated_at(&self) -> Result<Option<DateTime<Utc>>> {
        if let Some(now) = &self.now {
            return parse_instant("now", now).map(Some);
        }
        self.today
            .as_deref()
            .map(|today| parse_date("today", today).map(start_of_day))
            .transpose()
    }
}

/// Plans command arguments.
#[derive(Debug, Args)]
pub struct PlansCommand {
    /// Only print the plan for this surgery type
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub surgery_type: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl PlansCommand {
    /// Plan key for `--type`, if given.
    #[must_use]
    pub fn plan_key(&self) -> Option<String> {
        self.surgery_type
            .as_deref()
            .map(|t| crate::config::plan_key(t.trim()))
    }
}

/// Session command arguments.
#[derive(Debug, Args)]
pub struct SessionCommand {
    /// Read commands from this file instead of standard input
    #[arg(short, long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Pin the session clock to this instant (RFC 3339)
    #[arg(long, value_name = "RFC3339")]
    pub now: Option<String>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Parse an RFC 3339 timestamp into UTC.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] naming `field` if `s` is not RFC 3339.
pub fn parse_instant(field: &'static str, s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::invalid_input(field, format!("'{s}' is not an RFC 3339 timestamp ({e})")))
}
