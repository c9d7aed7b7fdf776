//! Command-line interface for eyecare.
//!
//! This module provides the CLI structure for the `eyecare` binary and the
//! line-driven runner behind `eyecare session`.

mod commands;
mod repl;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{parse_instant, ConfigCommand, PlanCommand, PlansCommand, SessionCommand};
pub use repl::{Flow, RunSummary, SessionRunner};

/// eyecare - Recovery tracker for patients after eye surgery
///
/// Looks up the day-by-day recovery plan for a surgery and tracks
/// medications, a do's and don'ts checklist, symptoms, appointments and
/// documents for the length of one session.
#[derive(Debug, Parser)]
#[command(name = "eyecare")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show today's instruction and upcoming milestones for a surgery
    Plan(PlanCommand),

    /// Print the recovery plan table
    Plans(PlansCommand),

    /// List the views and their paths
    Views,

    /// Run an interactive or scripted session
    Session(SessionCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}
