//! `eyecare` - CLI for the eye surgery recovery tracker
//!
//! This binary looks up recovery plans and runs interactive or scripted
//! tracking sessions.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};

use eyecare::cli::{
    parse_instant, Cli, Command, ConfigCommand, PlanCommand, PlansCommand, SessionCommand,
    SessionRunner,
};
use eyecare::surgery::parse_date;
use eyecare::view::{self, View};
use eyecare::{init_logging, Config, RecoveryPlan, Session};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Plan(plan_cmd) => handle_plan(&config, &plan_cmd),
        Command::Plans(plans_cmd) => handle_plans(&config, &plans_cmd),
        Command::Views => {
            handle_views();
            Ok(())
        }
        Command::Session(session_cmd) => handle_session(&config, &session_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn handle_plan(config: &Config, cmd: &PlanCommand) -> Result<()> {
    let plans = config.recovery_plans()?;
    let key = cmd.plan_key();
    if plans.get(&key).is_none() {
        warn!(plan = %key, "no recovery plan for this surgery type; using the generic instruction");
    }

    let date = parse_date("date", &cmd.date)?;
    let now = cmd.evaluated_at()?.unwrap_or_else(Utc::now);
    let projection = plans.project(&key, date, now);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&projection)?);
    } else {
        let mut out = String::new();
        view::write_projection(&projection, &mut out)?;
        println!("{key} Surgery - Day {}", projection.day);
        println!();
        print!("{out}");
    }
    Ok(())
}

fn handle_plans(config: &Config, cmd: &PlansCommand) -> Result<()> {
    let plans = config.recovery_plans()?;

    if let Some(key) = cmd.plan_key() {
        let plan = plans.plan_for(&key);
        if cmd.json {
            println!("{}", serde_json::to_string_pretty(plan)?);
        } else {
            print_plan(&key, plan);
        }
        return Ok(());
    }

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
    } else {
        for (i, (key, plan)) in plans.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print_plan(key, plan);
        }
    }
    Ok(())
}

fn print_plan(key: &str, plan: &RecoveryPlan) {
    println!("{key}");
    if plan.is_empty() {
        println!("  (no entries; every day uses the generic instruction)");
    }
    for (day, instruction) in plan.iter() {
        println!("  {day:>3}  {instruction}");
    }
}

fn handle_views() {
    for view in View::ALL {
        println!("{:<16} {}", view.path(), view.title());
    }
}

fn handle_session(config: &Config, cmd: &SessionCommand) -> Result<()> {
    let mut runner = SessionRunner::new(Session::from_config(config)?);
    if let Some(now) = &cmd.now {
        runner = runner.with_fixed_now(parse_instant("now", now)?);
    }

    let stdout = io::stdout();
    let summary = if let Some(path) = &cmd.script {
        let file = File::open(path)
            .with_context(|| format!("failed to open session script {}", path.display()))?;
        info!(script = %path.display(), "running session script");
        runner.run(BufReader::new(file), stdout.lock(), None)?
    } else {
        let stdin = io::stdin();
        let prompt = if stdin.is_terminal() {
            let mut page = String::new();
            view::render_page(View::SurgeryIntake, runner.session(), runner.now(), &mut page)?;
            print!("{page}");
            println!();
            println!("Type 'help' for a list of commands.");
            Some(config.session.prompt.as_str())
        } else {
            None
        };
        runner.run(stdin.lock(), stdout.lock(), prompt)?
    };

    info!(
        commands = summary.commands,
        failures = summary.failures,
        "session ended"
    );
    if cmd.script.is_some() && !summary.is_clean() {
        bail!(
            "{} of {} script commands failed",
            summary.failures,
            summary.commands
        );
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Session]");
                println!("  Seed defaults:      {}", config.session.seed_defaults);
                println!("  Prompt:             {:?}", config.session.prompt);
                println!();
                println!("[Documents]");
                println!("  Max size (bytes):   {}", config.documents.max_size_bytes);
                println!();
                println!("[Plans]");
                if config.plans.is_empty() {
                    println!("  (built-in only)");
                }
                for (name, entries) in &config.plans {
                    println!("  {name:<18}  {} configured entries", entries.len());
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}
