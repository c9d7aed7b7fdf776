//! Line-driven session runner.
//!
//! Each input line is split shell-style and parsed as one session command.
//! A failing command is reported and the session carries on with the next
//! line; only `quit` or end of input stops it.

use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::error::{Error, Result};
use crate::records::{parse_time, Severity, SymptomKind};
use crate::session::Session;
use crate::surgery::{parse_date, SurgeryType};
use crate::view::{self, View};

/// A single session command line.
#[derive(Debug, Parser)]
#[command(name = "session", no_binary_name = true)]
#[command(disable_version_flag = true, override_usage = "<COMMAND> [ARGS]")]
struct SessionLine {
    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Record the surgery this session tracks
    Surgery {
        /// LASIK, Cataract, PRK or ICL
        #[arg(value_name = "TYPE")]
        surgery_type: String,
        /// Surgery date (YYYY-MM-DD)
        date: String,
    },

    /// Render the view at a path, e.g. /recovery-plan
    Show {
        /// View path
        path: String,
    },

    /// Show today's instructions and upcoming milestones
    Plan,

    /// Summarize the surgery, current day and record counts
    Status,

    /// List medication reminders
    Meds,

    /// Add a medication reminder
    MedAdd {
        /// Medication name
        name: String,
        /// How often to take it
        frequency: String,
    },

    /// Mark a medication dose taken now
    Take {
        /// Medication id
        id: u64,
    },

    /// List do's and don'ts
    Checklist,

    /// Tick or untick a checklist item
    Toggle {
        /// Checklist item id
        id: u64,
    },

    /// Log a symptom
    Symptom {
        /// pain, dryness, blurriness or redness
        kind: String,
        /// Severity from 1 to 5
        #[arg(short, long, default_value_t = 3)]
        severity: u8,
        /// Free-form notes
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// Show the symptom history
    Symptoms,

    /// Schedule an appointment
    Appointment {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Time (HH:MM)
        time: String,
        /// What the appointment is for
        purpose: String,
    },

    /// List scheduled appointments
    Appointments,

    /// Ask to cancel an appointment
    Cancel {
        /// Appointment id
        id: u64,
    },

    /// Upload one or more documents
    Upload {
        /// Files to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// List uploaded documents
    Documents,

    /// List instructional videos
    Videos,

    /// End the session
    #[command(visible_alias = "exit")]
    Quit,
}

/// What the runner should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop the session.
    Quit,
}

/// Counts from one [`SessionRunner::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Command lines executed (comments and blank lines excluded).
    pub commands: usize,
    /// Command lines that reported an error.
    pub failures: usize,
}

impl RunSummary {
    /// Whether every command succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }
}

/// Drives a [`Session`] from text commands.
#[derive(Debug)]
pub struct SessionRunner {
    session: Session,
    fixed_now: Option<DateTime<Utc>>,
}

impl SessionRunner {
    /// A runner over `session` that reads the system clock.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            fixed_now: None,
        }
    }

    /// Pin the clock to `now` for every command.
    #[must_use]
    pub fn with_fixed_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    /// The session being driven.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The instant commands are evaluated at.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    /// Run commands from `input` until `quit` or end of input, writing
    /// results and errors to `output`. `prompt` is printed before each read.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading `input` or writing `output` fails;
    /// command failures, including lines that are not UTF-8, are reported
    /// inline and counted.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
        prompt: Option<&str>,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut buf = Vec::new();
        loop {
            if let Some(prompt) = prompt {
                write!(output, "{prompt}")?;
                output.flush()?;
            }
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                if prompt.is_some() {
                    writeln!(output)?;
                }
                break;
            }
            let line = match std::str::from_utf8(&buf) {
                Ok(text) => text.trim(),
                Err(err) => {
                    summary.commands += 1;
                    summary.failures += 1;
                    debug!(error = %err, "session line is not valid UTF-8");
                    writeln!(output, "error: line is not valid UTF-8 ({err})")?;
                    continue;
                }
            };
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            summary.commands += 1;
            let mut rendered = String::new();
            let result = self.execute_line(line, &mut rendered);
            output.write_all(rendered.as_bytes())?;
            match result {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(err) => {
                    summary.failures += 1;
                    debug!(line, error = %err, "session command failed");
                    match err {
                        Error::Usage(message) => writeln!(output, "{message}")?,
                        other => writeln!(output, "error: {other}")?,
                    }
                }
            }
        }
        debug!(
            commands = summary.commands,
            failures = summary.failures,
            "session input finished"
        );
        Ok(summary)
    }

    /// Execute one command line, appending its output to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] for lines that do not parse, or the error of
    /// the session operation the command ran.
    pub fn execute_line(&mut self, line: &str, out: &mut String) -> Result<Flow> {
        let Some(args) = shlex::split(line) else {
            return Err(Error::Usage(
                "error: malformed input; check quoting".to_string(),
            ));
        };
        if args.is_empty() {
            return Ok(Flow::Continue);
        }

        let parsed = match SessionLine::try_parse_from(&args) {
            Ok(parsed) => parsed,
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) =>
            {
                out.push_str(&err.to_string());
                return Ok(Flow::Continue);
            }
            Err(err) => return Err(Error::Usage(err.to_string().trim_end().to_string())),
        };
        debug!(action = ?parsed.action, "session command");
        self.apply(parsed.action, out)
    }

    fn apply(&mut self, action: Action, out: &mut String) -> Result<Flow> {
        let now = self.now();
        match action {
            Action::Surgery { surgery_type, date } => {
                let surgery_type: SurgeryType = surgery_type.parse()?;
                let date = parse_date("date", &date)?;
                self.session.record_surgery(surgery_type, date)?;
                self.page(View::RecoveryPlan, out)?;
            }
            Action::Show { path } => {
                let view: View = path.parse()?;
                self.page(view, out)?;
            }
            Action::Plan => {
                let projection = self.session.projection(now)?;
                view::write_header(&self.session, now, out)?;
                writeln!(out)?;
                view::write_projection(&projection, out)?;
            }
            Action::Status => self.status(out)?,
            Action::Meds => self.page(View::MedicationReminders, out)?,
            Action::MedAdd { name, frequency } => {
                let med = self.session.add_medication(&name, &frequency)?;
                writeln!(out, "Added [{}] {} ({})", med.id, med.name, med.frequency)?;
            }
            Action::Take { id } => {
                let med = self.session.mark_medication_taken(id, now)?;
                writeln!(out, "Marked {} taken at {}", med.name, now.format("%b %-d, %-I:%M %p"))?;
            }
            Action::Checklist => self.page(View::Checklist, out)?,
            Action::Toggle { id } => {
                let item = self.session.toggle_checklist_item(id)?;
                let state = if item.is_done { "done" } else { "not done" };
                writeln!(out, "[{}] {}: {state}", item.id, item.text)?;
            }
            Action::Symptom {
                kind,
                severity,
                notes,
            } => {
                let kind: SymptomKind = kind.parse()?;
                let severity = Severity::new(severity)?;
                let entry = self.session.log_symptom(kind, severity, &notes, now);
                writeln!(out, "Logged [{}] {} {}", entry.id, entry.kind, entry.severity)?;
            }
            Action::Symptoms => self.page(View::Progress, out)?,
            Action::Appointment {
                date,
                time,
                purpose,
            } => {
                let date = parse_date("date", &date)?;
                let time = parse_time(&time)?;
                let appt = self.session.schedule_appointment(date, time, &purpose)?;
                writeln!(
                    out,
                    "Scheduled [{}] {} on {}",
                    appt.id,
                    appt.purpose,
                    appt.scheduled_at().format("%Y-%m-%d at %H:%M")
                )?;
            }
            Action::Appointments => self.page(View::Appointments, out)?,
            Action::Cancel { id } => {
                let appt = self.session.cancel_appointment(id)?;
                writeln!(
                    out,
                    "Cancelling appointments is not available; [{}] {} is still scheduled",
                    appt.id, appt.purpose
                )?;
            }
            Action::Upload { paths } => {
                for doc in self.session.upload_documents(&paths)? {
                    writeln!(
                        out,
                        "Uploaded [{}] {} ({}, {})",
                        doc.id,
                        doc.filename,
                        doc.mime_type,
                        doc.display_size()
                    )?;
                }
            }
            Action::Documents => self.page(View::Documents, out)?,
            Action::Videos => self.page(View::Videos, out)?,
            Action::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn page(&self, view: View, out: &mut String) -> Result<()> {
        view::render_page(view, &self.session, self.now(), out)?;
        Ok(())
    }

    fn status(&self, out: &mut String) -> Result<()> {
        let now = self.now();
        let session = &self.session;
        view::write_header(session, now, out)?;
        writeln!(out)?;
        match (session.surgery(), session.current_day(now)) {
            (Some(surgery), Some(day)) => writeln!(
                out,
                "Surgery:      {} on {} (day {day})",
                surgery.surgery_type,
                surgery.date.format("%Y-%m-%d")
            )?,
            _ => writeln!(out, "Surgery:      not recorded")?,
        }
        let done = session.checklist().iter().filter(|i| i.is_done).count();
        writeln!(out, "Medications:  {}", session.medications().len())?;
        writeln!(out, "Checklist:    {done} of {} done", session.checklist().len())?;
        writeln!(out, "Symptoms:     {}", session.symptoms().len())?;
        writeln!(out, "Appointments: {}", session.appointments().len())?;
        writeln!(out, "Documents:    {}", session.documents().documents().len())?;
        Ok(())
    }
}
