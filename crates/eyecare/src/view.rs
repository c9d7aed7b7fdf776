//! The navigation surface and plain-text rendering of each view.

use std::fmt::{self, Write};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Error;
use crate::plan::{PlanStatus, Projection};
use crate::session::Session;

/// Application title shown in the header.
pub const APP_TITLE: &str = "EyeCare Guide";

/// A named view, reachable by a stable path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum View {
    /// Surgery details form.
    SurgeryIntake,
    /// Today's instruction and upcoming milestones.
    RecoveryPlan,
    /// Medication list with "mark taken".
    MedicationReminders,
    /// Do's and don'ts.
    Checklist,
    /// Instructional videos.
    Videos,
    /// Symptom log.
    Progress,
    /// Appointment scheduler.
    Appointments,
    /// Uploaded documents.
    Documents,
}

impl View {
    /// Every view, in route order.
    pub const ALL: [View; 8] = [
        Self::SurgeryIntake,
        Self::RecoveryPlan,
        Self::MedicationReminders,
        Self::Checklist,
        Self::Videos,
        Self::Progress,
        Self::Appointments,
        Self::Documents,
    ];

    /// Views listed in the bottom navigation once a surgery is recorded.
    pub const NAVIGATION: [View; 4] = [
        Self::RecoveryPlan,
        Self::MedicationReminders,
        Self::Checklist,
        Self::Progress,
    ];

    /// The path identifying this view.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::SurgeryIntake => "/",
            Self::RecoveryPlan => "/recovery-plan",
            Self::MedicationReminders => "/reminders",
            Self::Checklist => "/checklist",
            Self::Videos => "/videos",
            Self::Progress => "/progress",
            Self::Appointments => "/appointments",
            Self::Documents => "/documents",
        }
    }

    /// Heading shown at the top of the view.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::SurgeryIntake => "Enter Your Surgery Details",
            Self::RecoveryPlan => "Your Recovery Plan",
            Self::MedicationReminders => "Medication Reminders",
            Self::Checklist => "Do's and Don'ts",
            Self::Videos => "Video Resources",
            Self::Progress => "Progress Tracker",
            Self::Appointments => "Appointment Scheduler",
            Self::Documents => "Document Storage",
        }
    }

    /// Short label used in the bottom navigation.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::SurgeryIntake => "Start",
            Self::RecoveryPlan => "Plan",
            Self::MedicationReminders => "Reminders",
            Self::Checklist => "Checklist",
            Self::Videos => "Videos",
            Self::Progress => "Progress",
            Self::Appointments => "Appointments",
            Self::Documents => "Documents",
        }
    }

    /// Render the body of this view.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to `out` fails.
    pub fn render(&self, session: &Session, now: DateTime<Utc>, out: &mut impl Write) -> fmt::Result {
        writeln!(out, "{}", self.title())?;
        writeln!(out, "{}", "=".repeat(self.title().len()))?;
        match self {
            Self::SurgeryIntake => render_intake(session, out),
            Self::RecoveryPlan => match session.projection(now) {
                Ok(projection) => write_projection(&projection, out),
                Err(_) => writeln!(out, "Please enter your surgery details first."),
            },
            Self::MedicationReminders => render_medications(session, out),
            Self::Checklist => render_checklist(session, out),
            Self::Videos => render_videos(session, out),
            Self::Progress => render_symptoms(session, out),
            Self::Appointments => render_appointments(session, out),
            Self::Documents => render_documents(session, out),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for View {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let path = if s.starts_with('/') {
            s.to_string()
        } else {
            format!("/{s}")
        };
        Self::ALL
            .into_iter()
            .find(|v| v.path() == path)
            .ok_or_else(|| Error::UnknownView(s.to_string()))
    }
}

/// Render a full page: header, the view body and, once a surgery is
/// recorded, the bottom navigation.
///
/// # Errors
///
/// Returns an error only if writing to `out` fails.
pub fn render_page(
    view: View,
    session: &Session,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> fmt::Result {
    write_header(session, now, out)?;
    writeln!(out)?;
    view.render(session, now, out)?;
    if session.surgery().is_some() {
        writeln!(out)?;
        let nav: Vec<String> = View::NAVIGATION
            .iter()
            .map(|v| {
                if *v == view {
                    format!("[{}]", v.label())
                } else {
                    v.label().to_string()
                }
            })
            .collect();
        writeln!(out, "{}", nav.join(" | "))?;
    }
    Ok(())
}

/// The application header, with surgery and day once recorded.
///
/// # Errors
///
/// Returns an error only if writing to `out` fails.
pub fn write_header(session: &Session, now: DateTime<Utc>, out: &mut impl Write) -> fmt::Result {
    writeln!(out, "{APP_TITLE}")?;
    if let (Some(surgery), Some(day)) = (session.surgery(), session.current_day(now)) {
        writeln!(out, "{} Surgery - Day {day}", surgery.surgery_type)?;
    }
    Ok(())
}

/// Today's instruction followed by upcoming milestones.
///
/// # Errors
///
/// Returns an error only if writing to `out` fails.
pub fn write_projection(projection: &Projection, out: &mut impl Write) -> fmt::Result {
    if let PlanStatus::NotStarted { starts_in_days } = projection.status {
        let unit = if starts_in_days == 1 { "day" } else { "days" };
        writeln!(out, "Your recovery plan starts in {starts_in_days} {unit}.")?;
    }
    writeln!(out, "Today's Instructions (Day {})", projection.day)?;
    writeln!(out, "  {}", projection.instruction)?;
    writeln!(out)?;
    writeln!(out, "Upcoming Milestones")?;
    if projection.milestones.is_empty() {
        writeln!(out, "  No upcoming milestones")?;
    }
    for milestone in &projection.milestones {
        writeln!(out, "  {:>3}  {}", milestone.day, milestone.instruction)?;
    }
    Ok(())
}

fn render_intake(session: &Session, out: &mut impl Write) -> fmt::Result {
    if let Some(surgery) = session.surgery() {
        writeln!(
            out,
            "Recorded: {} on {}",
            surgery.surgery_type,
            surgery.date.format("%Y-%m-%d")
        )?;
        return Ok(());
    }
    writeln!(out, "Surgery types: LASIK, Cataract, PRK, ICL")?;
    writeln!(out, "Start your plan with: surgery <type> <YYYY-MM-DD>")
}

fn render_medications(session: &Session, out: &mut impl Write) -> fmt::Result {
    if session.medications().is_empty() {
        return writeln!(out, "No medications added yet");
    }
    for med in session.medications() {
        writeln!(out, "  [{}] {} ({})", med.id, med.name, med.frequency)?;
        if let Some(taken) = med.last_taken {
            writeln!(out, "      Last taken: {}", taken.format("%b %-d, %-I:%M %p"))?;
        }
    }
    Ok(())
}

fn render_checklist(session: &Session, out: &mut impl Write) -> fmt::Result {
    for item in session.checklist() {
        let mark = if item.is_done { 'x' } else { ' ' };
        let kind = if item.is_positive { "DO  " } else { "DON'T" };
        writeln!(out, "  [{}] [{mark}] {kind} {}", item.id, item.text)?;
    }
    Ok(())
}

fn render_videos(session: &Session, out: &mut impl Write) -> fmt::Result {
    for video in session.videos() {
        writeln!(out, "  [{}] {}", video.id, video.title)?;
        writeln!(out, "      {}", video.playable_url)?;
    }
    Ok(())
}

fn render_symptoms(session: &Session, out: &mut impl Write) -> fmt::Result {
    writeln!(out, "Symptom History")?;
    if session.symptoms().is_empty() {
        return writeln!(out, "  No symptoms logged yet");
    }
    for entry in session.symptoms() {
        writeln!(
            out,
            "  [{}] {:<10} {}  {}",
            entry.id,
            entry.kind,
            entry.severity,
            entry.recorded_at.format("%Y-%m-%d")
        )?;
        if !entry.notes.is_empty() {
            writeln!(out, "      {}", entry.notes)?;
        }
    }
    Ok(())
}

fn render_appointments(session: &Session, out: &mut impl Write) -> fmt::Result {
    writeln!(out, "Upcoming Appointments")?;
    if session.appointments().is_empty() {
        return writeln!(out, "  No appointments scheduled");
    }
    for appt in session.appointments() {
        writeln!(
            out,
            "  [{}] {}  {}",
            appt.id,
            appt.purpose,
            appt.scheduled_at().format("%Y-%m-%d %H:%M")
        )?;
    }
    Ok(())
}

fn render_documents(session: &Session, out: &mut impl Write) -> fmt::Result {
    writeln!(out, "Your Documents")?;
    let documents = session.documents().documents();
    if documents.is_empty() {
        return writeln!(out, "  No documents uploaded yet");
    }
    for doc in documents {
        writeln!(out, "  [{}] {}", doc.id, doc.filename)?;
        writeln!(
            out,
            "      {}  {}  {}",
            doc.mime_type,
            doc.display_size(),
            doc.local_reference
        )?;
    }
    Ok(())
}
