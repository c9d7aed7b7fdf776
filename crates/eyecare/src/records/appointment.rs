//! Follow-up appointments.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{required, Record, RecordList};
use crate::error::{Error, Result};

/// A scheduled appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Session-assigned identifier.
    pub id: u64,
    /// Day of the appointment.
    pub date: NaiveDate,
    /// Local time of the appointment.
    pub time: NaiveTime,
    /// Why the patient is going, e.g. "Follow-up".
    pub purpose: String,
}

impl Appointment {
    /// Date and time combined.
    #[must_use]
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

impl Record for Appointment {
    const KIND: &'static str = "appointment";

    fn id(&self) -> u64 {
        self.id
    }
}

impl RecordList<Appointment> {
    /// Append an appointment.
    ///
    /// # Errors
    ///
    /// Returns an error if the purpose is blank.
    pub fn schedule(&mut self, date: NaiveDate, time: NaiveTime, purpose: &str) -> Result<&Appointment> {
        let purpose = required("purpose", purpose)?;
        let appointment = self.push_with(|id| Appointment {
            id,
            date,
            time,
            purpose,
        });
        info!(id = appointment.id, at = %appointment.scheduled_at(), "appointment scheduled");
        Ok(appointment)
    }

    /// Request cancellation of appointment `id`.
    ///
    /// Cancellation is not supported yet: the appointment is left in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such appointment.
    pub fn cancel(&self, id: u64) -> Result<&Appointment> {
        let appointment = self.get(id)?;
        warn!(id, "appointment cancellation is not supported; appointment kept");
        Ok(appointment)
    }
}

/// Parse an appointment time (`HH:MM`, 24-hour).
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the string is blank or not a time.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = required("time", s)?;
    NaiveTime::parse_from_str(&s, "%H:%M")
        .map_err(|e| Error::invalid_input("time", format!("'{s}' is not an HH:MM time ({e})")))
}
