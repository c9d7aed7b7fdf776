//! Medication reminders.
//!
//! Reminders are manual: marking a dose taken records the time and nothing
//! is ever scheduled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{required, Record, RecordList};
use crate::error::Result;

/// A prescribed medication and when it was last taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    /// Session-assigned identifier.
    pub id: u64,
    /// Medication name, e.g. "Antibiotic Drops".
    pub name: String,
    /// Free-text dosing frequency, e.g. "Every 4 hours".
    pub frequency: String,
    /// When a dose was last marked as taken.
    pub last_taken: Option<DateTime<Utc>>,
}

impl Record for Medication {
    const KIND: &'static str = "medication";

    fn id(&self) -> u64 {
        self.id
    }
}

impl RecordList<Medication> {
    /// Add a medication that has not been taken yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or frequency is blank.
    pub fn add(&mut self, name: &str, frequency: &str) -> Result<&Medication> {
        let name = required("name", name)?;
        let frequency = required("frequency", frequency)?;
        Ok(self.push_with(|id| Medication {
            id,
            name,
            frequency,
            last_taken: None,
        }))
    }

    /// Record that a dose of medication `id` was taken at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if there is no such medication.
    pub fn mark_taken(&mut self, id: u64, now: DateTime<Utc>) -> Result<&Medication> {
        let medication = self.get_mut(id)?;
        medication.last_taken = Some(now);
        info!(id, name = %medication.name, "medication marked taken");
        Ok(medication)
    }

    /// The stock eye-drop regimen.
    #[must_use]
    pub fn defaults() -> Self {
        let mut list = Self::new();
        for (name, frequency) in [
            ("Antibiotic Drops", "Every 4 hours"),
            ("Anti-inflammatory Drops", "Twice daily"),
            ("Artificial Tears", "As needed"),
        ] {
            list.push_with(|id| Medication {
                id,
                name: name.to_string(),
                frequency: frequency.to_string(),
                last_taken: None,
            });
        }
        list
    }
}
