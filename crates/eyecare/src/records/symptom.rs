//! The symptom log on the progress view.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Record, RecordList};
use crate::error::{Error, Result};

/// What kind of symptom was noticed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomKind {
    /// Eye pain.
    #[default]
    Pain,
    /// Dry or gritty eyes.
    Dryness,
    /// Blurred vision.
    Blurriness,
    /// Red or bloodshot eyes.
    Redness,
}

impl SymptomKind {
    /// All kinds, in form order.
    pub const ALL: [SymptomKind; 4] = [Self::Pain, Self::Dryness, Self::Blurriness, Self::Redness];

    /// Lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pain => "pain",
            Self::Dryness => "dryness",
            Self::Blurriness => "blurriness",
            Self::Redness => "redness",
        }
    }
}

impl fmt::Display for SymptomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SymptomKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownSymptom(s.to_string()))
    }
}

/// Symptom severity on a 1 (mild) to 5 (severe) scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Severity(u8);

impl Severity {
    /// Lowest severity.
    pub const MIN: u8 = 1;
    /// Highest severity.
    pub const MAX: u8 = 5;

    /// Validate a severity value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `value` is outside 1–5.
    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::invalid_input(
                "severity",
                format!("{value} is not between {} and {}", Self::MIN, Self::MAX),
            ))
        }
    }

    /// The numeric value.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Severity {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// One logged symptom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomEntry {
    /// Session-assigned identifier.
    pub id: u64,
    /// What was noticed.
    pub kind: SymptomKind,
    /// How bad it was.
    pub severity: Severity,
    /// Optional free-text notes; empty when none were given.
    pub notes: String,
    /// When the entry was logged.
    pub recorded_at: DateTime<Utc>,
}

impl Record for SymptomEntry {
    const KIND: &'static str = "symptom";

    fn id(&self) -> u64 {
        self.id
    }
}

impl RecordList<SymptomEntry> {
    /// Append a symptom logged at `now`.
    pub fn log(
        &mut self,
        kind: SymptomKind,
        severity: Severity,
        notes: &str,
        now: DateTime<Utc>,
    ) -> &SymptomEntry {
        let entry = self.push_with(|id| SymptomEntry {
            id,
            kind,
            severity,
            notes: notes.trim().to_string(),
            recorded_at: now,
        });
        info!(id = entry.id, kind = %kind, severity = severity.get(), "symptom logged");
        entry
    }
}
