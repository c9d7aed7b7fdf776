//! Surgery types and the per-session surgery record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The kinds of eye surgery a patient can record.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum SurgeryType {
    /// Laser-assisted in situ keratomileusis.
    #[default]
    #[serde(rename = "LASIK")]
    Lasik,
    /// Cataract removal and lens replacement.
    Cataract,
    /// Photorefractive keratectomy.
    #[serde(rename = "PRK")]
    Prk,
    /// Implantable collamer lens.
    #[serde(rename = "ICL")]
    Icl,
}

impl SurgeryType {
    /// All surgery types, in intake form order.
    pub const ALL: [SurgeryType; 4] = [Self::Lasik, Self::Cataract, Self::Prk, Self::Icl];

    /// Canonical name, also used as the recovery plan key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lasik => "LASIK",
            Self::Cataract => "Cataract",
            Self::Prk => "PRK",
            Self::Icl => "ICL",
        }
    }
}

impl fmt::Display for SurgeryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurgeryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownSurgeryType(s.to_string()))
    }
}

/// The surgery a session is tracking recovery for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurgeryRecord {
    /// Session-assigned identifier.
    pub id: u64,
    /// Which surgery was performed.
    pub surgery_type: SurgeryType,
    /// Calendar date of the surgery.
    pub date: NaiveDate,
}

impl SurgeryRecord {
    /// Create a record.
    #[must_use]
    pub fn new(id: u64, surgery_type: SurgeryType, date: NaiveDate) -> Self {
        Self {
            id,
            surgery_type,
            date,
        }
    }

    /// The instant day offsets are measured from: midnight UTC on the surgery date.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        start_of_day(self.date)
    }
}

/// Midnight UTC at the start of `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Parse an intake-form date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the string is empty or not a valid
/// calendar date.
pub fn parse_date(field: &'static str, s: &str) -> Result<NaiveDate, Error> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::invalid_input(field, "is required"));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| Error::invalid_input(field, format!("'{s}' is not a YYYY-MM-DD date ({e})")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surgery_type_display() {
        assert_eq!(SurgeryType::Lasik.to_string(), "LASIK");
        assert_eq!(SurgeryType::Cataract.to_string(), "Cataract");
        assert_eq!(SurgeryType::Prk.to_string(), "PRK");
        assert_eq!(SurgeryType::Icl.to_string(), "ICL");
    }

    #[test]
    fn test_surgery_type_parse_is_case_insensitive() {
        assert_eq!("lasik".parse::<SurgeryType>().unwrap(), SurgeryType::Lasik);
        assert_eq!("CATARACT".parse::<SurgeryType>().unwrap(), SurgeryType::Cataract);
        assert_eq!(" prk ".parse::<SurgeryType>().unwrap(), SurgeryType::Prk);
        assert_eq!("Icl".parse::<SurgeryType>().unwrap(), SurgeryType::Icl);
    }

    #[test]
    fn test_surgery_type_parse_unknown() {
        let err = "SMILE".parse::<SurgeryType>().unwrap_err();
        assert!(matches!(err, Error::UnknownSurgeryType(ref s) if s == "SMILE"));
    }

    #[test]
    fn test_surgery_type_default_matches_intake_form() {
        assert_eq!(SurgeryType::default(), SurgeryType::Lasik);
    }

    #[test]
    fn test_surgery_type_serde_uses_canonical_names() {
        let json = serde_json::to_string(&SurgeryType::Lasik).unwrap();
        assert_eq!(json, "\"LASIK\"");
        let parsed: SurgeryType = serde_json::from_str("\"Cataract\"").unwrap();
        assert_eq!(parsed, SurgeryType::Cataract);
    }

    #[test]
    fn test_started_at_is_utc_midnight() {
        let record = SurgeryRecord::new(
            1,
            SurgeryType::Lasik,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert_eq!(record.started_at().to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("date", "2024-02-29").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_empty() {
        let err = parse_date("date", "  ").unwrap_err();
        assert_eq!(err.to_string(), "invalid date: is required");
    }

    #[test]
    fn test_parse_date_rejects_impossible_date() {
        let err = parse_date("date", "2023-02-29").unwrap_err();
        assert!(err.is_validation());
    }
}
