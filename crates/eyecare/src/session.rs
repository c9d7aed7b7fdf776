//! The per-session application context.
//!
//! A [`Session`] owns everything the patient enters during one run: the
//! surgery record, the record lists and the recovery plan table. Nothing is
//! persisted; dropping the session discards it all.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::plan::{day_offset, Projection, RecoveryPlanTable};
use crate::records::{
    Appointment, ChecklistItem, Document, DocumentStore, Medication, RecordList, Severity,
    SymptomEntry, SymptomKind, VideoResource,
};
use crate::surgery::{SurgeryRecord, SurgeryType};

/// State for one patient session.
#[derive(Debug)]
pub struct Session {
    plans: RecoveryPlanTable,
    surgery: Option<SurgeryRecord>,
    medications: RecordList<Medication>,
    checklist: RecordList<ChecklistItem>,
    symptoms: RecordList<SymptomEntry>,
    appointments: RecordList<Appointment>,
    documents: DocumentStore,
    videos: RecordList<VideoResource>,
}

impl Session {
    /// An empty session using `plans` and accepting documents up to
    /// `max_document_bytes`.
    #[must_use]
    pub fn new(plans: RecoveryPlanTable, max_document_bytes: u64) -> Self {
        Self {
            plans,
            surgery: None,
            medications: RecordList::new(),
            checklist: RecordList::new(),
            symptoms: RecordList::new(),
            appointments: RecordList::new(),
            documents: DocumentStore::new(max_document_bytes),
            videos: RecordList::new(),
        }
    }

    /// A session pre-filled with the stock medications, checklist and videos.
    #[must_use]
    pub fn with_defaults(plans: RecoveryPlanTable, max_document_bytes: u64) -> Self {
        Self {
            medications: RecordList::<Medication>::defaults(),
            checklist: RecordList::<ChecklistItem>::defaults(),
            videos: RecordList::<VideoResource>::defaults(),
            ..Self::new(plans, max_document_bytes)
        }
    }

    /// Build a session as configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured plan entries are invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let plans = config.recovery_plans()?;
        let max = config.documents.max_size_bytes;
        Ok(if config.session.seed_defaults {
            Self::with_defaults(plans, max)
        } else {
            Self::new(plans, max)
        })
    }

    // === Surgery ===

    /// Record the surgery this session tracks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SurgeryAlreadyRecorded`] if one was already entered.
    pub fn record_surgery(
        &mut self,
        surgery_type: SurgeryType,
        date: NaiveDate,
    ) -> Result<&SurgeryRecord> {
        if let Some(existing) = &self.surgery {
            return Err(Error::SurgeryAlreadyRecorded {
                surgery_type: existing.surgery_type.to_string(),
                date: existing.date,
            });
        }
        info!(%surgery_type, %date, "surgery recorded");
        Ok(self
            .surgery
            .insert(SurgeryRecord::new(1, surgery_type, date)))
    }

    /// The recorded surgery, if any.
    #[must_use]
    pub fn surgery(&self) -> Option<&SurgeryRecord> {
        self.surgery.as_ref()
    }

    /// Day offset since surgery at `now`, if a surgery is recorded.
    #[must_use]
    pub fn current_day(&self, now: DateTime<Utc>) -> Option<i64> {
        self.surgery.as_ref().map(|s| day_offset(s.date, now))
    }

    /// Today's instruction and upcoming milestones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SurgeryNotRecorded`] if no surgery was entered yet.
    pub fn projection(&self, now: DateTime<Utc>) -> Result<Projection> {
        let surgery = self.surgery.as_ref().ok_or(Error::SurgeryNotRecorded)?;
        Ok(self.plans.project_record(surgery, now))
    }

    /// The recovery plan table in use.
    #[must_use]
    pub fn plans(&self) -> &RecoveryPlanTable {
        &self.plans
    }

    // === Medications ===

    /// Medication reminders.
    #[must_use]
    pub fn medications(&self) -> &RecordList<Medication> {
        &self.medications
    }

    /// Add a medication.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or frequency is blank.
    pub fn add_medication(&mut self, name: &str, frequency: &str) -> Result<&Medication> {
        self.medications.add(name, frequency)
    }

    /// Mark a dose of medication `id` taken at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such medication.
    pub fn mark_medication_taken(&mut self, id: u64, now: DateTime<Utc>) -> Result<&Medication> {
        self.medications.mark_taken(id, now)
    }

    // === Checklist ===

    /// The do's and don'ts.
    #[must_use]
    pub fn checklist(&self) -> &RecordList<ChecklistItem> {
        &self.checklist
    }

    /// Flip checklist item `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such item.
    pub fn toggle_checklist_item(&mut self, id: u64) -> Result<&ChecklistItem> {
        self.checklist.toggle(id)
    }

    // === Symptoms ===

    /// The symptom log, oldest first.
    #[must_use]
    pub fn symptoms(&self) -> &RecordList<SymptomEntry> {
        &self.symptoms
    }

    /// Log a symptom at `now`.
    pub fn log_symptom(
        &mut self,
        kind: SymptomKind,
        severity: Severity,
        notes: &str,
        now: DateTime<Utc>,
    ) -> &SymptomEntry {
        self.symptoms.log(kind, severity, notes, now)
    }

    // === Appointments ===

    /// Scheduled appointments, in the order they were added.
    #[must_use]
    pub fn appointments(&self) -> &RecordList<Appointment> {
        &self.appointments
    }

    /// Schedule an appointment.
    ///
    /// # Errors
    ///
    /// Returns an error if the purpose is blank.
    pub fn schedule_appointment(
        &mut self,
        date: NaiveDate,
        time: NaiveTime,
        purpose: &str,
    ) -> Result<&Appointment> {
        self.appointments.schedule(date, time, purpose)
    }

    /// Ask to cancel appointment `id`; the appointment is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such appointment.
    pub fn cancel_appointment(&self, id: u64) -> Result<&Appointment> {
        self.appointments.cancel(id)
    }

    // === Documents ===

    /// Uploaded documents and their content.
    #[must_use]
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Upload every file in one selection.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be read or is too large; nothing
    /// is added in that case.
    pub fn upload_documents<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<&[Document]> {
        self.documents.import_files(paths)
    }

    // === Videos ===

    /// Instructional videos.
    #[must_use]
    pub fn videos(&self) -> &RecordList<VideoResource> {
        &self.videos
    }
}

impl Default for Session {
    fn default() -> Self {
        let config = Config::default();
        Self::with_defaults(RecoveryPlanTable::builtin(), config.documents.max_size_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_default_session_is_seeded() {
        let session = Session::default();
        assert!(session.surgery().is_none());
        assert_eq!(session.medications().len(), 3);
        assert_eq!(session.checklist().len(), 4);
        assert_eq!(session.videos().len(), 2);
        assert!(session.symptoms().is_empty());
        assert!(session.appointments().is_empty());
        assert!(session.documents().documents().is_empty());
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new(RecoveryPlanTable::builtin(), 10);
        assert!(session.medications().is_empty());
        assert!(session.checklist().is_empty());
        assert!(session.videos().is_empty());
    }

    #[test]
    fn test_projection_requires_surgery() {
        let session = Session::default();
        let err = session.projection(at(2024, 1, 8, 0)).unwrap_err();
        assert!(matches!(err, Error::SurgeryNotRecorded));
        assert_eq!(session.current_day(at(2024, 1, 8, 0)), None);
    }

    #[test]
    fn test_record_surgery_then_project() {
        let mut session = Session::default();
        session
            .record_surgery(SurgeryType::Lasik, date(2024, 1, 1))
            .unwrap();

        let projection = session.projection(at(2024, 1, 8, 0)).unwrap();
        assert_eq!(projection.day, 7);
        assert_eq!(projection.instruction, "Day 7: First follow-up appointment today");
        assert_eq!(session.current_day(at(2024, 1, 8, 0)), Some(7));
    }

    #[test]
    fn test_day_is_recomputed_from_now() {
        let mut session = Session::default();
        session
            .record_surgery(SurgeryType::Cataract, date(2024, 1, 1))
            .unwrap();

        assert_eq!(session.current_day(at(2024, 1, 2, 6)), Some(2));
        assert_eq!(session.current_day(at(2024, 1, 31, 0)), Some(30));
        assert_eq!(session.current_day(at(2024, 1, 2, 6)), Some(2));
    }

    #[test]
    fn test_surgery_is_recorded_once() {
        let mut session = Session::default();
        session
            .record_surgery(SurgeryType::Prk, date(2024, 2, 1))
            .unwrap();

        let err = session
            .record_surgery(SurgeryType::Lasik, date(2024, 3, 1))
            .unwrap_err();

        assert!(matches!(err, Error::SurgeryAlreadyRecorded { .. }));
        assert_eq!(session.surgery().unwrap().surgery_type, SurgeryType::Prk);
    }

    #[test]
    fn test_from_config_respects_seed_flag() {
        let mut config = Config::default();
        config.session.seed_defaults = false;
        let session = Session::from_config(&config).unwrap();
        assert!(session.medications().is_empty());

        let session = Session::from_config(&Config::default()).unwrap();
        assert_eq!(session.medications().len(), 3);
    }

    #[test]
    fn test_from_config_uses_configured_plans() {
        let mut config = Config::default();
        config
            .plans
            .entry("ICL".to_string())
            .or_default()
            .insert("1".to_string(), "Day 1: Check lens vault".to_string());
        let mut session = Session::from_config(&config).unwrap();
        session
            .record_surgery(SurgeryType::Icl, date(2024, 1, 1))
            .unwrap();

        let projection = session.projection(at(2024, 1, 1, 12)).unwrap();
        assert_eq!(projection.instruction, "Day 1: Check lens vault");
    }

    #[test]
    fn test_collaborator_updates_are_visible_immediately() {
        let mut session = Session::default();
        let now = at(2024, 1, 2, 8);

        session.mark_medication_taken(1, now).unwrap();
        session.toggle_checklist_item(3).unwrap();
        session.log_symptom(SymptomKind::Redness, Severity::new(4).unwrap(), "left eye", now);
        session
            .schedule_appointment(date(2024, 1, 8), NaiveTime::MIN, "Follow-up")
            .unwrap();

        assert_eq!(session.medications().get(1).unwrap().last_taken, Some(now));
        assert!(session.checklist().get(3).unwrap().is_done);
        assert_eq!(session.symptoms().len(), 1);
        assert_eq!(session.appointments().len(), 1);
        assert!(session.cancel_appointment(1).is_ok());
        assert_eq!(session.appointments().len(), 1);
    }

    #[test]
    fn test_add_medication() {
        let mut session = Session::default();
        let med = session.add_medication("Steroid Drops", "4x daily").unwrap();
        assert_eq!(med.id, 4);
    }

    #[test]
    fn test_upload_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discharge.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let mut session = Session::default();
        let added = session.upload_documents(&[&path]).unwrap();

        assert_eq!(added.len(), 1);
        assert_eq!(added[0].mime_type, "application/pdf");
        assert_eq!(session.documents().documents().len(), 1);
    }
}
