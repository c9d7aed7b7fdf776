//! Day-indexed recovery plans and the projection of a surgery onto them.
//!
//! A [`RecoveryPlanTable`] maps a surgery type name to a [`RecoveryPlan`],
//! which maps day offsets since surgery to instruction text. Projecting a
//! surgery date onto a plan yields today's instruction and the milestones
//! still ahead:
//!
//! ```
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use eyecare::plan::RecoveryPlanTable;
//!
//! let table = RecoveryPlanTable::builtin();
//! let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let now = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
//!
//! let projection = table.project("LASIK", date, now);
//! assert_eq!(projection.day, 7);
//! assert_eq!(projection.instruction, "Day 7: First follow-up appointment today");
//! assert_eq!(projection.milestones.len(), 2);
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::surgery::{start_of_day, SurgeryRecord, SurgeryType};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Days elapsed between the start of `date` (midnight UTC) and `now`,
/// rounded up to the next whole day.
///
/// `now` exactly at midnight gives 0 and one millisecond later gives 1.
/// When `now` is before the surgery date the result is zero or negative,
/// rounded toward zero (so 1.5 days early is -1).
#[must_use]
pub fn day_offset(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let elapsed = (now - start_of_day(date)).num_milliseconds();
    let whole = elapsed / MILLIS_PER_DAY;
    // Integer division truncates toward zero, which is already the ceiling
    // for negative values.
    if elapsed % MILLIS_PER_DAY > 0 {
        whole + 1
    } else {
        whole
    }
}

/// The generic instruction shown on days the plan has no entry for.
#[must_use]
pub fn fallback_instruction(day: i64) -> String {
    format!("Day {day}: Continue following your recovery plan")
}

/// A future day in the plan and what to do on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Day offset since surgery.
    pub day: u32,
    /// Instruction for that day.
    pub instruction: String,
}

/// Shared plan for keys with no entries.
static EMPTY_PLAN: RecoveryPlan = RecoveryPlan::new();

/// Instructions for one surgery type, keyed by day offset (1 = day of surgery).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecoveryPlan {
    entries: BTreeMap<u32, String>,
}

impl RecoveryPlan {
    /// An empty plan; every day falls back to the generic instruction.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Build a plan from `(day, instruction)` pairs.
    #[must_use]
    pub fn from_entries(entries: &[(u32, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(day, text)| (*day, (*text).to_string()))
                .collect(),
        }
    }

    /// Set the instruction for `day`, replacing any existing one.
    pub fn insert(&mut self, day: u32, instruction: impl Into<String>) {
        self.entries.insert(day, instruction.into());
    }

    /// The stored instruction for `day`, if any.
    #[must_use]
    pub fn instruction(&self, day: i64) -> Option<&str> {
        let day = u32::try_from(day).ok()?;
        self.entries.get(&day).map(String::as_str)
    }

    /// The stored instruction for `day`, or the generic fallback.
    #[must_use]
    pub fn instruction_or_fallback(&self, day: i64) -> Cow<'_, str> {
        match self.instruction(day) {
            Some(text) => Cow::Borrowed(text),
            None => Cow::Owned(fallback_instruction(day)),
        }
    }

    /// Entries with a day strictly after `day`, in ascending order.
    #[must_use]
    pub fn milestones_after(&self, day: i64) -> Vec<Milestone> {
        self.entries
            .iter()
            .filter(|(d, _)| i64::from(**d) > day)
            .map(|(d, text)| Milestone {
                day: *d,
                instruction: text.clone(),
            })
            .collect()
    }

    /// Iterate over `(day, instruction)` in ascending day order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(d, text)| (*d, text.as_str()))
    }

    /// Number of days with an instruction.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan has no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where the patient is relative to the start of their plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlanStatus {
    /// Day 1 has not been reached yet.
    NotStarted {
        /// Days until day 1 of the plan.
        starts_in_days: u64,
    },
    /// Day 1 or later.
    InProgress,
}

impl PlanStatus {
    fn for_day(day: i64) -> Self {
        if day < 1 {
            Self::NotStarted {
                starts_in_days: (1 - day).unsigned_abs(),
            }
        } else {
            Self::InProgress
        }
    }

    /// Whether day 1 has been reached.
    #[must_use]
    pub fn has_started(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

/// Today's view of a recovery plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    /// Plan key that was looked up.
    pub plan: String,
    /// Day offset since surgery.
    pub day: i64,
    /// Whether day 1 has been reached.
    pub status: PlanStatus,
    /// Instruction for `day`.
    pub instruction: String,
    /// Remaining entries after `day`, ascending.
    pub milestones: Vec<Milestone>,
}

/// Recovery plans for every known surgery type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecoveryPlanTable {
    plans: BTreeMap<String, RecoveryPlan>,
}

impl RecoveryPlanTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The table shipped with the application: LASIK and Cataract plans.
    ///
    /// PRK and ICL have no built-in entries; configuration may add them.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.insert(
            SurgeryType::Lasik.as_str(),
            RecoveryPlan::from_entries(&[
                (1, "Day 1: Rest your eyes, use prescribed eye drops every 4 hours, wear protective glasses"),
                (2, "Day 2: Continue eye drops, avoid screens for more than 30 minutes at a time"),
                (3, "Day 3: You may resume light activities, continue eye drops"),
                (7, "Day 7: First follow-up appointment today"),
                (14, "Day 14: You may resume light exercise"),
                (30, "Day 30: Final check-up today"),
            ]),
        );
        table.insert(
            SurgeryType::Cataract.as_str(),
            RecoveryPlan::from_entries(&[
                (1, "Day 1: Keep eye shield on, use antibiotic drops as prescribed"),
                (2, "Day 2: Remove shield during the day but wear at night"),
                (3, "Day 3: Begin using anti-inflammatory drops"),
                (7, "Day 7: First follow-up appointment today"),
                (14, "Day 14: You may resume most normal activities"),
                (30, "Day 30: Final check-up today"),
            ]),
        );
        table
    }

    /// Replace the plan stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, plan: RecoveryPlan) {
        self.plans.insert(key.into(), plan);
    }

    /// Add or replace single entries in the plan under `key`, creating it if needed.
    pub fn merge(&mut self, key: impl Into<String>, entries: impl IntoIterator<Item = (u32, String)>) {
        let plan = self.plans.entry(key.into()).or_default();
        for (day, text) in entries {
            plan.insert(day, text);
        }
    }

    /// The plan stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RecoveryPlan> {
        self.plans.get(key)
    }

    /// The plan for `key`, or an empty plan for unknown keys.
    #[must_use]
    pub fn plan_for(&self, key: &str) -> &RecoveryPlan {
        self.plans.get(key).unwrap_or(&EMPTY_PLAN)
    }

    /// Iterate over `(key, plan)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecoveryPlan)> {
        self.plans.iter().map(|(k, p)| (k.as_str(), p))
    }

    /// Project a surgery of type `key` performed on `date` onto its plan at `now`.
    #[must_use]
    pub fn project(&self, key: &str, date: NaiveDate, now: DateTime<Utc>) -> Projection {
        let day = day_offset(date, now);
        self.project_day(key, day)
    }

    /// Project a recorded surgery onto its plan at `now`.
    #[must_use]
    pub fn project_record(&self, record: &SurgeryRecord, now: DateTime<Utc>) -> Projection {
        self.project(record.surgery_type.as_str(), record.date, now)
    }

    /// Look up a plan at an already computed day offset.
    #[must_use]
    pub fn project_day(&self, key: &str, day: i64) -> Projection {
        let plan = self.plan_for(key);
        let projection = Projection {
            plan: key.to_string(),
            day,
            status: PlanStatus::for_day(day),
            instruction: plan.instruction_or_fallback(day).into_owned(),
            milestones: plan.milestones_after(day),
        };
        trace!(
            plan = key,
            day,
            milestones = projection.milestones.len(),
            "projected recovery plan"
        );
        projection
    }
}
