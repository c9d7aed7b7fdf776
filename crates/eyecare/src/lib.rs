//! `eyecare` - Recovery tracker for patients after eye surgery
//!
//! This library maps a surgery type and date onto a day-indexed recovery
//! plan, and keeps the patient's medications, checklist, symptom log,
//! appointments and documents in an in-memory [`Session`].
//!
//! ```
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use eyecare::{Session, SurgeryType};
//!
//! let mut session = Session::default();
//! session
//!     .record_surgery(SurgeryType::Lasik, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
//!     .unwrap();
//!
//! let now = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
//! let projection = session.projection(now).unwrap();
//! assert_eq!(projection.day, 7);
//! assert_eq!(projection.instruction, "Day 7: First follow-up appointment today");
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod plan;
pub mod records;
pub mod session;
pub mod surgery;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use plan::{day_offset, Milestone, PlanStatus, Projection, RecoveryPlan, RecoveryPlanTable};
pub use session::Session;
pub use surgery::{SurgeryRecord, SurgeryType};
pub use view::View;
