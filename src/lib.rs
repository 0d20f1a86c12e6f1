#![forbid(unsafe_code)]
//! ShiftGuard — monthly day/night shift planning with labor-risk warnings.
//!
//! - File-based inputs (CSV staff, JSON config/rules), no database.
//! - Deterministic greedy allocation with defined tie-breaks.
//! - Post-hoc compliance scan classifying findings RED/YELLOW/GREEN.
//! - Whole-day date model (chrono `NaiveDate`); no time-of-day tracking.

pub mod config;
pub mod engine;
pub mod holiday;
pub mod io;
pub mod model;
pub mod report;
pub mod sample;
pub mod storage;

pub use config::{load_config_from_file, load_rules_from_file, Month, RiskThresholds, RunConfig};
pub use engine::{Engine, ShiftError};
pub use holiday::{FixedHolidays, HolidayCalendar, NoHolidays};
pub use model::{
    CapacityReport, Roster, RunOutcome, ScheduleEntry, Severity, ShiftType, StaffId, StaffRecord,
    Warning, WarningCode,
};
pub use report::render_summary;
pub use storage::{JsonStorage, Storage};
