use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Strong identifier for a staff member (comes from the input roster, never generated).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Staff member as loaded from input; immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    pub id: StaffId,
    pub name: String,
    #[serde(default)]
    pub role: String,
    /// Desired number of worked days this month.
    pub desired_days: u32,
    pub can_day: bool,
    pub can_night: bool,
    pub can_weekend_holiday: bool,
    /// Requested days off. Dates outside the target month are kept but never match.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub requested_off: BTreeSet<NaiveDate>,
}

impl StaffRecord {
    pub fn new<I: AsRef<str>, N: Into<String>>(id: I, name: N, desired_days: u32) -> Self {
        Self {
            id: StaffId::new(id),
            name: name.into(),
            role: String::new(),
            desired_days,
            can_day: true,
            can_night: true,
            can_weekend_holiday: true,
            requested_off: BTreeSet::new(),
        }
    }
}

/// Full roster. Iteration order is insertion order from the input file and is
/// the deterministic tie-break for allocation priority.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Roster {
    pub staff: Vec<StaffRecord>,
}

impl Roster {
    pub fn new(staff: Vec<StaffRecord>) -> Self {
        Self { staff }
    }
    pub fn len(&self) -> usize {
        self.staff.len()
    }
    pub fn is_empty(&self) -> bool {
        self.staff.is_empty()
    }
    pub fn find_by_id<'a>(&'a self, id: &StaffId) -> Option<&'a StaffRecord> {
        self.staff.iter().find(|s| &s.id == id)
    }
}

/// Shift assigned to a staff member on one date. Exhaustive and mutually
/// exclusive per (staff, date).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftType {
    #[serde(rename = "DAY")]
    Day,
    #[serde(rename = "NIGHT")]
    Night,
    #[serde(rename = "OFF")]
    Off,
}

impl ShiftType {
    pub fn is_work(self) -> bool {
        self != ShiftType::Off
    }
    pub fn as_str(self) -> &'static str {
        match self {
            ShiftType::Day => "DAY",
            ShiftType::Night => "NIGHT",
            ShiftType::Off => "OFF",
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output row; the final schedule holds staff-count × days-in-month of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub shift_type: ShiftType,
    pub staff_id: StaffId,
    pub name: String,
}

/// Warning severity: RED hard violation, YELLOW advisory, GREEN all-clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "RED")]
    Red,
    #[serde(rename = "YELLOW")]
    Yellow,
    #[serde(rename = "GREEN")]
    Green,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Red => "RED",
            Severity::Yellow => "YELLOW",
            Severity::Green => "GREEN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of warning codes emitted by the planner, allocator and evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    InsufficientCapacityBase,
    InsufficientCapacityPeak,
    UnderstaffedDay,
    UnderstaffedNight,
    SoloShiftDay,
    SoloShiftNight,
    RequestedOffViolation,
    ExcessiveConsecutive,
    HighConsecutive,
    InsufficientRest,
    ExcessiveOvertime,
    HighOvertime,
    WeekendRestriction,
    AllClear,
}

impl WarningCode {
    pub fn as_str(self) -> &'static str {
        match self {
            WarningCode::InsufficientCapacityBase => "INSUFFICIENT_CAPACITY_BASE",
            WarningCode::InsufficientCapacityPeak => "INSUFFICIENT_CAPACITY_PEAK",
            WarningCode::UnderstaffedDay => "UNDERSTAFFED_DAY",
            WarningCode::UnderstaffedNight => "UNDERSTAFFED_NIGHT",
            WarningCode::SoloShiftDay => "SOLO_SHIFT_DAY",
            WarningCode::SoloShiftNight => "SOLO_SHIFT_NIGHT",
            WarningCode::RequestedOffViolation => "REQUESTED_OFF_VIOLATION",
            WarningCode::ExcessiveConsecutive => "EXCESSIVE_CONSECUTIVE",
            WarningCode::HighConsecutive => "HIGH_CONSECUTIVE",
            WarningCode::InsufficientRest => "INSUFFICIENT_REST",
            WarningCode::ExcessiveOvertime => "EXCESSIVE_OVERTIME",
            WarningCode::HighOvertime => "HIGH_OVERTIME",
            WarningCode::WeekendRestriction => "WEEKEND_RESTRICTION",
            WarningCode::AllClear => "ALL_CLEAR",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal finding attached to a run. Never aborts allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub severity: Severity,
    pub code: WarningCode,
    pub message: String,
    pub evidence: String,
}

impl Warning {
    pub fn new<M: Into<String>, E: Into<String>>(
        severity: Severity,
        code: WarningCode,
        message: M,
        evidence: E,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            evidence: evidence.into(),
        }
    }
}

/// Slot-model figures computed before allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityReport {
    /// (min_day + min_night) × days in month.
    pub base_slots: u32,
    pub extra_slots: u32,
    pub total_slots: u32,
    /// Σ desired_days over the roster.
    pub supply_slots: u32,
}

/// Everything a run produces; consumed by the export/formatting layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub schedule: Vec<ScheduleEntry>,
    pub warnings: Vec<Warning>,
    pub capacity: CapacityReport,
}

impl RunOutcome {
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.warnings
            .iter()
            .filter(|w| w.severity == severity)
            .count()
    }
    pub fn has_red(&self) -> bool {
        self.warnings.iter().any(|w| w.severity == Severity::Red)
    }
}
