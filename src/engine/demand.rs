use crate::config::RunConfig;
use crate::holiday::{is_weekend_or_holiday, HolidayCalendar};
use crate::model::{CapacityReport, Roster, Severity, Warning, WarningCode};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::info;

/// Calendar for the run: the month's dates plus the per-date variable extra
/// demand, distributed weekend/holiday-first.
#[derive(Debug, Clone)]
pub struct DemandPlan {
    dates: Vec<NaiveDate>,
    extra: BTreeMap<NaiveDate, u32>,
}

impl DemandPlan {
    /// Distributes `variable_extra_slots_month` one slot at a time, cycling
    /// through weekend/holiday dates first. Once the weekend cursor has run
    /// two full cycles, every further pass also feeds one slot to the weekday
    /// cycle. Stops early when both sets are empty, so it can never spin.
    pub fn build(config: &RunConfig, calendar: &dyn HolidayCalendar) -> Self {
        let dates = config.month.dates();
        let weekend: Vec<NaiveDate> = dates
            .iter()
            .copied()
            .filter(|d| is_weekend_or_holiday(*d, calendar))
            .collect();
        let weekday: Vec<NaiveDate> = dates
            .iter()
            .copied()
            .filter(|d| !is_weekend_or_holiday(*d, calendar))
            .collect();

        let mut extra: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        let total = config.variable_extra_slots_month;
        let mut distributed: u32 = 0;
        let mut cycle: usize = 0;

        while distributed < total {
            if !weekend.is_empty() {
                *extra.entry(weekend[cycle % weekend.len()]).or_insert(0) += 1;
                distributed += 1;
                cycle += 1;
                if distributed >= total {
                    break;
                }
            }
            if cycle >= weekend.len() * 2 {
                if weekday.is_empty() {
                    break;
                }
                *extra
                    .entry(weekday[distributed as usize % weekday.len()])
                    .or_insert(0) += 1;
                distributed += 1;
            }
        }

        if total > 0 {
            let on_weekend = extra.keys().filter(|d| weekend.contains(*d)).count();
            let on_weekday = extra.len() - on_weekend;
            info!(
                distributed,
                weekend_dates = on_weekend,
                weekday_dates = on_weekday,
                "variable extra slots distributed"
            );
        }

        Self { dates, extra }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Extra demand on top of the daily minimum for this date.
    pub fn extra_for(&self, date: NaiveDate) -> u32 {
        self.extra.get(&date).copied().unwrap_or(0)
    }

    pub fn total_extra(&self) -> u32 {
        self.extra.values().sum()
    }
}

/// Slot-model supply check: base demand vs the roster's desired days.
pub fn capacity_report(config: &RunConfig, roster: &Roster) -> CapacityReport {
    let days = config.month.days_in_month();
    let base_slots = (config.min_staff_day + config.min_staff_night) * days;
    let extra_slots = config.variable_extra_slots_month;
    let supply_slots: u32 = roster.staff.iter().map(|s| s.desired_days).sum();
    let report = CapacityReport {
        base_slots,
        extra_slots,
        total_slots: base_slots + extra_slots,
        supply_slots,
    };
    info!(
        base = report.base_slots,
        extra = report.extra_slots,
        total = report.total_slots,
        supply = report.supply_slots,
        "capacity report"
    );
    report
}

/// RED when supply cannot even cover the base demand, YELLOW when it covers
/// base but not the variable peak, nothing otherwise.
pub fn capacity_warning(report: &CapacityReport) -> Option<Warning> {
    if report.supply_slots < report.base_slots {
        Some(Warning::new(
            Severity::Red,
            WarningCode::InsufficientCapacityBase,
            format!(
                "supply below base demand (need {}, supply {}) - the schedule cannot be covered",
                report.base_slots, report.supply_slots
            ),
            format!("short by {} slot(s)", report.base_slots - report.supply_slots),
        ))
    } else if report.supply_slots < report.total_slots {
        Some(Warning::new(
            Severity::Yellow,
            WarningCode::InsufficientCapacityPeak,
            format!(
                "supply below peak demand (need {}, supply {}) - no headroom for busy days",
                report.total_slots, report.supply_slots
            ),
            format!(
                "short by {} slot(s)",
                report.total_slots - report.supply_slots
            ),
        ))
    } else {
        None
    }
}
