use super::demand::DemandPlan;
use super::state::{StaffState, StateStore};
use crate::config::{RiskThresholds, RunConfig};
use crate::holiday::{is_weekend_or_holiday, HolidayCalendar};
use crate::model::{Severity, ShiftType, Warning, WarningCode};
use chrono::NaiveDate;
use tracing::debug;

/// Greedy day-by-day fill: day slots first, then night slots, walking staff in
/// priority order. Shortfalls are recorded as warnings, never errors.
pub(super) fn allocate(
    config: &RunConfig,
    rules: &RiskThresholds,
    plan: &DemandPlan,
    calendar: &dyn HolidayCalendar,
    store: &mut StateStore,
    warnings: &mut Vec<Warning>,
) {
    let cap = rules.enforcement.max_consecutive_workdays;

    for &date in plan.dates() {
        let weekend = is_weekend_or_holiday(date, calendar);

        // Everyone not already marked OFF (requested time off) is a candidate.
        let mut order: Vec<usize> = (0..store.len())
            .filter(|i| store.get(*i).shift_on(date) != Some(ShiftType::Off))
            .collect();

        // Composite key: staff lacking weekend/holiday clearance sort into a
        // later tier on such dates but stay candidates; within a tier, the
        // furthest below their desired total goes first. The sort is stable,
        // so ties keep roster order.
        order.sort_by_key(|&i| {
            let state = store.get(i);
            let tier: u8 = u8::from(weekend && !state.can_weekend_holiday);
            let shortage = i64::from(state.assigned_days) - i64::from(state.desired_days);
            (tier, shortage)
        });

        // Split the day's extra demand between the two shifts, night taking
        // the odd slot.
        let extra = plan.extra_for(date);
        let min_day_today = config.min_staff_day + extra / 2;
        let min_night_today = config.min_staff_night + (extra - extra / 2);

        let mut day_assigned: Vec<usize> = Vec::new();
        for &i in &order {
            if day_assigned.len() as u32 >= min_day_today {
                break;
            }
            let state = store.get(i);
            if !state.can_day || state.assigned_days >= state.desired_days {
                continue;
            }
            if !can_assign(state, date, ShiftType::Day, cap) {
                continue;
            }
            if store.get_mut(i).assign(date, ShiftType::Day) {
                day_assigned.push(i);
            }
        }

        let mut night_assigned: Vec<usize> = Vec::new();
        for &i in &order {
            if day_assigned.contains(&i) {
                continue;
            }
            if night_assigned.len() as u32 >= min_night_today {
                break;
            }
            let state = store.get(i);
            if !state.can_night || state.assigned_days >= state.desired_days {
                continue;
            }
            if !can_assign(state, date, ShiftType::Night, cap) {
                continue;
            }
            if store.get_mut(i).assign(date, ShiftType::Night) {
                night_assigned.push(i);
            }
        }

        debug!(
            %date,
            day = day_assigned.len(),
            night = night_assigned.len(),
            day_target = min_day_today,
            night_target = min_night_today,
            "date filled"
        );

        staffing_warning(
            date,
            day_assigned.len() as u32,
            min_day_today,
            config.allow_solo_day,
            WarningCode::SoloShiftDay,
            WarningCode::UnderstaffedDay,
            "day",
            warnings,
        );
        staffing_warning(
            date,
            night_assigned.len() as u32,
            min_night_today,
            config.allow_solo_night,
            WarningCode::SoloShiftNight,
            WarningCode::UnderstaffedNight,
            "night",
            warnings,
        );
    }
}

/// Rest gate: never day work straight after a night shift, and never extend a
/// streak already at the enforced consecutive-workday cap.
fn can_assign(state: &StaffState, date: NaiveDate, shift: ShiftType, cap: u32) -> bool {
    if state.streak_before(date) >= cap {
        return false;
    }
    if state.last_shift_date.is_none() {
        return true;
    }
    let prev = match date.pred_opt() {
        Some(p) => p,
        None => return true,
    };
    match state.shift_on(prev) {
        Some(ShiftType::Night) if shift == ShiftType::Day => false,
        _ => true,
    }
}

#[allow(clippy::too_many_arguments)]
fn staffing_warning(
    date: NaiveDate,
    assigned: u32,
    required: u32,
    allow_solo: bool,
    solo_code: WarningCode,
    under_code: WarningCode,
    label: &str,
    warnings: &mut Vec<Warning>,
) {
    if assigned >= required {
        return;
    }
    if assigned == 1 && allow_solo {
        // Solo coverage is tolerated by policy but still surfaced.
        warnings.push(Warning::new(
            Severity::Yellow,
            solo_code,
            format!("{label} shift running solo (structural risk)"),
            date.format("%Y-%m-%d").to_string(),
        ));
    } else {
        warnings.push(Warning::new(
            Severity::Red,
            under_code,
            format!("{label} shift understaffed (required: {required}, actual: {assigned})"),
            date.format("%Y-%m-%d").to_string(),
        ));
    }
}
