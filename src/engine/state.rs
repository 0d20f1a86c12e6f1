use crate::model::{Roster, ShiftType, StaffId, StaffRecord};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Mutable per-staff record for one allocation run. The date→shift map is
/// built incrementally and must cover every date of the month once the run
/// closes it with [`StaffState::fill_off`].
#[derive(Debug, Clone)]
pub struct StaffState {
    pub id: StaffId,
    pub name: String,
    pub desired_days: u32,
    pub can_day: bool,
    pub can_night: bool,
    pub can_weekend_holiday: bool,
    pub requested_off: Vec<NaiveDate>,
    pub assigned_days: u32,
    pub consecutive_days: u32,
    pub last_shift_date: Option<NaiveDate>,
    pub last_shift_type: Option<ShiftType>,
    shifts: BTreeMap<NaiveDate, ShiftType>,
}

impl StaffState {
    fn from_record(record: &StaffRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            desired_days: record.desired_days,
            can_day: record.can_day,
            can_night: record.can_night,
            can_weekend_holiday: record.can_weekend_holiday,
            requested_off: record.requested_off.iter().copied().collect(),
            assigned_days: 0,
            consecutive_days: 0,
            last_shift_date: None,
            last_shift_type: None,
            shifts: BTreeMap::new(),
        }
    }

    pub fn shift_on(&self, date: NaiveDate) -> Option<ShiftType> {
        self.shifts.get(&date).copied()
    }

    /// Date→shift pairs in ascending date order.
    pub fn shifts(&self) -> impl Iterator<Item = (NaiveDate, ShiftType)> + '_ {
        self.shifts.iter().map(|(d, s)| (*d, *s))
    }

    /// Records a work assignment. Refuses to overwrite an existing entry
    /// (requested-off pre-seeding in particular), returning false; ordering
    /// alone is not trusted to protect those dates.
    pub fn assign(&mut self, date: NaiveDate, shift: ShiftType) -> bool {
        if self.shifts.contains_key(&date) {
            return false;
        }
        self.shifts.insert(date, shift);
        self.assigned_days += 1;
        self.touch(date, shift);
        true
    }

    /// Updates last-shift tracking and the consecutive-day streak.
    fn touch(&mut self, date: NaiveDate, shift: ShiftType) {
        self.last_shift_date = Some(date);
        self.last_shift_type = Some(shift);
        if shift.is_work() {
            // no previous calendar day means no streak to continue
            let prev_worked = date
                .pred_opt()
                .and_then(|prev| self.shifts.get(&prev))
                .is_some_and(|s| s.is_work());
            self.consecutive_days = if prev_worked {
                self.consecutive_days + 1
            } else {
                1
            };
        } else {
            self.consecutive_days = 0;
        }
    }

    /// Pre-seeds one requested-off date; runs before any allocation decision.
    fn seed_off(&mut self, date: NaiveDate) {
        self.shifts.insert(date, ShiftType::Off);
    }

    /// Closes the matrix: every date still unset becomes OFF.
    pub fn fill_off(&mut self, dates: &[NaiveDate]) {
        for date in dates {
            self.shifts.entry(*date).or_insert(ShiftType::Off);
        }
    }

    /// Streak length as of the given date's previous calendar day, 0 when the
    /// previous day was not worked.
    pub fn streak_before(&self, date: NaiveDate) -> u32 {
        let prev = match date.pred_opt() {
            Some(p) => p,
            None => return 0,
        };
        if self.shifts.get(&prev).is_some_and(|s| s.is_work()) {
            self.consecutive_days
        } else {
            0
        }
    }

    pub fn count_shifts(&self, shift: ShiftType) -> u32 {
        self.shifts.values().filter(|s| **s == shift).count() as u32
    }
}

/// All staff state for one run, in roster insertion order. Owned by the
/// engine call and dropped with it; nothing survives across runs.
#[derive(Debug)]
pub struct StateStore {
    states: Vec<StaffState>,
}

impl StateStore {
    /// Builds one state per staff record and immediately marks every
    /// requested-off date inside the month as OFF, so requested time off
    /// always wins over demand filling.
    pub fn new(roster: &Roster, dates: &[NaiveDate]) -> Self {
        let mut states: Vec<StaffState> =
            roster.staff.iter().map(StaffState::from_record).collect();
        for state in &mut states {
            for date in dates {
                if state.requested_off.contains(date) {
                    state.seed_off(*date);
                }
            }
        }
        Self { states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StaffState> {
        self.states.iter()
    }

    pub fn get(&self, index: usize) -> &StaffState {
        &self.states[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut StaffState {
        &mut self.states[index]
    }

    /// Fills every remaining (staff, date) hole with OFF.
    pub fn close_matrix(&mut self, dates: &[NaiveDate]) {
        for state in &mut self.states {
            state.fill_off(dates);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Month;
    use crate::model::StaffRecord;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, day).unwrap()
    }

    #[test]
    fn requested_off_is_seeded_and_cannot_be_overwritten() {
        let mut record = StaffRecord::new("S1", "One", 10);
        record.requested_off.insert(date(5));
        let dates = Month::new(2026, 2).unwrap().dates();
        let mut store = StateStore::new(&Roster::new(vec![record]), &dates);

        assert_eq!(store.get(0).shift_on(date(5)), Some(ShiftType::Off));
        assert!(!store.get_mut(0).assign(date(5), ShiftType::Day));
        assert_eq!(store.get(0).shift_on(date(5)), Some(ShiftType::Off));
        assert_eq!(store.get(0).assigned_days, 0);
    }

    #[test]
    fn streak_resets_after_a_gap() {
        let dates = Month::new(2026, 2).unwrap().dates();
        let mut store = StateStore::new(&Roster::new(vec![StaffRecord::new("S1", "One", 10)]), &dates);
        let state = store.get_mut(0);
        state.assign(date(1), ShiftType::Day);
        state.assign(date(2), ShiftType::Day);
        assert_eq!(state.consecutive_days, 2);
        assert_eq!(state.streak_before(date(3)), 2);

        // no work on the 3rd, streak is dead for the 4th
        assert_eq!(state.streak_before(date(4)), 0);
        state.assign(date(4), ShiftType::Night);
        assert_eq!(state.consecutive_days, 1);
    }

    #[test]
    fn earliest_representable_date_has_no_previous_day() {
        let dates = [NaiveDate::MIN];
        let mut store =
            StateStore::new(&Roster::new(vec![StaffRecord::new("S1", "One", 1)]), &dates);
        let state = store.get_mut(0);
        assert_eq!(state.streak_before(NaiveDate::MIN), 0);
        assert!(state.assign(NaiveDate::MIN, ShiftType::Day));
        assert_eq!(state.consecutive_days, 1);
    }

    #[test]
    fn close_matrix_leaves_no_date_unset() {
        let month = Month::new(2026, 2).unwrap();
        let dates = month.dates();
        let mut store = StateStore::new(&Roster::new(vec![StaffRecord::new("S1", "One", 10)]), &dates);
        store.get_mut(0).assign(date(10), ShiftType::Day);
        store.close_matrix(&dates);
        let state = store.get(0);
        assert_eq!(state.shifts().count(), dates.len());
        assert!(dates.iter().all(|d| state.shift_on(*d).is_some()));
    }
}
