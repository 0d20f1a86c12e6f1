use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Public-holiday lookup. Swap in a real calendar when one is available; the
/// engine only ever asks this one question.
pub trait HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

/// Fallback when no holiday data is available: nothing is a holiday.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate) -> bool {
        false
    }
}

/// Explicit set of holiday dates, typically loaded from a JSON array of
/// `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default)]
pub struct FixedHolidays {
    dates: BTreeSet<NaiveDate>,
}

impl FixedHolidays {
    pub fn new<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(&path)
            .with_context(|| format!("reading holidays {}", path.as_ref().display()))?;
        let raw: Vec<String> = serde_json::from_str(&data).context("parsing holidays JSON")?;
        let mut dates = BTreeSet::new();
        for s in raw {
            let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .with_context(|| format!("invalid holiday date: {s}"))?;
            dates.insert(date);
        }
        Ok(Self { dates })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl HolidayCalendar for FixedHolidays {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}

/// Saturday, Sunday, or a calendar holiday.
pub fn is_weekend_or_holiday(date: NaiveDate, calendar: &dyn HolidayCalendar) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || calendar.is_holiday(date)
}
