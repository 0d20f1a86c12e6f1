use crate::engine::types::ShiftError;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Target month, `YYYY-MM` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, ShiftError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ShiftError::InvalidMonth(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // valid by construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }

    pub fn days_in_month(&self) -> u32 {
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        next.unwrap()
            .signed_duration_since(self.first_day())
            .num_days() as u32
    }

    /// Every date of the month in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut out = Vec::with_capacity(self.days_in_month() as usize);
        let mut current = self.first_day();
        for _ in 0..self.days_in_month() {
            out.push(current);
            current = current.succ_opt().expect("date overflow");
        }
        out
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = ShiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s
            .split_once('-')
            .ok_or_else(|| ShiftError::InvalidMonth(s.to_string()))?;
        let year: i32 = y
            .parse()
            .map_err(|_| ShiftError::InvalidMonth(s.to_string()))?;
        let month: u32 = m
            .parse()
            .map_err(|_| ShiftError::InvalidMonth(s.to_string()))?;
        Month::new(year, month)
    }
}

impl TryFrom<String> for Month {
    type Error = ShiftError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Month> for String {
    fn from(m: Month) -> Self {
        m.to_string()
    }
}

/// One run's worth of configuration, fully typed with defaults resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub month: Month,
    pub min_staff_day: u32,
    pub min_staff_night: u32,
    pub variable_extra_slots_month: u32,
    pub allow_solo_day: bool,
    pub allow_solo_night: bool,
    pub max_consecutive_workdays: u32,
    pub min_rest_hours: u32,
    pub max_month_overtime_hours: f64,
    pub standard_day_shift_hours: f64,
    pub standard_night_shift_hours: f64,
}

impl RunConfig {
    pub fn new(month: Month, min_staff_day: u32, min_staff_night: u32) -> Self {
        Self {
            month,
            min_staff_day,
            min_staff_night,
            variable_extra_slots_month: 0,
            allow_solo_day: false,
            allow_solo_night: false,
            max_consecutive_workdays: 6,
            min_rest_hours: 11,
            max_month_overtime_hours: 45.0,
            standard_day_shift_hours: 8.0,
            standard_night_shift_hours: 10.0,
        }
    }

    pub fn validate(&self) -> Result<(), ShiftError> {
        if self.standard_day_shift_hours <= 0.0 || self.standard_night_shift_hours <= 0.0 {
            return Err(ShiftError::InvalidConfig(
                "standard shift hours must be positive",
            ));
        }
        Ok(())
    }
}

/// Raw wire form: required keys are checked by hand so the caller gets a
/// typed error naming the missing key, not a serde parse failure.
#[derive(Debug, Deserialize)]
struct RawRunConfig {
    month: Option<Month>,
    min_staff_day: Option<u32>,
    min_staff_night: Option<u32>,
    #[serde(default)]
    variable_extra_slots_month: u32,
    #[serde(default)]
    allow_solo_day: bool,
    #[serde(default)]
    allow_solo_night: bool,
    max_consecutive_workdays: Option<u32>,
    min_rest_hours: Option<u32>,
    max_month_overtime_hours: Option<f64>,
    standard_day_shift_hours: Option<f64>,
    standard_night_shift_hours: Option<f64>,
}

impl RawRunConfig {
    fn into_config(self) -> Result<RunConfig, ShiftError> {
        let month = self.month.ok_or(ShiftError::MissingConfigKey("month"))?;
        let min_staff_day = self
            .min_staff_day
            .ok_or(ShiftError::MissingConfigKey("min_staff_day"))?;
        let min_staff_night = self
            .min_staff_night
            .ok_or(ShiftError::MissingConfigKey("min_staff_night"))?;
        let mut config = RunConfig::new(month, min_staff_day, min_staff_night);
        config.variable_extra_slots_month = self.variable_extra_slots_month;
        config.allow_solo_day = self.allow_solo_day;
        config.allow_solo_night = self.allow_solo_night;
        if let Some(v) = self.max_consecutive_workdays {
            config.max_consecutive_workdays = v;
        }
        if let Some(v) = self.min_rest_hours {
            config.min_rest_hours = v;
        }
        if let Some(v) = self.max_month_overtime_hours {
            config.max_month_overtime_hours = v;
        }
        if let Some(v) = self.standard_day_shift_hours {
            config.standard_day_shift_hours = v;
        }
        if let Some(v) = self.standard_night_shift_hours {
            config.standard_night_shift_hours = v;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Parse a config from JSON text.
pub fn parse_config(json: &str) -> Result<RunConfig> {
    let raw: RawRunConfig = serde_json::from_str(json).context("parsing config JSON")?;
    Ok(raw.into_config()?)
}

pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
    let data = fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.as_ref().display()))?;
    parse_config(&data)
}

/// Yellow/red pair for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band<T> {
    pub yellow: T,
    pub red: T,
}

/// Compliance thresholds, loaded from the rules file; every field has a
/// compiled-in default so a partial (or absent) file still works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub thresholds: ThresholdTable,
    pub standard_month_hours: f64,
    pub enforcement: Enforcement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdTable {
    pub max_consecutive_workdays: Band<u32>,
    pub max_month_overtime_hours: Band<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enforcement {
    /// Hard cap applied while allocating, not just flagged afterwards.
    pub max_consecutive_workdays: u32,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            max_consecutive_workdays: Band { yellow: 6, red: 8 },
            max_month_overtime_hours: Band {
                yellow: 45.0,
                red: 54.0,
            },
        }
    }
}

impl Default for Enforcement {
    fn default() -> Self {
        Self {
            max_consecutive_workdays: 5,
        }
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            thresholds: ThresholdTable::default(),
            standard_month_hours: 160.0,
            enforcement: Enforcement::default(),
        }
    }
}

pub fn load_rules_from_file<P: AsRef<Path>>(path: P) -> Result<RiskThresholds> {
    let data = fs::read_to_string(&path)
        .with_context(|| format!("reading rules {}", path.as_ref().display()))?;
    let rules: RiskThresholds = serde_json::from_str(&data).context("parsing rules JSON")?;
    Ok(rules)
}
