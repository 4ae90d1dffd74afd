//! Weekly period grid configuration.

use serde::{Deserialize, Serialize};

use crate::util::PeriodIndex;

/// Shape of the weekly timetable grid.
///
/// Periods are numbered day-major: period `p` falls on day
/// `p / periods_per_day`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Teaching periods in one day.
    pub periods_per_day: u32,
    /// Teaching days in one week.
    pub days_per_week: u32,
    /// Wall-clock start of the first period, `HH:MM`.
    #[serde(default = "default_start_time")]
    pub start_time: String,
    /// Length of one period in minutes.
    #[serde(default = "default_period_duration")]
    pub period_duration_minutes: u32,
}

fn default_start_time() -> String {
    "08:00".into()
}

const fn default_period_duration() -> u32 {
    50
}

impl ScheduleConfig {
    /// Create a grid shape with the default start time and period length.
    #[must_use]
    pub fn new(periods_per_day: u32, days_per_week: u32) -> Self {
        Self {
            periods_per_day,
            days_per_week,
            start_time: default_start_time(),
            period_duration_minutes: default_period_duration(),
        }
    }

    /// Override the start time (`HH:MM`).
    #[must_use]
    pub fn with_start_time(mut self, start_time: impl Into<String>) -> Self {
        self.start_time = start_time.into();
        self
    }

    /// Override the period length.
    #[must_use]
    pub const fn with_period_duration(mut self, minutes: u32) -> Self {
        self.period_duration_minutes = minutes;
        self
    }

    /// Validate grid shape and start time.
    pub fn validate(&self) -> Result<(), String> {
        if self.periods_per_day == 0 {
            return Err("periods_per_day must be greater than 0".into());
        }
        if self.days_per_week == 0 {
            return Err("days_per_week must be greater than 0".into());
        }
        if self.period_duration_minutes == 0 {
            return Err("period_duration_minutes must be greater than 0".into());
        }
        if self.periods_per_day.checked_mul(self.days_per_week).is_none() {
            return Err(format!(
                "{} periods per day over {} days does not fit a period index",
                self.periods_per_day, self.days_per_week
            ));
        }
        self.start_minutes()?;
        Ok(())
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Number of periods in the week. Saturates for shapes `validate` rejects.
    #[must_use]
    pub const fn total_periods(&self) -> u32 {
        self.periods_per_day.saturating_mul(self.days_per_week)
    }

    /// Zero-based day a period falls on.
    #[must_use]
    pub const fn day_of(&self, period: PeriodIndex) -> u32 {
        period / self.periods_per_day
    }

    /// Zero-based position of a period within its day.
    #[must_use]
    pub const fn period_in_day(&self, period: PeriodIndex) -> u32 {
        period % self.periods_per_day
    }

    /// Human-readable label such as `Day 2, 08:50-09:40`.
    #[must_use]
    pub fn period_label(&self, period: PeriodIndex) -> String {
        let day = self.day_of(period) + 1;
        match self.start_minutes() {
            Ok(start) => {
                let from = self
                    .period_in_day(period)
                    .saturating_mul(self.period_duration_minutes)
                    .saturating_add(start);
                let to = from.saturating_add(self.period_duration_minutes);
                format!("Day {day}, {}-{}", format_hm(from), format_hm(to))
            }
            Err(_) => format!("Day {day}, period {}", self.period_in_day(period) + 1),
        }
    }

    fn start_minutes(&self) -> Result<u32, String> {
        let invalid = || format!("start_time `{}` is not HH:MM", self.start_time);
        let (h, m) = self.start_time.split_once(':').ok_or_else(invalid)?;
        let h: u32 = h.trim().parse().map_err(|_| invalid())?;
        let m: u32 = m.trim().parse().map_err(|_| invalid())?;
        if h > 23 || m > 59 {
            return Err(invalid());
        }
        Ok(h * 60 + m)
    }
}

fn format_hm(minutes: u32) -> String {
    format!("{:02}:{:02}", (minutes / 60) % 24, minutes % 60)
}
