//! Contest window selection and time-based weighting

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

/// The scoring window for one competition run.
///
/// Covers one UTC calendar month as `[start, end)`. The first `bonus_days`
/// of the month form a double-points sub-window, and contributions in the
/// final `hold_period` before `end` are linearly decayed to zero to make
/// boundary-timed wash loops worthless.
#[derive(Debug, Clone)]
pub struct ContestWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    bonus_until: DateTime<Utc>,
    hold_period: Duration,
}

impl ContestWindow {
    /// Build the window for the UTC calendar month containing `now`.
    ///
    /// Pure given `now`, so runs are reproducible against a fixed clock.
    pub fn current_month(now: DateTime<Utc>, bonus_days: i64, hold_period_hours: i64) -> Self {
        let start = month_start(now.year(), now.month());
        let end = if now.month() == 12 {
            month_start(now.year() + 1, 1)
        } else {
            month_start(now.year(), now.month() + 1)
        };

        Self::new(start, end, bonus_days, hold_period_hours)
    }

    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        bonus_days: i64,
        hold_period_hours: i64,
    ) -> Self {
        Self {
            start,
            end,
            bonus_until: start + Duration::days(bonus_days.max(0)),
            hold_period: Duration::hours(hold_period_hours.max(1)),
        }
    }

    /// Inclusive start, exclusive end
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }

    /// 2.0 inside the bonus sub-window, 1.0 otherwise
    pub fn bonus_multiplier(&self, at: DateTime<Utc>) -> f64 {
        if at < self.bonus_until {
            2.0
        } else {
            1.0
        }
    }

    /// Linear decay weight in `[0, 1]`: full credit until `end - hold_period`,
    /// ramping down to zero credit at `end`.
    pub fn hold_weight(&self, at: DateTime<Utc>) -> f64 {
        let remaining = (self.end - at).num_milliseconds() as f64;
        let hold = self.hold_period.num_milliseconds() as f64;
        (remaining / hold).clamp(0.0, 1.0)
    }
}

fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    // First day of a month at midnight UTC is always a unique instant
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .expect("UTC month start is unambiguous")
}
