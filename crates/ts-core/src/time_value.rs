//! Fractional hour-of-day values.

use std::fmt;
use std::ops::Add;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Number of hour buckets in a day.
pub const HOURS_PER_DAY: u32 = 24;

/// A point on a continuous hour axis, e.g. `9.5` for 09:30.
///
/// Values may exceed 24 after arithmetic (a shift running past midnight);
/// [`normalized_hour`](Self::normalized_hour) and
/// [`day_overflow`](Self::day_overflow) split such a value back into a bucket
/// and a day offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeValue(f64);

impl TimeValue {
    /// 00:00.
    pub const MIDNIGHT: Self = Self(0.0);

    /// One full day, used to push an end time past midnight.
    pub const ONE_DAY: Self = Self(24.0);

    /// Creates a value from a raw hour count.
    pub const fn from_hours(hours: f64) -> Self {
        Self(hours)
    }

    /// Creates a value from a clock reading.
    ///
    /// Minutes become a fraction of an hour rounded to two decimal places, so
    /// 09:20 is `9.33`.
    pub fn from_clock(hour: u32, minute: u32) -> Self {
        let fraction = (f64::from(minute) / 60.0 * 100.0).round() / 100.0;
        Self(f64::from(hour) + fraction)
    }

    /// Creates a value from a wall-clock time, discarding seconds.
    pub fn from_time(time: NaiveTime) -> Self {
        Self::from_clock(time.hour(), time.minute())
    }

    /// Returns the value as a real number of hours.
    pub const fn as_hours(self) -> f64 {
        self.0
    }

    /// Returns `floor(value)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn whole_hours(self) -> u32 {
        self.0.floor() as u32
    }

    /// Returns the part of the value past the whole hour, in `[0, 1)`.
    pub fn fraction(self) -> f64 {
        self.0 - self.0.floor()
    }

    /// Returns the hour-of-day bucket, `floor(value) mod 24`.
    pub fn normalized_hour(self) -> u32 {
        self.whole_hours() % HOURS_PER_DAY
    }

    /// Returns how many midnights the value lies past, `floor(value / 24)`.
    pub fn day_overflow(self) -> u32 {
        self.whole_hours() / HOURS_PER_DAY
    }
}

impl Add for TimeValue {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_hours(self.0))
    }
}

/// Formats an hour count with at most two decimals and no trailing zeros.
///
/// `8.5` renders as `8.5`, `8.0` as `8`, `2.3299999` as `2.33`.
pub fn format_hours(hours: f64) -> String {
    let text = format!("{hours:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
