//! Hour attribution.
//!
//! Splits a worked interval into signed per-hour contributions:
//!
//! 1. Every whole hour `h` in `[floor(start), floor(end))` gets weight `1.0`.
//! 2. A fractional start subtracts `fraction(start)` from the first hour,
//!    which step 1 over-counted.
//! 3. A fractional end adds `fraction(end)` to the last hour, which step 1's
//!    exclusive bound left out.
//!
//! The weights always sum to `end - start`. Hours at or past 24 carry a day
//! offset so the caller can credit them to the following day.

use crate::time_value::{HOURS_PER_DAY, TimeValue};

/// A signed weight credited to one hour bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    /// Days past the interval's own day, 1 once the interval crosses midnight.
    pub day_offset: u32,
    /// Hour-of-day bucket, always below 24.
    pub hour: u32,
    pub weight: f64,
}

impl Contribution {
    /// Builds a contribution for an absolute hour on the continuous axis.
    pub const fn at(absolute_hour: u32, weight: f64) -> Self {
        Self {
            day_offset: absolute_hour / HOURS_PER_DAY,
            hour: absolute_hour % HOURS_PER_DAY,
            weight,
        }
    }
}

/// Returns `end` moved past midnight when it reads earlier than `start`.
///
/// A shift ending at 00:00 is stored as `0.0`; it and any other end that
/// precedes its start belong to the next day.
pub fn effective_end(start: TimeValue, end: TimeValue) -> TimeValue {
    if end < start { end + TimeValue::ONE_DAY } else { end }
}

/// Computes the per-hour contributions of the interval `[start, end)`.
///
/// An empty interval yields no contributions.
pub fn attribute(start: TimeValue, end: TimeValue) -> Vec<Contribution> {
    let end = effective_end(start, end);
    if end <= start {
        return Vec::new();
    }

    let first = start.whole_hours();
    let last = end.whole_hours();

    let mut contributions: Vec<Contribution> =
        (first..last).map(|hour| Contribution::at(hour, 1.0)).collect();

    let start_fraction = start.fraction();
    if start_fraction > 0.0 {
        contributions.push(Contribution::at(first, -start_fraction));
    }

    let end_fraction = end.fraction();
    if end_fraction > 0.0 {
        contributions.push(Contribution::at(last, end_fraction));
    }

    contributions
}
