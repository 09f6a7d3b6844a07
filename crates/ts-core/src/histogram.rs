//! Running hour totals.

use serde::{Deserialize, Serialize};

use crate::attribution::Contribution;
use crate::grid::{DAYS_PER_WEEK, Day};

const HOURS: usize = 24;

/// Hours worked per hour-of-day, overall and split by day of week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourTotals {
    by_hour: [f64; HOURS],
    by_day_and_hour: [[f64; HOURS]; DAYS_PER_WEEK],
}

impl HourTotals {
    /// Creates all-zero totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds contributions from an interval that started on `day`.
    ///
    /// Contributions past midnight land on the following day.
    pub fn accumulate(&mut self, day: Day, contributions: &[Contribution]) {
        for c in contributions {
            let hour = c.hour as usize;
            let resolved = day.plus(c.day_offset);
            self.by_hour[hour] += c.weight;
            self.by_day_and_hour[resolved.index()][hour] += c.weight;
        }
    }

    /// Adds another set of totals into this one.
    pub fn merge(&mut self, other: &Self) {
        for (total, add) in self.by_hour.iter_mut().zip(other.by_hour) {
            *total += add;
        }
        for (row, other_row) in self.by_day_and_hour.iter_mut().zip(&other.by_day_and_hour) {
            for (total, add) in row.iter_mut().zip(other_row) {
                *total += add;
            }
        }
    }

    /// Hours per hour-of-day across all days.
    pub const fn by_hour(&self) -> &[f64; HOURS] {
        &self.by_hour
    }

    /// Hours per hour-of-day, indexed by day first.
    pub const fn by_day_and_hour(&self) -> &[[f64; HOURS]; DAYS_PER_WEEK] {
        &self.by_day_and_hour
    }

    /// Hours per hour-of-day for one day.
    pub const fn day(&self, day: Day) -> &[f64; HOURS] {
        &self.by_day_and_hour[day.index()]
    }

    /// Total hours across every bucket.
    pub fn total(&self) -> f64 {
        self.by_hour.iter().sum()
    }

    /// Returns true when no bucket holds any hours.
    pub fn is_zero(&self) -> bool {
        self.by_hour.iter().all(|&h| h == 0.0)
            && self.by_day_and_hour.iter().flatten().all(|&h| h == 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::attribution::attribute;
    use crate::time_value::TimeValue;

    fn tv(hours: f64) -> TimeValue {
        TimeValue::from_hours(hours)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn new_totals_are_zero() {
        let totals = HourTotals::new();
        assert!(totals.is_zero());
        assert_close(totals.total(), 0.0);
    }

    #[test]
    fn accumulate_credits_both_histograms() {
        let mut totals = HourTotals::new();
        totals.accumulate(Day::Tue, &attribute(tv(9.5), tv(11.0)));

        assert_close(totals.by_hour()[9], 0.5);
        assert_close(totals.by_hour()[10], 1.0);
        assert_close(totals.day(Day::Tue)[9], 0.5);
        assert_close(totals.day(Day::Tue)[10], 1.0);
        assert_close(totals.day(Day::Mon)[10], 0.0);
        assert_close(totals.total(), 1.5);
    }

    #[test]
    fn accumulate_rolls_hours_past_midnight_to_next_day() {
        let mut totals = HourTotals::new();
        totals.accumulate(Day::Fri, &attribute(tv(23.0), tv(25.0)));

        assert_close(totals.day(Day::Fri)[23], 1.0);
        assert_close(totals.day(Day::Fri)[0], 0.0);
        assert_close(totals.day(Day::Sat)[0], 1.0);
        assert_close(totals.by_hour()[0], 1.0);
        assert_close(totals.by_hour()[23], 1.0);
    }

    #[test]
    fn saturday_rollover_wraps_to_sunday() {
        let mut totals = HourTotals::new();
        totals.accumulate(Day::Sat, &attribute(tv(22.0), tv(0.5)));

        assert_close(totals.day(Day::Sat)[22], 1.0);
        assert_close(totals.day(Day::Sat)[23], 1.0);
        assert_close(totals.day(Day::Sun)[0], 0.5);
    }

    #[test]
    fn merge_adds_elementwise() {
        let mut a = HourTotals::new();
        a.accumulate(Day::Mon, &attribute(tv(9.0), tv(12.0)));
        let mut b = HourTotals::new();
        b.accumulate(Day::Mon, &attribute(tv(10.0), tv(11.0)));
        b.accumulate(Day::Wed, &attribute(tv(10.0), tv(11.0)));

        a.merge(&b);
        assert_close(a.by_hour()[10], 3.0);
        assert_close(a.day(Day::Mon)[10], 2.0);
        assert_close(a.day(Day::Wed)[10], 1.0);
        assert_close(a.total(), 5.0);
    }

    #[test]
    fn merge_order_does_not_change_totals() {
        let mut sheet_a = HourTotals::new();
        sheet_a.accumulate(Day::Sun, &attribute(tv(8.25), tv(16.5)));
        let mut sheet_b = HourTotals::new();
        sheet_b.accumulate(Day::Thu, &attribute(tv(21.0), tv(2.75)));

        let mut forward = HourTotals::new();
        forward.merge(&sheet_a);
        forward.merge(&sheet_b);

        let mut backward = HourTotals::new();
        backward.merge(&sheet_b);
        backward.merge(&sheet_a);

        for (f, b) in forward.by_hour().iter().zip(backward.by_hour()) {
            assert_close(*f, *b);
        }
        for day in Day::ALL {
            for (f, b) in forward.day(day).iter().zip(backward.day(day)) {
                assert_close(*f, *b);
            }
        }
    }

    #[test]
    fn serializes_both_histograms() {
        let mut totals = HourTotals::new();
        totals.accumulate(Day::Sun, &attribute(tv(0.0), tv(1.0)));
        let json = serde_json::to_value(&totals).unwrap();

        assert_eq!(json["by_hour"].as_array().unwrap().len(), 24);
        assert_eq!(json["by_day_and_hour"].as_array().unwrap().len(), 7);
        assert_eq!(json["by_day_and_hour"][0][0], 1.0);
    }
}
