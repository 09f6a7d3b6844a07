//! Tallying one timesheet into hour totals.

use crate::attribution::attribute;
use crate::get_out::{GetOutInterval, resolve_get_out};
use crate::grid::{Day, ShiftGrid, ShiftSlot};
use crate::histogram::HourTotals;

/// Largest gap between declared and computed totals that still counts as a
/// match. Declared totals carry one decimal and minutes are rounded to
/// hundredths, so small drift is expected.
pub const DECLARED_TOTAL_TOLERANCE: f64 = 0.1;

/// Hours worked on one day of a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct DayTally {
    pub day: Day,
    /// Duration of each shift present, in column order.
    pub shifts: Vec<(ShiftSlot, f64)>,
    pub get_out: Option<GetOutInterval>,
}

impl DayTally {
    /// Hours worked this day, get-out included.
    pub fn hours(&self) -> f64 {
        let shift_hours: f64 = self.shifts.iter().map(|(_, hours)| hours).sum();
        shift_hours + self.get_out.map_or(0.0, |g| g.duration())
    }
}

/// The sheet's own total disagreeing with what its cells add up to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TotalMismatch {
    pub declared: f64,
    pub computed: f64,
}

/// Result of tallying one sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTally {
    pub days: Vec<DayTally>,
    pub totals: HourTotals,
    pub declared_total: f64,
}

impl SheetTally {
    /// Hours the sheet's cells add up to.
    pub fn computed_total(&self) -> f64 {
        self.totals.total()
    }

    /// Returns the mismatch when the declared total is off by more than
    /// [`DECLARED_TOTAL_TOLERANCE`].
    pub fn declared_mismatch(&self) -> Option<TotalMismatch> {
        let computed = self.computed_total();
        ((self.declared_total - computed).abs() > DECLARED_TOTAL_TOLERANCE).then_some(
            TotalMismatch {
                declared: self.declared_total,
                computed,
            },
        )
    }
}

/// Attributes every shift and get-out on `grid` to hour buckets.
///
/// The result holds the sheet's own totals; callers merge them into a run
/// once the whole sheet has been read.
pub fn tally_sheet(grid: &ShiftGrid) -> SheetTally {
    let mut totals = HourTotals::new();
    let mut days = Vec::with_capacity(Day::ALL.len());

    for (day, row) in grid.days() {
        let mut shifts = Vec::new();
        for (slot, shift) in row.present_shifts() {
            totals.accumulate(day, &attribute(shift.start, shift.end));
            shifts.push((slot, shift.duration()));
        }

        let get_out = resolve_get_out(row);
        if let Some(interval) = get_out {
            tracing::trace!(%day, start = %interval.start, end = %interval.end, "placed get-out");
            totals.accumulate(day, &attribute(interval.start, interval.end));
        }

        days.push(DayTally {
            day,
            shifts,
            get_out,
        });
    }

    SheetTally {
        days,
        totals,
        declared_total: grid.declared_total(),
    }
}
