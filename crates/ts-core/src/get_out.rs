//! Anchoring get-out durations to a start time.

use crate::grid::{DayRow, Shift, ShiftSlot};
use crate::time_value::TimeValue;

/// Start used when no evening or night shift was worked.
pub const DEFAULT_GET_OUT_START: TimeValue = TimeValue::from_hours(22.0);

/// Slots whose end anchors a get-out, highest priority first.
const ANCHOR_SLOTS: [ShiftSlot; 2] = [ShiftSlot::Night, ShiftSlot::Evening];

/// A get-out placed on the hour axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GetOutInterval {
    pub start: TimeValue,
    pub end: TimeValue,
}

impl GetOutInterval {
    pub fn duration(&self) -> f64 {
        self.end.as_hours() - self.start.as_hours()
    }
}

/// Places the day's get-out, if it has one.
///
/// The get-out follows the night shift, else the evening shift, else starts
/// at 22:00. An anchor shift that ran past midnight hands over its rolled
/// end, so the get-out lands on the next day too.
pub fn resolve_get_out(row: &DayRow) -> Option<GetOutInterval> {
    let get_out = row.get_out?;

    let start = ANCHOR_SLOTS
        .into_iter()
        .find_map(|slot| row.shift(slot))
        .map_or(DEFAULT_GET_OUT_START, Shift::effective_end);

    Some(GetOutInterval {
        start,
        end: start + get_out.duration,
    })
}
