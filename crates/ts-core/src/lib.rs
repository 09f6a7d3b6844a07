//! Core domain logic for timesheet hour histograms.
//!
//! This crate contains:
//! - Time values: fractional hours on a continuous axis
//! - The shift grid: one week of shifts and get-outs
//! - Attribution: splitting an interval into per-hour weights
//! - Get-out placement: anchoring a bare duration to a start time
//! - Histograms: hours per hour-of-day, overall and per weekday

pub mod attribution;
pub mod get_out;
pub mod grid;
mod histogram;
mod tally;
pub mod time_value;

pub use attribution::{Contribution, attribute};
pub use get_out::{GetOutInterval, resolve_get_out};
pub use grid::{DAYS_PER_WEEK, Day, DayRow, GetOut, SHIFTS_PER_DAY, Shift, ShiftGrid, ShiftSlot};
pub use histogram::HourTotals;
pub use tally::{DayTally, SheetTally, TotalMismatch, tally_sheet};
pub use time_value::{TimeValue, format_hours};
