//! The normalized weekly timesheet grid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attribution::effective_end;
use crate::time_value::TimeValue;

/// Number of days on a sheet.
pub const DAYS_PER_WEEK: usize = 7;

/// Number of start/end pairs a sheet records per day.
pub const SHIFTS_PER_DAY: usize = 4;

/// Day of the week, in sheet row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    /// All days in row order, Sunday first.
    pub const ALL: [Self; DAYS_PER_WEEK] = [
        Self::Sun,
        Self::Mon,
        Self::Tue,
        Self::Wed,
        Self::Thu,
        Self::Fri,
        Self::Sat,
    ];

    /// Returns the row index, 0 for Sunday.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the day at `index`, wrapping modulo 7.
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % DAYS_PER_WEEK]
    }

    /// Returns the day `days` after this one.
    pub const fn plus(self, days: u32) -> Self {
        Self::from_index(self.index() + days as usize)
    }

    /// Three-letter display name.
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Mon => "Mon",
            Self::Tue => "Tue",
            Self::Wed => "Wed",
            Self::Thu => "Thu",
            Self::Fri => "Fri",
            Self::Sat => "Sat",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl From<chrono::Weekday> for Day {
    fn from(weekday: chrono::Weekday) -> Self {
        Self::from_index(weekday.num_days_from_sunday() as usize)
    }
}

/// Which start/end column pair a shift came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftSlot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl ShiftSlot {
    /// All slots in column order.
    pub const ALL: [Self; SHIFTS_PER_DAY] =
        [Self::Morning, Self::Afternoon, Self::Evening, Self::Night];

    /// Returns the pair index, 0 for the morning columns.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One worked interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shift {
    pub start: TimeValue,
    pub end: TimeValue,
}

impl Shift {
    pub const fn new(start: TimeValue, end: TimeValue) -> Self {
        Self { start, end }
    }

    /// End time with midnight rollover applied.
    pub fn effective_end(&self) -> TimeValue {
        effective_end(self.start, self.end)
    }

    /// Worked hours.
    pub fn duration(&self) -> f64 {
        self.effective_end().as_hours() - self.start.as_hours()
    }
}

/// A get-out logged as a bare duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GetOut {
    pub duration: TimeValue,
}

impl GetOut {
    /// Returns a get-out for `duration`, or `None` when it is under an hour.
    ///
    /// Sheets leave sub-hour values in the get-out column as noise, so only a
    /// nonzero hour component counts.
    pub fn from_duration(duration: TimeValue) -> Option<Self> {
        (duration.whole_hours() != 0).then_some(Self { duration })
    }
}

/// Everything recorded for a single day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayRow {
    pub shifts: [Option<Shift>; SHIFTS_PER_DAY],
    pub get_out: Option<GetOut>,
}

impl DayRow {
    /// Returns the shift in `slot`, if both its cells were filled.
    pub const fn shift(&self, slot: ShiftSlot) -> Option<&Shift> {
        self.shifts[slot.index()].as_ref()
    }

    /// Iterates over the shifts present, in column order.
    pub fn present_shifts(&self) -> impl Iterator<Item = (ShiftSlot, &Shift)> {
        ShiftSlot::ALL
            .into_iter()
            .filter_map(|slot| self.shift(slot).map(|shift| (slot, shift)))
    }

    /// Returns true when nothing was worked this day.
    pub fn is_empty(&self) -> bool {
        self.shifts.iter().all(Option::is_none) && self.get_out.is_none()
    }
}

/// One parsed timesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftGrid {
    days: [DayRow; DAYS_PER_WEEK],
    declared_total: f64,
}

impl ShiftGrid {
    pub const fn new(days: [DayRow; DAYS_PER_WEEK], declared_total: f64) -> Self {
        Self {
            days,
            declared_total,
        }
    }

    /// Returns the row for `day`.
    pub const fn day(&self, day: Day) -> &DayRow {
        &self.days[day.index()]
    }

    /// Iterates over all seven rows, Sunday first.
    pub fn days(&self) -> impl Iterator<Item = (Day, &DayRow)> {
        Day::ALL.into_iter().zip(self.days.iter())
    }

    /// Hours the sheet claims for itself.
    pub const fn declared_total(&self) -> f64 {
        self.declared_total
    }
}
