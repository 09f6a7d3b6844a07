//! Reader for weekly timesheet exports.
//!
//! A timesheet is exported as a headerless CSV file of eight records:
//!
//! - Records 0–6 are the days, Sunday first. Each has nine cells: four
//!   start/end pairs (morning, afternoon, evening, night) followed by the
//!   get-out cell.
//! - Record 7 is the totals row; cell 5 holds the hours the sheet declares.
//!
//! Time cells are empty or a time of day (`9:00`, `09:00:00`).
//!
//! # Get-out encoding
//!
//! The spreadsheet stores get-outs as a duration typed into a time cell, which
//! it reads as minutes and seconds: `00:01:30` means one hour thirty. The
//! reader shifts those fields up a unit before anything downstream sees them.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveTime, TimeDelta, Timelike};
use thiserror::Error;
use ts_core::{DAYS_PER_WEEK, Day, DayRow, GetOut, SHIFTS_PER_DAY, Shift, ShiftGrid, TimeValue};

/// Cells per day record: four start/end pairs plus the get-out.
pub const CELLS_PER_DAY: usize = SHIFTS_PER_DAY * 2 + 1;

/// Index of the get-out cell within a day record.
pub const GET_OUT_CELL: usize = SHIFTS_PER_DAY * 2;

/// Index of the declared total within the totals record.
pub const DECLARED_TOTAL_CELL: usize = 5;

const RECORD_COUNT: usize = DAYS_PER_WEEK + 1;

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Errors for a sheet that does not have the expected shape.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The file could not be read.
    #[error("failed to read sheet: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid CSV.
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    /// Wrong number of records.
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    /// A day record with the wrong number of cells.
    #[error("{day} row has {found} cells, expected {expected}")]
    CellCount {
        day: Day,
        expected: usize,
        found: usize,
    },
    /// A cell that should hold a time of day.
    #[error("{day} cell {cell}: {value:?} is not a time of day")]
    InvalidTime {
        day: Day,
        cell: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// The totals record is too short.
    #[error("totals row has no cell {cell}")]
    MissingTotal { cell: usize },
    /// The declared total is not a number.
    #[error("declared total {value:?} is not a number")]
    InvalidTotal {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

/// The cells of one day record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetRow {
    /// Start/end times, two per shift.
    pub shift_cells: [Option<NaiveTime>; SHIFTS_PER_DAY * 2],
    /// Get-out duration, already decoded.
    pub get_out: Option<TimeDelta>,
}

impl SheetRow {
    fn to_day_row(self) -> DayRow {
        let mut row = DayRow::default();
        for (slot, pair) in row.shifts.iter_mut().zip(self.shift_cells.chunks_exact(2)) {
            if let [Some(start), Some(end)] = pair {
                *slot = Some(Shift::new(
                    TimeValue::from_time(*start),
                    TimeValue::from_time(*end),
                ));
            }
        }
        row.get_out = self
            .get_out
            .and_then(|duration| GetOut::from_duration(duration_to_hours(duration)));
        row
    }
}

/// A timesheet as read from its export, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Timesheet {
    rows: [SheetRow; DAYS_PER_WEEK],
    declared_total: f64,
}

impl Timesheet {
    /// Reads a sheet from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self, SheetError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads a sheet from CSV text.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SheetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = csv_reader
            .records()
            .collect::<Result<Vec<_>, csv::Error>>()?;

        // Spreadsheet exports pad the bottom with rows of empty cells.
        while records
            .last()
            .is_some_and(|record| record.iter().all(str::is_empty))
        {
            records.pop();
        }

        if records.len() != RECORD_COUNT {
            return Err(SheetError::RowCount {
                expected: RECORD_COUNT,
                found: records.len(),
            });
        }

        let mut rows = [SheetRow::default(); DAYS_PER_WEEK];
        for ((day, record), row) in Day::ALL.into_iter().zip(&records).zip(rows.iter_mut()) {
            *row = parse_day_record(day, record)?;
        }

        let declared_total = parse_declared_total(&records[DAYS_PER_WEEK])?;
        tracing::debug!(declared_total, "read timesheet");

        Ok(Self {
            rows,
            declared_total,
        })
    }

    /// Returns the cells for `day`.
    pub const fn row(&self, day: Day) -> &SheetRow {
        &self.rows[day.index()]
    }

    /// Hours the sheet declares, rounded to one decimal.
    pub const fn declared_total(&self) -> f64 {
        self.declared_total
    }

    /// Normalizes the cells into the grid the core works on.
    ///
    /// A shift needs both cells; a lone start or end is dropped.
    pub fn to_grid(&self) -> ShiftGrid {
        let mut days = [DayRow::default(); DAYS_PER_WEEK];
        for (day, row) in days.iter_mut().zip(self.rows) {
            *day = row.to_day_row();
        }
        ShiftGrid::new(days, self.declared_total)
    }
}

fn parse_day_record(day: Day, record: &csv::StringRecord) -> Result<SheetRow, SheetError> {
    if record.len() != CELLS_PER_DAY {
        return Err(SheetError::CellCount {
            day,
            expected: CELLS_PER_DAY,
            found: record.len(),
        });
    }

    let mut row = SheetRow::default();
    for (cell, value) in record.iter().enumerate() {
        let time = parse_time(value).map_err(|source| SheetError::InvalidTime {
            day,
            cell,
            value: value.to_string(),
            source,
        })?;

        if cell == GET_OUT_CELL {
            row.get_out = time.map(decode_get_out);
        } else {
            row.shift_cells[cell] = time;
        }
    }
    Ok(row)
}

fn parse_declared_total(record: &csv::StringRecord) -> Result<f64, SheetError> {
    let value = record
        .get(DECLARED_TOTAL_CELL)
        .ok_or(SheetError::MissingTotal {
            cell: DECLARED_TOTAL_CELL,
        })?;
    if value.is_empty() {
        return Ok(0.0);
    }
    let total: f64 = value.parse().map_err(|source| SheetError::InvalidTotal {
        value: value.to_string(),
        source,
    })?;
    Ok((total * 10.0).round() / 10.0)
}

/// Parses a time-of-day cell; empty cells are `None`.
pub fn parse_time(value: &str) -> Result<Option<NaiveTime>, chrono::ParseError> {
    if value.is_empty() {
        return Ok(None);
    }

    let mut last_err = None;
    for format in TIME_FORMATS {
        match NaiveTime::parse_from_str(value, format) {
            Ok(time) => return Ok(Some(time)),
            Err(e) => last_err = Some(e),
        }
    }
    match last_err {
        Some(e) => Err(e),
        None => Ok(None),
    }
}

/// Reads a get-out cell's minutes as hours and its seconds as minutes.
pub fn decode_get_out(stored: NaiveTime) -> TimeDelta {
    TimeDelta::hours(i64::from(stored.minute())) + TimeDelta::minutes(i64::from(stored.second()))
}

fn duration_to_hours(duration: TimeDelta) -> TimeValue {
    let minutes = u32::try_from(duration.num_minutes()).unwrap_or(0);
    TimeValue::from_clock(minutes / 60, minutes % 60)
}

/// Returns true for paths that look like sheet exports.
pub fn is_sheet_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Lists the sheet exports in `dir`, sorted by file name.
///
/// Subdirectories and files with other extensions are skipped.
pub fn scan_sheet_dir(dir: &Path) -> Result<Vec<PathBuf>, SheetError> {
    let mut sheets = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_sheet_path(&path) {
            sheets.push(path);
        } else {
            tracing::debug!(path = ?path, "skipping non-sheet entry");
        }
    }
    // fs::read_dir order is platform-dependent
    sheets.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(sheets)
}
