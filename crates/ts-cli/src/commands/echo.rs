//! Line-oriented debug echo of sheets as they are tallied.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{NaiveTime, TimeDelta};
use ts_core::{Day, SheetTally, format_hours};
use ts_sheet::Timesheet;

/// Which debug sections to write for each sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Echo {
    /// The sheet's cells, one line per day.
    pub cells: bool,
    /// Shift and get-out hours per day, plus the total check.
    pub hour_counts: bool,
}

impl Echo {
    pub const fn any(self) -> bool {
        self.cells || self.hour_counts
    }
}

const CELL_WIDTH: usize = 8;

/// Writes the `[n] | name` line that opens a sheet's echo.
pub fn write_sheet_header<W: Write>(writer: &mut W, index: usize, name: &str) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "[{index}] | {name}")?;
    Ok(())
}

/// Writes the sheet's cells, one right-aligned column per cell.
pub fn write_cells<W: Write>(writer: &mut W, sheet: &Timesheet) -> Result<()> {
    for day in Day::ALL {
        let row = sheet.row(day);
        let mut line = format!("{day}:");
        for cell in row.shift_cells {
            write!(line, " {:>CELL_WIDTH$}", format_time_cell(cell))?;
        }
        write!(line, " {:>CELL_WIDTH$}", format_get_out_cell(row.get_out))?;
        writeln!(writer, "{}", line.trim_end())?;
    }
    Ok(())
}

/// Writes each day's shift durations and get-out, then the total check.
pub fn write_hour_counts<W: Write>(writer: &mut W, tally: &SheetTally) -> Result<()> {
    for day in &tally.days {
        let mut parts: Vec<String> = day
            .shifts
            .iter()
            .map(|(_, hours)| format_hours(*hours))
            .collect();
        if let Some(get_out) = day.get_out {
            parts.push(format!("GO: {}", format_hours(get_out.duration())));
        }

        if parts.is_empty() {
            writeln!(writer, "{}:", day.day)?;
        } else {
            writeln!(writer, "{}: {}", day.day, parts.join(" "))?;
        }
    }

    match tally.declared_mismatch() {
        Some(mismatch) => writeln!(
            writer,
            "Total mismatch: declared {}, computed {}",
            format_hours(mismatch.declared),
            format_hours(mismatch.computed)
        )?,
        None => writeln!(writer, "Total: {}", format_hours(tally.computed_total()))?,
    }
    Ok(())
}

/// Writes whichever sections `echo` asks for.
pub fn write_sheet<W: Write>(
    writer: &mut W,
    echo: Echo,
    sheet: &Timesheet,
    tally: &SheetTally,
) -> Result<()> {
    if echo.cells {
        write_cells(writer, sheet)?;
    }
    if echo.hour_counts {
        write_hour_counts(writer, tally)?;
    }
    Ok(())
}

fn format_time_cell(cell: Option<NaiveTime>) -> String {
    cell.map(|time| time.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

fn format_get_out_cell(cell: Option<TimeDelta>) -> String {
    cell.map(|duration| {
        format!(
            "{:02}:{:02}:00",
            duration.num_hours(),
            duration.num_minutes() % 60
        )
    })
    .unwrap_or_default()
}
