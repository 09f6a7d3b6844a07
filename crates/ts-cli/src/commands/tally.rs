//! Tally command: sums a directory of timesheets into hour histograms.
//!
//! Each sheet is read and tallied on its own; its hours join the run totals
//! only once the whole sheet has been read. A sheet that fails to read is
//! listed with its reason and the run moves on to the next one.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use ts_core::{Day, HourTotals, format_hours, tally_sheet};
use ts_sheet::{Timesheet, scan_sheet_dir};

use super::echo::{self, Echo};
use crate::Config;

#[derive(Debug, Args)]
pub struct TallyArgs {
    /// Directory of timesheet exports (defaults to the configured `timesheet_dir`).
    pub dir: Option<PathBuf>,

    /// Print the histograms as JSON.
    #[arg(long)]
    pub json: bool,

    /// Also print hours per weekday and hour.
    #[arg(long)]
    pub by_day: bool,

    /// Echo each sheet's cells.
    #[arg(long)]
    pub cells: bool,

    /// Echo each sheet's per-day hours.
    #[arg(long)]
    pub hour_counts: bool,
}

/// A sheet left out of the totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetFailure {
    pub file: String,
    pub reason: String,
}

/// Totals for a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub sheets_processed: usize,
    pub totals: HourTotals,
    pub failures: Vec<SheetFailure>,
}

// ========== Tallying ==========

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Tallies every sheet export in `dir`, echoing to `writer` as `echo` asks.
pub fn tally_dir<W: Write>(writer: &mut W, dir: &Path, echo: Echo) -> Result<RunSummary> {
    let sheets = scan_sheet_dir(dir)
        .with_context(|| format!("failed to read timesheet directory {}", dir.display()))?;
    tracing::debug!(dir = %dir.display(), count = sheets.len(), "found timesheets");

    let mut summary = RunSummary::default();

    for (index, path) in sheets.iter().enumerate() {
        let name = display_name(path);
        if echo.any() {
            echo::write_sheet_header(writer, index + 1, &name)?;
        }

        let sheet = match Timesheet::from_path(path) {
            Ok(sheet) => sheet,
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "skipping malformed timesheet");
                if echo.any() {
                    writeln!(writer, "Skipped: {e}")?;
                }
                summary.failures.push(SheetFailure {
                    file: name,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let tally = tally_sheet(&sheet.to_grid());
        echo::write_sheet(writer, echo, &sheet, &tally)?;

        if let Some(mismatch) = tally.declared_mismatch() {
            tracing::info!(
                file = %name,
                declared = mismatch.declared,
                computed = mismatch.computed,
                "declared total differs from computed hours"
            );
        }

        summary.totals.merge(&tally.totals);
        summary.sheets_processed += 1;
    }

    Ok(summary)
}

// ========== Text Output ==========

const COLUMN_WIDTH: usize = 7;

/// Formats hours per hour-of-day, one line per bucket.
pub fn format_by_hour(totals: &HourTotals) -> String {
    let mut output = String::new();
    writeln!(output, "HOURS BY HOUR OF DAY").unwrap();
    writeln!(output, "────────────────────").unwrap();
    for (hour, hours) in totals.by_hour().iter().enumerate() {
        writeln!(output, "{hour:02}:00 {:>COLUMN_WIDTH$}", format_hours(*hours)).unwrap();
    }
    output
}

/// Formats hours per hour-of-day with one column per weekday.
pub fn format_by_day(totals: &HourTotals) -> String {
    let mut output = String::new();
    writeln!(output, "HOURS BY DAY AND HOUR").unwrap();
    writeln!(output, "─────────────────────").unwrap();

    let mut header = String::from("Hour ");
    for day in Day::ALL {
        write!(header, " {:>COLUMN_WIDTH$}", day.short_name()).unwrap();
    }
    writeln!(output, "{header}").unwrap();

    for hour in 0..totals.by_hour().len() {
        let mut line = format!("{hour:02}:00");
        for day in Day::ALL {
            write!(line, " {:>COLUMN_WIDTH$}", format_hours(totals.day(day)[hour])).unwrap();
        }
        writeln!(output, "{line}").unwrap();
    }
    output
}

/// Formats the run summary and any failed sheets.
pub fn format_footer(summary: &RunSummary) -> String {
    let mut output = String::new();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Sheets processed: {}", summary.sheets_processed).unwrap();
    writeln!(
        output,
        "Total hours:      {}",
        format_hours(summary.totals.total())
    )
    .unwrap();

    if !summary.failures.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "FAILED SHEETS").unwrap();
        writeln!(output, "─────────────").unwrap();
        for failure in &summary.failures {
            writeln!(output, "{}: {}", failure.file, failure.reason).unwrap();
        }
    }
    output
}

/// Formats the full text report.
pub fn format_summary(summary: &RunSummary, by_day: bool) -> String {
    let mut output = format_by_hour(&summary.totals);
    if by_day {
        output.push('\n');
        output.push_str(&format_by_day(&summary.totals));
    }
    output.push('\n');
    output.push_str(&format_footer(summary));
    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonSummary<'a> {
    pub sheets_processed: usize,
    pub total_hours: f64,
    pub by_hour: &'a [f64; 24],
    pub by_day_and_hour: Vec<JsonDayHours<'a>>,
    pub failures: &'a [SheetFailure],
}

#[derive(Debug, Serialize)]
pub struct JsonDayHours<'a> {
    pub day: Day,
    pub hours: &'a [f64; 24],
}

/// Formats the run summary as JSON.
pub fn format_summary_json(summary: &RunSummary) -> Result<String> {
    let report = JsonSummary {
        sheets_processed: summary.sheets_processed,
        total_hours: summary.totals.total(),
        by_hour: summary.totals.by_hour(),
        by_day_and_hour: Day::ALL
            .into_iter()
            .map(|day| JsonDayHours {
                day,
                hours: summary.totals.day(day),
            })
            .collect(),
        failures: &summary.failures,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the tally command.
pub fn run<W: Write>(writer: &mut W, args: &TallyArgs, config: &Config) -> Result<()> {
    let dir = args.dir.as_deref().unwrap_or(&config.timesheet_dir);
    let echo = Echo {
        cells: args.cells || config.verbose_cells,
        hour_counts: args.hour_counts || config.verbose_hour_counts,
    };

    let summary = if args.json {
        // Keep stdout parseable
        tally_dir(&mut io::stderr().lock(), dir, echo)?
    } else {
        tally_dir(writer, dir, echo)?
    };
    tracing::debug!(
        sheets = summary.sheets_processed,
        failures = summary.failures.len(),
        "tally complete"
    );

    if args.json {
        writeln!(writer, "{}", format_summary_json(&summary)?)?;
    } else {
        if echo.any() {
            writeln!(writer)?;
        }
        write!(writer, "{}", format_summary(&summary, args.by_day || config.by_day))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use insta::assert_snapshot;

    const MONDAY_MORNING: &str = "\
,,,,,,,,
09:00:00,12:30:00,,,,,,,
,,,,,,,,
,,,,,,,,
,,,,,,,,
,,,,,,,,
,,,,,,,,
,,,,,3.5,,,
";

    const FRIDAY_GET_OUT: &str = "\
,,,,,,,,
,,,,,,,,
,,,,,,,,
,,,,,,,,
,,,,,,,,
,,,,,,,,00:03:00
,,,,,,,,
,,,,,3,,,
";

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn quiet_tally(dir: &Path) -> RunSummary {
        let mut sink = Vec::new();
        let summary = tally_dir(&mut sink, dir, Echo::default()).unwrap();
        assert!(sink.is_empty());
        summary
    }

    #[test]
    fn empty_directory_tallies_to_zero() {
        let temp = tempfile::tempdir().unwrap();
        let summary = quiet_tally(temp.path());

        assert_eq!(summary.sheets_processed, 0);
        assert!(summary.failures.is_empty());
        assert!(summary.totals.is_zero());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let mut sink = Vec::new();
        let err = tally_dir(&mut sink, &temp.path().join("gone"), Echo::default()).unwrap_err();
        assert!(err.to_string().contains("failed to read timesheet directory"));
    }

    #[test]
    fn totals_span_all_sheets() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("week-01.csv"), MONDAY_MORNING).unwrap();
        fs::write(temp.path().join("week-02.csv"), FRIDAY_GET_OUT).unwrap();

        let summary = quiet_tally(temp.path());
        assert_eq!(summary.sheets_processed, 2);
        assert_close(summary.totals.total(), 6.5);
        assert_close(summary.totals.by_hour()[12], 0.5);
        assert_close(summary.totals.day(Day::Fri)[22], 1.0);
        assert_close(summary.totals.day(Day::Sat)[0], 1.0);
    }

    #[test]
    fn malformed_sheet_is_reported_and_skipped() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("a.csv"), MONDAY_MORNING).unwrap();
        fs::write(temp.path().join("b.csv"), "09:00,nonsense\n").unwrap();
        fs::write(temp.path().join("c.csv"), FRIDAY_GET_OUT).unwrap();

        let summary = quiet_tally(temp.path());
        assert_eq!(summary.sheets_processed, 2);
        assert_close(summary.totals.total(), 6.5);
        assert_eq!(
            summary.failures,
            [SheetFailure {
                file: "b.csv".to_string(),
                reason: "expected 8 rows, found 1".to_string(),
            }]
        );
    }

    #[test]
    fn file_order_does_not_change_totals() {
        let forward = tempfile::tempdir().unwrap();
        fs::write(forward.path().join("1.csv"), MONDAY_MORNING).unwrap();
        fs::write(forward.path().join("2.csv"), FRIDAY_GET_OUT).unwrap();

        let backward = tempfile::tempdir().unwrap();
        fs::write(backward.path().join("1.csv"), FRIDAY_GET_OUT).unwrap();
        fs::write(backward.path().join("2.csv"), MONDAY_MORNING).unwrap();

        let a = quiet_tally(forward.path());
        let b = quiet_tally(backward.path());
        for (x, y) in a.totals.by_hour().iter().zip(b.totals.by_hour()) {
            assert_close(*x, *y);
        }
        for day in Day::ALL {
            for (x, y) in a.totals.day(day).iter().zip(b.totals.day(day)) {
                assert_close(*x, *y);
            }
        }
    }

    #[test]
    fn echo_writes_header_and_hour_counts() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("week-01.csv"), MONDAY_MORNING).unwrap();

        let mut output = Vec::new();
        let echo = Echo {
            cells: false,
            hour_counts: true,
        };
        tally_dir(&mut output, temp.path(), echo).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.starts_with("\n[1] | week-01.csv\n"));
        assert!(output.contains("Mon: 3.5\n"));
        assert!(output.contains("Total: 3.5\n"));
    }

    #[test]
    fn by_hour_lists_every_bucket() {
        let mut totals = HourTotals::new();
        totals.accumulate(Day::Mon, &ts_core::attribute(
            ts_core::TimeValue::from_hours(9.0),
            ts_core::TimeValue::from_hours(10.5),
        ));
        let output = format_by_hour(&totals);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 26);
        assert_eq!(lines[2], "00:00       0");
        assert_eq!(lines[11], "09:00       1");
        assert_eq!(lines[12], "10:00     0.5");
    }

    #[test]
    fn by_day_has_a_column_per_weekday() {
        let mut totals = HourTotals::new();
        totals.accumulate(Day::Sat, &ts_core::attribute(
            ts_core::TimeValue::from_hours(23.0),
            ts_core::TimeValue::from_hours(25.0),
        ));
        let output = format_by_day(&totals);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[2],
            "Hour      Sun     Mon     Tue     Wed     Thu     Fri     Sat"
        );
        assert_eq!(
            lines[3],
            "00:00       1       0       0       0       0       0       0"
        );
        assert!(lines[26].ends_with("       1"));
    }

    #[test]
    fn footer_lists_failures() {
        let summary = RunSummary {
            sheets_processed: 3,
            totals: HourTotals::new(),
            failures: vec![SheetFailure {
                file: "broken.csv".to_string(),
                reason: "Tue row has 4 cells, expected 9".to_string(),
            }],
        };
        assert_snapshot!(format_footer(&summary).trim_end(), @r"
        SUMMARY
        ───────
        Sheets processed: 3
        Total hours:      0

        FAILED SHEETS
        ─────────────
        broken.csv: Tue row has 4 cells, expected 9
        ");
    }

    #[test]
    fn json_summary_carries_both_histograms() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("week-02.csv"), FRIDAY_GET_OUT).unwrap();
        let summary = quiet_tally(temp.path());

        let json: serde_json::Value =
            serde_json::from_str(&format_summary_json(&summary).unwrap()).unwrap();
        assert_eq!(json["sheets_processed"], 1);
        assert_eq!(json["total_hours"], 3.0);
        assert_eq!(json["by_hour"][22], 1.0);
        assert_eq!(json["by_day_and_hour"][6]["day"], "Sat");
        assert_eq!(json["by_day_and_hour"][6]["hours"][0], 1.0);
        assert_eq!(json["failures"].as_array().unwrap().len(), 0);
    }
}
