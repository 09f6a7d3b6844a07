//! Show command: echoes a single timesheet and its per-day hours.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use ts_core::tally_sheet;
use ts_sheet::Timesheet;

use super::echo::{self, Echo};

/// Runs the show command.
pub fn run<W: Write>(writer: &mut W, path: &Path) -> Result<()> {
    let sheet = Timesheet::from_path(path)
        .with_context(|| format!("failed to read timesheet {}", path.display()))?;
    let tally = tally_sheet(&sheet.to_grid());

    writeln!(writer, "{}", path.display())?;
    echo::write_sheet(
        writer,
        Echo {
            cells: true,
            hour_counts: true,
        },
        &sheet,
        &tally,
    )?;
    Ok(())
}
