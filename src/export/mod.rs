//! CSV export of the whole shift.

pub mod sections;

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::core::session::ReconciliationSession;
use crate::errors::{Result, ShiftError};
use crate::utils::files;

pub use sections::{build_sections, CsvSection};

pub const DEFAULT_FILE_NAME: &str = "gas_station_data.csv";

/// Writes every section: title line, header, rows, then a blank line.
pub fn write_csv<W: Write>(session: &ReconciliationSession, mut writer: W) -> Result<()> {
    for section in build_sections(session) {
        {
            let mut csv = csv::WriterBuilder::new()
                .flexible(true)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(&mut writer);
            csv.write_record([section.title])?;
            csv.write_record(section.header)?;
            for row in &section.rows {
                csv.write_record(row)?;
            }
            csv.flush()?;
        }
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn render_csv(session: &ReconciliationSession) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(session, &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| ShiftError::ExportError(err.to_string()))
}

/// Writes the export to `path`, or to `path/gas_station_data.csv` when `path`
/// is a directory. Returns the file written.
pub fn export_csv(session: &ReconciliationSession, path: &Path) -> Result<PathBuf> {
    let target = if path.is_dir() {
        path.join(DEFAULT_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    files::replace_file(&target, render_csv(session)?)?;
    info!(
        path = %target.display(),
        tickets = session.lottery_ledger().ticket_count(),
        "shift exported"
    );
    Ok(target)
}
