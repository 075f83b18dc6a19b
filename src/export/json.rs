use crate::core::LoadedReport;
use std::io::Write;

/// Write the report exactly as it was received from the backend
pub fn write_report<W: Write>(loaded: &LoadedReport, mut writer: W) -> std::io::Result<()> {
    writer.write_all(loaded.raw_json().as_bytes())?;
    writer.flush()
}
