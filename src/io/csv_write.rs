use std::path::Path;

use csv::WriterBuilder;

use crate::error::Result;
use crate::flatten::ViolationTable;

/// Writes the flat violation list, header first. Rows keep their own width.
pub fn write_violations(path: &Path, table: &ViolationTable) -> Result<()> {
    let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;

    if let Some(header) = table.header() {
        writer.write_record(header)?;
    }
    for row in table.rows() {
        writer.write_record(row)?;
    }

    writer.flush()?;
    Ok(())
}
