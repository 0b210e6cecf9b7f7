use std::io::Write;
use std::path::Path;

use anyhow::Context;
use ibpdc_common::fabric::LinkRecord;

pub const LINK_HEADER: [&str; 13] = [
    "Source_GUID",
    "Source_Name",
    "Source_LID",
    "Source_Port",
    "Connection_Type",
    "Speed",
    "Status",
    "Target_GUID",
    "Target_LID",
    "Target_Port",
    "Target_Name",
    "Comment",
    "Group",
];

/// Writes `records` to a new CSV file at `path`, replacing any existing file.
pub fn write_links(path: &Path, records: &[LinkRecord]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_links_to(file, records).with_context(|| format!("writing {}", path.display()))
}

pub fn write_links_to<W: Write>(writer: W, records: &[LinkRecord]) -> anyhow::Result<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record(LINK_HEADER)?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }
    wtr.flush()?;
    Ok(())
}
