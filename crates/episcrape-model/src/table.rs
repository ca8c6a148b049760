use crate::record::{EpisodeRecord, COLUMNS};
use std::io;
use std::path::Path;

/// Write an episode table as CSV, replacing anything already at `path`.
///
/// The header row is always written, so an empty run still produces a
/// table with the expected schema.
pub fn write_table(records: &[EpisodeRecord], path: &Path) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    to_writer(records, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Serialize records into any CSV writer, header first.
pub fn to_writer<W: io::Write>(
    records: &[EpisodeRecord],
    writer: &mut csv::Writer<W>,
) -> Result<(), csv::Error> {
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    Ok(())
}

/// Read an episode table previously written by [`write_table`].
pub fn read_table(path: &Path) -> Result<Vec<EpisodeRecord>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    reader.deserialize().collect()
}
