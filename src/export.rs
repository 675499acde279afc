//! Writes scraped records to the flat files the analysis lessons read.
//!
//! Two formats are produced. The CSV file (`type,title,text,date,score`)
//! is what the sentiment and location lessons read back. The plain-text
//! file holds one record per line and is meant for third-party text
//! tools (word clouds, concordancers) that just want a bag of lines.

use crate::record::Record;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// An export error.
#[derive(Debug, Error)]
pub enum Error {
    /// An error writing to or reading from disk.
    #[error("could not access export file: {0}")]
    Io(#[from] std::io::Error),

    /// An error encoding or decoding CSV.
    #[error("could not process CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes records to a CSV file.
///
/// Produces a header row plus exactly one data row per record.
pub fn write_csv(records: &[Record], path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Writes records to a plain-text file, one non-empty line per record.
pub fn write_text(records: &[Record], path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        writeln!(writer, "{}", record.as_line())?;
    }
    writer.flush()?;
    info!("wrote {} lines to {}", records.len(), path.display());
    Ok(())
}

/// Reads records back from a CSV file produced by [`write_csv`].
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<Record>, Error> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let records = reader
        .deserialize()
        .collect::<Result<Vec<Record>, csv::Error>>()?;
    Ok(records)
}
