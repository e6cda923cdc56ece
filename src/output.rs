// src/output.rs

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::{Result, ScrapeError};

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ScrapeError + '_ {
    move |source| ScrapeError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `header` then every record to `path`, truncating whatever was there.
///
/// Not atomic: a failure part way leaves a partial file behind. The handle is
/// released when the writer drops, whichever way this returns.
pub fn write_records<P, R>(path: P, header: &[&str], records: &[R]) -> Result<PathBuf>
where
    P: AsRef<Path>,
    R: Serialize,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
    }

    let file = File::create(path).map_err(io_err(path))?;
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(BufWriter::new(file));

    wtr.write_record(header)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(io_err(path))?;

    debug!(path = %path.display(), records = records.len(), "wrote csv");
    Ok(path.to_path_buf())
}

/// Read a file produced by [`write_records`] back as `(header, rows)`.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let header = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for rec in rdr.records() {
        rows.push(rec?.iter().map(str::to_string).collect());
    }
    Ok((header, rows))
}
