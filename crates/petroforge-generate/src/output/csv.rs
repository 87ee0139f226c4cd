use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use petroforge_core::{Frame, TableName};
use serde::Serialize;

use crate::errors::GenerationError;

/// One CSV file written by [`write_tables_csv`].
#[derive(Debug, Clone, Serialize)]
pub struct CsvArtifact {
    pub table: TableName,
    pub path: PathBuf,
    pub rows: usize,
    pub bytes: u64,
}

/// Write a frame as CSV, header first, columns in frame order.
pub fn write_table_csv(path: &Path, frame: &Frame) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(frame.columns())?;
    for row in frame.rows() {
        writer.write_record(row.iter().map(|value| value.render()))?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

/// Write every frame to `<dir>/<table>.csv` in dependency order.
pub fn write_tables_csv(
    dir: &Path,
    frames: &BTreeMap<TableName, Frame>,
) -> Result<Vec<CsvArtifact>, GenerationError> {
    std::fs::create_dir_all(dir)?;
    let mut artifacts = Vec::with_capacity(frames.len());
    for (table, frame) in frames {
        let path = dir.join(format!("{}.csv", table.as_str()));
        let bytes = write_table_csv(&path, frame)?;
        artifacts.push(CsvArtifact {
            table: *table,
            path,
            rows: frame.len(),
            bytes,
        });
    }
    Ok(artifacts)
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
