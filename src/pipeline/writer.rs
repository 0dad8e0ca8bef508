//! Chunked CSV input and output.
//!
//! Output files carry a leading unnamed index column followed by the record
//! columns. The index runs on across chunks, so row `n` of a file always has
//! index `n` no matter how many chunks produced it.

use std::{
    fs::{File, OpenOptions},
    io::Read,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;

/// A record that can be written as one CSV row.
pub trait CsvRecord {
    fn header() -> Vec<&'static str>;
    fn record(&self) -> Vec<String>;
}

/// Writes records to one CSV file, one chunk at a time.
///
/// The first chunk truncates the file and writes the header, every later
/// chunk is appended without one. The writer holds no records between calls.
/// Chunks must be written in order by a single writer.
pub struct BatchWriter<R> {
    path: PathBuf,
    next_index: usize,
    _record: PhantomData<R>,
}

impl<R: CsvRecord> BatchWriter<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            next_index: 0,
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data rows written since the last first batch.
    pub fn rows_written(&self) -> usize {
        self.next_index
    }

    /// Writes one chunk and returns the number of rows written.
    pub fn write(&mut self, records: &[R], is_first_batch: bool) -> Result<usize, csv::Error> {
        let file = if is_first_batch {
            self.next_index = 0;
            File::create(&self.path)?
        } else {
            OpenOptions::new()
                .append(true)
                .create(true)
                .open(&self.path)?
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if is_first_batch {
            let mut header = vec![""];
            header.extend(R::header());
            writer.write_record(&header)?;
        }

        for record in records {
            let mut row = vec![self.next_index.to_string()];
            row.extend(record.record());
            writer.write_record(&row)?;
            self.next_index += 1;
        }

        writer.flush()?;
        Ok(records.len())
    }
}

/// Writes a complete record set in a single chunk.
pub fn write_all<R: CsvRecord>(path: impl Into<PathBuf>, records: &[R]) -> Result<usize, csv::Error> {
    BatchWriter::new(path).write(records, true)
}

/// Reads a headed CSV file as consecutive chunks of deserialized rows.
///
/// Only the columns named by `T` are read; other columns are ignored.
pub struct ChunkedReader<R, T> {
    reader: csv::Reader<R>,
    chunk_size: usize,
    _row: PhantomData<T>,
}

impl<T: DeserializeOwned> ChunkedReader<File, T> {
    pub fn from_path(path: impl AsRef<Path>, chunk_size: usize) -> Result<Self, csv::Error> {
        Ok(Self::from_csv(csv::Reader::from_path(path)?, chunk_size))
    }
}

impl<R: Read, T: DeserializeOwned> ChunkedReader<R, T> {
    pub fn from_reader(reader: R, chunk_size: usize) -> Self {
        Self::from_csv(csv::Reader::from_reader(reader), chunk_size)
    }

    fn from_csv(reader: csv::Reader<R>, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk_size: chunk_size.max(1),
            _row: PhantomData,
        }
    }
}

impl<R: Read, T: DeserializeOwned> Iterator for ChunkedReader<R, T> {
    type Item = Result<Vec<T>, csv::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut chunk = Vec::with_capacity(self.chunk_size);
        for row in self.reader.deserialize::<T>() {
            match row {
                Ok(row) => {
                    chunk.push(row);
                    if chunk.len() == self.chunk_size {
                        break;
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }

        if chunk.is_empty() { None } else { Some(Ok(chunk)) }
    }
}

/// Number of data rows in a headed CSV file.
pub fn count_rows(path: impl AsRef<Path>) -> Result<usize, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = 0;
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        rows += 1;
    }
    Ok(rows)
}
