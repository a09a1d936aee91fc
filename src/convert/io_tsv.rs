// Primitives for reading LiveVox exports.

use std::fs::File;
use std::io::Read;

use csv::{ByteRecord, ByteRecordsIntoIter};
use log::debug;
use snafu::{OptionExt, ResultExt};

use crate::convert::*;

/// A tab-separated export: the header row, then the data rows one at a time.
///
/// Rows are handed out even if their number of columns differs from the header,
/// the driver decides what to do with them. Bytes that are not valid UTF-8 are
/// replaced rather than failing the whole file.
///
/// Empty lines carry no record and are not handed out, so they do not count as
/// read rows. The line numbers of the following rows still match the file.
pub struct ExportReader<R: Read> {
    headers: Vec<String>,
    records: ByteRecordsIntoIter<R>,
    lineno: u64,
}

impl ExportReader<File> {
    pub fn from_path(path: &str) -> ConvertResult<ExportReader<File>> {
        let file = File::open(path).context(OpeningInputSnafu { path })?;
        ExportReader::from_reader(file, path)
    }
}

impl<R: Read> ExportReader<R> {
    /// `name` is only used in error messages.
    pub fn from_reader(reader: R, name: &str) -> ConvertResult<ExportReader<R>> {
        ExportReader::from_csv(builder().from_reader(reader), name)
    }

    fn from_csv(rdr: csv::Reader<R>, name: &str) -> ConvertResult<ExportReader<R>> {
        let mut records = rdr.into_byte_records();
        let header = records
            .next()
            .context(MissingHeaderSnafu { path: name })?
            .context(ReadingHeaderSnafu { path: name })?;
        let headers = to_strings(&header);
        debug!("ExportReader: header: {:?}", headers);
        Ok(ExportReader {
            headers,
            records,
            lineno: 1,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<R: Read> Iterator for ExportReader<R> {
    type Item = Result<InputRecord, csv::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(r) => r,
            Err(e) => return Some(Err(e)),
        };
        // Quoted fields may span several lines, trust the reader when it knows.
        self.lineno = record
            .position()
            .map(|p| p.line())
            .unwrap_or(self.lineno + 1);
        Some(Ok(InputRecord {
            lineno: self.lineno,
            fields: to_strings(&record),
        }))
    }
}

fn builder() -> csv::ReaderBuilder {
    let mut b = csv::ReaderBuilder::new();
    b.delimiter(b'\t')
        .quote(b'"')
        .has_headers(false)
        .flexible(true);
    b
}

fn to_strings(record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|f| String::from_utf8_lossy(f).to_string())
        .collect()
}
