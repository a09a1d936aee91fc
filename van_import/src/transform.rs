use std::io::{self, Write};

use crate::translate::Vocabulary;

pub const FIELD_SEPARATOR: &str = "\t";
pub const ROW_TERMINATOR: &str = "\r\n";

/// Turns export rows into import rows.
///
/// Built once from the export header: the header row is translated column by
/// column, while data rows only get their outcome column translated.
#[derive(Debug, Clone)]
pub struct Transformer<'v> {
    vocabulary: &'v Vocabulary,
    // For each column position, whether it holds the outcome.
    outcome_columns: Vec<bool>,
    header_row: Vec<String>,
}

impl<'v> Transformer<'v> {
    pub fn new(headers: &[String], vocabulary: &'v Vocabulary) -> Transformer<'v> {
        let outcome_columns = headers
            .iter()
            .map(|h| *h == vocabulary.outcome_column)
            .collect();
        let mut header_row: Vec<String> = headers
            .iter()
            .map(|h| vocabulary.headers.translate(h).to_string())
            .collect();
        header_row.push(vocabulary.marker.clone());
        Transformer {
            vocabulary,
            outcome_columns,
            header_row,
        }
    }

    /// Number of columns of the export header.
    pub fn width(&self) -> usize {
        self.outcome_columns.len()
    }

    /// The translated header, including the marker column.
    pub fn header_row(&self) -> &[String] {
        &self.header_row
    }

    pub fn transform(&self, row: &[String]) -> Vec<String> {
        let mut res: Vec<String> = Vec::with_capacity(row.len() + 1);
        for (idx, cell) in row.iter().enumerate() {
            if self.outcome_columns.get(idx).cloned().unwrap_or(false) {
                res.push(self.vocabulary.results.translate(cell).to_string());
            } else {
                res.push(cell.clone());
            }
        }
        res.push(self.vocabulary.marker.clone());
        res
    }
}

/// Writes one row in the flat file layout of VAN bulk imports.
pub fn write_import_row<W: Write>(w: &mut W, fields: &[String]) -> io::Result<()> {
    let line = fields.join(FIELD_SEPARATOR);
    w.write_all(line.as_bytes())?;
    w.write_all(ROW_TERMINATOR.as_bytes())
}
