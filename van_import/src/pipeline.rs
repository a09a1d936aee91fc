use log::{debug, info, warn};
use std::error::Error;

use crate::classify::Classifier;
use crate::config::*;
use crate::router::{DestinationFactory, GroupSummary, Router};
use crate::transform::Transformer;
use crate::translate::Vocabulary;

/// A data row of the export, with its line number in the file (the header is line 1).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct InputRecord {
    pub lineno: u64,
    pub fields: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SkippedRow {
    pub lineno: u64,
    pub reason: ClassifyError,
}

/// Statistics for one run
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RunSummary {
    pub rows_read: u64,
    pub rows_written: u64,
    pub skipped: Vec<SkippedRow>,
    /// The groups in the order they were created.
    pub groups: Vec<GroupSummary>,
}

impl RunSummary {
    pub fn rows_skipped(&self) -> u64 {
        self.skipped.len() as u64
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DriverState {
    Running,
    Done,
}

/// Reads the rows of an export in order and routes each of them to its import file.
pub struct Driver<'v, F: DestinationFactory> {
    classifier: Classifier,
    transformer: Transformer<'v>,
    router: Router<F>,
    state: DriverState,
}

impl<'v, F: DestinationFactory> Driver<'v, F> {
    /// Arguments:
    /// * `headers` the header row of the export, in the source vocabulary
    /// * `vocabulary` the translation tables, shared by all the rows
    /// * `classifier` the row shapes to recognize
    /// * `factory` creates the destination of each new group
    pub fn new(
        headers: &[String],
        vocabulary: &'v Vocabulary,
        classifier: Classifier,
        factory: F,
    ) -> Driver<'v, F> {
        let transformer = Transformer::new(headers, vocabulary);
        debug!("Driver::new: import header: {:?}", transformer.header_row());
        let router = Router::new(factory, transformer.header_row().to_vec());
        Driver {
            classifier,
            transformer,
            router,
            state: DriverState::Running,
        }
    }

    #[cfg(test)]
    fn state(&self) -> DriverState {
        self.state
    }

    /// Processes all the records until the input is exhausted.
    ///
    /// Rows that cannot be classified are skipped and listed in the summary.
    /// Input and output failures stop the run. In every case, the groups opened
    /// so far are closed before returning.
    pub fn run<I, E>(&mut self, records: I) -> Result<RunSummary, PipelineError>
    where
        I: IntoIterator<Item = Result<InputRecord, E>>,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        if self.state == DriverState::Done {
            return Err(PipelineError::Finished);
        }
        let mut summary = RunSummary::default();
        let processed = self.process_all(records, &mut summary);
        self.state = DriverState::Done;
        let closed = self.router.close_all();
        processed?;
        summary.groups = closed?;
        info!(
            "Processed {} rows: {} written to {} files, {} skipped",
            summary.rows_read,
            summary.rows_written,
            summary.groups.len(),
            summary.rows_skipped()
        );
        Ok(summary)
    }

    fn process_all<I, E>(&mut self, records: I, summary: &mut RunSummary) -> Result<(), PipelineError>
    where
        I: IntoIterator<Item = Result<InputRecord, E>>,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        let mut last_line: Option<u64> = None;
        for record_r in records {
            let record = record_r.map_err(|e| PipelineError::Input {
                after_line: last_line,
                source: e.into(),
            })?;
            last_line = Some(record.lineno);
            self.process_record(&record, summary)?;
        }
        Ok(())
    }

    fn process_record(
        &mut self,
        record: &InputRecord,
        summary: &mut RunSummary,
    ) -> Result<(), PipelineError> {
        debug!(
            "Processing line {}: {}",
            record.lineno,
            record.fields.join(",")
        );
        summary.rows_read += 1;

        let classification = match self.classify(&record.fields) {
            Ok(c) => c,
            Err(reason) => {
                warn!(
                    "Skipping line {}: {}: {}",
                    record.lineno,
                    reason,
                    record.fields.join(",")
                );
                summary.skipped.push(SkippedRow {
                    lineno: record.lineno,
                    reason,
                });
                return Ok(());
            }
        };

        let row = self
            .transformer
            .transform(&classification.normalize_row(&record.fields));
        self.router
            .get_or_create(&classification.key())?
            .write_row(&row)?;
        summary.rows_written += 1;
        Ok(())
    }

    fn classify(&self, fields: &[String]) -> Result<Classification, ClassifyError> {
        let expected = self.transformer.width();
        if fields.len() != expected {
            return Err(ClassifyError::ColumnCount {
                expected,
                found: fields.len(),
            });
        }
        if let Some(column) = fields
            .iter()
            .position(|f| f.contains(['\t', '\r', '\n']))
        {
            return Err(ClassifyError::EmbeddedSeparator { column });
        }
        self.classifier.classify(fields)
    }
}
