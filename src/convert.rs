use log::{debug, info};
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::PathBuf;

use van_import::*;

pub mod config_reader;
pub mod io_common;
pub mod io_tsv;

use crate::convert::config_reader::*;
use crate::convert::io_common::*;
use crate::convert::io_tsv::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConvertError {
    #[snafu(display("Please specify a LiveVox export file to parse"))]
    MissingInput {},
    #[snafu(display("Error opening export file {path}"))]
    OpeningInput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Export file {path} is empty, a header row is expected"))]
    MissingHeader { path: String },
    #[snafu(display("Error reading the header of {path}"))]
    ReadingHeader { source: csv::Error, path: String },
    #[snafu(display("Error opening translation tables {path}"))]
    OpeningTables {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing translation tables {path}"))]
    ParsingTables {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Invalid date {date:?}, expected YYYYMMDD"))]
    InvalidDate {
        source: chrono::ParseError,
        date: String,
    },
    #[snafu(display("Error creating output directory {path}"))]
    CreatingOutputDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Conversion of {path} did not complete"))]
    Conversion { source: PipelineError, path: String },
}

pub type ConvertResult<T> = Result<T, ConvertError>;

/// The options of one conversion run.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ConvertSettings {
    pub input: Option<String>,
    pub out_dir: Option<String>,
    pub tables: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// Every import file written, with its number of data rows.
    pub files: Vec<(PathBuf, u64)>,
    pub summary: RunSummary,
}

pub fn run_conversion(settings: &ConvertSettings) -> ConvertResult<ConversionReport> {
    let input = settings.input.clone().context(MissingInputSnafu {})?;
    let date = run_date(settings.date.as_deref())?;

    let tables = match settings.tables.as_deref() {
        Some(path) => read_tables(path)?,
        None => default_tables()?,
    };
    debug!(
        "run_conversion: {} header and {} result translations",
        tables.headers.len(),
        tables.results.len()
    );
    let vocabulary = tables.into_vocabulary();

    let out_dir = PathBuf::from(settings.out_dir.as_deref().unwrap_or("."));
    fs::create_dir_all(&out_dir).context(CreatingOutputDirSnafu {
        path: out_dir.display().to_string(),
    })?;

    info!(
        "Converting {} into {}",
        simplify_file_name(&input),
        out_dir.display()
    );
    let export = ExportReader::from_path(&input)?;
    let headers = export.headers().to_vec();
    let mut driver = Driver::new(
        &headers,
        &vocabulary,
        Classifier::default(),
        ImportFiles::new(&out_dir, &date),
    );
    let summary = driver
        .run(export)
        .context(ConversionSnafu { path: input.clone() })?;

    let files = summary
        .groups
        .iter()
        .map(|g| (import_file_path(&out_dir, &g.key, &date), g.rows))
        .collect();
    Ok(ConversionReport { files, summary })
}
