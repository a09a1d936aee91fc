use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::info;
use snafu::ResultExt;

use crate::convert::*;

const DATE_FORMAT: &str = "%Y%m%d";

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// The date stamped in the file names: today, unless a date is given.
pub fn run_date(date: Option<&str>) -> ConvertResult<String> {
    match date {
        Some(s) => {
            let d = NaiveDate::parse_from_str(s, DATE_FORMAT).context(InvalidDateSnafu { date: s })?;
            Ok(d.format(DATE_FORMAT).to_string())
        }
        None => Ok(chrono::Local::now().format(DATE_FORMAT).to_string()),
    }
}

/// `CA_MYV_20160201_Results.txt`
pub fn import_file_name(key: &GroupKey, date: &str) -> String {
    [
        key.jurisdiction.as_str(),
        key.category.tag(),
        date,
        "Results.txt",
    ]
    .join("_")
}

pub fn import_file_path(dir: &Path, key: &GroupKey, date: &str) -> PathBuf {
    dir.join(import_file_name(key, date))
}

/// Import files in a directory, named after their group and the run date.
/// An existing file with the same name is truncated.
pub struct ImportFiles {
    dir: PathBuf,
    date: String,
}

impl ImportFiles {
    pub fn new(dir: &Path, date: &str) -> ImportFiles {
        ImportFiles {
            dir: dir.to_path_buf(),
            date: date.to_string(),
        }
    }
}

impl DestinationFactory for ImportFiles {
    type Destination = BufWriter<File>;

    fn open(&mut self, key: &GroupKey) -> io::Result<BufWriter<File>> {
        let path = import_file_path(&self.dir, key, &self.date);
        info!("Writing {} import file {}", key, path.display());
        Ok(BufWriter::new(File::create(path)?))
    }
}
