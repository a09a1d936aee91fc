// ********* Shared data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::io;

/// Identifiers at or above this value belong to the contact lists (My Campaign),
/// all the others to the voter file (My Voters).
pub const CONTACT_LIST_THRESHOLD: u64 = 100_000_000;

/// The kind of list a record belongs to.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Category {
    /// My Campaign records.
    ContactList,
    /// My Voters records.
    VoterFile,
}

impl Category {
    /// Derives the category from the magnitude of a decimal identifier.
    ///
    /// The comparison works on the digits directly, so identifiers that
    /// do not fit in a machine integer are still classified. An all-zero
    /// or empty identifier is a voter file record.
    pub fn from_van_id(digits: &str) -> Category {
        let magnitude = digits.trim_start_matches('0');
        // u64::MAX has 20 digits, anything longer is far above the threshold.
        let contact_list = if magnitude.len() >= 20 {
            true
        } else {
            magnitude
                .parse::<u64>()
                .map(|v| v >= CONTACT_LIST_THRESHOLD)
                .unwrap_or(false)
        };
        if contact_list {
            Category::ContactList
        } else {
            Category::VoterFile
        }
    }

    /// The tag used by VAN for this list, also used in the file names.
    pub fn tag(&self) -> &'static str {
        match self {
            Category::ContactList => "MYC",
            Category::VoterFile => "MYV",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// The key of an output group: one import file per state and list.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct GroupKey {
    pub jurisdiction: String,
    pub category: Category,
}

impl GroupKey {
    pub fn new(jurisdiction: &str, category: Category) -> GroupKey {
        GroupKey {
            jurisdiction: jurisdiction.to_string(),
            category,
        }
    }
}

impl Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.jurisdiction, self.category.tag())
    }
}

/// The outcome of classifying one row.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Classification {
    /// Two-letter state code.
    pub jurisdiction: String,
    pub category: Category,
    /// The bare numeric VAN id, without any tag or state prefix.
    pub van_id: String,
}

impl Classification {
    pub fn key(&self) -> GroupKey {
        GroupKey::new(&self.jurisdiction, self.category)
    }

    /// Returns a copy of the row in which the identifier column holds the bare VAN id.
    pub fn normalize_row(&self, row: &[String]) -> Vec<String> {
        let mut res = row.to_vec();
        if let Some(first) = res.first_mut() {
            *first = self.van_id.clone();
        }
        res
    }
}

/// Reasons for which a single row cannot be routed.
///
/// None of these stop a run: the row is reported and skipped.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ClassifyError {
    EmptyRow,
    /// The row does not have as many columns as the header.
    ColumnCount { expected: usize, found: usize },
    /// A cell holds a tab or a line break, which the import format cannot carry.
    EmbeddedSeparator { column: usize },
    /// The identifier matches none of the known shapes.
    UnrecognizedId { id: String },
    /// The column carrying the state for bare numeric ids is absent.
    MissingJurisdictionColumn { index: usize },
    /// The column carrying the state does not start with a state code.
    InvalidJurisdiction { value: String },
}

impl Error for ClassifyError {}

impl Display for ClassifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifyError::EmptyRow => write!(f, "empty row"),
            ClassifyError::ColumnCount { expected, found } => write!(
                f,
                "expected {} columns as in the header, found {}",
                expected, found
            ),
            ClassifyError::EmbeddedSeparator { column } => write!(
                f,
                "column {} contains a tab or a line break",
                column + 1
            ),
            ClassifyError::UnrecognizedId { id } => {
                write!(f, "unable to identify state for id {:?}", id)
            }
            ClassifyError::MissingJurisdictionColumn { index } => {
                write!(f, "missing state column at position {}", index + 1)
            }
            ClassifyError::InvalidJurisdiction { value } => {
                write!(f, "unable to identify state from {:?}", value)
            }
        }
    }
}

/// Errors that prevent a run from completing.
#[derive(Debug)]
pub enum PipelineError {
    /// The input could not be read past some point.
    Input {
        /// The last line that was read successfully, if any.
        after_line: Option<u64>,
        source: Box<dyn Error + Send + Sync>,
    },
    /// An import file could not be created, written or flushed.
    Output { key: GroupKey, source: io::Error },
    /// The driver has already consumed its input.
    Finished,
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Input { source, .. } => Some(source.as_ref()),
            PipelineError::Output { source, .. } => Some(source),
            PipelineError::Finished => None,
        }
    }
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Input {
                after_line: Some(lineno),
                source,
            } => write!(f, "error reading input after line {}: {}", lineno, source),
            PipelineError::Input {
                after_line: None,
                source,
            } => {
                write!(f, "error reading input: {}", source)
            }
            PipelineError::Output { key, source } => {
                write!(f, "error writing import file for {}: {}", key, source)
            }
            PipelineError::Finished => write!(f, "the input has already been processed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(Category::from_van_id("100000000"), Category::ContactList);
        assert_eq!(Category::from_van_id("99999999"), Category::VoterFile);
        assert_eq!(Category::from_van_id("100000001"), Category::ContactList);
    }

    #[test]
    fn leading_zeros_do_not_count() {
        assert_eq!(Category::from_van_id("0099999999"), Category::VoterFile);
        assert_eq!(Category::from_van_id("000100000000"), Category::ContactList);
        assert_eq!(Category::from_van_id("0"), Category::VoterFile);
    }

    #[test]
    fn very_long_ids() {
        assert_eq!(
            Category::from_van_id("99999999999999999999"),
            Category::ContactList
        );
        assert_eq!(
            Category::from_van_id("123456789012345678901234567890"),
            Category::ContactList
        );
    }

    #[test]
    fn normalize_row_replaces_only_the_id() {
        let c = Classification {
            jurisdiction: "CA".to_string(),
            category: Category::VoterFile,
            van_id: "12345".to_string(),
        };
        let row = vec!["MYV-CA-12345".to_string(), "x".to_string()];
        assert_eq!(c.normalize_row(&row), vec!["12345", "x"]);
        // The input row is left untouched.
        assert_eq!(row[0], "MYV-CA-12345");
        assert_eq!(c.key().to_string(), "CA_MYV");
    }
}
