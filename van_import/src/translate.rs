use std::collections::HashMap;

/// The column holding the call result in LiveVox exports.
pub const DEFAULT_OUTCOME_COLUMN: &str = "LivevoxResult";

/// The value VAN expects in the extra trailing column of every import row.
pub const DEFAULT_MARKER: &str = "Z";

/// A mapping from the source vocabulary to the target vocabulary.
///
/// Lookups of unknown terms return the term itself. A table is built once and
/// only read afterwards.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct TranslationTable {
    entries: HashMap<String, String>,
}

impl TranslationTable {
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map(|s| s.as_str()).unwrap_or(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<HashMap<String, String>> for TranslationTable {
    fn from(entries: HashMap<String, String>) -> Self {
        TranslationTable { entries }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TranslationTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        TranslationTable {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Returns the translation of `key`, or `key` itself when the table does not know it.
pub fn translate<'a>(table: &'a TranslationTable, key: &'a str) -> &'a str {
    table.translate(key)
}

/// Everything needed to turn source vocabulary into import vocabulary.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Vocabulary {
    /// Applied to every column name of the header.
    pub headers: TranslationTable,
    /// Applied to the values of the outcome column.
    pub results: TranslationTable,
    /// Name (in the source vocabulary) of the column whose values are translated.
    pub outcome_column: String,
    pub marker: String,
}

impl Vocabulary {
    pub fn new(headers: TranslationTable, results: TranslationTable) -> Vocabulary {
        Vocabulary {
            headers,
            results,
            outcome_column: DEFAULT_OUTCOME_COLUMN.to_string(),
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}
