use std::collections::HashMap;
use std::fs;

use serde::Deserialize;
use snafu::ResultExt;

use crate::convert::*;

const BUILTIN_TABLES: &str = include_str!("../../resources/livevox_tables.json");
const BUILTIN_TABLES_NAME: &str = "resources/livevox_tables.json";

/// The translation tables, as stored in JSON.
#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
pub struct TablesConfig {
    /// Export column name -> import column name
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// LiveVox result -> VAN result
    #[serde(default)]
    pub results: HashMap<String, String>,
    #[serde(rename = "outcomeColumn")]
    pub outcome_column: Option<String>,
    pub marker: Option<String>,
}

impl TablesConfig {
    pub fn into_vocabulary(self) -> Vocabulary {
        let mut v = Vocabulary::new(self.headers.into(), self.results.into());
        if let Some(c) = self.outcome_column {
            v.outcome_column = c;
        }
        if let Some(m) = self.marker {
            v.marker = m;
        }
        v
    }
}

pub fn read_tables(path: &str) -> ConvertResult<TablesConfig> {
    let contents = fs::read_to_string(path).context(OpeningTablesSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingTablesSnafu { path })
}

/// The LiveVox to VAN tables shipped with the program.
pub fn default_tables() -> ConvertResult<TablesConfig> {
    serde_json::from_str(BUILTIN_TABLES).context(ParsingTablesSnafu {
        path: BUILTIN_TABLES_NAME,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables() {
        let t = default_tables().unwrap();
        assert_eq!(t.headers.len(), 2);
        assert_eq!(t.results.len(), 91);
        let v = t.into_vocabulary();
        assert_eq!(v.headers.translate("DateCanvassedCT"), "Date");
        assert_eq!(v.results.translate("AGENT - CUST RPC 5"), "5 - Strong Clinton");
        assert_eq!(v.results.translate("Invalid Phone Number"), "Disconnected");
        assert_eq!(v.results.translate("Not a LiveVox code"), "Not a LiveVox code");
        assert_eq!(v.outcome_column, "LivevoxResult");
        assert_eq!(v.marker, "Z");
    }

    #[test]
    fn partial_tables() {
        let t: TablesConfig = serde_json::from_str(r#"{"results": {"Busy": "B"}}"#).unwrap();
        assert!(t.headers.is_empty());
        let v = t.into_vocabulary();
        assert_eq!(v.results.translate("Busy"), "B");
        assert_eq!(v.marker, "Z");
    }

    #[test]
    fn unreadable_tables() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("tables.json");
        let path = p.display().to_string();
        assert!(matches!(
            read_tables(&path),
            Err(ConvertError::OpeningTables { .. })
        ));
        fs::write(&p, "{\"headers\": [1, 2]}").unwrap();
        assert!(matches!(
            read_tables(&path),
            Err(ConvertError::ParsingTables { .. })
        ));
    }
}
