//! Lookup tables used by the `-batch` modifier.
//!
//! Two tables are involved:
//! - relators: role name -> MARC relator code (`"Photographer"` -> `"pht"`)
//! - coded terms: admin set / library unit label -> code
//!
//! Built-in tables are embedded from `terms/*.json`; either can be replaced
//! from a JSON file per schema variant.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigResult;
use crate::logs::log_warning;

const RELATORS_JSON: &str = include_str!("../terms/marc_relators.json");
const CODED_TERMS_JSON: &str = include_str!("../terms/coded_terms.json");

static BUILTIN_RELATORS: Lazy<TermTable> = Lazy::new(|| load_builtin("marc_relators", RELATORS_JSON));

static BUILTIN_CODED_TERMS: Lazy<TermTable> = Lazy::new(|| load_builtin("coded_terms", CODED_TERMS_JSON));

/// Parse an embedded table; a broken one is reported and replaced by an empty table.
fn load_builtin(name: &str, json: &str) -> TermTable {
    TermTable::from_json(json).unwrap_or_else(|e| {
        log_warning(format!("Built-in {} table is invalid, -batch codes will fall back: {}", name, e));
        TermTable::default()
    })
}

/// A flat string -> string lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermTable(HashMap<String, String>);

impl TermTable {
    /// Parse a JSON object of string values.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TermTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The tables injected into the modifier pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermTables {
    pub relators: TermTable,
    pub coded_terms: TermTable,
}

impl TermTables {
    pub fn new(relators: TermTable, coded_terms: TermTable) -> Self {
        Self { relators, coded_terms }
    }

    /// Tables shipped with the crate.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_RELATORS.clone(), BUILTIN_CODED_TERMS.clone())
    }

    /// Replace the relator table with one loaded from disk.
    pub fn with_relators_file(mut self, path: impl AsRef<Path>) -> ConfigResult<Self> {
        self.relators = TermTable::from_file(path)?;
        Ok(self)
    }

    /// Replace the coded-term table with one loaded from disk.
    pub fn with_coded_terms_file(mut self, path: impl AsRef<Path>) -> ConfigResult<Self> {
        self.coded_terms = TermTable::from_file(path)?;
        Ok(self)
    }
}

impl Default for TermTables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_tables_load() {
        let tables = TermTables::builtin();
        assert_eq!(tables.relators.get("Photographer"), Some("pht"));
        assert_eq!(tables.coded_terms.get("Music Library"), Some("MUSIC_LIBRARY"));
    }

    #[test]
    fn test_embedded_tables_parse() {
        let relators = TermTable::from_json(RELATORS_JSON).unwrap();
        let coded = TermTable::from_json(CODED_TERMS_JSON).unwrap();
        assert!(relators.len() > 10);
        assert!(!coded.is_empty());
    }

    #[test]
    fn test_broken_builtin_falls_back_to_empty() {
        assert!(load_builtin("broken", "{not json").is_empty());
    }

    #[test]
    fn test_relators_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Creator": "cre"}}"#).unwrap();

        let tables = TermTables::builtin().with_relators_file(file.path()).unwrap();
        assert_eq!(tables.relators.len(), 1);
        assert_eq!(tables.relators.get("Creator"), Some("cre"));
        assert!(!tables.coded_terms.is_empty());
    }

    #[test]
    fn test_invalid_table_is_config_error() {
        assert!(TermTable::from_json(r#"{"a": 1}"#).is_err());
    }
}
