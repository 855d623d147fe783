//! Runtime configuration: text format and per-field options.
//!
//! Everything here can be set through the reader, writer and processor
//! builders, or loaded from JSON:
//!
//! ```
//! use csv_field_mapper::core::config::MappingConfig;
//!
//! let config = MappingConfig::from_json_str(
//!     r#"{
//!         "format": { "delimiter": ";" },
//!         "fields": { "split_texts": { "alias": "tags", "list_separator": "|" } }
//!     }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.format.delimiter, ";");
//! assert_eq!(config.fields.get("split_texts").unwrap().list_separator, Some('|'));
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::CsvError;

/// Delimiter written between columns by default.
pub const DEFAULT_DELIMITER: &str = ", ";

/// Shape of the delimited text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvFormat {
    /// String separating columns, split literally (no quoting, no escaping).
    pub delimiter: String,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_owned(),
        }
    }
}

impl CsvFormat {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CsvError> {
        if self.delimiter.is_empty() {
            return Err(CsvError::Config("delimiter must not be empty".to_owned()));
        }
        Ok(())
    }
}

/// Metadata attached to one field by the caller.
///
/// Set values take precedence over the ones the record type declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    pub alias: Option<String>,
    pub list_separator: Option<char>,
}

/// Side table of [`FieldOptions`] keyed by field identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldOptionsTable {
    entries: BTreeMap<String, FieldOptions>,
}

impl FieldOptionsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alias(mut self, field: impl Into<String>, alias: impl Into<String>) -> Self {
        self.entries.entry(field.into()).or_default().alias = Some(alias.into());
        self
    }

    pub fn list_separator(mut self, field: impl Into<String>, separator: char) -> Self {
        self.entries.entry(field.into()).or_default().list_separator = Some(separator);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldOptions> {
        self.entries.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldOptions)> {
        self.entries
            .iter()
            .map(|(field, options)| (field.as_str(), options))
    }
}

/// Format and field options loaded together, typically from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub format: CsvFormat,
    pub fields: FieldOptionsTable,
}

impl MappingConfig {
    pub fn from_json_str(json: &str) -> Result<Self, CsvError> {
        let config: MappingConfig =
            serde_json::from_str(json).map_err(|error| CsvError::Config(error.to_string()))?;
        config.format.validate()?;
        Ok(config)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, CsvError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CsvError::FileNotFound(path.to_path_buf()));
        }
        Self::from_json_str(&fs::read_to_string(path)?)
    }
}
