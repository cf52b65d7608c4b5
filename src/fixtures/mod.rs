//! Test fixture loading.
//!
//! A [`FixtureLoader`] reads `<directory>/<table><file_ending>` once per table, parses it
//! with an injected [`FixtureParser`] and caches the result under the lower-cased table
//! name.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::FixtureError;

mod parser;

pub use parser::{FixtureFormat, FixtureParser, JsonParser, XmlParser};

use parser::is_empty_fixture;

pub struct FixtureLoader {
    directory: PathBuf,
    file_ending: String,
    parser: Option<Box<dyn FixtureParser>>,
    loaded_files: HashMap<String, Value>,
}

impl FixtureLoader {
    /// Create a loader without a parser; loading fails until one is set.
    ///
    /// # Errors
    /// Returns `FixtureError::InvalidDirectory` if `directory` is not a directory.
    pub fn new(
        directory: impl AsRef<Path>,
        file_ending: impl Into<String>,
    ) -> Result<Self, FixtureError> {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            return Err(FixtureError::InvalidDirectory);
        }
        Ok(Self {
            directory: directory.to_path_buf(),
            file_ending: file_ending.into(),
            parser: None,
            loaded_files: HashMap::new(),
        })
    }

    /// # Errors
    /// Returns `FixtureError::InvalidDirectory` if `directory` is not a directory.
    pub fn with_parser(
        directory: impl AsRef<Path>,
        file_ending: impl Into<String>,
        parser: impl FixtureParser + 'static,
    ) -> Result<Self, FixtureError> {
        let mut loader = Self::new(directory, file_ending)?;
        loader.parser = Some(Box::new(parser));
        Ok(loader)
    }

    /// Loader for one of the built-in formats.
    ///
    /// # Errors
    /// Returns `FixtureError::InvalidDirectory` if `directory` is not a directory.
    pub fn for_format(
        directory: impl AsRef<Path>,
        format: FixtureFormat,
    ) -> Result<Self, FixtureError> {
        let mut loader = Self::new(directory, format.file_ending())?;
        loader.parser = Some(format.parser());
        Ok(loader)
    }

    /// # Errors
    /// Returns `FixtureError::InvalidDirectory` if `directory` is not a directory.
    pub fn json(directory: impl AsRef<Path>) -> Result<Self, FixtureError> {
        Self::for_format(directory, FixtureFormat::Json)
    }

    /// # Errors
    /// Returns `FixtureError::InvalidDirectory` if `directory` is not a directory.
    pub fn xml(directory: impl AsRef<Path>) -> Result<Self, FixtureError> {
        Self::for_format(directory, FixtureFormat::Xml)
    }

    pub fn set_parser(&mut self, parser: impl FixtureParser + 'static) {
        self.parser = Some(Box::new(parser));
    }

    #[must_use]
    pub fn fixture_directory(&self) -> &Path {
        &self.directory
    }

    #[must_use]
    pub fn file_ending(&self) -> &str {
        &self.file_ending
    }

    /// Parsed fixtures cached so far, keyed by lower-cased table name.
    #[must_use]
    pub fn loaded_files(&self) -> &HashMap<String, Value> {
        &self.loaded_files
    }

    /// Every fixture record for `table`.
    ///
    /// # Errors
    /// Returns `FixtureError::NotFound` when the file does not exist,
    /// `FixtureError::FailedToLoad` when it holds nothing, `FixtureError::NoParser`
    /// without a parser, or the parser's error.
    pub fn get_all(&mut self, table: &str) -> Result<&Value, FixtureError> {
        let key = table.to_lowercase();
        if !self.loaded_files.contains_key(&key) {
            let fixtures = self.read_fixture(table, &key)?;
            self.loaded_files.insert(key.clone(), fixtures);
        }
        self.loaded_files
            .get(&key)
            .ok_or_else(|| FixtureError::FailedToLoad(table.to_owned()))
    }

    /// The record at `index`.
    ///
    /// # Errors
    /// Returns `FixtureError::IndexNotFound` for a missing index, or any
    /// [`FixtureLoader::get_all`] error.
    pub fn get_one(&mut self, table: &str, index: usize) -> Result<&Value, FixtureError> {
        let fixtures = self.get_all(table)?;
        entry_at(fixtures, index).ok_or(FixtureError::IndexNotFound)
    }

    /// `length` records starting at `offset`.
    ///
    /// # Errors
    /// Returns `FixtureError::InvalidLength` for a zero length,
    /// `FixtureError::OffsetNotFound` for a missing offset, `FixtureError::InvalidRange`
    /// when the range runs past the end, or any [`FixtureLoader::get_all`] error.
    pub fn get_range(
        &mut self,
        table: &str,
        offset: usize,
        length: usize,
    ) -> Result<Vec<&Value>, FixtureError> {
        if length == 0 {
            return Err(FixtureError::InvalidLength);
        }

        let fixtures = self.get_all(table)?;
        if entry_at(fixtures, offset).is_none() {
            return Err(FixtureError::OffsetNotFound);
        }
        let end = offset.checked_add(length).ok_or(FixtureError::InvalidRange)?;
        if end > entry_count(fixtures) {
            return Err(FixtureError::InvalidRange);
        }

        let range = match fixtures {
            Value::Array(items) => items[offset..end].iter().collect(),
            Value::Object(map) => map.values().skip(offset).take(length).collect(),
            _ => Vec::new(),
        };
        Ok(range)
    }

    fn read_fixture(&self, table: &str, key: &str) -> Result<Value, FixtureError> {
        let path = self.directory.join(format!("{key}{}", self.file_ending));
        if !path.is_file() {
            return Err(FixtureError::NotFound(key.to_owned()));
        }

        let contents = fs::read_to_string(&path)?;
        if contents.is_empty() {
            return Err(FixtureError::FailedToLoad(table.to_owned()));
        }

        let parser = self.parser.as_ref().ok_or(FixtureError::NoParser)?;
        let fixtures = parser.parse(&contents)?;
        if is_empty_fixture(&fixtures) {
            return Err(FixtureError::FailedToLoad(table.to_owned()));
        }

        tracing::debug!(table = key, path = %path.display(), "fixture loaded");
        Ok(fixtures)
    }
}

impl std::fmt::Debug for FixtureLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureLoader")
            .field("directory", &self.directory)
            .field("file_ending", &self.file_ending)
            .field("has_parser", &self.parser.is_some())
            .field("loaded_files", &self.loaded_files.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn entry_at(fixtures: &Value, index: usize) -> Option<&Value> {
    match fixtures {
        Value::Array(items) => items.get(index),
        Value::Object(map) => map.get(&index.to_string()),
        _ => None,
    }
}

fn entry_count(fixtures: &Value) -> usize {
    match fixtures {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}
