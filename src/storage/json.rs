//! JSON storage
//!
//! The file is one object of objects, section name to key to string:
//!
//! ```json
//! {
//!   "window": {
//!     "width": "800",
//!     "sizes": "[[1,2],[3]]"
//!   }
//! }
//! ```
//!
//! Arrays and other structured values are kept as their compact JSON text
//! inside the string slot. Reads never fail on bad data: a malformed file
//! loads as an empty store, and a value that does not convert yields the
//! caller's default.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::store::{read_or_create, write_atomic, ConfigStore, Result, StoreError, TypedAccess};
use super::StoreFormat;
use crate::domain::{CoercionPolicy, FromScalar, Grid, SectionMap};

/// Store backed by a JSON file
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    sections: SectionMap,
}

impl JsonStore {
    fn load(path: &Path) -> Result<SectionMap> {
        let Some(content) = read_or_create(path, "{}")? else {
            return Ok(SectionMap::new());
        };

        if content.trim().is_empty() {
            return Ok(SectionMap::new());
        }

        let sections = match serde_json::from_str::<SectionMap>(&content) {
            Ok(sections) => sections,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "malformed json store, starting empty"
                );
                SectionMap::new()
            }
        };

        tracing::debug!(
            path = %path.display(),
            sections = sections.len(),
            "loaded json store"
        );
        Ok(sections)
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(|e| StoreError::Encode {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Parses the stored text of a key as JSON
    fn decode<T: DeserializeOwned>(&self, section: &str, key: &str) -> Option<T> {
        let raw = self.sections.value(section, key)?;
        serde_json::from_str(raw).ok()
    }

    /// Reads a value as `T`, returning `default` if it is absent or does
    /// not convert
    pub fn get<T: FromScalar>(&self, section: &str, key: &str, default: T) -> T {
        self.get_typed(section, key, default.clone()).unwrap_or(default)
    }

    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get(section, key, default)
    }

    pub fn get_int(&self, section: &str, key: &str, default: i32) -> i32 {
        self.get(section, key, default)
    }

    pub fn get_float(&self, section: &str, key: &str, default: f32) -> f32 {
        self.get(section, key, default)
    }

    pub fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get(section, key, default)
    }

    /// Stores a scalar in its canonical text form
    pub fn set<T: FromScalar>(&mut self, section: &str, key: &str, value: &T) {
        self.sections
            .entry(section)
            .set(key, value.to_scalar().to_stored());
    }

    /// Reads any deserializable value.
    ///
    /// The stored text is first read as JSON (`42`, `[1,2]`, `{"a":1}`),
    /// then as a plain JSON string, so `get_value::<String>` returns the
    /// text unchanged.
    pub fn get_value<T: DeserializeOwned>(&self, section: &str, key: &str, default: T) -> T {
        let Some(raw) = self.sections.value(section, key) else {
            return default;
        };

        serde_json::from_str(raw)
            .or_else(|_| serde_json::from_value(serde_json::Value::String(raw.to_string())))
            .unwrap_or(default)
    }

    /// Stores any serializable value. Values that serialize to a JSON
    /// string are stored unquoted.
    pub fn set_value<T: Serialize + ?Sized>(&mut self, section: &str, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_value(value).map_err(|e| StoreError::Encode {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let text = match json {
            serde_json::Value::String(s) => s,
            other => self.encode(&other)?,
        };

        self.sections.entry(section).set(key, text);
        Ok(())
    }

    /// Reads a one-dimensional array
    pub fn get_array<T: DeserializeOwned>(&self, section: &str, key: &str, default: Vec<T>) -> Vec<T> {
        self.decode(section, key).unwrap_or(default)
    }

    /// Stores a one-dimensional array as JSON text
    pub fn set_array<T: Serialize>(&mut self, section: &str, key: &str, values: &[T]) -> Result<()> {
        let text = self.encode(values)?;
        self.sections.entry(section).set(key, text);
        Ok(())
    }

    /// Reads an array of arrays whose rows may differ in length
    pub fn get_jagged<T: DeserializeOwned>(
        &self,
        section: &str,
        key: &str,
        default: Vec<Vec<T>>,
    ) -> Vec<Vec<T>> {
        self.decode(section, key).unwrap_or(default)
    }

    pub fn set_jagged<T: Serialize>(&mut self, section: &str, key: &str, rows: &[Vec<T>]) -> Result<()> {
        let text = self.encode(rows)?;
        self.sections.entry(section).set(key, text);
        Ok(())
    }

    /// Reads a rectangular array. Ragged stored rows yield `default`.
    pub fn get_grid<T: DeserializeOwned>(&self, section: &str, key: &str, default: Grid<T>) -> Grid<T> {
        self.decode(section, key).unwrap_or(default)
    }

    pub fn set_grid<T: Serialize>(&mut self, section: &str, key: &str, grid: &Grid<T>) -> Result<()> {
        let text = self.encode(grid)?;
        self.sections.entry(section).set(key, text);
        Ok(())
    }
}

impl ConfigStore for JsonStore {
    fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let sections = Self::load(&path)?;
        Ok(Self { path, sections })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> StoreFormat {
        StoreFormat::Json
    }

    fn reload(&mut self) -> Result<()> {
        self.sections = Self::load(&self.path)?;
        Ok(())
    }

    fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.sections
            .value(section, key)
            .unwrap_or(default)
            .to_string()
    }

    fn sections(&self) -> Vec<String> {
        self.sections.names().map(String::from).collect()
    }

    fn keys(&self, section: &str) -> Result<Vec<String>> {
        self.sections
            .get(section)
            .map(|s| s.keys().map(String::from).collect())
            .ok_or_else(|| StoreError::section_not_found(section))
    }

    fn all_key_values(&self, section: &str) -> Result<Vec<(String, String)>> {
        self.sections
            .get(section)
            .map(|s| s.entries().to_vec())
            .ok_or_else(|| StoreError::section_not_found(section))
    }

    fn section_exists(&self, section: &str) -> bool {
        self.sections.contains(section)
    }

    fn key_exists(&self, section: &str, key: &str) -> bool {
        self.sections.value(section, key).is_some()
    }

    fn set_string(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        self.sections.entry(section).set(key, value);
        Ok(())
    }

    fn create_section(&mut self, section: &str) -> Result<()> {
        if !self.sections.insert_new(section) {
            return Err(StoreError::DuplicateSection(section.to_string()));
        }
        Ok(())
    }

    fn delete_section(&mut self, section: &str) -> Result<()> {
        if !self.sections.remove(section) {
            return Err(StoreError::section_not_found(section));
        }
        Ok(())
    }

    fn delete_key(&mut self, section: &str, key: &str) -> Result<()> {
        let entries = self
            .sections
            .get_mut(section)
            .ok_or_else(|| StoreError::section_not_found(section))?;

        if !entries.remove(key) {
            return Err(StoreError::key_not_found(section, key));
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        let mut content = serde_json::to_string_pretty(&self.sections).map_err(|e| {
            StoreError::Encode {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;
        content.push('\n');

        write_atomic(&self.path, content.as_bytes())?;
        tracing::debug!(
            path = %self.path.display(),
            sections = self.sections.len(),
            "saved json store"
        );
        Ok(())
    }
}

impl TypedAccess for JsonStore {
    const POLICY: CoercionPolicy = CoercionPolicy::Lenient;
}
