//! Contract shared by every file-backed store

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::StoreFormat;
use crate::domain::{CoercionError, CoercionPolicy, FromScalar, Scalar, ScalarKind};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}", not_found_message(.section, .key.as_deref()))]
    NotFound { section: String, key: Option<String> },

    #[error("Section already exists: [{0}]")]
    DuplicateSection(String),

    #[error("Value of '{key}' in [{section}] is not a valid {kind}: '{value}'")]
    Format {
        section: String,
        key: String,
        value: String,
        kind: ScalarKind,
        #[source]
        source: CoercionError,
    },

    #[error("Invalid element name: '{0}'")]
    InvalidName(String),

    #[error("Cannot write {text:?} as an INI {part}: {reason}")]
    Unrepresentable {
        part: &'static str,
        text: String,
        reason: &'static str,
    },

    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to encode {}: {message}", .path.display())]
    Encode { path: PathBuf, message: String },

    #[error("Cannot tell the file type of {} (expected .ini, .json or .xml)", .0.display())]
    UnknownFormat(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn not_found_message(section: &str, key: Option<&str>) -> String {
    match key {
        Some(key) => format!("Key not found: '{}' in [{}]", key, section),
        None => format!("Section not found: [{}]", section),
    }
}

impl StoreError {
    pub fn section_not_found(section: &str) -> Self {
        Self::NotFound {
            section: section.to_string(),
            key: None,
        }
    }

    pub fn key_not_found(section: &str, key: &str) -> Self {
        Self::NotFound {
            section: section.to_string(),
            key: Some(key.to_string()),
        }
    }

    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns true for [`StoreError::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Operations every store offers, whatever its file format.
///
/// A store is loaded once when opened and written back only by
/// [`ConfigStore::save`]. Opening a path that does not exist writes an
/// empty document there straight away.
pub trait ConfigStore: Sized {
    /// Opens the store at `path`, creating an empty file if needed
    fn open(path: impl AsRef<Path>) -> Result<Self>;

    /// Returns the backing file path
    fn path(&self) -> &Path;

    /// Returns the file format of this store
    fn format(&self) -> StoreFormat;

    /// Discards in-memory state and reads the backing file again
    fn reload(&mut self) -> Result<()>;

    /// Returns the value of `key` in `section`, or `default`
    fn get_string(&self, section: &str, key: &str, default: &str) -> String;

    /// Returns section names in file order
    fn sections(&self) -> Vec<String>;

    /// Returns key names of `section` in file order
    fn keys(&self, section: &str) -> Result<Vec<String>>;

    /// Returns a snapshot of every entry in `section`
    fn all_key_values(&self, section: &str) -> Result<Vec<(String, String)>>;

    fn section_exists(&self, section: &str) -> bool;

    fn key_exists(&self, section: &str, key: &str) -> bool;

    /// Inserts or overwrites a value, creating the section if needed
    fn set_string(&mut self, section: &str, key: &str, value: &str) -> Result<()>;

    /// Adds an empty section
    fn create_section(&mut self, section: &str) -> Result<()>;

    fn delete_section(&mut self, section: &str) -> Result<()>;

    fn delete_key(&mut self, section: &str, key: &str) -> Result<()>;

    /// Writes the whole store to its backing file
    fn save(&self) -> Result<()>;
}

/// Typed reads over a store's string values.
///
/// `POLICY` decides what happens when a present value does not parse:
/// [`CoercionPolicy::Strict`] returns [`StoreError::Format`],
/// [`CoercionPolicy::Lenient`] returns the default instead.
pub trait TypedAccess: ConfigStore {
    const POLICY: CoercionPolicy;

    /// Reads a value as the kind of `default`
    fn get_scalar(&self, section: &str, key: &str, default: Scalar) -> Result<Scalar> {
        let kind = default.kind();

        match Self::POLICY {
            CoercionPolicy::Strict => {
                let raw = self.get_string(section, key, &default.to_stored());
                Scalar::parse(kind, &raw).map_err(|source| StoreError::Format {
                    section: section.to_string(),
                    key: key.to_string(),
                    value: raw,
                    kind,
                    source,
                })
            }
            CoercionPolicy::Lenient => {
                if !self.key_exists(section, key) {
                    return Ok(default);
                }
                let raw = self.get_string(section, key, "");
                Ok(Scalar::parse(kind, &raw).unwrap_or(default))
            }
        }
    }

    /// Reads a value as `T`
    fn get_typed<T: FromScalar>(&self, section: &str, key: &str, default: T) -> Result<T> {
        let scalar = self.get_scalar(section, key, default.to_scalar())?;
        let stored = scalar.to_stored();

        match T::from_scalar(scalar) {
            Ok(value) => Ok(value),
            Err(_) if Self::POLICY == CoercionPolicy::Lenient => Ok(default),
            Err(source) => Err(StoreError::Format {
                section: section.to_string(),
                key: key.to_string(),
                value: stored,
                kind: T::KIND,
                source,
            }),
        }
    }

    /// Stores `value` in its canonical text form
    fn set_typed<T: FromScalar>(&mut self, section: &str, key: &str, value: &T) -> Result<()> {
        self.set_string(section, key, &value.to_scalar().to_stored())
    }
}

/// Path of the temp file used while replacing `path`
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Replaces `path` with `content` via a temp file and rename
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let temp = temp_path(path);
    fs::write(&temp, content).map_err(|e| StoreError::io(&temp, e))?;

    if let Err(e) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(StoreError::io(path, e));
    }

    Ok(())
}

/// Reads `path`, or writes `empty` there and returns `None` if it is missing
pub(crate) fn read_or_create(path: &Path, empty: &str) -> Result<Option<String>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "creating empty store file");
        write_atomic(path, empty.as_bytes())?;
        return Ok(None);
    }

    fs::read_to_string(path)
        .map(Some)
        .map_err(|e| StoreError::io(path, e))
}
