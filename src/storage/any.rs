//! Format selection for callers that only know a path

use std::fmt;
use std::path::Path;

use super::store::{ConfigStore, Result, StoreError, TypedAccess};
use super::{IniStore, JsonStore, XmlStore};
use crate::domain::{FromScalar, Scalar, ScalarKind};

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreFormat {
    Ini,
    Json,
    Xml,
}

impl StoreFormat {
    /// Guesses the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ini" | "cfg" | "conf" => Some(Self::Ini),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreFormat::Ini => "ini",
            StoreFormat::Json => "json",
            StoreFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for StoreFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A store of any format, chosen at runtime
#[derive(Debug)]
pub enum AnyStore {
    Ini(IniStore),
    Json(JsonStore),
    Xml(XmlStore),
}

macro_rules! dispatch {
    ($self:expr, $store:ident => $body:expr) => {
        match $self {
            AnyStore::Ini($store) => $body,
            AnyStore::Json($store) => $body,
            AnyStore::Xml($store) => $body,
        }
    };
}

impl AnyStore {
    /// Opens `path` as the given format
    pub fn open_as(path: impl AsRef<Path>, format: StoreFormat) -> Result<Self> {
        Ok(match format {
            StoreFormat::Ini => AnyStore::Ini(IniStore::open(path)?),
            StoreFormat::Json => AnyStore::Json(JsonStore::open(path)?),
            StoreFormat::Xml => AnyStore::Xml(XmlStore::open(path)?),
        })
    }

    /// Reads a typed value using the store's own coercion policy.
    ///
    /// XML stores only hold strings, so any kind other than
    /// [`ScalarKind::String`] is read from the raw text with strict parsing.
    pub fn get_scalar(&self, section: &str, key: &str, default: Scalar) -> Result<Scalar> {
        match self {
            AnyStore::Ini(store) => store.get_scalar(section, key, default),
            AnyStore::Json(store) => store.get_scalar(section, key, default),
            AnyStore::Xml(store) => {
                let kind = default.kind();
                let raw = store.get_string(section, key, &default.to_stored());
                if kind == ScalarKind::String {
                    return Ok(Scalar::String(raw));
                }
                Scalar::parse(kind, &raw).map_err(|source| StoreError::Format {
                    section: section.to_string(),
                    key: key.to_string(),
                    value: raw,
                    kind,
                    source,
                })
            }
        }
    }
}

impl AnyStore {
    /// Reads a value as `T`, with the same range checks as the typed getters
    pub fn get_typed<T: FromScalar>(&self, section: &str, key: &str, default: T) -> Result<T> {
        match self {
            AnyStore::Ini(store) => store.get_typed(section, key, default),
            AnyStore::Json(store) => store.get_typed(section, key, default),
            AnyStore::Xml(_) => {
                let scalar = self.get_scalar(section, key, default.to_scalar())?;
                let stored = scalar.to_stored();
                T::from_scalar(scalar).map_err(|source| StoreError::Format {
                    section: section.to_string(),
                    key: key.to_string(),
                    value: stored,
                    kind: T::KIND,
                    source,
                })
            }
        }
    }
}

impl ConfigStore for AnyStore {
    fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format =
            StoreFormat::from_path(path).ok_or_else(|| StoreError::UnknownFormat(path.to_path_buf()))?;
        Self::open_as(path, format)
    }

    fn path(&self) -> &Path {
        dispatch!(self, s => s.path())
    }

    fn format(&self) -> StoreFormat {
        dispatch!(self, s => s.format())
    }

    fn reload(&mut self) -> Result<()> {
        dispatch!(self, s => s.reload())
    }

    fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        dispatch!(self, s => s.get_string(section, key, default))
    }

    fn sections(&self) -> Vec<String> {
        dispatch!(self, s => s.sections())
    }

    fn keys(&self, section: &str) -> Result<Vec<String>> {
        dispatch!(self, s => s.keys(section))
    }

    fn all_key_values(&self, section: &str) -> Result<Vec<(String, String)>> {
        dispatch!(self, s => s.all_key_values(section))
    }

    fn section_exists(&self, section: &str) -> bool {
        dispatch!(self, s => s.section_exists(section))
    }

    fn key_exists(&self, section: &str, key: &str) -> bool {
        dispatch!(self, s => s.key_exists(section, key))
    }

    fn set_string(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        dispatch!(self, s => s.set_string(section, key, value))
    }

    fn create_section(&mut self, section: &str) -> Result<()> {
        dispatch!(self, s => s.create_section(section))
    }

    fn delete_section(&mut self, section: &str) -> Result<()> {
        dispatch!(self, s => s.delete_section(section))
    }

    fn delete_key(&mut self, section: &str, key: &str) -> Result<()> {
        dispatch!(self, s => s.delete_key(section, key))
    }

    fn save(&self) -> Result<()> {
        dispatch!(self, s => s.save())
    }
}
