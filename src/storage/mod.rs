//! # Storage Layer
//!
//! File-backed configuration stores, one per format, all exposing the same
//! [`ConfigStore`] operations.
//!
//! ## Formats
//!
//! | Store | File | In memory | Typed reads |
//! |-------|------|-----------|-------------|
//! | [`IniStore`] | `[section]` + `key = value` lines | [`SectionMap`] | strict |
//! | [`JsonStore`] | object of objects of strings | [`SectionMap`] | lenient, plus arrays |
//! | [`XmlStore`] | root / section / key elements | [`Element`] tree | strings only |
//!
//! ## Lifecycle
//!
//! - Opening a missing path writes an empty document immediately
//! - Changes stay in memory until [`ConfigStore::save`]
//! - Saves are full rewrites through a temp file + rename
//! - No locking: one owner per file
//!
//! ## Errors
//!
//! All stores report [`StoreError::NotFound`] and
//! [`StoreError::DuplicateSection`] the same way. Only strict stores
//! (INI) return [`StoreError::Format`] from typed reads; JSON falls back to
//! the caller's default.
//!
//! [`SectionMap`]: crate::domain::SectionMap
//! [`Element`]: crate::domain::Element

mod any;
mod ini;
mod json;
mod store;
mod xml;

pub use any::{AnyStore, StoreFormat};
pub use ini::{parse_ini, render_ini, IniStore};
pub use json::JsonStore;
pub use store::{ConfigStore, Result, StoreError, TypedAccess};
pub use xml::{parse_xml, render_xml, XmlStore, ROOT_TAG};
