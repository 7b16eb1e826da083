//! INI storage
//!
//! Line-oriented format:
//!
//! ```text
//! ; full-line comment
//! [server]
//! host = example.org   ; trailing comment
//! port = 8080
//! ```
//!
//! Comments and layout are not kept; saving rewrites the file from the
//! parsed sections.

use std::path::{Path, PathBuf};

use super::store::{read_or_create, write_atomic, ConfigStore, Result, StoreError, TypedAccess};
use super::StoreFormat;
use crate::domain::{CoercionPolicy, SectionMap};

/// Parses INI text into sections.
///
/// Lines before the first section header, and lines that are neither a
/// header nor contain `=`, are dropped.
pub fn parse_ini(content: &str) -> SectionMap {
    let mut sections = SectionMap::new();
    let mut current: Option<String> = None;

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }

        if trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']') {
            let name = trimmed[1..trimmed.len() - 1].trim();
            sections.entry(name);
            current = Some(name.to_string());
            continue;
        }

        let Some((key, raw_value)) = trimmed.split_once('=') else {
            tracing::trace!(line = line_num + 1, "ignoring line without '='");
            continue;
        };

        let Some(section) = current.as_deref() else {
            tracing::trace!(line = line_num + 1, "ignoring entry before first section");
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        let value = match raw_value.split_once(';') {
            Some((value, _comment)) => value,
            None => raw_value,
        };

        sections.entry(section).set(key, value.trim());
    }

    sections
}

fn unrepresentable(part: &'static str, text: &str, reason: &'static str) -> StoreError {
    StoreError::Unrepresentable {
        part,
        text: text.to_string(),
        reason,
    }
}

/// Rejects text that [`parse_ini`] would read back differently.
///
/// `forbidden` lists characters the line format gives a meaning to.
fn check_text(part: &'static str, text: &str, forbidden: &[char]) -> Result<()> {
    if text.contains(['\n', '\r']) {
        return Err(unrepresentable(part, text, "line breaks are not allowed"));
    }
    if text.trim() != text {
        return Err(unrepresentable(part, text, "surrounding whitespace is trimmed on load"));
    }
    if let Some(c) = text.chars().find(|c| forbidden.contains(c)) {
        let reason = match c {
            ';' => "';' starts a comment",
            _ => "'=' separates key and value",
        };
        return Err(unrepresentable(part, text, reason));
    }
    Ok(())
}

fn check_section(section: &str) -> Result<()> {
    check_text("section", section, &[])
}

fn check_entry(key: &str, value: &str) -> Result<()> {
    if key.is_empty() {
        return Err(unrepresentable("key", key, "keys cannot be empty"));
    }
    if key.starts_with('[') {
        return Err(unrepresentable("key", key, "'[' starts a section header"));
    }
    check_text("key", key, &['=', ';'])?;
    check_text("value", value, &[';'])
}

/// Renders sections as INI text
pub fn render_ini(sections: &SectionMap) -> String {
    let mut out = String::new();

    for section in sections {
        out.push('[');
        out.push_str(section.name());
        out.push_str("]\n");

        for (key, value) in section.entries() {
            out.push_str(key);
            out.push_str(" = ");
            out.push_str(value);
            out.push('\n');
        }

        out.push('\n');
    }

    out
}

/// Store backed by an INI file.
///
/// Typed getters are strict: a present value that does not parse is an
/// error rather than a silent default.
#[derive(Debug)]
pub struct IniStore {
    path: PathBuf,
    sections: SectionMap,
}

impl IniStore {
    fn load(path: &Path) -> Result<SectionMap> {
        let sections = match read_or_create(path, "")? {
            Some(content) => parse_ini(&content),
            None => SectionMap::new(),
        };

        tracing::debug!(
            path = %path.display(),
            sections = sections.len(),
            "loaded ini store"
        );
        Ok(sections)
    }

    /// Reads a boolean, failing if the stored text is not `true`/`false`
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool> {
        self.get_typed(section, key, default)
    }

    pub fn get_int(&self, section: &str, key: &str, default: i32) -> Result<i32> {
        self.get_typed(section, key, default)
    }

    pub fn get_float(&self, section: &str, key: &str, default: f32) -> Result<f32> {
        self.get_typed(section, key, default)
    }

    pub fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64> {
        self.get_typed(section, key, default)
    }
}

impl ConfigStore for IniStore {
    fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let sections = Self::load(&path)?;
        Ok(Self { path, sections })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> StoreFormat {
        StoreFormat::Ini
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
        check_section(section)?;
        check_entry(key, value)?;

        self.sections.entry(section).set(key, value);
        Ok(())
    }

    fn create_section(&mut self, section: &str) -> Result<()> {
        if self.sections.contains(section) {
            return Err(StoreError::DuplicateSection(section.to_string()));
        }
        check_section(section)?;

        self.sections.insert_new(section);
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
        write_atomic(&self.path, render_ini(&self.sections).as_bytes())?;
        tracing::debug!(
            path = %self.path.display(),
            sections = self.sections.len(),
            "saved ini store"
        );
        Ok(())
    }
}

impl TypedAccess for IniStore {
    const POLICY: CoercionPolicy = CoercionPolicy::Strict;
}
