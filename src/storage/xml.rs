//! XML storage
//!
//! One root element, one child per section, one grandchild per key with
//! the value as its text:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <configuration>
//!   <server>
//!     <host>example.org</host>
//!   </server>
//! </configuration>
//! ```
//!
//! Only string access is offered. Attributes, comments and processing
//! instructions are dropped when the file is read.

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::store::{read_or_create, write_atomic, ConfigStore, Result, StoreError};
use super::StoreFormat;
use crate::domain::{is_valid_name, Element};

/// Root tag used for newly created files
pub const ROOT_TAG: &str = "configuration";

const EMPTY_DOCUMENT: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<configuration/>\n";

/// Parses an XML document into an element tree.
///
/// Whitespace-only text inside elements that have children is discarded;
/// text of leaf elements is kept exactly.
pub fn parse_xml(content: &str) -> std::result::Result<Element, String> {
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("at byte {}: {}", reader.buffer_position(), e))?;

        match event {
            Event::Start(start) => stack.push(Element::new(tag_name(&start))),
            Event::Empty(start) => {
                close_element(&mut stack, &mut root, Element::new(tag_name(&start)))?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| "closing tag without opening tag".to_string())?;
                close_element(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    let text = text.unescape().map_err(|e| e.to_string())?;
                    current.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("element <{}> is never closed", open.name));
    }
    root.ok_or_else(|| "document has no root element".to_string())
}

fn tag_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn close_element(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    mut element: Element,
) -> std::result::Result<(), String> {
    if !element.children.is_empty() && element.text.trim().is_empty() {
        element.text.clear();
    }

    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err("document has more than one root element".to_string()),
    }
    Ok(())
}

/// Renders an element tree as an indented XML document
pub fn render_xml(root: &Element) -> std::result::Result<Vec<u8>, String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(|e| e.to_string())?;
    write_element(&mut writer, root)?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> std::result::Result<(), String> {
    let name = element.name.as_str();

    if element.children.is_empty() && element.text.is_empty() {
        return writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(|e| e.to_string());
    }

    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(|e| e.to_string())?;

    if element.children.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&element.text)))
            .map_err(|e| e.to_string())?;
    } else {
        for child in &element.children {
            write_element(writer, child)?;
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| e.to_string())
}

/// Store backed by an XML file
#[derive(Debug)]
pub struct XmlStore {
    path: PathBuf,
    root: Element,
}

impl XmlStore {
    fn load(path: &Path) -> Result<Element> {
        let root = match read_or_create(path, EMPTY_DOCUMENT)? {
            Some(content) if !content.trim().is_empty() => {
                parse_xml(&content).map_err(|message| StoreError::Parse {
                    path: path.to_path_buf(),
                    message,
                })?
            }
            _ => Element::new(ROOT_TAG),
        };

        tracing::debug!(
            path = %path.display(),
            sections = root.children.len(),
            "loaded xml store"
        );
        Ok(root)
    }

    fn check_name(name: &str) -> Result<()> {
        if is_valid_name(name) {
            Ok(())
        } else {
            Err(StoreError::InvalidName(name.to_string()))
        }
    }

    /// Returns the document root
    pub fn root(&self) -> &Element {
        &self.root
    }
}

impl ConfigStore for XmlStore {
    fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let root = Self::load(&path)?;
        Ok(Self { path, root })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> StoreFormat {
        StoreFormat::Xml
    }

    fn reload(&mut self) -> Result<()> {
        self.root = Self::load(&self.path)?;
        Ok(())
    }

    fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.root
            .child(section)
            .and_then(|s| s.child(key))
            .map_or_else(|| default.to_string(), |k| k.text.clone())
    }

    fn sections(&self) -> Vec<String> {
        self.root.child_names().map(String::from).collect()
    }

    fn keys(&self, section: &str) -> Result<Vec<String>> {
        self.root
            .child(section)
            .map(|s| s.child_names().map(String::from).collect())
            .ok_or_else(|| StoreError::section_not_found(section))
    }

    fn all_key_values(&self, section: &str) -> Result<Vec<(String, String)>> {
        self.root
            .child(section)
            .map(|s| {
                s.children
                    .iter()
                    .map(|k| (k.name.clone(), k.text.clone()))
                    .collect()
            })
            .ok_or_else(|| StoreError::section_not_found(section))
    }

    fn section_exists(&self, section: &str) -> bool {
        self.root.child(section).is_some()
    }

    fn key_exists(&self, section: &str, key: &str) -> bool {
        self.root
            .child(section)
            .is_some_and(|s| s.child(key).is_some())
    }

    fn set_string(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        // Names already in the document were accepted by the parser.
        if !self.section_exists(section) {
            Self::check_name(section)?;
        }
        if !self.key_exists(section, key) {
            Self::check_name(key)?;
        }

        let element = self.root.child_or_insert(section).child_or_insert(key);
        element.children.clear();
        element.text = value.to_string();
        Ok(())
    }

    fn create_section(&mut self, section: &str) -> Result<()> {
        if self.section_exists(section) {
            return Err(StoreError::DuplicateSection(section.to_string()));
        }
        Self::check_name(section)?;

        self.root.children.push(Element::new(section));
        Ok(())
    }

    fn delete_section(&mut self, section: &str) -> Result<()> {
        self.root
            .remove_child(section)
            .map(|_| ())
            .ok_or_else(|| StoreError::section_not_found(section))
    }

    fn delete_key(&mut self, section: &str, key: &str) -> Result<()> {
        let element = self
            .root
            .child_mut(section)
            .ok_or_else(|| StoreError::section_not_found(section))?;

        element
            .remove_child(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::key_not_found(section, key))
    }

    fn save(&self) -> Result<()> {
        let content = render_xml(&self.root).map_err(|message| StoreError::Encode {
            path: self.path.clone(),
            message,
        })?;

        write_atomic(&self.path, &content)?;
        tracing::debug!(
            path = %self.path.display(),
            sections = self.root.children.len(),
            "saved xml store"
        );
        Ok(())
    }
}
