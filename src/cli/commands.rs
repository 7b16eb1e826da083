//! Store commands

use anyhow::{Context, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::app::Commands;
use super::output::Output;
use crate::domain::{FromScalar, Scalar, ScalarKind};
use crate::storage::{AnyStore, ConfigStore};

/// Key/value pairs serialized as an object in file order
struct Entries<'a>(&'a [(String, String)]);

impl Serialize for Entries<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

pub fn run(cmd: Commands, store: &mut AnyStore, output: &Output) -> Result<()> {
    match cmd {
        Commands::Sections => list(output, &store.sections()),
        Commands::Keys { section } => list(output, &store.keys(&section)?),
        Commands::Show { section } => show(store, output, &section),
        Commands::Get {
            section,
            key,
            default,
            value_type,
        } => get(store, output, &section, &key, default.as_deref(), value_type.into()),
        Commands::Set {
            section,
            key,
            value,
        } => {
            store.set_string(&section, &key, &value)?;
            save(store)?;
            output.success(&format!("Set {} in [{}]", key, section));
            Ok(())
        }
        Commands::Exists { section, key } => {
            let exists = match &key {
                Some(key) => store.key_exists(&section, key),
                None => store.section_exists(&section),
            };
            output.data(&serde_json::json!({ "exists": exists }));
            output.line(&exists.to_string());
            Ok(())
        }
        Commands::CreateSection { section } => {
            store.create_section(&section)?;
            save(store)?;
            output.success(&format!("Created section [{}]", section));
            Ok(())
        }
        Commands::DeleteSection { section } => {
            store.delete_section(&section)?;
            save(store)?;
            output.success(&format!("Deleted section [{}]", section));
            Ok(())
        }
        Commands::DeleteKey { section, key } => {
            store.delete_key(&section, &key)?;
            save(store)?;
            output.success(&format!("Deleted {} from [{}]", key, section));
            Ok(())
        }
    }
}

fn save(store: &AnyStore) -> Result<()> {
    store
        .save()
        .with_context(|| format!("Failed to save {}", store.path().display()))
}

fn list(output: &Output, names: &[String]) -> Result<()> {
    output.data(&names);
    for name in names {
        output.line(name);
    }
    Ok(())
}

fn show(store: &AnyStore, output: &Output, section: &str) -> Result<()> {
    let entries = store.all_key_values(section)?;

    output.data(&Entries(&entries));
    for (key, value) in &entries {
        output.line(&format!("{} = {}", key, value));
    }
    Ok(())
}

fn get(
    store: &AnyStore,
    output: &Output,
    section: &str,
    key: &str,
    default: Option<&str>,
    kind: ScalarKind,
) -> Result<()> {
    let default = Scalar::parse(kind, default.unwrap_or(zero_text(kind)))
        .with_context(|| format!("Invalid --default for type {}", kind))?;

    // Integers share the library's 32-bit range
    let value = match kind {
        ScalarKind::Int => {
            let default = i32::from_scalar(default)
                .with_context(|| format!("Invalid --default for type {}", kind))?;
            store.get_typed(section, key, default)?.to_scalar()
        }
        _ => store.get_scalar(section, key, default)?,
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "section": section,
            "key": key,
            "value": value,
        }));
    } else {
        output.line(&value.to_stored());
    }
    Ok(())
}

/// Default used when `--default` is not given
fn zero_text(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Bool => "false",
        ScalarKind::Int => "0",
        ScalarKind::Float | ScalarKind::Double => "0",
        ScalarKind::String => "",
    }
}
