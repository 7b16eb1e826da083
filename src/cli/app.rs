//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use super::output::{Output, OutputFormat};
use super::{commands, logging};
use crate::domain::ScalarKind;
use crate::storage::{AnyStore, StoreFormat};

#[derive(Parser)]
#[command(name = "confstore")]
#[command(author, version, about = "Read and edit INI, JSON and XML configuration files")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file to operate on
    #[arg(long, short = 'F', global = true, env = "CONFSTORE_FILE")]
    pub file: Option<PathBuf>,

    /// File type (inferred from the extension when omitted)
    #[arg(long = "type", short = 't', global = true)]
    pub store_type: Option<StoreType>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// File type selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreType {
    Ini,
    Json,
    Xml,
}

impl From<StoreType> for StoreFormat {
    fn from(value: StoreType) -> Self {
        match value {
            StoreType::Ini => StoreFormat::Ini,
            StoreType::Json => StoreFormat::Json,
            StoreType::Xml => StoreFormat::Xml,
        }
    }
}

/// Type to read a value as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ValueType {
    #[default]
    String,
    Bool,
    Int,
    Float,
    Double,
}

impl From<ValueType> for ScalarKind {
    fn from(value: ValueType) -> Self {
        match value {
            ValueType::String => ScalarKind::String,
            ValueType::Bool => ScalarKind::Bool,
            ValueType::Int => ScalarKind::Int,
            ValueType::Float => ScalarKind::Float,
            ValueType::Double => ScalarKind::Double,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List section names
    Sections,

    /// List the keys of a section
    Keys {
        section: String,
    },

    /// Show every key and value of a section
    Show {
        section: String,
    },

    /// Print a single value
    Get {
        section: String,
        key: String,

        /// Value returned when the key is missing
        #[arg(long, short)]
        default: Option<String>,

        /// Read the value as this type
        #[arg(long = "as", value_enum, default_value = "string")]
        value_type: ValueType,
    },

    /// Set a value, creating the section if needed
    Set {
        section: String,
        key: String,
        value: String,
    },

    /// Check whether a section, or a key within it, exists
    Exists {
        section: String,
        key: Option<String>,
    },

    /// Add an empty section
    CreateSection {
        section: String,
    },

    /// Remove a section and all of its keys
    DeleteSection {
        section: String,
    },

    /// Remove one key from a section
    DeleteKey {
        section: String,
        key: String,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let output = Output::new(cli.format);

    let path = cli
        .file
        .ok_or_else(|| anyhow!("No configuration file given. Use --file or set CONFSTORE_FILE."))?;

    let format = match cli.store_type {
        Some(store_type) => store_type.into(),
        None => StoreFormat::from_path(&path).ok_or_else(|| {
            anyhow!(
                "Cannot tell the file type of {}. Use --type ini|json|xml.",
                path.display()
            )
        })?,
    };

    tracing::debug!(path = %path.display(), %format, "opening store");
    let mut store = AnyStore::open_as(&path, format)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    commands::run(cli.command, &mut store, &output)
}
