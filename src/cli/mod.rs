//! # Command-Line Interface
//!
//! The `confstore` binary: inspect and edit one configuration file.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `sections` | List section names |
//! | `keys <section>` | List keys of a section |
//! | `show <section>` | Print every `key = value` of a section |
//! | `get <section> <key>` | Print one value (`--as int`, `--default 0`) |
//! | `set <section> <key> <value>` | Upsert a value and save |
//! | `exists <section> [key]` | Print `true` or `false` |
//! | `create-section`, `delete-section`, `delete-key` | Edit and save |
//!
//! ## Selecting the file
//!
//! `--file` (or `CONFSTORE_FILE`) names the file. Its type comes from the
//! extension unless `--type ini|json|xml` is given:
//! ```bash
//! confstore --file app.ini get server port --as int
//! ```
//!
//! ## Output Formats
//!
//! - `text` (default) - plain values, one per line
//! - `json` - one JSON document per command
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the command.

mod app;
mod commands;
mod logging;
mod output;

pub use app::{run, Cli, Commands, StoreType, ValueType};
pub use output::{Output, OutputFormat};
