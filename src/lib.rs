//! confstore - sectioned configuration files behind one interface
//!
//! A store holds a two-level mapping, section name to key to string value,
//! loaded from an INI, JSON or XML file and written back on request.
//! Typed reads (bool, int, float, double) follow a per-format policy: INI
//! reports values that do not parse, JSON quietly returns the default.
//!
//! ```no_run
//! use confstore::{ConfigStore, IniStore};
//!
//! let mut store = IniStore::open("app.ini")?;
//! store.set_string("server", "port", "8080")?;
//! let port = store.get_int("server", "port", 80)?;
//! assert_eq!(port, 8080);
//! store.save()?;
//! # Ok::<(), confstore::StoreError>(())
//! ```

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{CoercionPolicy, FromScalar, Grid, Scalar, ScalarKind};
pub use storage::{
    AnyStore, ConfigStore, IniStore, JsonStore, StoreError, StoreFormat, TypedAccess, XmlStore,
};
