//! Data model for confstore
//!
//! Holds the in-memory shapes the stores work with, free of any file I/O.

mod element;
mod grid;
mod section;
mod value;

pub use element::{is_valid_name, Element};
pub use grid::Grid;
pub use section::{Section, SectionMap};
pub use value::{coerce, CoercionError, CoercionPolicy, FromScalar, Scalar, ScalarKind};
