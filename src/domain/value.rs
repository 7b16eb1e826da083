//! Typed views over stored strings
//!
//! Every value is stored as text. Reading it back as a typed value goes
//! through a closed set of target kinds ([`ScalarKind`]); the parsed result
//! is a [`Scalar`]. How a failed conversion is reported is decided by the
//! store's [`CoercionPolicy`], not here.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Supported conversion targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    Double,
    String,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::String => "string",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed value of one of the supported kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f32),
    Double(f64),
    String(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoercionError {
    #[error("cannot read '{value}' as {kind}")]
    Format { value: String, kind: ScalarKind },

    #[error("expected a {expected} value, found {found}")]
    Mismatch {
        expected: ScalarKind,
        found: ScalarKind,
    },
}

impl Scalar {
    /// Returns the kind of this value
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Double(_) => ScalarKind::Double,
            Scalar::String(_) => ScalarKind::String,
        }
    }

    /// Parses stored text as `kind`.
    ///
    /// Surrounding whitespace is ignored for non-string kinds. Booleans
    /// accept `true`/`false` in any letter case.
    pub fn parse(kind: ScalarKind, raw: &str) -> Result<Self, CoercionError> {
        let trimmed = raw.trim();
        let format_error = || CoercionError::Format {
            value: raw.to_string(),
            kind,
        };

        match kind {
            ScalarKind::Bool => {
                if trimmed.eq_ignore_ascii_case("true") {
                    Ok(Scalar::Bool(true))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(Scalar::Bool(false))
                } else {
                    Err(format_error())
                }
            }
            ScalarKind::Int => trimmed
                .parse()
                .map(Scalar::Int)
                .map_err(|_| format_error()),
            ScalarKind::Float => trimmed
                .parse()
                .map(Scalar::Float)
                .map_err(|_| format_error()),
            ScalarKind::Double => trimmed
                .parse()
                .map(Scalar::Double)
                .map_err(|_| format_error()),
            ScalarKind::String => Ok(Scalar::String(raw.to_string())),
        }
    }

    /// Returns the text form written to the store
    pub fn to_stored(&self) -> String {
        match self {
            Scalar::Bool(v) => v.to_string(),
            Scalar::Int(v) => v.to_string(),
            Scalar::Float(v) => v.to_string(),
            Scalar::Double(v) => v.to_string(),
            Scalar::String(v) => v.clone(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_stored())
    }
}

/// How a store reports a present value that cannot be converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionPolicy {
    /// Conversion failures are returned as errors
    Strict,
    /// Conversion failures yield the caller's default
    Lenient,
}

/// Rust types that map onto one [`ScalarKind`]
pub trait FromScalar: Sized + Clone {
    const KIND: ScalarKind;

    fn from_scalar(value: Scalar) -> Result<Self, CoercionError>;

    fn to_scalar(&self) -> Scalar;
}

/// Parses stored text straight into `T`
pub fn coerce<T: FromScalar>(raw: &str) -> Result<T, CoercionError> {
    T::from_scalar(Scalar::parse(T::KIND, raw)?)
}

fn mismatch(expected: ScalarKind, found: &Scalar) -> CoercionError {
    CoercionError::Mismatch {
        expected,
        found: found.kind(),
    }
}

impl FromScalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn from_scalar(value: Scalar) -> Result<Self, CoercionError> {
        match value {
            Scalar::Bool(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Bool(*self)
    }
}

impl FromScalar for i64 {
    const KIND: ScalarKind = ScalarKind::Int;

    fn from_scalar(value: Scalar) -> Result<Self, CoercionError> {
        match value {
            Scalar::Int(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Int(*self)
    }
}

impl FromScalar for i32 {
    const KIND: ScalarKind = ScalarKind::Int;

    fn from_scalar(value: Scalar) -> Result<Self, CoercionError> {
        match value {
            // Out-of-range text is a format problem, not a kind mismatch
            Scalar::Int(v) => i32::try_from(v).map_err(|_| CoercionError::Format {
                value: v.to_string(),
                kind: Self::KIND,
            }),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Int(i64::from(*self))
    }
}

impl FromScalar for f32 {
    const KIND: ScalarKind = ScalarKind::Float;

    fn from_scalar(value: Scalar) -> Result<Self, CoercionError> {
        match value {
            Scalar::Float(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Float(*self)
    }
}

impl FromScalar for f64 {
    const KIND: ScalarKind = ScalarKind::Double;

    fn from_scalar(value: Scalar) -> Result<Self, CoercionError> {
        match value {
            Scalar::Double(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Double(*self)
    }
}

impl FromScalar for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn from_scalar(value: Scalar) -> Result<Self, CoercionError> {
        match value {
            Scalar::String(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::String(self.clone())
    }
}
