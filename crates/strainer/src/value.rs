//! Field kinds and runtime values.
//!
//! [`FieldKind`] describes the declared type of a record field, [`Value`]
//! is what an accessor reads out of a record, and [`Literal`] is a
//! criterion's raw text coerced to the field's kind.

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};

/// Declared type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Text,
    /// Any other type. Present in the schema but not searchable.
    Unsupported,
}

/// Grouping of field kinds that decides which operators are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindClass {
    Integer,
    Float,
    Text,
    Unsupported,
}

impl KindClass {
    pub fn as_str(self) -> &'static str {
        match self {
            KindClass::Integer => "integer",
            KindClass::Float => "float",
            KindClass::Text => "text",
            KindClass::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for KindClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FieldKind {
    /// Returns the type class of this kind.
    pub fn class(self) -> KindClass {
        match self {
            FieldKind::I8
            | FieldKind::I16
            | FieldKind::I32
            | FieldKind::I64
            | FieldKind::Isize
            | FieldKind::U8
            | FieldKind::U16
            | FieldKind::U32
            | FieldKind::U64
            | FieldKind::Usize => KindClass::Integer,
            FieldKind::F32 | FieldKind::F64 => KindClass::Float,
            FieldKind::Text => KindClass::Text,
            FieldKind::Unsupported => KindClass::Unsupported,
        }
    }

    /// Returns the name used in diagnostics and in `#[filter(kind = "...")]`.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::I8 => "i8",
            FieldKind::I16 => "i16",
            FieldKind::I32 => "i32",
            FieldKind::I64 => "i64",
            FieldKind::Isize => "isize",
            FieldKind::U8 => "u8",
            FieldKind::U16 => "u16",
            FieldKind::U32 => "u32",
            FieldKind::U64 => "u64",
            FieldKind::Usize => "usize",
            FieldKind::F32 => "f32",
            FieldKind::F64 => "f64",
            FieldKind::Text => "string",
            FieldKind::Unsupported => "unsupported",
        }
    }

    /// Coerces raw criterion text into a literal of this kind.
    ///
    /// Integers are parsed at the declared width, so `"300"` is rejected
    /// for a `u8` field instead of wrapping. Text passes through unchanged.
    pub fn coerce(self, raw: &str) -> Result<Literal, CoerceError> {
        let lit = match self {
            FieldKind::I8 => Literal::Signed(raw.parse::<i8>()?.into()),
            FieldKind::I16 => Literal::Signed(raw.parse::<i16>()?.into()),
            FieldKind::I32 => Literal::Signed(raw.parse::<i32>()?.into()),
            FieldKind::I64 => Literal::Signed(raw.parse::<i64>()?),
            FieldKind::Isize => Literal::Signed(raw.parse::<isize>()? as i64),
            FieldKind::U8 => Literal::Unsigned(raw.parse::<u8>()?.into()),
            FieldKind::U16 => Literal::Unsigned(raw.parse::<u16>()?.into()),
            FieldKind::U32 => Literal::Unsigned(raw.parse::<u32>()?.into()),
            FieldKind::U64 => Literal::Unsigned(raw.parse::<u64>()?),
            FieldKind::Usize => Literal::Unsigned(raw.parse::<usize>()? as u64),
            FieldKind::F32 => Literal::Float(raw.parse::<f32>()?.into()),
            FieldKind::F64 => Literal::Float(raw.parse::<f64>()?),
            FieldKind::Text => Literal::Text(raw.to_string()),
            FieldKind::Unsupported => return Err(CoerceError::Unsupported),
        };
        Ok(lit)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a raw value could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoerceError {
    #[error("{0}")]
    Int(#[from] ParseIntError),
    #[error("{0}")]
    Float(#[from] ParseFloatError),
    #[error("field kind is not searchable")]
    Unsupported,
}

/// A field value read from a record, borrowed where possible.
///
/// Integers are widened to 64 bits by the accessor; the comparator only
/// ever sees two values of the same field, so widening preserves order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Text(&'a str),
}

impl<'a> Value<'a> {
    /// Returns the name of this value's variant, for mismatch diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Signed(_) => "signed",
            Value::Unsigned(_) => "unsigned",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }

    /// Extracts the text, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A criterion value coerced to its field's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
}
