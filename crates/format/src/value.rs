// Path: crates/format/src/value.rs

//! Value types and their token encodings.
//!
//! The set of types is closed. Each variant has exactly one parse rule
//! ([`ValueType::parse_token`]) and one format rule ([`Values::format_into`]).

use crate::error::{FormatError, Result};
use std::fmt;

/// The type tag of a record's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Write nothing. Used by composite operations that skip a field.
    Ignore,
    /// The whole remainder of the line, spaces included.
    Text,
    /// One byte per token, written as two uppercase hex digits.
    HexByte,
    /// Decimal floating point.
    #[cfg(feature = "float")]
    Float32,
    /// Signed decimal integer.
    Int32,
    /// Unsigned decimal integer.
    UInt32,
    /// `true` or `false`.
    Bool,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ignore => "ignore",
            Self::Text => "text",
            Self::HexByte => "hex",
            #[cfg(feature = "float")]
            Self::Float32 => "float",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// A single decoded scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    HexByte(u8),
    #[cfg(feature = "float")]
    Float32(f32),
    Int32(i32),
    UInt32(u32),
    Bool(bool),
}

impl fmt::Display for Value {
    /// Writes the value exactly as it is encoded in a record.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HexByte(b) => write!(f, "{:02X}", b),
            #[cfg(feature = "float")]
            Self::Float32(x) => write!(f, "{:.6}", x),
            Self::Int32(x) => write!(f, "{}", x),
            Self::UInt32(x) => write!(f, "{}", x),
            Self::Bool(x) => write!(f, "{}", x),
        }
    }
}

impl ValueType {
    /// Decodes one value token.
    ///
    /// `HexByte` reads the first two characters and ignores the rest. Numeric
    /// types must consume the whole token. `Bool` never fails: anything other
    /// than a case-insensitive `true` is `false`.
    pub fn parse_token(self, token: &[u8]) -> Result<Value> {
        let parse_err = || FormatError::Parse {
            value_type: self,
            token: String::from_utf8_lossy(token).into_owned(),
        };

        match self {
            Self::HexByte => {
                let digits = token.get(..2).ok_or_else(parse_err)?;
                let mut byte = [0u8; 1];
                hex::decode_to_slice(digits, &mut byte).map_err(|_| parse_err())?;
                let [value] = byte;
                Ok(Value::HexByte(value))
            }
            #[cfg(feature = "float")]
            Self::Float32 => parse_str(token)
                .and_then(|s| s.parse::<f32>().ok())
                .map(Value::Float32)
                .ok_or_else(parse_err),
            Self::Int32 => parse_str(token)
                .and_then(|s| s.parse::<i32>().ok())
                .map(Value::Int32)
                .ok_or_else(parse_err),
            Self::UInt32 => parse_str(token)
                .and_then(|s| s.parse::<u32>().ok())
                .map(Value::UInt32)
                .ok_or_else(parse_err),
            Self::Bool => Ok(Value::Bool(token.eq_ignore_ascii_case(b"true"))),
            Self::Ignore | Self::Text => Err(FormatError::UnsupportedType(self)),
        }
    }
}

fn parse_str(token: &[u8]) -> Option<&str> {
    std::str::from_utf8(token).ok()
}

/// The values of one record, tagged with their type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Values<'a> {
    Ignore,
    Text(&'a str),
    HexBytes(&'a [u8]),
    #[cfg(feature = "float")]
    Float32(&'a [f32]),
    Int32(&'a [i32]),
    UInt32(&'a [u32]),
    Bool(&'a [bool]),
}

impl Values<'_> {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Ignore => ValueType::Ignore,
            Self::Text(_) => ValueType::Text,
            Self::HexBytes(_) => ValueType::HexByte,
            #[cfg(feature = "float")]
            Self::Float32(_) => ValueType::Float32,
            Self::Int32(_) => ValueType::Int32,
            Self::UInt32(_) => ValueType::UInt32,
            Self::Bool(_) => ValueType::Bool,
        }
    }

    /// Number of tokens this request writes. Text always counts as one.
    pub fn count(&self) -> usize {
        match self {
            Self::Ignore => 0,
            Self::Text(_) => 1,
            Self::HexBytes(v) => v.len(),
            #[cfg(feature = "float")]
            Self::Float32(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::Bool(v) => v.len(),
        }
    }

    /// Appends the encoded values, separated by single spaces.
    ///
    /// Text is copied verbatim. Floats use six fractional digits.
    pub fn format_into(&self, out: &mut String) {
        match self {
            Self::Ignore => {}
            Self::Text(text) => out.push_str(text),
            Self::HexBytes(v) => join(out, v, |b, out| out.push_str(&hex::encode_upper([*b]))),
            #[cfg(feature = "float")]
            Self::Float32(v) => join(out, v, |x, out| out.push_str(&format!("{:.6}", x))),
            Self::Int32(v) => join(out, v, |x, out| out.push_str(&x.to_string())),
            Self::UInt32(v) => join(out, v, |x, out| out.push_str(&x.to_string())),
            Self::Bool(v) => join(out, v, |x, out| {
                out.push_str(if *x { "true" } else { "false" })
            }),
        }
    }
}

fn join<T>(out: &mut String, items: &[T], mut fmt_one: impl FnMut(&T, &mut String)) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        fmt_one(item, out);
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Rust types that map onto exactly one scalar [`ValueType`].
pub trait Scalar: Copy + sealed::Sealed {
    /// The tag values of this type are read and written with.
    const VALUE_TYPE: ValueType;

    /// Extracts `Self` from a decoded value of the matching variant.
    fn from_value(value: Value) -> Option<Self>;

    /// Wraps a slice as a write payload.
    fn as_values(values: &[Self]) -> Values<'_>;
}

macro_rules! impl_scalar {
    ($ty:ty, $tag:ident, $values:ident) => {
        impl sealed::Sealed for $ty {}

        impl Scalar for $ty {
            const VALUE_TYPE: ValueType = ValueType::$tag;

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$tag(v) => Some(v),
                    _ => None,
                }
            }

            fn as_values(values: &[Self]) -> Values<'_> {
                Values::$values(values)
            }
        }
    };
}

impl_scalar!(u8, HexByte, HexBytes);
#[cfg(feature = "float")]
impl_scalar!(f32, Float32, Float32);
impl_scalar!(i32, Int32, Int32);
impl_scalar!(u32, UInt32, UInt32);
impl_scalar!(bool, Bool, Bool);
