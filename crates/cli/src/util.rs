// Path: crates/cli/src/util.rs

use anyhow::{anyhow, bail, Context, Result};
use keyfmt_format::{FormatConfig, KeyFile, Scalar, ValueType, Values};
use keyfmt_stream::FileStream;
use std::fs;
use std::path::Path;

/// Reads the codec settings, then applies command-line overrides.
pub fn load_config(path: Option<&Path>, strict: bool, chunk_size: Option<usize>) -> Result<FormatConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str::<FormatConfig>(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => FormatConfig::default(),
    };
    if strict {
        config.strict = true;
    }
    if let Some(size) = chunk_size {
        config.read_chunk_size = size;
    }
    Ok(config)
}

pub fn open(path: &Path, config: &FormatConfig) -> Result<KeyFile<FileStream>> {
    let stream = FileStream::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(KeyFile::with_config(stream, config))
}

/// Like [`open`], creating an empty file when none exists.
pub fn open_or_create(path: &Path, config: &FormatConfig) -> Result<KeyFile<FileStream>> {
    let stream = FileStream::open_or_create(path)
        .with_context(|| format!("opening {}", path.display()))?;
    Ok(KeyFile::with_config(stream, config))
}

/// Command-line name of a value type.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeArg {
    Text,
    Hex,
    Float,
    Int32,
    Uint32,
    Bool,
}

impl TypeArg {
    pub fn value_type(self) -> Result<ValueType> {
        Ok(match self {
            Self::Text => ValueType::Text,
            Self::Hex => ValueType::HexByte,
            Self::Float => float_type()?,
            Self::Int32 => ValueType::Int32,
            Self::Uint32 => ValueType::UInt32,
            Self::Bool => ValueType::Bool,
        })
    }
}

#[cfg(feature = "float")]
fn float_type() -> Result<ValueType> {
    Ok(ValueType::Float32)
}

#[cfg(not(feature = "float"))]
fn float_type() -> Result<ValueType> {
    bail!("float values are not supported by this build")
}

/// Values parsed from command-line arguments, owned so a [`Values`] can borrow them.
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedValues {
    Text(String),
    Hex(Vec<u8>),
    #[cfg(feature = "float")]
    Float(Vec<f32>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Bool(Vec<bool>),
}

impl OwnedValues {
    pub fn parse(type_arg: TypeArg, args: &[String]) -> Result<Self> {
        if args.is_empty() {
            bail!("at least one value is required");
        }
        Ok(match type_arg.value_type()? {
            ValueType::Text => Self::Text(args.join(" ")),
            ValueType::HexByte => Self::Hex(parse_all(args)?),
            #[cfg(feature = "float")]
            ValueType::Float32 => Self::Float(parse_all(args)?),
            ValueType::Int32 => Self::Int32(parse_all(args)?),
            ValueType::UInt32 => Self::UInt32(parse_all(args)?),
            ValueType::Bool => {
                for arg in args {
                    if !arg.eq_ignore_ascii_case("true") && !arg.eq_ignore_ascii_case("false") {
                        bail!("{:?} is not a boolean (expected true or false)", arg);
                    }
                }
                Self::Bool(parse_all(args)?)
            }
            ValueType::Ignore => bail!("ignore is not a writable type"),
        })
    }

    pub fn as_values(&self) -> Values<'_> {
        match self {
            Self::Text(text) => Values::Text(text),
            Self::Hex(v) => Values::HexBytes(v),
            #[cfg(feature = "float")]
            Self::Float(v) => Values::Float32(v),
            Self::Int32(v) => Values::Int32(v),
            Self::UInt32(v) => Values::UInt32(v),
            Self::Bool(v) => Values::Bool(v),
        }
    }
}

fn parse_all<T: Scalar>(args: &[String]) -> Result<Vec<T>> {
    args.iter()
        .map(|arg| {
            if T::VALUE_TYPE == ValueType::HexByte && arg.len() != 2 {
                bail!("{:?} is not a single hex byte", arg);
            }
            let value = T::VALUE_TYPE.parse_token(arg.as_bytes())?;
            T::from_value(value).ok_or_else(|| anyhow!("{:?} does not decode as {}", arg, T::VALUE_TYPE))
        })
        .collect()
}
