// Path: crates/cli/src/commands/read.rs

use crate::util::{self, TypeArg};
use anyhow::{bail, Result};
use clap::Parser;
use keyfmt_format::{FormatConfig, KeyFile, ValueType};
use keyfmt_stream::Stream;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct FileArgs {
    /// Path to the key-value file.
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct KeyArgs {
    /// Path to the key-value file.
    pub file: PathBuf,
    /// Key to look up.
    pub key: String,
}

#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Path to the key-value file.
    pub file: PathBuf,
    /// Key to look up.
    pub key: String,
    /// How to decode the values.
    #[clap(long = "type", value_enum, default_value = "text")]
    pub value_type: TypeArg,
    /// Number of values to read. Defaults to every value on the line.
    #[clap(long)]
    pub count: Option<usize>,
}

pub fn get(args: GetArgs, config: &FormatConfig) -> Result<()> {
    let mut file = util::open(&args.file, config)?;
    println!("{}", get_values(&mut file, &args.key, args.value_type, args.count)?);
    Ok(())
}

/// Reads a key and renders its values the way they are stored.
pub fn get_values<S: Stream>(
    file: &mut KeyFile<S>,
    key: &str,
    type_arg: TypeArg,
    count: Option<usize>,
) -> Result<String> {
    let value_type = type_arg.value_type()?;
    file.rewind()?;
    if value_type == ValueType::Text {
        if count.is_some() {
            bail!("--count does not apply to text values");
        }
        return Ok(file.read_string(key)?);
    }

    let count = match count {
        Some(count) => count,
        None => file.value_count(key)?,
    };
    let codec = file.codec();
    let strict = file.strict();
    let values = codec.read_values(file.stream_mut(), key, value_type, count, strict)?;
    let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
    Ok(rendered.join(" "))
}

pub fn count(args: KeyArgs, config: &FormatConfig) -> Result<()> {
    let mut file = util::open(&args.file, config)?;
    println!("{}", file.value_count(&args.key)?);
    Ok(())
}

pub fn keys(args: FileArgs, config: &FormatConfig) -> Result<()> {
    let mut file = util::open(&args.file, config)?;
    for key in file.keys()? {
        println!("{}", key);
    }
    Ok(())
}

pub fn header(args: FileArgs, config: &FormatConfig) -> Result<()> {
    let mut file = util::open(&args.file, config)?;
    let (filetype, version) = file.read_header()?;
    println!("Filetype: {}", filetype);
    println!("Version: {}", version);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyfmt_format::FormatError;
    use keyfmt_stream::MemoryStream;

    fn sample() -> KeyFile<MemoryStream> {
        let data = b"Filetype: Remote\nVersion: 1\nname: Power\ndata: 0A 1B 2C\ncode: -5\n";
        KeyFile::new(MemoryStream::from_bytes(data.to_vec()))
    }

    #[test]
    fn test_get_values_renders_each_type() {
        let mut file = sample();
        assert_eq!(get_values(&mut file, "name", TypeArg::Text, None).unwrap(), "Power");
        assert_eq!(get_values(&mut file, "data", TypeArg::Hex, None).unwrap(), "0A 1B 2C");
        assert_eq!(get_values(&mut file, "code", TypeArg::Int32, Some(1)).unwrap(), "-5");
    }

    #[test]
    fn test_get_values_errors() {
        let mut file = sample();
        assert!(get_values(&mut file, "name", TypeArg::Text, Some(1)).is_err());

        let err = get_values(&mut file, "data", TypeArg::Hex, Some(2)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FormatError>(),
            Some(FormatError::ArityMismatch { .. })
        ));

        let err = get_values(&mut file, "missing", TypeArg::Hex, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FormatError>(),
            Some(FormatError::KeyNotFound(_))
        ));
    }
}
