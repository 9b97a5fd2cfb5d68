// Path: crates/cli/src/commands/edit.rs

use crate::util::{self, OwnedValues, TypeArg};
use anyhow::{bail, Context, Result};
use clap::Parser;
use keyfmt_format::{FormatConfig, KeyFile};
use keyfmt_stream::{FileStream, Stream};
use std::path::PathBuf;

pub use super::read::KeyArgs;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Path of the file to create.
    pub file: PathBuf,
    /// Value of the `Filetype` record.
    #[clap(long)]
    pub filetype: String,
    /// Value of the `Version` record.
    #[clap(long, default_value_t = 1)]
    pub version: u32,
    /// Replace the file if it already exists.
    #[clap(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct SetArgs {
    /// Path to the key-value file.
    pub file: PathBuf,
    /// Key to update or append. A missing file is created.
    pub key: String,
    /// Values to store. Text values are joined with single spaces.
    #[clap(required = true)]
    pub values: Vec<String>,
    /// How to encode the values.
    #[clap(long = "type", value_enum, default_value = "text")]
    pub value_type: TypeArg,
}

#[derive(Parser, Debug)]
pub struct CommentArgs {
    /// Path to the key-value file.
    pub file: PathBuf,
    /// Comment text, without the leading `#`.
    pub text: String,
}

pub fn init(args: InitArgs, config: &FormatConfig) -> Result<()> {
    if args.file.exists() && !args.force {
        bail!(
            "{} already exists (use --force to replace it)",
            args.file.display()
        );
    }
    let stream = FileStream::create(&args.file)
        .with_context(|| format!("creating {}", args.file.display()))?;
    let mut file = KeyFile::with_config(stream, config);
    file.write_header(&args.filetype, args.version)?;
    file.into_inner().sync()?;
    tracing::info!(target: "cli", path = %args.file.display(), "Created file");
    Ok(())
}

pub fn set(args: SetArgs, config: &FormatConfig) -> Result<()> {
    let values = OwnedValues::parse(args.value_type, &args.values)?;
    let mut file = util::open_or_create(&args.file, config)?;
    set_values(&mut file, &args.key, &values)?;
    file.into_inner().sync()?;
    Ok(())
}

/// Updates `key` in place, or appends it when the file does not have it.
pub fn set_values<S: Stream>(file: &mut KeyFile<S>, key: &str, values: &OwnedValues) -> Result<()> {
    file.rewind()?;
    file.insert_or_update_values(key, values.as_values())?;
    Ok(())
}

pub fn delete(args: KeyArgs, config: &FormatConfig) -> Result<()> {
    let mut file = util::open(&args.file, config)?;
    file.rewind()?;
    file.delete_key(&args.key)?;
    file.into_inner().sync()?;
    Ok(())
}

pub fn comment(args: CommentArgs, config: &FormatConfig) -> Result<()> {
    let mut file = util::open(&args.file, config)?;
    append_comment(&mut file, &args.text)?;
    file.into_inner().sync()?;
    Ok(())
}

pub fn append_comment<S: Stream>(file: &mut KeyFile<S>, text: &str) -> Result<()> {
    file.seek_to_append()?;
    file.write_comment(text)?;
    Ok(())
}
