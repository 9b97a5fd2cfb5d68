// Path: crates/cli/src/main.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # keyfmt CLI
//!
//! Reads and edits key-value files from a shell.

use anyhow::Result;
use clap::{Parser, Subcommand};
use keyfmt_format::{ErrorCode, FormatError};
use keyfmt_telemetry::{init_tracing, LogFormat};
use std::path::PathBuf;

mod commands;
mod util;

use commands::*;

#[derive(Parser, Debug)]
#[clap(
    name = "keyfmt",
    version,
    about = "Inspect and edit line-oriented key-value files.",
    long_about = "keyfmt reads, updates, appends and deletes typed records in key-value files without rewriting the whole file."
)]
struct Cli {
    /// TOML file with codec settings (read_chunk_size, strict).
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Stop key lookups at the first non-matching key.
    #[clap(long, global = true)]
    strict: bool,

    /// Override the scanner's read chunk size.
    #[clap(long, global = true)]
    chunk_size: Option<usize>,

    /// Emit logs as JSON objects.
    #[clap(long, global = true)]
    json_logs: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    // --- Reading ---
    /// Print the values of a key.
    Get(read::GetArgs),

    /// Print the number of values stored under a key.
    Count(read::KeyArgs),

    /// List every key in the file.
    Keys(read::FileArgs),

    /// Print the file type and version.
    Header(read::FileArgs),

    // --- Editing ---
    /// Create a new file holding only a header.
    Init(edit::InitArgs),

    /// Update a key in place, or append it if absent. Creates the file if needed.
    Set(edit::SetArgs),

    /// Remove a key and its values.
    Delete(edit::KeyArgs),

    /// Append a comment line.
    Comment(edit::CommentArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(log_format)?;

    let config = util::load_config(cli.config.as_deref(), cli.strict, cli.chunk_size)?;

    let result = match cli.command {
        Commands::Get(args) => read::get(args, &config),
        Commands::Count(args) => read::count(args, &config),
        Commands::Keys(args) => read::keys(args, &config),
        Commands::Header(args) => read::header(args, &config),
        Commands::Init(args) => edit::init(args, &config),
        Commands::Set(args) => edit::set(args, &config),
        Commands::Delete(args) => edit::delete(args, &config),
        Commands::Comment(args) => edit::comment(args, &config),
    };

    if let Err(e) = &result {
        if let Some(format_err) = e.downcast_ref::<FormatError>() {
            tracing::error!(code = format_err.code(), "{}", format_err);
        }
    }
    result
}
