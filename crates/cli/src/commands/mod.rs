// Path: crates/cli/src/commands/mod.rs

pub mod edit;
pub mod read;
