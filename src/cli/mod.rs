//! CLI argument handling.

pub mod args;

pub use args::{parse_args, CliCommand, USAGE};
