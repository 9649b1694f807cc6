//! Command handlers.
//!
//! Each handler takes the pieces of `CliContext` it needs and returns
//! `Result<(), CliError>` so `main` can pick the exit code.

pub mod grammars;
pub mod process;
pub mod serve;
