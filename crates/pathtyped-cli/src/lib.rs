//! pathtyped CLI library.
//!
//! Exposes the command implementations, project configuration and output
//! formatters behind the `pathtyped` binary so they can be tested directly.

pub mod cli;
pub mod commands;
pub mod config;
pub mod formatters;

pub use cli::{ExitCode, OutputFormat};
pub use commands::common::{BuildArgs, BuildPlan};
pub use config::ProjectConfig;
