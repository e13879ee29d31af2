//! Command implementations for the pathtyped CLI.
//!
//! Each command resolves its [`BuildPlan`](common::BuildPlan), runs the
//! construction and prints its result in the requested output format.

pub mod check;
pub mod common;
pub mod generate;
pub mod tree;
