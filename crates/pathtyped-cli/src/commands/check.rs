//! Check command implementation.
//!
//! Runs the full construction without writing anything and reports whether
//! the declaration artifact is current. Useful as a CI gate.

use super::common::BuildPlan;
use super::generate::BuildSummary;
use crate::cli::{ExitCode, OutputFormat};
use crate::formatters::format_output;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Runs the check command.
///
/// Returns [`ExitCode::STALE`] when the artifact is missing or its
/// fingerprint differs.
///
/// # Errors
///
/// Returns an error if the plan is invalid or construction fails.
pub fn run(plan: &BuildPlan, output_format: OutputFormat) -> Result<ExitCode> {
    info!("Checking declaration for {}", plan.folder.display());

    let manager = plan
        .builder()?
        .check_only(true)
        .build()
        .with_context(|| format!("failed to construct {}", plan.folder.display()))?;

    let summary = BuildSummary::new(plan, &manager);
    let formatted =
        format_output(&summary, output_format).context("failed to format build summary")?;
    println!("{formatted}");

    if manager.status().is_current() {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(
            "{} is stale, run `pathtyped generate` to update it",
            plan.definition.display()
        );
        Ok(ExitCode::STALE)
    }
}
