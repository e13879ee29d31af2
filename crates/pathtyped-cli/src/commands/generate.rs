//! Generate command implementation.
//!
//! Constructs the resource folder and rewrites the declaration artifact when
//! it is missing or stale.

use super::common::BuildPlan;
use crate::cli::{ExitCode, OutputFormat};
use crate::formatters::format_output;
use anyhow::{Context, Result};
use pathtyped::ResourceManager;
use serde::Serialize;
use tracing::info;

/// Outcome of a construction, as printed by `generate` and `check`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BuildSummary {
    /// Resource folder
    pub folder: String,
    /// Declaration artifact path
    pub definition: String,
    /// Emitter used for the declaration
    pub emitter: String,
    /// `up-to-date`, `regenerated` or `stale`
    pub status: String,
    /// Tree fingerprint
    pub fingerprint: String,
    /// Number of leaves in the resolved tree
    pub leaves: usize,
}

impl BuildSummary {
    /// Summarizes a constructed manager.
    #[must_use]
    pub fn new(plan: &BuildPlan, manager: &ResourceManager) -> Self {
        Self {
            folder: plan.folder.display().to_string(),
            definition: manager.definition().path().display().to_string(),
            emitter: plan.emitter.to_string(),
            status: manager.status().to_string(),
            fingerprint: manager.fingerprint().to_string(),
            leaves: manager.shape().leaf_count(),
        }
    }
}

/// Runs the generate command.
///
/// # Errors
///
/// Returns an error if the plan is invalid or construction fails.
pub fn run(plan: &BuildPlan, output_format: OutputFormat) -> Result<ExitCode> {
    info!("Generating declaration for {}", plan.folder.display());

    let manager = plan
        .builder()?
        .build()
        .with_context(|| format!("failed to construct {}", plan.folder.display()))?;

    let summary = BuildSummary::new(plan, &manager);
    let formatted =
        format_output(&summary, output_format).context("failed to format build summary")?;
    println!("{formatted}");

    Ok(ExitCode::SUCCESS)
}
