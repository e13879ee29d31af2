//! Tree command implementation.
//!
//! Prints the resolved resource tree. Nothing is written to disk.

use super::common::BuildPlan;
use crate::cli::{ExitCode, OutputFormat};
use crate::formatters::format_output;
use anyhow::{Context, Result};
use pathtyped::Resource;
use tracing::info;

/// Resolves the resource tree of `plan` without touching the artifact.
///
/// # Errors
///
/// Returns an error if the plan is invalid or construction fails.
pub fn resolve(plan: &BuildPlan) -> Result<Resource> {
    let manager = plan
        .builder()?
        .check_only(true)
        .build()
        .with_context(|| format!("failed to construct {}", plan.folder.display()))?;
    Ok(manager.root().clone())
}

/// Runs the tree command.
///
/// # Errors
///
/// Returns an error if construction or formatting fails.
pub fn run(plan: &BuildPlan, output_format: OutputFormat) -> Result<ExitCode> {
    info!("Resolving tree for {}", plan.folder.display());

    let root = resolve(plan)?;
    let formatted = format_output(&root, output_format).context("failed to format tree")?;
    println!("{formatted}");

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::common::BuildArgs;
    use crate::config::ProjectConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_tree_serializes_resources() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("res");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("main.txt"), "hello").unwrap();
        fs::write(folder.join("speech_1.txt"), "one").unwrap();

        let plan = BuildArgs {
            folder: Some(folder),
            definition: Some(temp.path().join("definition.py")),
            strip: vec!["txt".to_string()],
            group: vec![r"(speech)_(\d)".to_string()],
            loaders: vec!["text".to_string()],
            ..BuildArgs::default()
        }
        .merge(ProjectConfig::default())
        .unwrap();

        let root = resolve(&plan).unwrap();
        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json, serde_json::json!({"speech": [null, "one"], "main": "hello"}));
        assert!(!plan.definition.exists());

        assert_eq!(run(&plan, OutputFormat::Pretty).unwrap(), ExitCode::SUCCESS);
    }
}
