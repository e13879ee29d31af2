//! pathtyped CLI.
//!
//! Constructs resource folders and keeps their declaration artifacts in sync.
//!
//! # Examples
//!
//! ```bash
//! # Generate a Python declaration for ./res
//! pathtyped generate res --definition definition.py --strip 'txt|json' --loader text
//!
//! # Fail in CI when the declaration is out of date
//! pathtyped check res --definition definition.py --strip 'txt|json' --loader text
//!
//! # Inspect the resolved tree
//! pathtyped --format json tree --config pathtyped.toml
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use pathtyped_cli::commands::{self, common::BuildArgs};
use pathtyped_cli::{BuildPlan, ExitCode, OutputFormat};
use tracing::{Level, error};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Typed, read-only access to resource folders.
#[derive(Parser, Debug)]
#[command(name = "pathtyped")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Construct the folder and rewrite the declaration if it is stale.
    Generate(BuildArgs),

    /// Construct the folder without writing; exit with 1 if the declaration
    /// is stale.
    Check(BuildArgs),

    /// Print the resolved resource tree.
    Tree(BuildArgs),
}

impl Commands {
    const fn args(&self) -> &BuildArgs {
        match self {
            Self::Generate(args) | Self::Check(args) | Self::Tree(args) => args,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let output_format = cli.format.parse::<OutputFormat>()?;
    let plan = cli.command.args().resolve()?;

    init_logging(cli.verbose, plan.log_level)?;

    let exit_code = match execute_command(&cli.command, &plan, output_format) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::ERROR
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Initializes logging.
///
/// `RUST_LOG` wins over the project file level, and `--verbose` wins over
/// both.
fn init_logging(verbose: bool, level: Option<Level>) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        let fallback = level.map_or_else(|| "info".to_string(), |l| l.to_string().to_lowercase());
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

/// Routes the command to its handler.
fn execute_command(
    command: &Commands,
    plan: &BuildPlan,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    match command {
        Commands::Generate(_) => commands::generate::run(plan, output_format),
        Commands::Check(_) => commands::check::run(plan, output_format),
        Commands::Tree(_) => commands::tree::run(plan, output_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathtyped::{CollisionPolicy, EmitterKind};
    use std::path::PathBuf;

    #[test]
    fn test_cli_parsing_generate() {
        let cli = Cli::parse_from([
            "pathtyped",
            "generate",
            "res",
            "--definition",
            "definition.py",
            "--strip",
            "txt|json",
            "--group",
            r"(speech)_(\d)",
            "--loader",
            "text",
            "--loader",
            "json",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("Expected Generate command");
        };
        assert_eq!(args.folder, Some(PathBuf::from("res")));
        assert_eq!(args.definition, Some(PathBuf::from("definition.py")));
        assert_eq!(args.strip, vec!["txt|json"]);
        assert_eq!(args.group, vec![r"(speech)_(\d)"]);
        assert_eq!(args.loaders, vec!["text", "json"]);
    }

    #[test]
    fn test_cli_parsing_enums() {
        let cli = Cli::parse_from([
            "pathtyped",
            "check",
            "res",
            "-d",
            "definition.ts",
            "--emitter",
            "ts",
            "--on-collision",
            "fail",
        ]);
        let Commands::Check(args) = cli.command else {
            panic!("Expected Check command");
        };
        assert_eq!(args.emitter, Some(EmitterKind::TypeScript));
        assert_eq!(args.on_collision, Some(CollisionPolicy::Fail));
    }

    #[test]
    fn test_cli_rejects_unknown_loader() {
        let result = Cli::try_parse_from(["pathtyped", "tree", "res", "--loader", "yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from(["pathtyped", "tree", "--format", "json", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.format, "json");
        assert!(cli.command.args().folder.is_none());
    }

    #[test]
    fn test_cli_output_format_default() {
        let cli = Cli::parse_from(["pathtyped", "tree", "res"]);
        assert_eq!(cli.format, "pretty");
    }
}
