//! CLI-specific types.
//!
//! Output formats and exit codes shared by every subcommand.

use std::fmt;
use std::str::FromStr;

/// CLI output format.
///
/// All formats carry the same information with different presentation.
///
/// # Examples
///
/// ```
/// use pathtyped_cli::cli::OutputFormat;
///
/// let format: OutputFormat = "pretty".parse().unwrap();
/// assert_eq!(format, OutputFormat::Pretty);
/// assert_eq!(OutputFormat::Json.as_str(), "json");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Indented JSON for machine parsing
    Json,
    /// Compact JSON on one line, for scripts
    Text,
    /// Colored, human-readable tree
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Returns the string representation of the format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "pretty" => Ok(Self::Pretty),
            _ => anyhow::bail!("invalid output format: '{s}' (expected: json, text, or pretty)"),
        }
    }
}

/// CLI exit code.
///
/// # Examples
///
/// ```
/// use pathtyped_cli::cli::ExitCode;
///
/// assert!(ExitCode::SUCCESS.is_success());
/// assert_eq!(ExitCode::STALE.as_i32(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful execution (exit code 0).
    pub const SUCCESS: Self = Self(0);

    /// The declaration artifact is stale (exit code 1).
    pub const STALE: Self = Self(1);

    /// Construction failed (exit code 2).
    pub const ERROR: Self = Self(2);

    /// Returns the exit code as an integer.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Checks if the exit code represents success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
