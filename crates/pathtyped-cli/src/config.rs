//! Project configuration file.
//!
//! A project can keep its construction options in `pathtyped.toml` next to
//! the resource folder, so `pathtyped generate` needs no flags:
//!
//! ```toml
//! folder = "res"
//! definition = "definition.py"
//! emitter = "python"
//! import = "from defaults import *"
//! strip = ["txt|json"]
//! group = ['(speech)_(\d)']
//! loaders = ["text", "json"]
//! rules = [{ group = '(frame)_(\d+)\.png' }, { strip = "png" }]
//!
//! name = "ResourceManager"
//! indent = "    "
//! ignore = "__.*__"
//! on_collision = "overwrite"
//! level = "info"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.
//!
//! Rules run in this order: every `strip` pattern, then every `group`
//! pattern, then the `rules` list in the order written. Use `rules` alone
//! when a group rule has to run before a strip rule.

use anyhow::{Context, Result};
use pathtyped::{CollisionPolicy, EmitterKind};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default project file name, looked up in the working directory.
pub const PROJECT_FILE: &str = "pathtyped.toml";

/// Contents of a project file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Resource folder
    pub folder: Option<PathBuf>,
    /// Declaration artifact path
    pub definition: Option<PathBuf>,
    /// Declaration emitter
    pub emitter: Option<EmitterKind>,
    /// Import statement copied into the artifact
    pub import: Option<String>,
    /// Extension-strip patterns, one rule each, applied in order
    pub strip: Vec<String>,
    /// Group-by patterns, one rule each, applied after the strip rules
    pub group: Vec<String>,
    /// Built-in loader names, tried in order
    pub loaders: Vec<String>,
    /// Rules applied in the order written, after `strip` and `group`
    pub rules: Vec<RuleSpec>,
    /// Label of the resource manager
    pub name: Option<String>,
    /// Declaration indent unit
    pub indent: Option<String>,
    /// Ignore pattern for file and directory names
    pub ignore: Option<String>,
    /// Collision policy
    pub on_collision: Option<CollisionPolicy>,
    /// Default log level (`trace`, `debug`, `info`, `warn`, `error`)
    pub level: Option<String>,
}

/// One entry of the ordered `rules` list.
///
/// # Examples
///
/// ```
/// use pathtyped_cli::config::{ProjectConfig, RuleSpec};
///
/// let config = ProjectConfig::parse("rules = [{ group = '(a)_(\\d)' }, { strip = \"txt\" }]")?;
/// assert_eq!(
///     config.rules,
///     vec![RuleSpec::Group(r"(a)_(\d)".to_string()), RuleSpec::Strip("txt".to_string())]
/// );
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSpec {
    /// Extension-strip rule with its extension pattern
    Strip(String),
    /// Group-by rule with its key pattern
    Group(String),
}

impl ProjectConfig {
    /// Parses a project file from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or contains unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathtyped_cli::config::ProjectConfig;
    ///
    /// let config = ProjectConfig::parse("folder = \"res\"\nloaders = [\"text\"]").unwrap();
    /// assert_eq!(config.loaders, vec!["text"]);
    /// assert!(ProjectConfig::parse("unknown = 1").is_err());
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse project file")
    }

    /// Loads a project file, resolving relative paths against its directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read project file {}", path.display()))?;
        let mut config = Self::parse(&content)
            .with_context(|| format!("invalid project file {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.folder = config.folder.map(|p| base.join(p));
            config.definition = config.definition.map(|p| base.join(p));
        }

        debug!("Loaded project file {}", path.display());
        Ok(config)
    }

    /// Loads `path`, or `pathtyped.toml` from the working directory if it
    /// exists, or returns an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit or discovered file cannot be loaded.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(PROJECT_FILE).is_file() => Self::load(Path::new(PROJECT_FILE)),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_file() {
        let config = ProjectConfig::parse(
            r#"
            folder = "res"
            definition = "definition.ts"
            emitter = "typescript"
            import = "import type { Bytes } from './types';"
            strip = ["txt|json"]
            group = ['(speech)_(\d)']
            loaders = ["text", "json"]
            name = "Assets"
            indent = "  "
            ignore = ""
            on_collision = "fail"
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.folder, Some(PathBuf::from("res")));
        assert_eq!(config.emitter, Some(EmitterKind::TypeScript));
        assert_eq!(config.group, vec![r"(speech)_(\d)"]);
        assert_eq!(config.on_collision, Some(CollisionPolicy::Fail));
        assert_eq!(config.ignore.as_deref(), Some(""));
        assert_eq!(config.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_parse_ordered_rules() {
        let config = ProjectConfig::parse(
            r#"
            rules = [
                { group = '(frame)_(\d+)\.png' },
                { strip = "png" },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.rules,
            vec![
                RuleSpec::Group(r"(frame)_(\d+)\.png".to_string()),
                RuleSpec::Strip("png".to_string()),
            ]
        );
        assert!(ProjectConfig::parse("rules = [{ rename = \"x\" }]").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(ProjectConfig::parse("emitter = \"cobol\"").is_err());
        assert!(ProjectConfig::parse("on_collision = \"maybe\"").is_err());
        assert!(ProjectConfig::parse("strip = \"txt\"").is_err());
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(PROJECT_FILE);
        fs::write(&path, "folder = \"res\"\ndefinition = \"out/definition.py\"\n").unwrap();

        let config = ProjectConfig::load(&path).unwrap();
        assert_eq!(config.folder, Some(temp.path().join("res")));
        assert_eq!(config.definition, Some(temp.path().join("out/definition.py")));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = ProjectConfig::discover(Some(&temp.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read project file"));
    }
}
