//! Construction configuration.
//!
//! [`ResourceConfig`] controls how a resource folder is scanned, how the
//! declaration is indented and labelled, and how key collisions are handled.
//!
//! # Examples
//!
//! ```
//! use pathtyped_core::{CollisionPolicy, ResourceConfig};
//!
//! // Use default configuration
//! let config = ResourceConfig::default();
//! assert_eq!(config.ignore, "__.*__");
//! assert_eq!(config.on_collision, CollisionPolicy::Overwrite);
//!
//! // Create custom configuration
//! let custom = ResourceConfig {
//!     indent: "  ".to_string(),
//!     ..Default::default()
//! };
//! assert!(custom.validate().is_ok());
//! ```

use crate::location::Location;
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{Level, warn};

/// What to do when two entries claim the same key.
///
/// Collisions can come from extension stripping, from group-by merging and
/// from name normalization. They are always logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Log a warning and let the later entry overwrite the earlier one
    #[default]
    Overwrite,
    /// Abort construction with [`Error::KeyCollision`]
    Fail,
}

impl CollisionPolicy {
    /// Reports a collision on `key` at `location`.
    ///
    /// Under [`CollisionPolicy::Overwrite`] this logs a warning and returns
    /// `Ok(())`, letting the caller proceed with the overwrite.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyCollision`] under [`CollisionPolicy::Fail`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pathtyped_core::{CollisionPolicy, Location};
    ///
    /// let root = Location::root();
    /// assert!(CollisionPolicy::Overwrite.check(&root, "data", "extension strip").is_ok());
    /// assert!(CollisionPolicy::Fail.check(&root, "data", "extension strip").is_err());
    /// ```
    pub fn check(self, location: &Location, key: &str, reason: &str) -> Result<()> {
        match self {
            Self::Overwrite => {
                warn!("Key collision at {location} on '{key}' ({reason}), overwriting");
                Ok(())
            }
            Self::Fail => Err(Error::KeyCollision {
                location: location.to_string(),
                key: key.to_string(),
                reason: reason.to_string(),
            }),
        }
    }

    /// Returns the policy name as used in configuration files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::Fail => "fail",
        }
    }
}

impl std::str::FromStr for CollisionPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "fail" => Ok(Self::Fail),
            _ => Err(Error::ConfigError {
                message: format!("unknown collision policy '{s}' (expected overwrite or fail)"),
            }),
        }
    }
}

/// Configuration for one resource manager construction.
///
/// # Examples
///
/// ```
/// use pathtyped_core::{CollisionPolicy, ResourceConfig};
///
/// let config = ResourceConfig {
///     name: "Assets".to_string(),
///     on_collision: CollisionPolicy::Fail,
///     ..Default::default()
/// };
///
/// assert_eq!(config.name, "Assets");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    /// Label used in logs and in the declaration header.
    ///
    /// Default: `ResourceManager`
    pub name: String,

    /// Indentation unit of the emitted declaration.
    ///
    /// Default: four spaces
    pub indent: String,

    /// Basenames fully matching this pattern are skipped while scanning.
    ///
    /// Default: `__.*__` (dunder names such as `__pycache__`)
    pub ignore: String,

    /// If set, installs a stderr log subscriber at this level, unless one is
    /// already installed.
    ///
    /// Default: None
    pub level: Option<Level>,

    /// Key collision handling.
    ///
    /// Default: [`CollisionPolicy::Overwrite`]
    pub on_collision: CollisionPolicy,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            name: "ResourceManager".to_string(),
            indent: "    ".to_string(),
            ignore: "__.*__".to_string(),
            level: None,
            on_collision: CollisionPolicy::default(),
        }
    }
}

impl ResourceConfig {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathtyped_core::ResourceConfig;
    ///
    /// let config = ResourceConfig::builder()
    ///     .name("Assets")
    ///     .indent("\t")
    ///     .build();
    ///
    /// assert_eq!(config.indent, "\t");
    /// ```
    #[must_use]
    pub fn builder() -> ResourceConfigBuilder {
        ResourceConfigBuilder::new()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the name or indent is empty, and
    /// [`Error::InvalidPattern`] if the ignore pattern does not compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathtyped_core::ResourceConfig;
    ///
    /// let config = ResourceConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// let mut invalid = ResourceConfig::default();
    /// invalid.indent = String::new();
    /// assert!(invalid.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::ConfigError {
                message: "name cannot be empty".to_string(),
            });
        }

        if self.indent.is_empty() {
            return Err(Error::ConfigError {
                message: "indent cannot be empty".to_string(),
            });
        }

        Regex::new(&self.ignore).map_err(|e| Error::InvalidPattern {
            pattern: self.ignore.clone(),
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

/// Builder for [`ResourceConfig`].
#[derive(Debug, Default)]
pub struct ResourceConfigBuilder {
    config: ResourceConfig,
}

impl ResourceConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the log and header label.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Sets the indentation unit.
    #[must_use]
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.config.indent = indent.into();
        self
    }

    /// Sets the ignore pattern.
    #[must_use]
    pub fn ignore(mut self, pattern: impl Into<String>) -> Self {
        self.config.ignore = pattern.into();
        self
    }

    /// Sets the log level of the built-in stderr subscriber.
    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.config.level = Some(level);
        self
    }

    /// Sets the collision policy.
    #[must_use]
    pub const fn on_collision(mut self, policy: CollisionPolicy) -> Self {
        self.config.on_collision = policy;
        self
    }

    /// Builds the configuration.
    ///
    /// The result is not validated. Call [`ResourceConfig::validate`] or let
    /// the resource manager do it.
    #[must_use]
    pub fn build(self) -> ResourceConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResourceConfig::default();
        assert_eq!(config.name, "ResourceManager");
        assert_eq!(config.indent, "    ");
        assert_eq!(config.ignore, "__.*__");
        assert!(config.level.is_none());
        assert_eq!(config.on_collision, CollisionPolicy::Overwrite);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ResourceConfig::builder()
            .name("Assets")
            .indent("\t")
            .ignore(r"\..*")
            .level(Level::DEBUG)
            .on_collision(CollisionPolicy::Fail)
            .build();

        assert_eq!(config.name, "Assets");
        assert_eq!(config.indent, "\t");
        assert_eq!(config.ignore, r"\..*");
        assert_eq!(config.level, Some(Level::DEBUG));
        assert_eq!(config.on_collision, CollisionPolicy::Fail);
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let config = ResourceConfig::builder().name("  ").build();
        assert!(config.validate().unwrap_err().is_config_error());
    }

    #[test]
    fn test_validate_rejects_bad_ignore() {
        let config = ResourceConfig::builder().ignore("(").build();
        assert!(config.validate().unwrap_err().is_invalid_pattern());
    }

    #[test]
    fn test_collision_policy_check() {
        let loc = Location::root().key("a");
        assert!(CollisionPolicy::Overwrite.check(&loc, "x", "test").is_ok());

        let err = CollisionPolicy::Fail.check(&loc, "x", "test").unwrap_err();
        assert!(err.is_key_collision());
        assert!(err.to_string().contains("root.a"));
    }

    #[test]
    fn test_collision_policy_parse() {
        assert_eq!(
            "overwrite".parse::<CollisionPolicy>().unwrap(),
            CollisionPolicy::Overwrite
        );
        assert_eq!("FAIL".parse::<CollisionPolicy>().unwrap(), CollisionPolicy::Fail);
        assert!("skip".parse::<CollisionPolicy>().is_err());
    }

    #[test]
    fn test_collision_policy_serde() {
        let policy: CollisionPolicy = serde_json::from_str("\"fail\"").unwrap();
        assert_eq!(policy, CollisionPolicy::Fail);
        assert_eq!(
            serde_json::to_string(&CollisionPolicy::Overwrite).unwrap(),
            "\"overwrite\""
        );
    }
}
