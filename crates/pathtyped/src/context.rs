//! Read-only construction context handed to rules and loaders.

use pathtyped_core::{CollisionPolicy, Location, ResourceConfig, Result};
use std::path::{Path, PathBuf};

/// What a rule or loader can see of the running construction.
///
/// # Examples
///
/// ```
/// use pathtyped::Context;
/// use pathtyped_core::ResourceConfig;
///
/// let ctx = Context::new("resources", ResourceConfig::default());
/// assert_eq!(ctx.name(), "ResourceManager");
/// assert_eq!(ctx.folder().to_str(), Some("resources"));
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    folder: PathBuf,
    config: ResourceConfig,
}

impl Context {
    /// Creates a context for constructing `folder` with `config`.
    #[must_use]
    pub fn new(folder: impl Into<PathBuf>, config: ResourceConfig) -> Self {
        Self {
            folder: folder.into(),
            config,
        }
    }

    /// The resource folder being constructed.
    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// Label of the resource manager.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The configured collision policy.
    #[must_use]
    pub const fn on_collision(&self) -> CollisionPolicy {
        self.config.on_collision
    }

    /// Reports a key collision through the configured policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyCollision`](pathtyped_core::Error::KeyCollision)
    /// under [`CollisionPolicy::Fail`].
    pub fn collision(&self, location: &Location, key: &str, reason: &str) -> Result<()> {
        self.config.on_collision.check(location, key, reason)
    }
}
