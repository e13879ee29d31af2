//! Error types for pathtyped.
//!
//! A single error hierarchy is shared by every crate in the workspace. Each
//! variant carries enough context (paths, locations, patterns) to diagnose the
//! failure without re-running the construction.
//!
//! # Examples
//!
//! ```
//! use pathtyped_core::{Error, Result};
//!
//! fn require_folder(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(Error::NotFound {
//!             path: "<empty>".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = require_folder("").unwrap_err();
//! assert!(err.is_not_found());
//! ```

use thiserror::Error;

/// Boxed error returned by user-supplied loaders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for pathtyped.
///
/// Filesystem and loader errors are fatal and abort construction. Structural
/// problems (key collisions, grouping ties) only surface as errors when the
/// configured [`CollisionPolicy`](crate::CollisionPolicy) asks for it.
#[derive(Error, Debug)]
pub enum Error {
    /// The resource folder, or a subdirectory of it, does not exist.
    ///
    /// Raised when the root is missing before the scan starts or when a
    /// directory disappears while it is being walked.
    #[error("Path not found: {path}")]
    NotFound {
        /// The path that could not be found
        path: String,
    },

    /// The resource folder exists but is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// The offending path
        path: String,
    },

    /// Any other filesystem failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read or written
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A loader failed and was not wrapped with a fallback value.
    ///
    /// The original loader error is preserved as the source.
    #[error("Loader failed at {location} for {value}: {source}")]
    LoaderFailure {
        /// Location of the leaf in the tree (e.g. `root.audio.bgm`)
        location: String,
        /// Debug representation of the leaf that was being loaded
        value: String,
        /// Error raised by the loader
        #[source]
        source: BoxError,
    },

    /// A regular expression supplied for ignoring, stripping or grouping
    /// could not be used.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as supplied by the caller
        pattern: String,
        /// Why it was rejected
        reason: String,
    },

    /// Two entries claimed the same key and the collision policy is `fail`.
    #[error("Key collision at {location} on '{key}': {reason}")]
    KeyCollision {
        /// Location of the node holding the key
        location: String,
        /// The contested key
        key: String,
        /// Which rule produced the collision
        reason: String,
    },

    /// The tree reached a stage in a shape that stage cannot accept.
    #[error("Invalid tree at {location}: {reason}")]
    InvalidTree {
        /// Location of the offending node
        location: String,
        /// Description of the problem
        reason: String,
    },

    /// Configuration error.
    ///
    /// Raised when a [`ResourceConfig`](crate::ResourceConfig) fails
    /// validation.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Serialization/deserialization or template rendering failed.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl Error {
    /// Creates an [`Error::Io`] for the given path.
    #[must_use]
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Returns `true` if a path could not be found.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathtyped_core::Error;
    ///
    /// let err = Error::NotFound {
    ///     path: "resources".to_string(),
    /// };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the root was not a directory.
    #[must_use]
    pub const fn is_not_directory(&self) -> bool {
        matches!(self, Self::NotADirectory { .. })
    }

    /// Returns `true` for generic I/O failures.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns `true` if a loader failed without a fallback.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathtyped_core::Error;
    ///
    /// let err = Error::LoaderFailure {
    ///     location: "root.data".to_string(),
    ///     value: "\"data.txt\"".to_string(),
    ///     source: "stream did not contain valid UTF-8".into(),
    /// };
    /// assert!(err.is_loader_failure());
    /// ```
    #[must_use]
    pub const fn is_loader_failure(&self) -> bool {
        matches!(self, Self::LoaderFailure { .. })
    }

    /// Returns `true` if a pattern was rejected.
    #[must_use]
    pub const fn is_invalid_pattern(&self) -> bool {
        matches!(self, Self::InvalidPattern { .. })
    }

    /// Returns `true` if a key collision aborted construction.
    #[must_use]
    pub const fn is_key_collision(&self) -> bool {
        matches!(self, Self::KeyCollision { .. })
    }

    /// Returns `true` if a stage received a tree it cannot process.
    #[must_use]
    pub const fn is_invalid_tree(&self) -> bool {
        matches!(self, Self::InvalidTree { .. })
    }

    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathtyped_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "indent cannot be empty".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is a serialization or rendering error.
    #[must_use]
    pub const fn is_serialization_error(&self) -> bool {
        matches!(self, Self::SerializationError { .. })
    }
}

/// Result type alias used throughout pathtyped.
///
/// # Examples
///
/// ```
/// use pathtyped_core::{Error, Result};
///
/// fn non_empty(indent: &str) -> Result<&str> {
///     if indent.is_empty() {
///         return Err(Error::ConfigError {
///             message: "indent cannot be empty".to_string(),
///         });
///     }
///     Ok(indent)
/// }
///
/// assert!(non_empty("    ").is_ok());
/// assert!(non_empty("").is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;
