//! Optional built-in log output.
//!
//! Libraries normally leave subscriber installation to the application. When
//! [`ResourceConfig::level`](crate::ResourceConfig::level) is set, the
//! resource manager installs a plain stderr subscriber through
//! [`init_with_level`], unless the application already installed its own.

use tracing::{Level, warn};

/// Installs a stderr fmt subscriber with the given maximum level.
///
/// Returns `true` if the subscriber was installed. If a global subscriber is
/// already present, nothing is changed, a warning is emitted through the
/// existing subscriber and `false` is returned.
///
/// # Examples
///
/// ```
/// use pathtyped_core::logging::init_with_level;
/// use tracing::Level;
///
/// let first = init_with_level(Level::INFO);
/// // A second call never replaces the subscriber.
/// assert!(!init_with_level(Level::DEBUG) || !first);
/// ```
pub fn init_with_level(level: Level) -> bool {
    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok();

    if !installed {
        warn!("A log subscriber is already installed, ignoring configured level {level}");
    }

    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_is_rejected() {
        let _ = init_with_level(Level::WARN);
        assert!(!init_with_level(Level::TRACE));
    }
}
