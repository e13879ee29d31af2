//! Leaf value loaders.
//!
//! Every leaf of the transformed tree is offered to the configured loaders in
//! order. A loader can decline (`Ok(None)`), produce a value (`Ok(Some(_))`)
//! or fail (`Err(_)`). The first value wins; a failure aborts construction
//! unless the loader was wrapped with [`LoaderExt::with_fallback`].
//!
//! # Examples
//!
//! ```
//! use pathtyped::{Context, Loader, LoaderExt, Loaders, path_loader};
//! use pathtyped_core::{Leaf, ResourceConfig, Value};
//! use std::path::Path;
//!
//! // Uppercases every `.md` file, falling back to an empty string on error
//! let shout = path_loader(|_, path: &Path| {
//!     Ok(Value::Text(std::fs::read_to_string(path)?.to_uppercase()))
//! })
//! .with_extension("md")
//! .unwrap()
//! .with_fallback("");
//!
//! let ctx = Context::new(".", ResourceConfig::default());
//! let loaded = shout.load(&ctx, Leaf::Path(Path::new("missing.md"))).unwrap();
//! assert_eq!(loaded, Some(Value::from("")));
//!
//! // Declined: wrong extension
//! let declined = Loaders::text().load(&ctx, Leaf::Path(Path::new("image.png"))).unwrap();
//! assert!(declined.is_none());
//! ```

use crate::context::Context;
use pathtyped_core::{BoxError, Error, Leaf, Location, Result, Value};
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, error, warn};

/// Result of a single loader invocation.
pub type LoadResult = std::result::Result<Option<Value>, BoxError>;

/// Turns leaves into values.
pub trait Loader: Send + Sync {
    /// Loads `leaf`, or declines with `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Any error is wrapped into [`Error::LoaderFailure`] by the pipeline.
    fn load(&self, ctx: &Context, leaf: Leaf<'_>) -> LoadResult;
}

impl Loader for Box<dyn Loader> {
    fn load(&self, ctx: &Context, leaf: Leaf<'_>) -> LoadResult {
        self.as_ref().load(ctx, leaf)
    }
}

/// A loader built from a closure by [`loader_fn`].
pub struct FnLoader<F> {
    func: F,
}

impl<F> fmt::Debug for FnLoader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnLoader").finish_non_exhaustive()
    }
}

impl<F> Loader for FnLoader<F>
where
    F: Fn(&Context, Leaf<'_>) -> LoadResult + Send + Sync,
{
    fn load(&self, ctx: &Context, leaf: Leaf<'_>) -> LoadResult {
        (self.func)(ctx, leaf)
    }
}

/// Builds a loader from a closure over `(ctx, leaf)`.
///
/// # Examples
///
/// ```
/// use pathtyped::{Context, Loader, loader_fn};
/// use pathtyped_core::{Leaf, ResourceConfig, Value};
///
/// // Turns every integer inserted by a rule into a float
/// let widen = loader_fn(|_, leaf| match leaf {
///     Leaf::Value(Value::Integer(i)) => Ok(Some(Value::Float(*i as f64))),
///     _ => Ok(None),
/// });
///
/// let ctx = Context::new(".", ResourceConfig::default());
/// let value = Value::Integer(2);
/// assert_eq!(widen.load(&ctx, Leaf::Value(&value)).unwrap(), Some(Value::Float(2.0)));
/// ```
pub const fn loader_fn<F>(func: F) -> FnLoader<F>
where
    F: Fn(&Context, Leaf<'_>) -> LoadResult + Send + Sync,
{
    FnLoader { func }
}

/// A loader that only accepts raw paths, built by [`path_loader`].
pub struct PathFnLoader<F> {
    func: F,
}

impl<F> fmt::Debug for PathFnLoader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathFnLoader").finish_non_exhaustive()
    }
}

impl<F> Loader for PathFnLoader<F>
where
    F: Fn(&Context, &Path) -> std::result::Result<Value, BoxError> + Send + Sync,
{
    fn load(&self, ctx: &Context, leaf: Leaf<'_>) -> LoadResult {
        match leaf {
            Leaf::Path(path) => (self.func)(ctx, path).map(Some),
            Leaf::Value(_) => Ok(None),
        }
    }
}

/// Builds a loader from a closure over `(ctx, path)`.
///
/// The loader declines every leaf that is not a raw path.
pub const fn path_loader<F>(func: F) -> PathFnLoader<F>
where
    F: Fn(&Context, &Path) -> std::result::Result<Value, BoxError> + Send + Sync,
{
    PathFnLoader { func }
}

/// Combinators available on every loader.
pub trait LoaderExt: Loader + Sized {
    /// Declines paths whose last extension does not fully match `pattern`.
    ///
    /// Non-path leaves are declined as well.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if `pattern` is not a valid regex.
    fn with_extension(self, pattern: &str) -> Result<WithExtension<Self>> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(WithExtension {
            inner: self,
            pattern: regex,
        })
    }

    /// Replaces failures of this loader with `value`.
    ///
    /// Failures are still logged at error level. Declines pass through.
    fn with_fallback(self, value: impl Into<Value>) -> WithFallback<Self> {
        WithFallback {
            inner: self,
            fallback: value.into(),
        }
    }

    /// Boxes the loader for registration.
    fn boxed(self) -> Box<dyn Loader>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<L: Loader> LoaderExt for L {}

/// Loader restricted to an extension pattern. See [`LoaderExt::with_extension`].
#[derive(Debug)]
pub struct WithExtension<L> {
    inner: L,
    pattern: Regex,
}

impl<L: Loader> Loader for WithExtension<L> {
    fn load(&self, ctx: &Context, leaf: Leaf<'_>) -> LoadResult {
        let accepted = leaf
            .as_path()
            .and_then(Path::extension)
            .is_some_and(|ext| self.pattern.is_match(&ext.to_string_lossy()));
        if accepted {
            self.inner.load(ctx, leaf)
        } else {
            Ok(None)
        }
    }
}

/// Loader with a fallback value. See [`LoaderExt::with_fallback`].
#[derive(Debug)]
pub struct WithFallback<L> {
    inner: L,
    fallback: Value,
}

impl<L: Loader> Loader for WithFallback<L> {
    fn load(&self, ctx: &Context, leaf: Leaf<'_>) -> LoadResult {
        match self.inner.load(ctx, leaf) {
            Ok(value) => Ok(value),
            Err(e) => {
                error!("Failed to load {leaf:?}: {e}");
                Ok(Some(self.fallback.clone()))
            }
        }
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

/// Loads `.txt` files as [`Value::Text`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLoader;

impl Loader for TextLoader {
    fn load(&self, _ctx: &Context, leaf: Leaf<'_>) -> LoadResult {
        let Some(path) = leaf.as_path().filter(|p| has_extension(p, "txt")) else {
            return Ok(None);
        };
        let text = fs::read_to_string(path)?;
        debug!("Loaded text from {}", path.display());
        Ok(Some(Value::Text(text)))
    }
}

/// Loads `.json` files as [`Value::Json`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl Loader for JsonLoader {
    fn load(&self, _ctx: &Context, leaf: Leaf<'_>) -> LoadResult {
        let Some(path) = leaf.as_path().filter(|p| has_extension(p, "json")) else {
            return Ok(None);
        };
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
        debug!("Loaded JSON from {}", path.display());
        Ok(Some(Value::Json(json)))
    }
}

/// Loads any file as [`Value::Bytes`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesLoader;

impl Loader for BytesLoader {
    fn load(&self, _ctx: &Context, leaf: Leaf<'_>) -> LoadResult {
        let Some(path) = leaf.as_path() else {
            return Ok(None);
        };
        let bytes = fs::read(path)?;
        debug!("Loaded {} bytes from {}", bytes.len(), path.display());
        Ok(Some(Value::Bytes(bytes)))
    }
}

/// Keeps any path as [`Value::Path`] without reading it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathValueLoader;

impl Loader for PathValueLoader {
    fn load(&self, _ctx: &Context, leaf: Leaf<'_>) -> LoadResult {
        Ok(leaf.as_path().map(|path| Value::Path(path.to_path_buf())))
    }
}

/// Built-in loaders.
#[derive(Debug, Clone, Copy)]
pub struct Loaders;

impl Loaders {
    /// `.txt` files as text.
    #[must_use]
    pub const fn text() -> TextLoader {
        TextLoader
    }

    /// `.json` files as parsed JSON.
    #[must_use]
    pub const fn json() -> JsonLoader {
        JsonLoader
    }

    /// Any file as raw bytes.
    #[must_use]
    pub const fn bytes() -> BytesLoader {
        BytesLoader
    }

    /// Any file as its path.
    #[must_use]
    pub const fn path() -> PathValueLoader {
        PathValueLoader
    }

    /// Looks up a built-in loader by name (`text`, `json`, `bytes`, `path`).
    #[must_use]
    pub fn by_name(name: &str) -> Option<Box<dyn Loader>> {
        match name {
            "text" => Some(Box::new(TextLoader)),
            "json" => Some(Box::new(JsonLoader)),
            "bytes" => Some(Box::new(BytesLoader)),
            "path" => Some(Box::new(PathValueLoader)),
            _ => None,
        }
    }
}

/// Offers `leaf` to each loader in order and returns the first value.
///
/// A leaf declined by every loader passes through unchanged (raw paths
/// become [`Value::Path`]) with a warning.
///
/// # Errors
///
/// Returns [`Error::LoaderFailure`] carrying the loader's error as its
/// source when a loader fails.
pub fn load_leaf(
    ctx: &Context,
    loaders: &[Box<dyn Loader>],
    location: &Location,
    leaf: Leaf<'_>,
) -> Result<Value> {
    for loader in loaders {
        match loader.load(ctx, leaf) {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(source) => {
                error!("Error while loading object at location {location}; {leaf:?}: {source}");
                return Err(Error::LoaderFailure {
                    location: location.to_string(),
                    value: format!("{leaf:?}"),
                    source,
                });
            }
        }
    }

    warn!("No loader found for object at location: {location}; {leaf:?}");
    Ok(leaf.to_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathtyped_core::ResourceConfig;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn ctx() -> Context {
        Context::new(".", ResourceConfig::default())
    }

    fn failing() -> impl Loader {
        path_loader(|_, _| Err("boom".into()))
    }

    #[test]
    fn test_text_loader() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("main.txt");
        fs::write(&path, "hello").unwrap();

        let value = Loaders::text().load(&ctx(), Leaf::Path(&path)).unwrap();
        assert_eq!(value, Some(Value::from("hello")));
    }

    #[test]
    fn test_json_loader() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.json");
        fs::write(&path, r#"{"a": [1, 2]}"#).unwrap();

        let value = Loaders::json().load(&ctx(), Leaf::Path(&path)).unwrap().unwrap();
        assert_eq!(value.as_json(), Some(&serde_json::json!({"a": [1, 2]})));

        assert!(Loaders::json().load(&ctx(), Leaf::Path(Path::new("a.txt"))).unwrap().is_none());
    }

    #[test]
    fn test_json_loader_rejects_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{").unwrap();
        assert!(Loaders::json().load(&ctx(), Leaf::Path(&path)).is_err());
    }

    #[test]
    fn test_bytes_and_path_loaders() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("image.png");
        fs::write(&path, [0x89, 0x50]).unwrap();

        let bytes = Loaders::bytes().load(&ctx(), Leaf::Path(&path)).unwrap();
        assert_eq!(bytes, Some(Value::Bytes(vec![0x89, 0x50])));

        let kept = Loaders::path().load(&ctx(), Leaf::Path(&path)).unwrap();
        assert_eq!(kept, Some(Value::Path(path.clone())));
    }

    #[test]
    fn test_builtins_decline_values() {
        let value = Value::from(1i64);
        for name in ["text", "json", "bytes", "path"] {
            let loader = Loaders::by_name(name).unwrap();
            assert!(loader.load(&ctx(), Leaf::Value(&value)).unwrap().is_none());
        }
        assert!(Loaders::by_name("yaml").is_none());
    }

    #[test]
    fn test_with_extension() {
        let loader = Loaders::path().with_extension("png|jpg").unwrap();
        let accepted = loader.load(&ctx(), Leaf::Path(Path::new("a.jpg"))).unwrap();
        assert!(accepted.is_some());
        let declined = loader.load(&ctx(), Leaf::Path(Path::new("a.jpeg"))).unwrap();
        assert!(declined.is_none());
        let no_ext = loader.load(&ctx(), Leaf::Path(Path::new("png"))).unwrap();
        assert!(no_ext.is_none());

        assert!(Loaders::path().with_extension("(").is_err());
    }

    #[test]
    fn test_fallback_never_fails() {
        let loader = failing().with_fallback(Value::from("fallback"));
        let value = loader.load(&ctx(), Leaf::Path(Path::new("x"))).unwrap();
        assert_eq!(value, Some(Value::from("fallback")));

        let value = Value::from(true);
        assert!(loader.load(&ctx(), Leaf::Value(&value)).unwrap().is_none());
    }

    #[test]
    fn test_pipeline_first_success_wins() {
        let loaders = vec![Loaders::text().boxed(), Loaders::path().boxed(), Loaders::bytes().boxed()];
        let value = load_leaf(&ctx(), &loaders, &Location::root(), Leaf::Path(Path::new("a.png"))).unwrap();
        assert_eq!(value, Value::Path(PathBuf::from("a.png")));
    }

    #[test]
    fn test_pipeline_failure_keeps_source() {
        let loaders = vec![failing().boxed()];
        let location = Location::root().key("data");
        let err = load_leaf(&ctx(), &loaders, &location, Leaf::Path(Path::new("data.txt"))).unwrap_err();

        assert!(err.is_loader_failure());
        let Error::LoaderFailure { location, value, source } = err else {
            unreachable!()
        };
        assert_eq!(location, "root.data");
        assert!(value.contains("data.txt"));
        assert_eq!(source.to_string(), "boom");
    }

    #[test]
    fn test_pipeline_passthrough_when_declined() {
        let value = Value::from(3i64);
        let passed = load_leaf(&ctx(), &[], &Location::root(), Leaf::Value(&value)).unwrap();
        assert_eq!(passed, value);

        let passed = load_leaf(&ctx(), &[], &Location::root(), Leaf::Path(Path::new("a"))).unwrap();
        assert_eq!(passed, Value::Path(PathBuf::from("a")));
    }
}
