//! Resource manager construction.
//!
//! [`ResourceManager::builder`] collects the rules, loaders, emitter and
//! configuration, then [`ResourceManagerBuilder::build`] runs the whole
//! pipeline as one blocking unit:
//!
//! 1. scan the folder into a raw tree;
//! 2. apply every rule in order, then normalize the keys;
//! 3. load every leaf and derive the declaration shape;
//! 4. fingerprint the tree and the shape;
//! 5. rewrite the declaration artifact if the stored fingerprint differs.

use crate::context::Context;
use crate::loader::Loader;
use crate::middleware::{Middleware, apply_middleware, run_middlewares};
use crate::normalize::NormalizeNames;
use crate::resolve::resolve;
use pathtyped_codegen::{
    DeclarationHeader, Emitter, EmitterKind, Fingerprint, Fingerprinter, Shape, TemplateEngine,
};
use pathtyped_core::{
    Error, Location, MapNode, Node, Resource, ResourceConfig, Result, logging,
};
use pathtyped_files::{DefinitionFile, Scanner};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span};

/// State of the declaration artifact after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionStatus {
    /// The stored fingerprint matched; nothing was written.
    UpToDate,
    /// The artifact was missing or stale and has been rewritten.
    Regenerated,
    /// The artifact is missing or stale and was left alone (check-only mode).
    Stale,
}

impl DefinitionStatus {
    /// Returns the status name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UpToDate => "up-to-date",
            Self::Regenerated => "regenerated",
            Self::Stale => "stale",
        }
    }

    /// Returns `true` unless the artifact is left stale.
    #[must_use]
    pub const fn is_current(&self) -> bool {
        !matches!(self, Self::Stale)
    }
}

impl fmt::Display for DefinitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A constructed resource folder.
///
/// Holds the resolved resource tree and the declaration that describes it.
///
/// # Examples
///
/// ```
/// use pathtyped::{DefinitionStatus, Loaders, ResourceManager, group_by, strip_extensions};
/// use pathtyped_files::DefinitionFile;
/// # use tempfile::TempDir;
///
/// # let temp = TempDir::new().unwrap();
/// # let folder = temp.path().join("res");
/// # std::fs::create_dir(&folder).unwrap();
/// # std::fs::write(folder.join("main.txt"), "hello").unwrap();
/// # std::fs::write(folder.join("speech_1.txt"), "one").unwrap();
/// let definition = DefinitionFile::new("", temp.path().join("definition.py"));
///
/// let manager = ResourceManager::builder(&folder, definition)
///     .middleware(strip_extensions("txt")?)
///     .middleware(group_by(r"(speech)_(\d)")?)
///     .loader(Loaders::text())
///     .build()?;
///
/// assert_eq!(manager.status(), DefinitionStatus::Regenerated);
/// assert_eq!(manager.root()["main"].as_text(), Some("hello"));
/// assert_eq!(manager.root()["speech"][1].as_text(), Some("one"));
/// assert!(manager.root()["speech"][0].is_none());
/// # Ok::<(), pathtyped_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ResourceManager {
    root: Resource,
    shape: Shape,
    fingerprint: Fingerprint,
    status: DefinitionStatus,
    declaration: String,
    definition: DefinitionFile,
}

impl ResourceManager {
    /// Starts configuring a manager for `folder`, declared into `definition`.
    #[must_use]
    pub fn builder(folder: impl Into<PathBuf>, definition: DefinitionFile) -> ResourceManagerBuilder {
        ResourceManagerBuilder::new(folder, definition)
    }

    /// The resolved resource tree.
    #[must_use]
    pub const fn root(&self) -> &Resource {
        &self.root
    }

    /// The declaration shape of [`root`](Self::root).
    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Fingerprint of the tree, loaders and emitter.
    #[must_use]
    pub const fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// What happened to the declaration artifact.
    #[must_use]
    pub const fn status(&self) -> DefinitionStatus {
        self.status
    }

    /// The full artifact text that was written, or would have been written.
    ///
    /// When the artifact was up to date this is a fresh rendering; only its
    /// timestamp may differ from the file on disk.
    #[must_use]
    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    /// The declaration artifact.
    #[must_use]
    pub const fn definition(&self) -> &DefinitionFile {
        &self.definition
    }
}

/// Builder for [`ResourceManager`].
pub struct ResourceManagerBuilder {
    folder: PathBuf,
    definition: DefinitionFile,
    config: ResourceConfig,
    middlewares: Vec<Box<dyn Middleware>>,
    loaders: Vec<Box<dyn Loader>>,
    emitter: Box<dyn Emitter>,
    check_only: bool,
}

impl fmt::Debug for ResourceManagerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceManagerBuilder")
            .field("folder", &self.folder)
            .field("definition", &self.definition)
            .field("config", &self.config)
            .field("middlewares", &self.middlewares.len())
            .field("loaders", &self.loaders.len())
            .field("emitter", &self.emitter.name())
            .field("check_only", &self.check_only)
            .finish()
    }
}

impl ResourceManagerBuilder {
    /// Creates a builder with the default configuration, no rules, no
    /// loaders and the Python emitter.
    #[must_use]
    pub fn new(folder: impl Into<PathBuf>, definition: DefinitionFile) -> Self {
        Self {
            folder: folder.into(),
            definition,
            config: ResourceConfig::default(),
            middlewares: Vec::new(),
            loaders: Vec::new(),
            emitter: EmitterKind::default().emitter(),
            check_only: false,
        }
    }

    /// Appends a rule. Rules run in registration order.
    #[must_use]
    pub fn middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middlewares.push(Box::new(middleware));
        self
    }

    /// Appends a loader. Loaders are tried in registration order.
    #[must_use]
    pub fn loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loaders.push(Box::new(loader));
        self
    }

    /// Sets the construction configuration.
    #[must_use]
    pub fn config(mut self, config: ResourceConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the declaration emitter.
    #[must_use]
    pub fn emitter(mut self, emitter: impl Emitter + 'static) -> Self {
        self.emitter = Box::new(emitter);
        self
    }

    /// Selects one of the built-in emitters.
    #[must_use]
    pub fn emitter_kind(mut self, kind: EmitterKind) -> Self {
        self.emitter = kind.emitter();
        self
    }

    /// Computes everything but never writes the artifact.
    #[must_use]
    pub const fn check_only(mut self, check_only: bool) -> Self {
        self.check_only = check_only;
        self
    }

    /// Runs the construction.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the folder cannot
    /// be scanned, a rule or loader fails, a collision occurs under
    /// [`CollisionPolicy::Fail`](pathtyped_core::CollisionPolicy::Fail), or
    /// the artifact cannot be read or written.
    pub fn build(self) -> Result<ResourceManager> {
        self.config.validate()?;
        if let Some(level) = self.config.level {
            logging::init_with_level(level);
        }

        let span = info_span!("resource_manager", name = %self.config.name);
        let _enter = span.enter();

        let ctx = Context::new(&self.folder, self.config.clone());
        let tree = self.transform(&ctx)?;
        let (root, shape) = resolve(&ctx, &self.loaders, &tree)?;

        let fingerprint = Fingerprinter::new(&self.folder)
            .fold_map(&tree)
            .update(self.emitter.name())
            .fold_shape(&shape)
            .finish();
        debug!("Fingerprint: {fingerprint}");

        let stale = self.is_stale(&fingerprint)?;

        let header = DeclarationHeader::new(
            &fingerprint,
            &self.config.name,
            self.definition.import_statement(),
        );
        let declaration = TemplateEngine::new()?.render_declaration(
            self.emitter.as_ref(),
            &shape,
            &self.config.indent,
            &header,
        )?;

        let status = match (stale, self.check_only) {
            (false, _) => {
                info!("Definition file is up to date");
                DefinitionStatus::UpToDate
            }
            (true, true) => {
                info!(
                    "Definition file {} is stale, leaving it untouched",
                    self.definition.path().display()
                );
                DefinitionStatus::Stale
            }
            (true, false) => {
                self.definition.write(&declaration)?;
                info!("Definition file has been regenerated");
                DefinitionStatus::Regenerated
            }
        };

        Ok(ResourceManager {
            root,
            shape,
            fingerprint,
            status,
            declaration,
            definition: self.definition,
        })
    }

    /// Scans the folder and applies the rules and key normalization.
    fn transform(&self, ctx: &Context) -> Result<MapNode> {
        let scanned = Scanner::new(&self.config.ignore)?.scan(&self.folder)?;

        let tree = run_middlewares(ctx, &self.middlewares, Node::Map(scanned))?;
        let tree = apply_middleware(ctx, &NormalizeNames, tree, &Location::root())?;

        match tree {
            Node::Map(map) => Ok(map),
            Node::Seq(_) => Err(Error::InvalidTree {
                location: Location::root().to_string(),
                reason: "the root must remain a map after applying rules".to_string(),
            }),
        }
    }

    fn is_stale(&self, fingerprint: &Fingerprint) -> Result<bool> {
        if !self.definition.exists() {
            info!("Definition file does not exist. Regenerating definition file");
            return Ok(true);
        }
        if fingerprint.matches(&self.definition.read_integrity()?) {
            return Ok(false);
        }
        info!("Folder contents/loaders have changed. Regenerating definition file");
        Ok(true)
    }

    /// The resource folder.
    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.folder
    }
}
