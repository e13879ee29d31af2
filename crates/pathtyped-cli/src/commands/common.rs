//! Options shared by every construction command.
//!
//! Command-line flags are merged over the project file: a flag always wins,
//! and a repeated list flag (`--strip`, `--group`, `--loader`) replaces the
//! list from the file instead of extending it. Passing any `--strip` or
//! `--group` flag replaces every rule of the file, including its ordered
//! `rules` list.

use crate::config::{ProjectConfig, RuleSpec};
use anyhow::{Context, Result, bail};
use clap::Args;
use pathtyped::{
    CollisionPolicy, DefinitionFile, EmitterKind, Loaders, ResourceConfig, ResourceManager,
    ResourceManagerBuilder, group_by, strip_extensions,
};
use std::path::PathBuf;
use tracing::{Level, debug};

/// Construction options accepted by `generate`, `check` and `tree`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildArgs {
    /// Resource folder to construct
    pub folder: Option<PathBuf>,

    /// Path of the declaration artifact
    #[arg(short, long)]
    pub definition: Option<PathBuf>,

    /// Declaration emitter (python, typescript, rust)
    #[arg(short, long)]
    pub emitter: Option<EmitterKind>,

    /// Strip file extensions fully matching this pattern (repeatable; every
    /// strip rule runs before every group rule)
    #[arg(long = "strip", num_args = 1)]
    pub strip: Vec<String>,

    /// Group keys matching this pattern into sequences or maps (repeatable;
    /// runs after the strip rules, use `rules` in the project file for other
    /// orders)
    #[arg(long = "group", num_args = 1)]
    pub group: Vec<String>,

    /// Built-in loader to try, in order (repeatable)
    #[arg(
        short,
        long = "loader",
        num_args = 1,
        value_parser = ["text", "json", "bytes", "path"]
    )]
    pub loaders: Vec<String>,

    /// Import statement copied into the artifact
    #[arg(long)]
    pub import: Option<String>,

    /// Label of the resource manager
    #[arg(long)]
    pub name: Option<String>,

    /// Indent unit of the declaration
    #[arg(long)]
    pub indent: Option<String>,

    /// Names fully matching this pattern are skipped while scanning
    #[arg(long)]
    pub ignore: Option<String>,

    /// What to do when two entries claim the same key (overwrite, fail)
    #[arg(long)]
    pub on_collision: Option<CollisionPolicy>,

    /// Project file (default: ./pathtyped.toml if present)
    #[arg(short, long, env = "PATHTYPED_CONFIG")]
    pub config: Option<PathBuf>,
}

impl BuildArgs {
    /// Loads the project file and merges these flags over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the project file cannot be loaded, or if the
    /// folder or definition is set nowhere.
    pub fn resolve(&self) -> Result<BuildPlan> {
        let project = ProjectConfig::discover(self.config.as_deref())?;
        self.merge(project)
    }

    /// Merges these flags over an already loaded project file.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder or definition is set nowhere, or the
    /// log level is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathtyped_cli::commands::common::BuildArgs;
    /// use pathtyped_cli::config::ProjectConfig;
    ///
    /// let project = ProjectConfig::parse(
    ///     "folder = \"res\"\ndefinition = \"definition.py\"\nloaders = [\"text\"]",
    /// )?;
    /// let args = BuildArgs { loaders: vec!["json".to_string()], ..BuildArgs::default() };
    ///
    /// let plan = args.merge(project)?;
    /// assert_eq!(plan.loaders, vec!["json"]);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn merge(&self, project: ProjectConfig) -> Result<BuildPlan> {
        let folder = self
            .folder
            .clone()
            .or(project.folder)
            .context("no resource folder given (pass FOLDER or set `folder` in the project file)")?;
        let definition = self.definition.clone().or(project.definition).context(
            "no definition path given (pass --definition or set `definition` in the project file)",
        )?;

        let rules = if self.strip.is_empty() && self.group.is_empty() {
            ordered_rules(&project.strip, &project.group)
                .chain(project.rules)
                .collect()
        } else {
            ordered_rules(&self.strip, &self.group).collect()
        };

        let log_level = project
            .level
            .as_deref()
            .map(|level| {
                level
                    .parse::<Level>()
                    .map_err(|_| anyhow::anyhow!("invalid log level '{level}'"))
            })
            .transpose()?;

        let defaults = ResourceConfig::default();
        let config = ResourceConfig::builder()
            .name(self.name.clone().or(project.name).unwrap_or(defaults.name))
            .indent(self.indent.clone().or(project.indent).unwrap_or(defaults.indent))
            .ignore(self.ignore.clone().or(project.ignore).unwrap_or(defaults.ignore))
            .on_collision(
                self.on_collision
                    .or(project.on_collision)
                    .unwrap_or(defaults.on_collision),
            )
            .build();

        Ok(BuildPlan {
            folder,
            definition,
            emitter: self.emitter.or(project.emitter).unwrap_or_default(),
            import: self.import.clone().or(project.import).unwrap_or_default(),
            rules,
            loaders: if self.loaders.is_empty() {
                project.loaders
            } else {
                self.loaders.clone()
            },
            config,
            log_level,
        })
    }
}

/// Strip rules followed by group rules.
fn ordered_rules<'a>(
    strip: &'a [String],
    group: &'a [String],
) -> impl Iterator<Item = RuleSpec> + 'a {
    strip
        .iter()
        .cloned()
        .map(RuleSpec::Strip)
        .chain(group.iter().cloned().map(RuleSpec::Group))
}

/// Fully resolved construction options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    /// Resource folder
    pub folder: PathBuf,
    /// Declaration artifact path
    pub definition: PathBuf,
    /// Declaration emitter
    pub emitter: EmitterKind,
    /// Import statement copied into the artifact
    pub import: String,
    /// Rules, in the order they run
    pub rules: Vec<RuleSpec>,
    /// Built-in loader names
    pub loaders: Vec<String>,
    /// Construction configuration
    pub config: ResourceConfig,
    /// Default log level from the project file
    pub log_level: Option<Level>,
}

impl BuildPlan {
    /// Creates a manager builder carrying every rule, loader and option of
    /// this plan.
    ///
    /// Rules are registered in plan order.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid or a loader is unknown.
    pub fn builder(&self) -> Result<ResourceManagerBuilder> {
        let mut builder = ResourceManager::builder(
            &self.folder,
            DefinitionFile::new(&self.import, &self.definition),
        )
        .config(self.config.clone())
        .emitter_kind(self.emitter);

        for rule in &self.rules {
            builder = match rule {
                RuleSpec::Strip(pattern) => builder.middleware(
                    strip_extensions(pattern)
                        .with_context(|| format!("invalid strip pattern '{pattern}'"))?,
                ),
                RuleSpec::Group(pattern) => builder.middleware(
                    group_by(pattern)
                        .with_context(|| format!("invalid group pattern '{pattern}'"))?,
                ),
            };
        }
        for name in &self.loaders {
            let Some(loader) = Loaders::by_name(name) else {
                bail!("unknown loader '{name}' (expected: text, json, bytes, path)");
            };
            builder = builder.loader(loader);
        }

        debug!(
            "Plan for {}: {} rules, {} loaders",
            self.folder.display(),
            self.rules.len(),
            self.loaders.len()
        );
        Ok(builder)
    }
}
