//! Access to the audited source tree.
//!
//! Files are enumerated recursively under a directory of the project root and
//! filtered by name patterns, path substrings, extension suffixes and by the
//! [`Generation`] of the cartridge they belong to.

use crate::config::Config;
use crate::error::AuditError;
use crate::source::SourceFile;
use glob::Pattern;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory holding the cartridges, relative to the project root.
pub const CARTRIDGES_DIR: &str = "cartridges";

/// Directories never scanned.
pub const DEFAULT_EXCLUDES: &[&str] = &["node_modules", "vendor"];

/// Pattern for reference-storefront modification cartridges.
pub const CHANGES_CARTRIDGES: &str = "*changes";

/// Platform architecture era a cartridge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    /// Modifications of the legacy reference storefront.
    Changes,
    /// Storefront Reference Architecture.
    Sfra,
    /// SiteGenesis JavaScript controllers.
    Controllers,
    /// SiteGenesis pipelines.
    Pipelines,
    /// Anything else.
    Common,
}

impl Generation {
    /// Buckets a cartridge directory name. The first matching rule wins.
    #[must_use]
    pub fn classify(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("changes") {
            Self::Changes
        } else if name.contains("sfra") {
            Self::Sfra
        } else if name.contains("controllers") || name.contains("_sg") {
            Self::Controllers
        } else if name.contains("pipelines") {
            Self::Pipelines
        } else {
            Self::Common
        }
    }

    /// Lower-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Changes => "changes",
            Self::Sfra => "sfra",
            Self::Controllers => "controllers",
            Self::Pipelines => "pipelines",
            Self::Common => "common",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cartridge names grouped by generation, lower-cased and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartridgeSet {
    by_generation: BTreeMap<Generation, Vec<String>>,
}

impl CartridgeSet {
    /// Buckets `names`.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut by_generation: BTreeMap<Generation, Vec<String>> = BTreeMap::new();
        for name in names {
            let name = name.as_ref().to_lowercase();
            by_generation
                .entry(Generation::classify(&name))
                .or_default()
                .push(name);
        }
        for names in by_generation.values_mut() {
            names.sort();
        }
        Self { by_generation }
    }

    /// Names in `generation`.
    #[must_use]
    pub fn names(&self, generation: Generation) -> &[String] {
        self.by_generation
            .get(&generation)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of cartridges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_generation.values().map(Vec::len).sum()
    }

    /// True if there are no cartridges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which files of the tree a rule looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileQuery {
    dir: PathBuf,
    extensions: Vec<String>,
    include: Vec<String>,
    exclude: Vec<String>,
    generation: Option<Generation>,
}

impl FileQuery {
    /// All files under `dir`, relative to the project root.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extensions: Vec::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            generation: None,
        }
    }

    /// All files under `cartridges/`.
    #[must_use]
    pub fn cartridges() -> Self {
        Self::new(CARTRIDGES_DIR)
    }

    /// Restricts to names ending with one of the `|`-separated suffixes.
    #[must_use]
    pub fn extensions(mut self, suffixes: &str) -> Self {
        self.extensions = suffixes
            .split('|')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        self
    }

    /// Keeps files whose relative path contains one of `parts`.
    #[must_use]
    pub fn include<I, S>(mut self, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(parts.into_iter().map(Into::into));
        self
    }

    /// Skips files and directories whose name matches one of `patterns`.
    ///
    /// Patterns are exact names or `*` wildcards matched against the whole name.
    #[must_use]
    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Keeps files of cartridges in `generation`.
    #[must_use]
    pub fn generation(mut self, generation: Generation) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Directory searched, relative to the project root.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn matches_extension(&self, name: &str) -> bool {
        self.extensions.is_empty() || self.extensions.iter().any(|e| name.ends_with(e.as_str()))
    }

    fn matches_include(&self, relative: &str) -> bool {
        self.include.is_empty() || self.include.iter().any(|i| relative.contains(i.as_str()))
    }
}

/// The source tree of one project.
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
    exclude_changes: bool,
    exclude: Vec<String>,
    cartridges: CartridgeSet,
}

impl Corpus {
    /// Opens the tree at `root`.
    ///
    /// `exclude` applies to every query on top of the default excludes.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude pattern is invalid or the cartridges
    /// directory cannot be listed.
    pub fn open(
        root: impl Into<PathBuf>,
        exclude_changes: bool,
        exclude: &[String],
    ) -> Result<Self, AuditError> {
        let root = root.into();
        for pattern in exclude {
            Pattern::new(pattern)?;
        }
        let cartridges = list_cartridges(&root.join(CARTRIDGES_DIR))?;
        debug!(
            "Opened {} with {} cartridge(s)",
            root.display(),
            cartridges.len()
        );
        Ok(Self {
            root,
            exclude_changes,
            exclude: exclude.to_vec(),
            cartridges,
        })
    }

    /// Opens the tree named by `config.project.root`.
    ///
    /// # Errors
    ///
    /// See [`Corpus::open`].
    pub fn from_config(config: &Config) -> Result<Self, AuditError> {
        Self::open(
            config.project.root.clone(),
            config.project.exclude_changes_cartridges,
            &config.analyzer.exclude,
        )
    }

    /// Project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cartridges under `cartridges/`, bucketed by generation.
    #[must_use]
    pub fn cartridges(&self) -> &CartridgeSet {
        &self.cartridges
    }

    /// `path` relative to the root, `/`-separated.
    #[must_use]
    pub fn relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Files matching `query`, in path order.
    ///
    /// A missing directory yields no files.
    ///
    /// # Errors
    ///
    /// Returns an error on an invalid exclude pattern or a traversal failure.
    pub fn files(&self, query: &FileQuery) -> Result<Vec<SourceFile>, AuditError> {
        let dir = self.root.join(&query.dir);
        if !dir.is_dir() {
            warn!("{} does not exist, nothing to scan", dir.display());
            return Ok(Vec::new());
        }

        let skipped = self.skip_patterns(query)?;
        let skip = |entry: &DirEntry| {
            entry.depth() > 0
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| skipped.iter().any(|p| p.matches(name)))
        };

        let mut files = Vec::new();
        for entry in WalkDir::new(&dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !skip(e))
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !query.matches_extension(&name) {
                continue;
            }
            let relative = self.relative(entry.path());
            if !query.matches_include(&relative) {
                continue;
            }
            if let Some(generation) = query.generation {
                match cartridge_of(&relative) {
                    Some(cartridge) if Generation::classify(cartridge) == generation => {}
                    _ => continue,
                }
            }
            files.push(SourceFile::new(entry.into_path()));
        }

        debug!("{} file(s) under {}", files.len(), query.dir.display());
        Ok(files)
    }

    fn skip_patterns(&self, query: &FileQuery) -> Result<Vec<Pattern>, AuditError> {
        let changes = self.exclude_changes.then_some(CHANGES_CARTRIDGES);
        DEFAULT_EXCLUDES
            .iter()
            .copied()
            .chain(changes)
            .chain(self.exclude.iter().map(String::as_str))
            .chain(query.exclude.iter().map(String::as_str))
            .map(|p| Pattern::new(p).map_err(AuditError::from))
            .collect()
    }
}

/// Name of the cartridge a `/`-separated relative path lies in.
#[must_use]
pub fn cartridge_of(relative: &str) -> Option<&str> {
    let mut parts = relative.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(CARTRIDGES_DIR), Some(cartridge), Some(_)) => Some(cartridge),
        _ => None,
    }
}

fn list_cartridges(dir: &Path) -> Result<CartridgeSet, AuditError> {
    if !dir.is_dir() {
        warn!("No cartridges directory at {}", dir.display());
        return Ok(CartridgeSet::default());
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(CartridgeSet::from_names(names))
}
