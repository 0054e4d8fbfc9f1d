//! Locating and loading `cartridge-lint.toml`.
//!
//! The audited path may be a whole repository or a single cartridge inside
//! it, so project configs are searched from the audited path upward until the
//! directory holding `cartridges/`. Order:
//!
//! 1. `--config <path>`
//! 2. `cartridge-lint.toml` or `.cartridge-lint.toml`, nearest first
//! 3. `$CARTRIDGE_LINT_CONFIG_DIR/config.toml` or `~/.cartridge-lint/config.toml`
//! 4. built-in defaults

use anyhow::{Context, Result};
use cartridge_lint_core::{Config, CARTRIDGES_DIR};
use std::fmt;
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order in each directory.
pub const PROJECT_CONFIG_NAMES: &[&str] = &["cartridge-lint.toml", ".cartridge-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`; not checked for existence until loaded.
    Explicit(PathBuf),
    /// Found at or above the audited path.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Picks the source for auditing `audited`.
    #[must_use]
    pub fn resolve(audited: &Path, explicit: Option<&Path>) -> Self {
        Self::resolve_with(audited, explicit, global_config_dir().as_deref())
    }

    fn resolve_with(audited: &Path, explicit: Option<&Path>, global_dir: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::Explicit(path.to_path_buf());
        }
        if let Some(path) = find_project_config(audited) {
            return Self::Project(path);
        }
        global_dir
            .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
            .filter(|path| path.is_file())
            .map_or(Self::Default, Self::Global)
    }

    /// The config file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads and parses the config file, or returns defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not a valid config.
    pub fn load(&self) -> Result<Config> {
        tracing::info!("Using {self}");
        let Some(path) = self.path() else {
            return Ok(Config::default());
        };
        Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "config {}", p.display()),
            Self::Project(p) => write!(f, "project config {}", p.display()),
            Self::Global(p) => write!(f, "global config {}", p.display()),
            Self::Default => f.write_str("default config"),
        }
    }
}

/// Nearest project config between `audited` and the project root.
///
/// The root is the first ancestor holding `cartridges/`. Without one only
/// `audited` itself is searched.
fn find_project_config(audited: &Path) -> Option<PathBuf> {
    for dir in audited.ancestors() {
        let found = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file());
        if found.is_some() {
            tracing::debug!("Found project config in {}", dir.display());
            return found;
        }
        if dir.join(CARTRIDGES_DIR).is_dir() || !is_inside_project(dir) {
            break;
        }
    }
    None
}

fn is_inside_project(dir: &Path) -> bool {
    dir.ancestors().skip(1).any(|a| a.join(CARTRIDGES_DIR).is_dir())
}

/// `$CARTRIDGE_LINT_CONFIG_DIR`, else `~/.cartridge-lint`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("CARTRIDGE_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".cartridge-lint"))
}
