//! Rule presets for common configurations.

use crate::{
    job_metadata, no_px_sizes, CartridgeVersionFormat, CloseReadersWriters,
    CloseSeekableIterators, ControllerJsonTests, GuideAvailability, GuideCompatibility,
    GuideSfraVersion, GuideTitleVersion, JobMetadata, LocalServiceRegistry, ManifestVersion,
    ModelCallsSuper, ModelUnitTests, NoControllerCalls, NoDsScripts, NoHardcodedTemplateStrings,
    NoHardcodedUrls, NoImportant, NoInlineStyles, NoPxSizes, NoReplacedEndpoints,
    NoSessionCustom, NoTodo, NoUnencodedIsprint, OverviewDocument, RepoLayout, RequirePathPrefix,
};
use cartridge_lint_core::{Config, ProjectRuleBox, RuleBox, Severity};
use std::str::FromStr;

/// Preset configurations for cartridge-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every code rule plus the version checks.
    Recommended,
    /// Everything, documentation included, with style rules raised to errors.
    Strict,
    /// Script safety rules for gradual adoption.
    Minimal,
}

impl Preset {
    /// Preset name as used in configuration.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Minimal => "minimal",
        }
    }

    /// Returns the per-file rules for this preset.
    #[must_use]
    pub fn rules(self, config: &Config) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(config),
            Self::Strict => strict_rules(config),
            Self::Minimal => minimal_rules(),
        }
    }

    /// Returns the project rules for this preset.
    #[must_use]
    pub fn project_rules(self, config: &Config) -> Vec<ProjectRuleBox> {
        match self {
            Self::Recommended => recommended_project_rules(),
            Self::Strict => strict_project_rules(config),
            Self::Minimal => Vec::new(),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "recommended" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            "minimal" => Ok(Self::Minimal),
            _ => Err(format!("Unknown preset: {s}")),
        }
    }
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only includes the script safety rules:
/// - `require-path-prefix` (CL001)
/// - `no-session-custom` (CL003)
/// - `close-readers-writers` (CL004)
/// - `close-seekable-iterators` (CL005)
/// - `local-service-registry` (CL007)
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![
        Box::new(RequirePathPrefix::new()),
        Box::new(NoSessionCustom::new()),
        Box::new(CloseReadersWriters::new()),
        Box::new(CloseSeekableIterators::new()),
        Box::new(LocalServiceRegistry::new()),
    ]
}

/// Returns the recommended set of rules: every per-file rule (CL001-CL019).
///
/// `[rules.<name>]` options of `config` are applied.
#[must_use]
pub fn recommended_rules(config: &Config) -> Vec<RuleBox> {
    vec![
        Box::new(RequirePathPrefix::new()),
        Box::new(NoTodo::new()),
        Box::new(NoSessionCustom::new()),
        Box::new(CloseReadersWriters::new()),
        Box::new(CloseSeekableIterators::new()),
        Box::new(NoDsScripts::new()),
        Box::new(LocalServiceRegistry::new()),
        Box::new(NoHardcodedUrls::new()),
        Box::new(NoPxSizes::from_config(config.rule(no_px_sizes::NAME))),
        Box::new(NoImportant::new()),
        Box::new(NoHardcodedTemplateStrings::new()),
        Box::new(NoUnencodedIsprint::new()),
        Box::new(NoInlineStyles::new()),
        Box::new(ModelUnitTests::new()),
        Box::new(ModelCallsSuper::new()),
        Box::new(ControllerJsonTests::new()),
        Box::new(NoReplacedEndpoints::new()),
        Box::new(NoControllerCalls::new()),
        Box::new(JobMetadata::from_config(config.rule(job_metadata::NAME))),
    ]
}

/// Returns the strict set of rules.
///
/// Same rules as [`recommended_rules`], with the warning-level rules
/// (`no-todo`, `no-px-sizes`, `no-important`, `no-inline-styles`) raised to errors.
#[must_use]
pub fn strict_rules(config: &Config) -> Vec<RuleBox> {
    vec![
        Box::new(RequirePathPrefix::new()),
        Box::new(NoTodo::new().severity(Severity::Error)),
        Box::new(NoSessionCustom::new()),
        Box::new(CloseReadersWriters::new()),
        Box::new(CloseSeekableIterators::new()),
        Box::new(NoDsScripts::new()),
        Box::new(LocalServiceRegistry::new()),
        Box::new(NoHardcodedUrls::new()),
        Box::new(
            NoPxSizes::from_config(config.rule(no_px_sizes::NAME)).severity(Severity::Error),
        ),
        Box::new(NoImportant::new().severity(Severity::Error)),
        Box::new(NoHardcodedTemplateStrings::new()),
        Box::new(NoUnencodedIsprint::new()),
        Box::new(NoInlineStyles::new().severity(Severity::Error)),
        Box::new(ModelUnitTests::new()),
        Box::new(ModelCallsSuper::new()),
        Box::new(ControllerJsonTests::new()),
        Box::new(NoReplacedEndpoints::new()),
        Box::new(NoControllerCalls::new()),
        Box::new(JobMetadata::from_config(config.rule(job_metadata::NAME))),
    ]
}

/// Returns all available per-file rules at their default severities.
#[must_use]
pub fn all_rules(config: &Config) -> Vec<RuleBox> {
    recommended_rules(config)
}

/// Returns the recommended project rules: the version and layout checks.
///
/// - `cartridge-version-format` (CL100)
/// - `manifest-version` (CL101)
/// - `repo-layout` (CL107)
#[must_use]
pub fn recommended_project_rules() -> Vec<ProjectRuleBox> {
    vec![
        Box::new(CartridgeVersionFormat::new()),
        Box::new(ManifestVersion::new()),
        Box::new(RepoLayout::new()),
    ]
}

/// Returns the strict project rules: the recommended ones plus the
/// documentation rules (CL102-CL106).
#[must_use]
pub fn strict_project_rules(config: &Config) -> Vec<ProjectRuleBox> {
    vec![
        Box::new(CartridgeVersionFormat::new()),
        Box::new(ManifestVersion::new()),
        Box::new(GuideTitleVersion::new()),
        Box::new(GuideSfraVersion::new()),
        Box::new(GuideCompatibility::new()),
        Box::new(GuideAvailability::from_config(
            config.rule(crate::guide_availability::NAME),
        )),
        Box::new(OverviewDocument::new()),
        Box::new(RepoLayout::new()),
    ]
}

/// Returns all available project rules.
#[must_use]
pub fn all_project_rules(config: &Config) -> Vec<ProjectRuleBox> {
    strict_project_rules(config)
}
