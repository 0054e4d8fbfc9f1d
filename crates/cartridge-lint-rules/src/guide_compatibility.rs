//! Rule to check the compatibility section of every guide.
//!
//! # Detected Patterns
//!
//! The section must name, after the matching keyword:
//!
//! - the platform version (`platform`, `api`, `sfcc` or `salesforce`)
//! - the compatibility mode (`compatibility`)
//! - the SFRA version, in guides covering SFRA (`sfra`)
//! - the SiteGenesis version, in guides covering controllers (`sitegen`, `genesis` or `sg`)
//!
//! The SFRA and SiteGenesis versions only need configuring when a guide
//! covering that generation exists.

use crate::guides::{alternative, audit_guides};
use cartridge_lint_core::docs::DocumentGuide;
use cartridge_lint_core::patterns::{
    ANY_COMPATIBILITY_MODE, ANY_PLATFORM_VERSION, ANY_SFRA_VERSION, ANY_SITEGEN_VERSION,
    COMPATIBILITY_MODE, PLATFORM_VERSION, SFRA_VERSION, SITEGEN_VERSION,
};
use cartridge_lint_core::{
    AuditError, Generation, ProjectConfig, ProjectContext, ProjectRule, Severity,
    VerificationSession,
};
use regex::Regex;

/// Rule code for guide-compatibility.
pub const CODE: &str = "CL104";

/// Rule name for guide-compatibility.
pub const NAME: &str = "guide-compatibility";

/// Section holding the supported versions.
const SECTION: &str = "compatibility";

/// One version the section must mention.
struct Requirement<'a> {
    label: &'static str,
    version: &'a str,
    pattern: Regex,
    any: &'static Regex,
    /// Generation a guide must cover for the requirement to apply.
    only_for: Option<Generation>,
}

impl Requirement<'_> {
    fn applies_to(&self, guide: &DocumentGuide) -> bool {
        self.only_for.map_or(true, |generation| {
            guide.generation().is_some_and(|g| g.covers(generation))
        })
    }
}

/// Requires compatibility sections to name the supported versions.
#[derive(Debug, Clone)]
pub struct GuideCompatibility {
    /// Severity level.
    pub severity: Severity,
}

impl Default for GuideCompatibility {
    fn default() -> Self {
        Self::new()
    }
}

impl GuideCompatibility {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl ProjectRule for GuideCompatibility {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Compatibility section should name the supported platform, compatibility mode and storefront versions"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn needs_documents(&self) -> bool {
        true
    }

    fn check_project(
        &self,
        ctx: &ProjectContext<'_>,
        session: &mut VerificationSession,
    ) -> Result<(), AuditError> {
        let project = &ctx.config.project;
        let guides = ctx.documents()?.guides(None)?;
        let covered = |generation: Generation| {
            guides
                .iter()
                .any(|g| g.generation().is_some_and(|c| c.covers(generation)))
        };

        let platform = ProjectConfig::require(&project.platform_version, "platform_version")?;
        let mode = ProjectConfig::require(&project.compatibility_mode, "compatibility_mode")?;
        let mut requirements = vec![
            Requirement {
                label: "platform version",
                version: platform,
                pattern: PLATFORM_VERSION.build(&[platform])?,
                any: &ANY_PLATFORM_VERSION,
                only_for: None,
            },
            Requirement {
                label: "compatibility mode",
                version: mode,
                pattern: COMPATIBILITY_MODE.build(&[mode])?,
                any: &ANY_COMPATIBILITY_MODE,
                only_for: None,
            },
        ];
        if covered(Generation::Sfra) {
            let sfra = ProjectConfig::require(&project.sfra_version, "sfra_version")?;
            requirements.push(Requirement {
                label: "sfra",
                version: sfra,
                pattern: SFRA_VERSION.build(&[sfra])?,
                any: &ANY_SFRA_VERSION,
                only_for: Some(Generation::Sfra),
            });
        }
        if covered(Generation::Controllers) {
            let sitegen = ProjectConfig::require(&project.sitegen_version, "sitegen_version")?;
            requirements.push(Requirement {
                label: "SiteGen version",
                version: sitegen,
                pattern: SITEGEN_VERSION.build(&[sitegen])?,
                any: &ANY_SITEGEN_VERSION,
                only_for: Some(Generation::Controllers),
            });
        }

        audit_guides(session, guides, |guide| {
            let section = guide.section(SECTION)?;
            Ok(requirements
                .iter()
                .filter(|r| r.applies_to(guide) && !r.pattern.is_match(section))
                .map(|r| {
                    format!(
                        "{} {} mentioning was not found in {SECTION} section of '{}'.{}",
                        r.label,
                        r.version,
                        guide.name(),
                        alternative(section, r.any)
                    )
                })
                .collect())
        })
    }
}
