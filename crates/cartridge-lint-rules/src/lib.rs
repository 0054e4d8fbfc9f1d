//! # cartridge-lint-rules
//!
//! Built-in audit rules for cartridge-lint.
//!
//! Each rule scans one kind of artifact of a cartridge repository and reports
//! the text spans breaking a certification convention.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | CL001 | `require-path-prefix` | `require()` paths must be relative, `*/`, `~/`, `dw/` or `server` |
//! | CL002 | `no-todo` | Forbids `TODO` markers in cartridge code |
//! | CL003 | `no-session-custom` | Forbids `session.custom` and `session.getCustom()` |
//! | CL004 | `close-readers-writers` | Readers and writers must be closed |
//! | CL005 | `close-seekable-iterators` | Seekable iterators must be closed in the function opening them |
//! | CL006 | `no-ds-scripts` | Forbids `.ds` scripts outside pipelines cartridges |
//! | CL007 | `local-service-registry` | Requires `LocalServiceRegistry` over `ServiceRegistry` |
//! | CL008 | `no-hardcoded-urls` | Forbids URLs in client-side scripts |
//! | CL009 | `no-px-sizes` | Prefers em/rem over px above a threshold |
//! | CL010 | `no-important` | Forbids `!important` |
//! | CL011 | `no-hardcoded-template-strings` | Template text must come from resource bundles |
//! | CL012 | `no-unencoded-isprint` | Forbids `<isprint encoding="off">` |
//! | CL013 | `no-inline-styles` | Forbids `style=` attributes in templates |
//! | CL014 | `model-unit-tests` | Every model needs a unit test |
//! | CL015 | `model-calls-super` | Model constructors must call `super.call(` |
//! | CL016 | `controller-json-tests` | JSON endpoints need integration tests |
//! | CL017 | `no-replaced-endpoints` | SFRA routes must be prepended or appended, not replaced |
//! | CL018 | `no-controller-calls` | SiteGenesis controllers must not call other controllers |
//! | CL019 | `job-metadata` | Job metadata must target `RefArch` and not `.ds` modules |
//! | CL100 | `cartridge-version-format` | Configured version must be `YY.N.N` for the current year |
//! | CL101 | `manifest-version` | `package.json` version must equal the configured version |
//! | CL102 | `guide-title-version` | Guides name the cartridge version on their title page |
//! | CL103 | `guide-sfra-version` | SFRA guides name the SFRA version on their title page |
//! | CL104 | `guide-compatibility` | Compatibility sections name the supported versions |
//! | CL105 | `guide-availability` | Guides describe behavior when the service is down |
//! | CL106 | `overview-document` | An installation overview document is provided |
//! | CL107 | `repo-layout` | `paths.base` points at the sibling SFRA checkout |
//!
//! ## Usage
//!
//! ```ignore
//! use cartridge_lint_core::Analyzer;
//! use cartridge_lint_rules::{NoTodo, CloseReadersWriters};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./my-cartridges")
//!     .rule(NoTodo::new())
//!     .rule(CloseReadersWriters::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cartridge_version_format;
mod close_readers_writers;
mod close_seekable_iterators;
mod controller_json_tests;
mod guide_availability;
mod guide_compatibility;
mod guide_sfra_version;
mod guide_title_version;
mod guides;
mod job_metadata;
mod local_service_registry;
mod manifest_version;
mod model_calls_super;
mod no_controller_calls;
mod no_ds_scripts;
mod no_hardcoded_template_strings;
mod no_hardcoded_urls;
mod no_important;
mod no_inline_styles;
mod no_px_sizes;
mod no_replaced_endpoints;
mod no_session_custom;
mod no_todo;
mod no_unencoded_isprint;
mod overview_document;
mod presets;
pub mod queries;
mod repo_layout;
mod require_path_prefix;

pub use cartridge_version_format::CartridgeVersionFormat;
pub use close_readers_writers::CloseReadersWriters;
pub use close_seekable_iterators::{CloseSeekableIterators, SeekableIteratorCatalog};
pub use controller_json_tests::ControllerJsonTests;
pub use guide_availability::GuideAvailability;
pub use guide_compatibility::GuideCompatibility;
pub use guide_sfra_version::GuideSfraVersion;
pub use guide_title_version::GuideTitleVersion;
pub use job_metadata::JobMetadata;
pub use local_service_registry::LocalServiceRegistry;
pub use manifest_version::ManifestVersion;
pub use model_calls_super::ModelCallsSuper;
pub use model_unit_tests::ModelUnitTests;
pub use no_controller_calls::NoControllerCalls;
pub use no_ds_scripts::NoDsScripts;
pub use no_hardcoded_template_strings::NoHardcodedTemplateStrings;
pub use no_hardcoded_urls::NoHardcodedUrls;
pub use no_important::NoImportant;
pub use no_inline_styles::NoInlineStyles;
pub use no_px_sizes::NoPxSizes;
pub use no_replaced_endpoints::NoReplacedEndpoints;
pub use no_session_custom::NoSessionCustom;
pub use no_todo::NoTodo;
pub use no_unencoded_isprint::NoUnencodedIsprint;
pub use overview_document::OverviewDocument;
pub use presets::{
    all_project_rules, all_rules, minimal_rules, recommended_project_rules, recommended_rules,
    strict_project_rules, strict_rules, Preset,
};
pub use repo_layout::RepoLayout;
pub use require_path_prefix::RequirePathPrefix;

/// Re-export core types for convenience.
pub use cartridge_lint_core::{ProjectRule, Rule, Severity, Violation};

#[cfg(test)]
pub(crate) mod testing {
    use cartridge_lint_core::{
        Analyzer, Config, Corpus, FileContext, ProjectRule, Rule, SourceFile,
        VerificationSession, Violation,
    };
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// An SFRA implementation guide for cartridge version 26.1.0.
    pub(crate) const SFRA_GUIDE: &str = "Int Custom SFRA Implementation Guide \
        Version 26.1.0 for SFRA 5.3.0 \
        Table of Contents 1. Summary 3 2. Component Overview 4 3. Compatibility 5 4. Availability 6 \
        Summary This cartridge connects the storefront to the custom service. \
        Component Overview The cartridge contains controllers, models and scripts. \
        Compatibility Available for platform 21.2 with compatibility mode 19.10 and SFRA 5.3.0 \
        Availability If the custom service is down, the storefront keeps working: checkout falls back \
        to the default payment flow and a message is shown to the shopper until the service recovers.";

    /// Project versions matching [`SFRA_GUIDE`].
    pub(crate) const VERSIONS: &str = "[project]\n\
        cartridge_version = \"26.1.0\"\n\
        platform_version = \"21.2\"\n\
        compatibility_mode = \"19.10\"\n\
        sfra_version = \"5.3.0\"\n\
        sitegen_version = \"105.0.0\"\n";

    /// Runs `rule` on `code` as if it lived at `relative` in an empty project.
    pub(crate) fn check_code(rule: &dyn Rule, relative: &str, code: &str) -> Vec<Violation> {
        let dir = tempfile::tempdir().unwrap();
        let corpus = Corpus::open(dir.path(), true, &[]).unwrap();
        let config = Config::default();
        let file = SourceFile::with_content(dir.path().join(relative), code);
        rule.check(&FileContext::new(&file, code, &corpus, &config))
            .unwrap()
    }

    pub(crate) fn texts(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(Violation::text).collect()
    }

    /// Writes `files` into a fresh project directory.
    pub(crate) fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let path = dir.path().join(path);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        dir
    }

    /// Writes a minimal `.docx` whose body is `text`, one run per word.
    pub(crate) fn docx(root: &Path, name: &str, text: &str) -> PathBuf {
        let dir = root.join("documentation");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut zip = zip::ZipWriter::new(std::fs::File::create(&path).unwrap());
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        zip.start_file("word/document.xml", options).unwrap();
        let runs: String = text
            .split(' ')
            .map(|w| format!("<w:r><w:t>{w} </w:t></w:r>"))
            .collect();
        write!(zip, "<w:document><w:body><w:p>{runs}</w:p></w:body></w:document>").unwrap();
        zip.finish().unwrap();
        path
    }

    /// Runs a per-file rule over a project directory.
    pub(crate) fn run_rule<R: Rule + 'static>(root: &Path, rule: R) -> VerificationSession {
        let analyzer = Analyzer::builder().root(root).rule(rule).build().unwrap();
        analyzer.analyze().unwrap().reports.remove(0).session
    }

    /// Runs a project rule over a project directory with `config`.
    pub(crate) fn run_project_rule<R: ProjectRule + 'static>(
        root: &Path,
        config: &str,
        rule: R,
    ) -> Result<VerificationSession, cartridge_lint_core::AuditError> {
        let analyzer = Analyzer::builder()
            .root(root)
            .config(Config::parse(config).unwrap())
            .project_rule(rule)
            .build()?;
        Ok(analyzer.analyze()?.reports.remove(0).session)
    }

    /// Messages of every failed audit, in order.
    pub(crate) fn messages(session: &VerificationSession) -> Vec<String> {
        session
            .failed_audits()
            .iter()
            .flat_map(|a| a.violations().iter().map(|v| v.text().to_string()))
            .collect()
    }
}
