//! Core analyzer for orchestrating audit execution.

use crate::config::{Config, RuleConfig};
use crate::context::{FileContext, ProjectContext};
use crate::corpus::Corpus;
use crate::docs::DocumentSet;
use crate::error::AuditError;
use crate::rule::{ProjectRule, ProjectRuleBox, Rule, RuleBox};
use crate::session::VerificationSession;
use crate::types::{AuditResult, ReportOptions, RuleReport, Severity};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    project_rules: Vec<ProjectRuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    report_options: ReportOptions,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project root, overriding `project.root` from the config.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a per-file rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed per-file rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds a project-wide rule to the analyzer.
    #[must_use]
    pub fn project_rule<R: ProjectRule + 'static>(mut self, rule: R) -> Self {
        self.project_rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed project-wide rule to the analyzer.
    #[must_use]
    pub fn project_rule_box(mut self, rule: ProjectRuleBox) -> Self {
        self.project_rules.push(rule);
        self
    }

    /// Adds an exclude name pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude name patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets how session reports are rendered.
    #[must_use]
    pub fn report_options(mut self, options: ReportOptions) -> Self {
        self.report_options = options;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory is needed and unavailable,
    /// an exclude pattern is invalid or the cartridges cannot be listed.
    pub fn build(self) -> Result<Analyzer, AuditError> {
        let config = self.config.unwrap_or_default();
        let root = self.root.unwrap_or_else(|| config.project.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());

        let corpus = Corpus::open(
            root,
            config.project.exclude_changes_cartridges,
            &exclude_patterns,
        )?;

        Ok(Analyzer {
            corpus,
            rules: self.rules,
            project_rules: self.project_rules,
            config,
            report_options: self.report_options,
        })
    }
}

/// The main analyzer that orchestrates audit execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    corpus: Corpus,
    rules: Vec<RuleBox>,
    project_rules: Vec<ProjectRuleBox>,
    config: Config,
    report_options: ReportOptions,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the project root being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.corpus.root()
    }

    /// Returns the corpus being analyzed.
    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len() + self.project_rules.len()
    }

    /// Runs every enabled rule and returns one report per rule.
    ///
    /// Documentation is loaded only if an enabled project rule needs it.
    ///
    /// # Errors
    ///
    /// Returns the first configuration, IO or scan error; no partial result
    /// is returned.
    pub fn analyze(&self) -> Result<AuditResult, AuditError> {
        info!("Starting analysis at {}", self.root().display());

        let mut result = AuditResult::new();
        let mut scanned = HashSet::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }
            let session = self.run_rule(rule.as_ref(), &mut scanned)?;
            result.reports.push(RuleReport {
                code: rule.code().to_string(),
                rule: rule.name().to_string(),
                severity: self.severity(rule.name(), rule.default_severity()),
                session,
            });
        }

        let project_rules: Vec<_> = self
            .project_rules
            .iter()
            .filter(|r| {
                let enabled = self.config.is_rule_enabled(r.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", r.name());
                }
                enabled
            })
            .collect();

        let documents = if project_rules.iter().any(|r| r.needs_documents()) {
            Some(DocumentSet::load_blocking(&self.corpus)?)
        } else {
            None
        };
        let mut project_ctx = ProjectContext::new(&self.corpus, &self.config);
        if let Some(documents) = &documents {
            project_ctx = project_ctx.with_documents(documents);
        }

        for rule in project_rules {
            let mut session = self.session(rule.description());
            rule.check_project(&project_ctx, &mut session)?;
            result.reports.push(RuleReport {
                code: rule.code().to_string(),
                rule: rule.name().to_string(),
                severity: self.severity(rule.name(), rule.default_severity()),
                session,
            });
        }

        result.files_checked = scanned.len();
        let failed = result.failed().count();
        if failed > 0 {
            warn!("{failed} rule(s) found violations");
        }
        info!(
            "Analysis complete: {} rule(s) over {} file(s)",
            result.reports.len(),
            result.files_checked
        );

        Ok(result)
    }

    fn run_rule(
        &self,
        rule: &dyn Rule,
        scanned: &mut HashSet<PathBuf>,
    ) -> Result<VerificationSession, AuditError> {
        let mut session = self.session(rule.description());
        let files = self.corpus.files(&rule.query())?;
        debug!("{}: {} file(s)", rule.name(), files.len());

        for file in files {
            scanned.insert(file.path().to_path_buf());
            let mut scope = session.select(file);
            scope.record(|file| {
                let content = file.content()?;
                let ctx = FileContext::new(file, content, &self.corpus, &self.config);
                rule.check(&ctx).map_err(|e| e.in_file(file.path()))
            })?;
            scope.save();
        }
        Ok(session)
    }

    fn session(&self, issue: &str) -> VerificationSession {
        VerificationSession::new(issue).with_options(self.report_options)
    }

    fn severity(&self, rule_name: &str, default: Severity) -> Severity {
        self.config.rule_severity(rule_name).unwrap_or(default)
    }

    /// Gets the rule configuration for a specific rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.config.rule(rule_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::FileQuery;
    use crate::error::ScanError;
    use crate::source::SourceFile;
    use crate::types::Violation;
    use std::fs;

    struct Debugger;

    impl Rule for Debugger {
        fn name(&self) -> &'static str {
            "no-debugger"
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn description(&self) -> &'static str {
            "Debugger statements"
        }
        fn default_severity(&self) -> Severity {
            Severity::Warning
        }
        fn query(&self) -> FileQuery {
            FileQuery::cartridges().extensions(".js")
        }
        fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
            if ctx.content.contains("unterminated") {
                return Err(ScanError::UnterminatedTag { offset: 0 }.into());
            }
            ctx.content
                .match_indices("debugger;")
                .map(|(i, m)| Violation::new(m, i))
                .collect()
        }
    }

    struct Readme;

    impl ProjectRule for Readme {
        fn name(&self) -> &'static str {
            "readme"
        }
        fn code(&self) -> &'static str {
            "T100"
        }
        fn description(&self) -> &'static str {
            "Missing readme"
        }
        fn default_severity(&self) -> Severity {
            Severity::Warning
        }
        fn check_project(
            &self,
            ctx: &ProjectContext<'_>,
            session: &mut VerificationSession,
        ) -> Result<(), AuditError> {
            let path = ctx.corpus.root().join("README.md");
            if !path.exists() {
                let mut scope = session.select(SourceFile::with_content(path, "README.md"));
                scope.add("README.md", 0)?;
                scope.save();
            }
            Ok(())
        }
    }

    fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let path = dir.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_builder() {
        let dir = project(&[]);
        let analyzer = Analyzer::builder()
            .root(dir.path())
            .rule(Debugger)
            .project_rule(Readme)
            .build()
            .expect("Failed to build analyzer");

        assert_eq!(analyzer.root(), dir.path());
        assert_eq!(analyzer.rule_count(), 2);
    }

    #[test]
    fn test_analyze_collects_failed_files_only() {
        let dir = project(&[
            ("cartridges/app/cartridge/a.js", "var a;\ndebugger;\n"),
            ("cartridges/app/cartridge/b.js", "var b;\n"),
        ]);
        let analyzer = Analyzer::builder()
            .root(dir.path())
            .rule(Debugger)
            .project_rule(Readme)
            .build()
            .unwrap();

        let mut result = analyzer.analyze().unwrap();
        assert_eq!(result.files_checked, 2);
        assert_eq!(result.reports.len(), 2);

        let debugger = &result.reports[0];
        assert_eq!(debugger.severity, Severity::Warning);
        assert_eq!(debugger.session.failed_audits().len(), 1);
        assert_eq!(debugger.session.files_checked(), 2);
        assert!(!result.reports[1].passed());
        assert_eq!(result.reports[1].severity, Severity::Warning);

        assert!(!result.has_errors());
        assert!(result.has_failures_at(Severity::Warning));
        let report = result.format_test_report(Severity::Warning).unwrap();
        assert!(report.contains("Debugger statements:"));
        assert!(report.contains("row 2:"));
    }

    #[test]
    fn test_config_disables_and_overrides() {
        let dir = project(&[("cartridges/app/cartridge/a.js", "debugger;")]);
        let config = Config::parse(
            "[rules.no-debugger]\nseverity = \"error\"\n[rules.readme]\nenabled = false\n",
        )
        .unwrap();
        let analyzer = Analyzer::builder()
            .root(dir.path())
            .config(config)
            .rule(Debugger)
            .project_rule(Readme)
            .build()
            .unwrap();

        let result = analyzer.analyze().unwrap();
        assert_eq!(result.reports.len(), 1);
        assert!(result.has_errors());
    }

    #[test]
    fn test_scan_errors_name_the_file() {
        let dir = project(&[("cartridges/app/cartridge/bad.js", "unterminated")]);
        let analyzer = Analyzer::builder()
            .root(dir.path())
            .rule(Debugger)
            .build()
            .unwrap();

        let err = analyzer.analyze().unwrap_err();
        assert!(matches!(err, AuditError::MalformedInput { .. }));
        assert!(err.to_string().contains("bad.js"));
    }

    #[test]
    fn test_excluded_names_are_skipped() {
        let dir = project(&[
            ("cartridges/app/cartridge/a.js", "debugger;"),
            ("cartridges/app/cartridge/lib/b.js", "debugger;"),
        ]);
        let analyzer = Analyzer::builder()
            .root(dir.path())
            .exclude("lib")
            .rule(Debugger)
            .build()
            .unwrap();

        let result = analyzer.analyze().unwrap();
        assert_eq!(result.files_checked, 1);
    }
}
