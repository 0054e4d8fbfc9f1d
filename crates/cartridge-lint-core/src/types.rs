//! Core types for violations, file audits and results.

use crate::error::AuditError;
use crate::session::VerificationSession;
use crate::source::SourceFile;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt::Write as _;

/// Severity level for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail the audit.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed before certification.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            other => Err(AuditError::Configuration(format!(
                "unknown severity `{other}`. Valid values: error, warning, info"
            ))),
        }
    }
}

/// A located text span that breaks a convention.
///
/// `offset` is a byte offset into the owning file's content. The row stays
/// `None` until [`FileAudit::resolve_rows`] runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    text: String,
    offset: usize,
    row: Option<usize>,
}

impl Violation {
    /// Creates an unresolved violation.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidArgument`] if `text` is empty.
    pub fn new(text: impl Into<String>, offset: usize) -> Result<Self, AuditError> {
        let text = text.into();
        if text.is_empty() {
            return Err(AuditError::InvalidArgument(format!(
                "violation text must not be empty (offset {offset})"
            )));
        }
        Ok(Self {
            text,
            offset,
            row: None,
        })
    }

    /// The offending text as found.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset in the file content.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Resolved 1-based row, if resolution ran.
    #[must_use]
    pub fn row(&self) -> Option<usize> {
        self.row
    }

    /// Text for display, optionally collapsed onto one line.
    #[must_use]
    pub fn display_text(&self, beautify: bool) -> Cow<'_, str> {
        if beautify {
            Cow::Owned(beautify_text(&self.text))
        } else {
            Cow::Borrowed(&self.text)
        }
    }

    /// One report line: `   row N: text`, or `   text` when unresolved.
    #[must_use]
    pub fn message(&self, beautify: bool) -> String {
        let text = self.display_text(beautify);
        match self.row {
            Some(row) => format!("   row {row}: {text}"),
            None => format!("   {text}"),
        }
    }
}

/// Collapses whitespace runs to a single space and trims both ends.
#[must_use]
pub fn beautify_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 1-based row of `offset` given the sorted newline offsets of its file.
///
/// Offsets past the last newline land on the row after it.
#[must_use]
pub fn row_of(newlines: &[usize], offset: usize) -> usize {
    newlines.partition_point(|&n| n < offset) + 1
}

/// Resolves rows for all violations in one merge pass over `newlines`.
fn resolve_rows(newlines: &[usize], violations: &mut [Violation]) {
    let mut order: Vec<usize> = (0..violations.len()).collect();
    order.sort_by_key(|&i| violations[i].offset);

    let mut passed = 0;
    for i in order {
        let offset = violations[i].offset;
        while passed < newlines.len() && newlines[passed] < offset {
            passed += 1;
        }
        violations[i].row = Some(passed + 1);
    }
}

/// Report rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Resolve and print `row N:` prefixes.
    pub rows: bool,
    /// Collapse violation text onto one line.
    pub beautify: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            rows: true,
            beautify: true,
        }
    }
}

/// All violations of one rule found in one file.
#[derive(Debug, Serialize)]
pub struct FileAudit {
    #[serde(serialize_with = "serialize_path")]
    file: SourceFile,
    violations: Vec<Violation>,
}

fn serialize_path<S: Serializer>(file: &SourceFile, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&file.path().to_string_lossy())
}

impl FileAudit {
    /// Starts an empty audit of `file`.
    #[must_use]
    pub fn new(file: SourceFile) -> Self {
        Self {
            file,
            violations: Vec::new(),
        }
    }

    /// The audited file.
    #[must_use]
    pub fn file(&self) -> &SourceFile {
        &self.file
    }

    /// Violations in discovery order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Appends a violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// True if any violation was recorded.
    #[must_use]
    pub fn failed(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Resolves the row of every violation. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns an error if the file content cannot be read.
    pub fn resolve_rows(&mut self) -> Result<(), AuditError> {
        let newlines = self.file.newline_offsets()?;
        resolve_rows(newlines, &mut self.violations);
        Ok(())
    }

    /// Formats `SOURCE: <path>` followed by one line per violation.
    ///
    /// # Errors
    ///
    /// Returns an error if rows are requested and the file cannot be read.
    pub fn report(&mut self, options: ReportOptions) -> Result<String, AuditError> {
        if options.rows {
            self.resolve_rows()?;
        }
        let mut out = format!("SOURCE: {}", self.file.path().display());
        for v in &self.violations {
            let _ = write!(out, "\n{}", v.message(options.beautify));
        }
        Ok(out)
    }
}

/// Outcome of one rule over the whole corpus.
#[derive(Debug, Serialize)]
pub struct RuleReport {
    /// Rule code (e.g., "CL011").
    pub code: String,
    /// Rule name (e.g., "no-hardcoded-template-strings").
    pub rule: String,
    /// Effective severity.
    pub severity: Severity,
    /// Collected audits.
    pub session: VerificationSession,
}

impl RuleReport {
    /// True if the rule found nothing.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.session.is_successful()
    }
}

/// Result of running an audit.
#[derive(Debug, Default, Serialize)]
pub struct AuditResult {
    /// One report per executed rule, in registration order.
    pub reports: Vec<RuleReport>,
    /// Number of distinct files scanned by per-file rules.
    pub files_checked: usize,
}

impl AuditResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports of rules that found violations.
    pub fn failed(&self) -> impl Iterator<Item = &RuleReport> {
        self.reports.iter().filter(|r| !r.passed())
    }

    /// Returns true if any failing rule is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_failures_at(Severity::Error)
    }

    /// Checks if any failing rule meets or exceeds `severity`.
    #[must_use]
    pub fn has_failures_at(&self, severity: Severity) -> bool {
        self.failed().any(|r| r.severity >= severity)
    }

    /// Counts failing rules by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.failed().filter(|r| r.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Formats failing rules as a test failure report.
    ///
    /// Produces a human-readable multi-line report suitable for `panic!()` messages
    /// in `cargo test` integration.
    ///
    /// # Errors
    ///
    /// Returns an error if row resolution needs a file that can no longer be read.
    pub fn format_test_report(&mut self, fail_on: Severity) -> Result<String, AuditError> {
        let failing = self
            .reports
            .iter()
            .filter(|r| !r.passed() && r.severity >= fail_on)
            .count();

        let mut report = String::new();
        let _ = writeln!(
            report,
            "\n=== cartridge-lint: {failing} failing rule(s) ===\n"
        );

        for r in &mut self.reports {
            if r.passed() || r.severity < fail_on {
                continue;
            }
            let _ = writeln!(report, "{} [{}] {}", r.rule, r.code, r.severity);
            let _ = writeln!(report, "{}", r.session.report()?);
        }

        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Total: {} error(s), {} warning(s), {} info(s) over {} rule(s) and {} file(s)",
            errors,
            warnings,
            infos,
            self.reports.len(),
            self.files_checked
        );

        Ok(report)
    }
}
