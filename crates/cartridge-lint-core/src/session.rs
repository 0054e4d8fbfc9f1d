//! Verification sessions: per-rule collection of failed file audits.
//!
//! A file is audited through an [`AuditScope`], which mutably borrows its
//! session. While a scope is alive no other file can be selected, and
//! violations cannot be added once the scope is saved or discarded.

use crate::error::AuditError;
use crate::source::SourceFile;
use crate::types::{FileAudit, ReportOptions, Violation};
use serde::Serialize;
use tracing::debug;

/// Failed audits of one rule across all files it scanned.
#[derive(Debug, Serialize)]
pub struct VerificationSession {
    issue: String,
    options: ReportOptions,
    failed: Vec<FileAudit>,
    files_checked: usize,
}

impl VerificationSession {
    /// Creates a session for the issue described by `issue`.
    #[must_use]
    pub fn new(issue: impl Into<String>) -> Self {
        Self {
            issue: issue.into(),
            options: ReportOptions::default(),
            failed: Vec::new(),
            files_checked: 0,
        }
    }

    /// Sets how reports are rendered.
    #[must_use]
    pub fn with_options(mut self, options: ReportOptions) -> Self {
        self.options = options;
        self
    }

    /// Short description of the verified issue.
    #[must_use]
    pub fn issue(&self) -> &str {
        &self.issue
    }

    /// Opens an audit of `file`.
    pub fn select(&mut self, file: SourceFile) -> AuditScope<'_> {
        debug!("Auditing {}", file.path().display());
        self.files_checked += 1;
        AuditScope {
            audit: Some(FileAudit::new(file)),
            session: self,
        }
    }

    /// True if no audited file failed.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.failed.is_empty()
    }

    /// Failed audits in the order their files were saved.
    #[must_use]
    pub fn failed_audits(&self) -> &[FileAudit] {
        &self.failed
    }

    /// Number of files selected during the session.
    #[must_use]
    pub fn files_checked(&self) -> usize {
        self.files_checked
    }

    /// Total number of violations over all failed audits.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.failed.iter().map(|a| a.violations().len()).sum()
    }

    /// Resolves the row of every recorded violation.
    ///
    /// # Errors
    ///
    /// Returns an error if a failed file cannot be read.
    pub fn resolve_rows(&mut self) -> Result<(), AuditError> {
        self.failed.iter_mut().try_for_each(FileAudit::resolve_rows)
    }

    /// Consolidates all failed audits: `<issue>:\n<audit>\n\n<audit>...`.
    ///
    /// # Errors
    ///
    /// Returns an error if row resolution needs a file that cannot be read.
    pub fn report(&mut self) -> Result<String, AuditError> {
        let options = self.options;
        let audits = self
            .failed
            .iter_mut()
            .map(|a| a.report(options))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("{}:\n{}\n", self.issue, audits.join("\n\n")))
    }
}

/// An open audit of one file inside a [`VerificationSession`].
///
/// Dropping a scope without calling [`save`](Self::save) discards it.
#[derive(Debug)]
pub struct AuditScope<'s> {
    session: &'s mut VerificationSession,
    audit: Option<FileAudit>,
}

impl AuditScope<'_> {
    /// The file being audited.
    ///
    /// # Panics
    ///
    /// Never: the audit is only taken by `save`/`discard`, which consume the scope.
    #[must_use]
    #[allow(clippy::missing_panics_doc)]
    pub fn file(&self) -> &SourceFile {
        match &self.audit {
            Some(audit) => audit.file(),
            None => unreachable!("audit scope used after close"),
        }
    }

    /// Records a violation.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidArgument`] for empty text.
    pub fn add(&mut self, text: impl Into<String>, offset: usize) -> Result<(), AuditError> {
        let violation = Violation::new(text, offset)?;
        self.push(violation);
        Ok(())
    }

    /// Records already built violations.
    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        for v in violations {
            self.push(v);
        }
    }

    /// Runs `check` against the file and records what it returns.
    ///
    /// # Errors
    ///
    /// Propagates the error of `check`.
    pub fn record<F>(&mut self, check: F) -> Result<(), AuditError>
    where
        F: FnOnce(&SourceFile) -> Result<Vec<Violation>, AuditError>,
    {
        let found = check(self.file())?;
        self.extend(found);
        Ok(())
    }

    fn push(&mut self, violation: Violation) {
        if let Some(audit) = &mut self.audit {
            audit.push(violation);
        }
    }

    /// Closes the scope, keeping the audit if it failed. Returns whether it did.
    pub fn save(mut self) -> bool {
        match self.audit.take() {
            Some(audit) if audit.failed() => {
                self.session.failed.push(audit);
                true
            }
            _ => false,
        }
    }

    /// Closes the scope and drops whatever was recorded.
    pub fn discard(mut self) {
        self.audit = None;
    }
}

impl Drop for AuditScope<'_> {
    fn drop(&mut self) {
        if let Some(audit) = &self.audit {
            debug!(
                "Discarding unsaved audit of {} ({} violation(s))",
                audit.file().path().display(),
                audit.violations().len()
            );
        }
    }
}
