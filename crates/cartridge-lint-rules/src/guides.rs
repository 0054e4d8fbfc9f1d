//! Shared plumbing of the documentation rules.

use cartridge_lint_core::docs::{DocumentError, DocumentGuide};
use cartridge_lint_core::{AuditError, SourceFile, VerificationSession};
use regex::Regex;

/// Audits each guide with `check`, recording its messages against the guide.
///
/// A guide too malformed to check fails with the structural problem as its
/// only message.
pub(crate) fn audit_guides<'d, I, F>(
    session: &mut VerificationSession,
    guides: I,
    mut check: F,
) -> Result<(), AuditError>
where
    I: IntoIterator<Item = &'d DocumentGuide>,
    F: FnMut(&DocumentGuide) -> Result<Vec<String>, DocumentError>,
{
    for guide in guides {
        let messages = check(guide).unwrap_or_else(|e| vec![e.to_string()]);
        let mut scope = session.select(SourceFile::with_content(guide.path(), guide.content()));
        for message in messages {
            scope.add(message, 0)?;
        }
        scope.save();
    }
    Ok(())
}

/// `" Instead was found: <match>"` for the first match of `pattern`, or "".
pub(crate) fn alternative(text: &str, pattern: &Regex) -> String {
    pattern
        .find(text)
        .map(|m| format!(" Instead was found: {}", m.as_str()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartridge_lint_core::patterns::ANY_CARTRIDGE_VERSION;
    use cartridge_lint_core::CartridgeSet;

    #[test]
    fn test_alternative() {
        assert_eq!(
            alternative("guideversion25.2.0", &ANY_CARTRIDGE_VERSION),
            " Instead was found: version25.2.0"
        );
        assert_eq!(alternative("guide", &ANY_CARTRIDGE_VERSION), "");
    }

    #[test]
    fn test_structural_errors_become_messages() {
        let guide = DocumentGuide::new("a_guide.docx", "no toc", &CartridgeSet::default());
        let mut session = VerificationSession::new("Guides");
        audit_guides(&mut session, [&guide], |g| Ok(vec![g.first_page()?.to_string()])).unwrap();
        assert_eq!(session.violation_count(), 1);
        assert_eq!(
            session.failed_audits()[0].violations()[0].text(),
            "no table of contents found"
        );
    }
}
