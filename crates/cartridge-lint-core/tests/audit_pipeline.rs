//! Integration test: per-file and project rules end-to-end via Analyzer.
//!
//! Builds a small cartridge repository in a temp dir and checks what the
//! public API reports for it.

use cartridge_lint_core::docs::{DocType, DocumentSet, GuideGeneration};
use cartridge_lint_core::{
    markup, Analyzer, AuditError, Config, Corpus, FileContext, FileQuery, Generation,
    ProjectContext, ProjectRule, Rule, Severity, SourceFile, VerificationSession, Violation,
};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

struct TemplateStrings;

impl Rule for TemplateStrings {
    fn name(&self) -> &'static str {
        "template-strings"
    }
    fn code(&self) -> &'static str {
        "IT001"
    }
    fn description(&self) -> &'static str {
        "Hardcoded strings in templates"
    }
    fn default_severity(&self) -> Severity {
        Severity::Error
    }
    fn query(&self) -> FileQuery {
        FileQuery::cartridges().extensions(".isml")
    }
    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        markup::hardcoded_strings(ctx.content)
    }
}

struct SfraGuides;

impl ProjectRule for SfraGuides {
    fn name(&self) -> &'static str {
        "sfra-guides"
    }
    fn code(&self) -> &'static str {
        "IT100"
    }
    fn description(&self) -> &'static str {
        "Guides not mentioning storefront cartridges"
    }
    fn needs_documents(&self) -> bool {
        true
    }
    fn check_project(
        &self,
        ctx: &ProjectContext<'_>,
        session: &mut VerificationSession,
    ) -> Result<(), AuditError> {
        for guide in ctx.documents()?.guides(Some(Generation::Sfra))? {
            if !guide.content().contains("storefront") {
                let mut scope =
                    session.select(SourceFile::with_content(guide.path(), guide.content()));
                scope.add(format!("no storefront in {}", guide.name()), 0)?;
                scope.save();
            }
        }
        Ok(())
    }
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn write_docx(root: &Path, name: &str, text: &str) {
    let dir = root.join("documentation");
    std::fs::create_dir_all(&dir).unwrap();
    let mut zip = zip::ZipWriter::new(std::fs::File::create(dir.join(name)).unwrap());
    zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    let runs: String = text
        .split(' ')
        .map(|w| format!("<w:r><w:t>{w} </w:t></w:r>"))
        .collect();
    write!(zip, "<w:document><w:body><w:p>{runs}</w:p></w:body></w:document>").unwrap();
    zip.finish().unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "cartridges/app_custom_sfra/cartridge/templates/default/cart.isml",
        "<isdecorate template=\"common/layout/page\">\n<div>\n    Your cart\n</div>\n<span>${Resource.msg('cart.total','cart',null)}</span>\n</isdecorate>",
    );
    write(
        dir.path(),
        "cartridges/app_custom_sfra/cartridge/templates/default/empty.isml",
        "<div>${pdict.message}</div>",
    );
    write_docx(
        dir.path(),
        "Custom_SFRA_Implementation_Guide.docx",
        "Custom SFRA Implementation Guide Table of Contents 1. Summary 3 2. Setup 4 \
         Summary The cartridge plugs into checkout. Setup Upload the cartridge.",
    );
    write_docx(
        dir.path(),
        "Custom_Overview.docx",
        "Validation of the installation steps",
    );
    dir
}

#[test]
fn file_rule_reports_rows_of_failed_files_only() {
    let dir = fixture();
    let analyzer = Analyzer::builder()
        .root(dir.path())
        .rule(TemplateStrings)
        .build()
        .unwrap();

    let mut result = analyzer.analyze().unwrap();
    assert_eq!(result.files_checked, 2);
    assert!(result.has_errors());

    let session = &mut result.reports[0].session;
    assert_eq!(session.files_checked(), 2);
    assert_eq!(session.failed_audits().len(), 1);
    assert_eq!(session.violation_count(), 1);

    let report = session.report().unwrap();
    assert!(report.starts_with("Hardcoded strings in templates:\nSOURCE: "));
    assert!(report.contains("cart.isml"));
    assert!(report.contains("   row 2: Your cart"));
}

#[test]
fn project_rule_sees_classified_guides() {
    let dir = fixture();
    let analyzer = Analyzer::builder()
        .root(dir.path())
        .project_rule(SfraGuides)
        .build()
        .unwrap();

    let mut result = analyzer.analyze().unwrap();
    let report = result.format_test_report(Severity::Error).unwrap();
    assert!(report.contains("sfra-guides [IT100] error"));
    assert!(report.contains("no storefront in custom_sfra_implementation_guide.docx"));
    assert!(report.contains("Total: 1 error(s), 0 warning(s), 0 info(s)"));
}

#[test]
fn disabled_project_rules_do_not_load_documents() {
    let dir = TempDir::new().unwrap();
    let config = Config::parse("[rules.sfra-guides]\nenabled = false\n").unwrap();
    let analyzer = Analyzer::builder()
        .root(dir.path())
        .config(config)
        .project_rule(SfraGuides)
        .build()
        .unwrap();

    let result = analyzer.analyze().unwrap();
    assert!(result.reports.is_empty());
}

#[test]
fn missing_documentation_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let analyzer = Analyzer::builder()
        .root(dir.path())
        .project_rule(SfraGuides)
        .build()
        .unwrap();

    let err = analyzer.analyze().unwrap_err();
    assert!(matches!(err, AuditError::Configuration(_)));
}

#[tokio::test]
async fn documents_are_loaded_in_file_order_and_classified() {
    let dir = fixture();
    let corpus = Corpus::open(dir.path(), true, &[]).unwrap();
    let documents = DocumentSet::load(&corpus).await.unwrap();

    let docs = documents.documents();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].name(), "custom_overview.docx");
    assert_eq!(docs[0].doc_type(), DocType::Overview);
    assert_eq!(docs[1].doc_type(), DocType::Guide);
    assert_eq!(docs[1].generation(), Some(GuideGeneration::Sfra));

    assert_eq!(documents.guides(Some(Generation::Sfra)).unwrap().len(), 1);
    assert!(matches!(
        documents.guides(Some(Generation::Controllers)),
        Err(AuditError::Configuration(_))
    ));
    assert_eq!(docs[1].section("setup").unwrap(), "uploadthecartridge.");
}

#[test]
fn json_output_carries_paths_and_rows() {
    let dir = fixture();
    let analyzer = Analyzer::builder()
        .root(dir.path())
        .rule(TemplateStrings)
        .build()
        .unwrap();

    let mut result = analyzer.analyze().unwrap();
    result.reports[0].session.resolve_rows().unwrap();
    let json = serde_json::to_value(&result).unwrap();

    let audit = &json["reports"][0]["session"]["failed"][0];
    assert!(audit["file"].as_str().unwrap().ends_with("cart.isml"));
    assert_eq!(audit["violations"][0]["row"], 2);
    assert_eq!(json["reports"][0]["severity"], "error");
}
