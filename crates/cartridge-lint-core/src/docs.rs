//! Documentation archives: extraction, classification and section lookup.
//!
//! Documents are `.docx` files under `documentation/`. Their text is
//! lower-cased with all whitespace removed, so every search in this module
//! works on that normalized form.

use crate::corpus::{CartridgeSet, Corpus, FileQuery, Generation};
use crate::error::AuditError;
use crate::patterns::{TOC_BULLET, TOC_CUSTOM_CONTROLLER};
use serde::Serialize;
use std::cell::OnceCell;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Directory holding the documentation, relative to the project root.
pub const DOCUMENTATION_DIR: &str = "documentation";

/// Archive member holding the document body.
const DOCUMENT_XML: &str = "word/document.xml";

/// Structural problem in one document. Rules report these as violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Neither "table of contents" nor "contents" occurs.
    #[error("no table of contents found")]
    MissingTableOfContents,

    /// The table of contents has no numbered entry.
    #[error("table of contents has no numbered entries")]
    EmptyTableOfContents,

    /// The first entry of the table of contents never occurs as a heading.
    #[error("heading `{0}` from the table of contents not found in the document body")]
    MissingHeading(String),

    /// The requested section is not listed in the table of contents.
    #[error("section `{0}` is not listed in the table of contents")]
    MissingSection(String),
}

/// Kind of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocType {
    /// Implementation guide.
    Guide,
    /// Test case listing.
    TestCases,
    /// Installation overview / validation document.
    Overview,
    /// No classifier rule matched.
    Unclassified,
}

/// Storefront generation(s) a guide covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideGeneration {
    /// SFRA only.
    Sfra,
    /// SiteGenesis controllers only.
    Controllers,
    /// SFRA and SiteGenesis controllers.
    Mixed,
    /// SiteGenesis pipelines.
    Pipelines,
    /// No classifier rule matched.
    Unclassified,
}

impl GuideGeneration {
    /// True if a guide of this generation documents `generation` cartridges.
    #[must_use]
    pub fn covers(self, generation: Generation) -> bool {
        matches!(
            (self, generation),
            (Self::Sfra | Self::Mixed, Generation::Sfra)
                | (Self::Controllers | Self::Mixed, Generation::Controllers)
                | (Self::Pipelines, Generation::Pipelines)
        )
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Guide => "guide",
            Self::TestCases => "test cases",
            Self::Overview => "overview",
            Self::Unclassified => "unclassified",
        })
    }
}

type DocRule = (DocType, fn(&str, &str) -> bool);

/// Document type rules, first match wins.
const DOC_TYPE_RULES: &[DocRule] = &[
    (DocType::Guide, |name, text| {
        name.contains("guide")
            || ((text.contains("tableofcontent") || text.contains("contents"))
                && text.contains("implementationguide"))
    }),
    (DocType::TestCases, |name, _| name.contains("test")),
    (DocType::Overview, |name, text| {
        name.contains("overview") || text.find("validation").is_some_and(|i| i < 10)
    }),
];

/// What a guide was found to mention.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Traits {
    sfra: bool,
    controllers: bool,
    pipelines: bool,
}

type GenerationRule = (GuideGeneration, fn(Traits) -> bool);

/// Guide generation rules, first match wins. Pipelines guides that also
/// cover controllers count as controllers guides.
const GENERATION_RULES: &[GenerationRule] = &[
    (GuideGeneration::Mixed, |t| t.sfra && t.controllers),
    (GuideGeneration::Sfra, |t| t.sfra),
    (GuideGeneration::Controllers, |t| t.controllers),
    (GuideGeneration::Pipelines, |t| t.pipelines),
];

/// One extracted document.
#[derive(Debug)]
pub struct DocumentGuide {
    path: PathBuf,
    name: String,
    content: String,
    doc_type: DocType,
    generation: Option<GuideGeneration>,
    contents_start: OnceCell<(usize, usize)>,
    main_start: OnceCell<usize>,
}

impl DocumentGuide {
    /// Normalizes `raw_text` and classifies the document.
    ///
    /// `cartridges` feeds the content-based generation heuristics.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, raw_text: &str, cartridges: &CartridgeSet) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let content: String = raw_text
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let doc_type = DOC_TYPE_RULES
            .iter()
            .find(|(_, rule)| rule(&name, &content))
            .map_or(DocType::Unclassified, |(t, _)| *t);

        let mut doc = Self {
            path,
            name,
            content,
            doc_type,
            generation: None,
            contents_start: OnceCell::new(),
            main_start: OnceCell::new(),
        };
        if doc_type == DocType::Guide {
            let generation = doc.classify_generation(cartridges);
            debug!("{} is a {:?} guide", doc.name, generation);
            doc.generation = Some(generation);
        }
        doc
    }

    fn classify_generation(&self, cartridges: &CartridgeSet) -> GuideGeneration {
        let name = self.name.as_str();
        let mentions_all = |generation: Generation| {
            let names = cartridges.names(generation);
            !names.is_empty() && names.iter().all(|c| self.content.contains(c.as_str()))
        };
        let first_page = self.first_page().unwrap_or_default();

        let sfra = name.contains("sfra") || mentions_all(Generation::Sfra) || first_page.contains("sfra");
        let controllers = name.contains("controllers")
            || name.contains("sgjc")
            || mentions_all(Generation::Controllers)
            || first_page.contains("controller")
            || self
                .table_of_contents()
                .is_ok_and(|toc| TOC_CUSTOM_CONTROLLER.is_match(toc));
        let pipelines = name.contains("pipelines") || mentions_all(Generation::Pipelines);

        let traits = Traits {
            sfra,
            controllers,
            pipelines,
        };
        GENERATION_RULES
            .iter()
            .find(|(_, rule)| rule(traits))
            .map_or(GuideGeneration::Unclassified, |(g, _)| *g)
    }

    /// Archive path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lower-cased file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Document type assigned at load time.
    #[must_use]
    pub fn doc_type(&self) -> DocType {
        self.doc_type
    }

    /// Guide generation, for guides.
    #[must_use]
    pub fn generation(&self) -> Option<GuideGeneration> {
        self.generation
    }

    /// `(header start, header end)` of the table of contents.
    fn contents_header(&self) -> Result<(usize, usize), DocumentError> {
        if let Some(span) = self.contents_start.get() {
            return Ok(*span);
        }
        let span = ["tableofcontents", "contents"]
            .iter()
            .find_map(|header| self.content.find(header).map(|i| (i, i + header.len())))
            .ok_or(DocumentError::MissingTableOfContents)?;
        Ok(*self.contents_start.get_or_init(|| span))
    }

    /// Offset of the first body heading: the second occurrence of the first
    /// table-of-contents entry, counting from the table itself.
    fn main_start(&self) -> Result<usize, DocumentError> {
        if let Some(start) = self.main_start.get() {
            return Ok(*start);
        }
        let (_, toc_start) = self.contents_header()?;
        let toc = &self.content[toc_start..];
        let first = TOC_BULLET
            .captures(toc)
            .and_then(|c| c.get(1))
            .ok_or(DocumentError::EmptyTableOfContents)?;
        let listed = toc_start + first.start();
        let heading = first.as_str();
        let body = self.content[listed + heading.len()..]
            .find(heading)
            .map(|i| listed + heading.len() + i)
            .ok_or_else(|| DocumentError::MissingHeading(heading.to_string()))?;
        Ok(*self.main_start.get_or_init(|| body))
    }

    /// Text before the table of contents.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MissingTableOfContents`] if there is none.
    pub fn first_page(&self) -> Result<&str, DocumentError> {
        let (start, _) = self.contents_header()?;
        Ok(&self.content[..start])
    }

    /// The table of contents without its header.
    ///
    /// # Errors
    ///
    /// Returns an error if the table or its first heading cannot be located.
    pub fn table_of_contents(&self) -> Result<&str, DocumentError> {
        let (_, start) = self.contents_header()?;
        let end = self.main_start()?;
        Ok(&self.content[start..end])
    }

    /// Everything from the first body heading on.
    ///
    /// # Errors
    ///
    /// Returns an error if the table or its first heading cannot be located.
    pub fn main_content(&self) -> Result<&str, DocumentError> {
        Ok(&self.content[self.main_start()?..])
    }

    /// Body of the section whose table-of-contents entry contains `name`,
    /// up to the next entry's heading.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MissingSection`] if no entry contains `name`
    /// or its heading is not in the body.
    pub fn section(&self, name: &str) -> Result<&str, DocumentError> {
        let name = name.to_lowercase();
        let toc = self.table_of_contents()?;

        let mut previous = None;
        let mut current = None;
        let mut next = None;
        for caps in TOC_BULLET.captures_iter(toc) {
            let Some(entry) = caps.get(1).map(|m| m.as_str()) else {
                continue;
            };
            if current.is_some() {
                next = Some(entry);
                break;
            }
            if entry.contains(name.as_str()) {
                current = Some(entry);
            } else {
                previous = Some(entry);
            }
        }
        let current = current.ok_or_else(|| DocumentError::MissingSection(name.clone()))?;

        let main = self.main_content()?;
        // Searching from the preceding heading avoids matching the name in earlier prose.
        let from = previous.and_then(|p| main.find(p)).unwrap_or(0);
        let start = main[from..]
            .find(current)
            .map(|i| from + i + current.len())
            .ok_or_else(|| DocumentError::MissingSection(name.clone()))?;
        let end = next
            .and_then(|n| main[start..].find(n))
            .map_or(main.len(), |i| start + i);
        Ok(&main[start..end])
    }
}

/// All documents of a project.
#[derive(Debug, Default)]
pub struct DocumentSet {
    documents: Vec<DocumentGuide>,
}

impl DocumentSet {
    /// Wraps already built documents.
    #[must_use]
    pub fn from_documents(documents: Vec<DocumentGuide>) -> Self {
        Self { documents }
    }

    /// Extracts and classifies every `.docx` under `documentation/`.
    ///
    /// Archives are extracted on blocking tasks; all of them complete before
    /// any document is classified. Result order follows file order.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Configuration`] if there are no documents, or the
    /// first extraction error.
    pub async fn load(corpus: &Corpus) -> Result<Self, AuditError> {
        let files = corpus.files(&FileQuery::new(DOCUMENTATION_DIR).extensions(".docx"))?;
        if files.is_empty() {
            return Err(AuditError::Configuration(format!(
                "no documentation files found under {}",
                corpus.root().join(DOCUMENTATION_DIR).display()
            )));
        }

        let handles: Vec<_> = files
            .iter()
            .map(|file| {
                let path = file.path().to_path_buf();
                tokio::task::spawn_blocking(move || {
                    let text = extract_text(&path)?;
                    Ok::<_, AuditError>((path, text))
                })
            })
            .collect();

        let mut extracted = Vec::with_capacity(handles.len());
        for handle in handles {
            extracted.push(handle.await??);
        }

        let documents: Vec<_> = extracted
            .into_iter()
            .map(|(path, text)| DocumentGuide::new(path, &text, corpus.cartridges()))
            .collect();
        info!("Loaded {} document(s)", documents.len());
        Ok(Self { documents })
    }

    /// [`load`](Self::load) on a private current-thread runtime.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_blocking(corpus: &Corpus) -> Result<Self, AuditError> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(Self::load(corpus))
    }

    /// Every document.
    #[must_use]
    pub fn documents(&self) -> &[DocumentGuide] {
        &self.documents
    }

    /// Guides covering `generation`, or every guide for `None`.
    ///
    /// Unclassified guides never match a generation.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Configuration`] if no guide matches.
    pub fn guides(&self, generation: Option<Generation>) -> Result<Vec<&DocumentGuide>, AuditError> {
        let mut guides = Vec::new();
        for doc in self.documents.iter().filter(|d| d.doc_type == DocType::Guide) {
            match (generation, doc.generation) {
                (None, _) => guides.push(doc),
                (Some(_), Some(GuideGeneration::Unclassified) | None) => {
                    warn!("Guide {} covers no known generation, skipping it", doc.name);
                }
                (Some(wanted), Some(covered)) if covered.covers(wanted) => guides.push(doc),
                _ => {}
            }
        }
        if guides.is_empty() {
            return Err(AuditError::Configuration(format!(
                "no {} guides found",
                generation.map_or("implementation", Generation::as_str)
            )));
        }
        Ok(guides)
    }
}

/// Text runs of a `.docx` body, space-separated.
///
/// # Errors
///
/// Returns an error if the file is not a zip archive or has no document body.
pub fn extract_text(path: &Path) -> Result<String, AuditError> {
    let archive_error = |source| AuditError::Archive {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(archive_error)?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_XML)
        .map_err(archive_error)?
        .read_to_string(&mut xml)?;
    Ok(text_runs(&xml))
}

/// Contents of `<w:t>` elements, space-separated.
fn text_runs(xml: &str) -> String {
    let mut text = String::new();
    for element in xml.split("<w:t").skip(1) {
        if let Some((_, rest)) = element.split_once('>') {
            text.push_str(rest.split('<').next().unwrap_or_default());
            text.push(' ');
        }
    }
    text
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    pub(crate) const SFRA_GUIDE: &str = "Int Custom SFRA Implementation Guide \
        Version 26.1.0 for SFRA 5.3.0 \
        Table of Contents 1. Summary 3 2. Component Overview 4 3. Compatibility 5 4. Availability 6 \
        Summary This cartridge connects the storefront to the custom service. \
        Component Overview The cartridge contains controllers, models and scripts. \
        Compatibility Available for platform 21.2 with compatibility mode 19.10 and SFRA 5.3.0 \
        Availability If the custom service is down, the storefront keeps working: checkout falls back \
        to the default payment flow and a message is shown to the shopper until the service recovers.";

    pub(crate) fn docx(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        zip.start_file(DOCUMENT_XML, options).unwrap();
        let runs: String = text
            .split(' ')
            .map(|w| format!("<w:r><w:t xml:space=\"preserve\">{w} </w:t></w:r>"))
            .collect();
        write!(
            zip,
            "<?xml version=\"1.0\"?><w:document><w:body><w:p>{runs}</w:p></w:body></w:document>"
        )
        .unwrap();
        zip.finish().unwrap();
        path
    }

    fn guide(name: &str, text: &str) -> DocumentGuide {
        DocumentGuide::new(name, text, &CartridgeSet::default())
    }

    #[test]
    fn test_normalization() {
        let doc = guide("Int_Guide.docx", "Hello \n World\t!");
        assert_eq!(doc.content(), "helloworld!");
        assert_eq!(doc.name(), "int_guide.docx");
    }

    #[test]
    fn test_doc_type_rules() {
        assert_eq!(guide("x_guide.docx", "").doc_type(), DocType::Guide);
        assert_eq!(
            guide("x.docx", "tableofcontents implementation guide").doc_type(),
            DocType::Guide
        );
        assert_eq!(guide("x_test_cases.docx", "").doc_type(), DocType::TestCases);
        assert_eq!(guide("x_overview.docx", "").doc_type(), DocType::Overview);
        assert_eq!(guide("x.docx", "Validation steps").doc_type(), DocType::Overview);
        assert_eq!(guide("x.docx", "notes").doc_type(), DocType::Unclassified);
        assert_eq!(guide("x.docx", "notes").generation(), None);
    }

    #[test]
    fn test_generation_rules() {
        assert_eq!(
            guide("int_sfra_guide.docx", SFRA_GUIDE).generation(),
            Some(GuideGeneration::Sfra)
        );
        assert_eq!(
            guide("int_sgjc_guide.docx", "controllers tableofcontents 1.a2").generation(),
            Some(GuideGeneration::Controllers)
        );
        assert_eq!(
            guide("int_sfra_controllers_guide.docx", "").generation(),
            Some(GuideGeneration::Mixed)
        );
        assert_eq!(
            guide("int_guide.docx", "nothing here").generation(),
            Some(GuideGeneration::Unclassified)
        );

        let cartridges = CartridgeSet::from_names(["int_pay_pipelines"]);
        let doc = DocumentGuide::new("int_guide.docx", "uses int_pay_pipelines", &cartridges);
        assert_eq!(doc.generation(), Some(GuideGeneration::Pipelines));
    }

    #[test]
    fn test_pages_and_sections() {
        let doc = guide("int_custom_sfra_guide.docx", SFRA_GUIDE);
        assert!(doc.first_page().unwrap().ends_with("sfra5.3.0"));
        assert!(doc.table_of_contents().unwrap().starts_with("1.summary3"));
        assert!(doc.main_content().unwrap().starts_with("summarythiscartridge"));
        assert_eq!(
            doc.section("Compatibility").unwrap(),
            "availableforplatform21.2withcompatibilitymode19.10andsfra5.3.0"
        );
        assert!(doc.section("availability").unwrap().len() > 100);
        assert_eq!(
            doc.section("support"),
            Err(DocumentError::MissingSection("support".into()))
        );
    }

    #[test]
    fn test_missing_table_of_contents() {
        let doc = guide("int_guide.docx", "just a title page");
        assert_eq!(doc.first_page(), Err(DocumentError::MissingTableOfContents));
        assert!(doc.section("compatibility").is_err());
    }

    #[test]
    fn test_text_runs() {
        let xml = "<?xml?><w:body><w:tbl><w:tc><w:p><w:r><w:t>Hello</w:t></w:r><w:tab/><w:r><w:t xml:space=\"preserve\">World</w:t></w:r></w:p></w:tc></w:tbl></w:body>";
        assert_eq!(text_runs(xml).split_whitespace().collect::<Vec<_>>(), ["Hello", "World"]);
    }

    #[tokio::test]
    async fn test_load_and_filter_guides() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join(DOCUMENTATION_DIR);
        std::fs::create_dir_all(&docs).unwrap();
        docx(&docs, "int_custom_sfra_guide.docx", SFRA_GUIDE);
        docx(&docs, "int_custom_overview.docx", "Validation of the installation");

        let corpus = Corpus::open(dir.path(), true, &[]).unwrap();
        let set = DocumentSet::load(&corpus).await.unwrap();
        assert_eq!(set.documents().len(), 2);
        assert_eq!(set.documents()[0].doc_type(), DocType::Overview);
        assert_eq!(set.guides(Some(Generation::Sfra)).unwrap().len(), 1);
        assert!(matches!(
            set.guides(Some(Generation::Controllers)),
            Err(AuditError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_load_without_documents() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = Corpus::open(dir.path(), true, &[]).unwrap();
        assert!(matches!(
            DocumentSet::load(&corpus).await,
            Err(AuditError::Configuration(_))
        ));
    }

    #[test]
    fn test_broken_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, "not a zip").unwrap();
        assert!(matches!(
            extract_text(&path),
            Err(AuditError::Archive { .. })
        ));
    }
}
