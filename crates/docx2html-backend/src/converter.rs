//! Conversion pipeline
//!
//! bytes → package → side tables (styles, numbering, images) → tokenizer →
//! list assembler → border-number merger → renderer. Custom properties and
//! footer ECLIs are read from their own parts and merged into the result.

use crate::assembler::NumberingListAssembler;
use crate::border_number::BorderNumberMerger;
use crate::images::ImageResolver;
use crate::metadata::{extract_footer_eclis, extract_properties};
use crate::numbering::NumberingRegistry;
use crate::options::ConverterOptions;
use crate::package::{ContentTypes, DocxPackage, Relationships, DOCUMENT_PART};
use crate::render::HtmlRenderer;
use crate::styles::StyleRegistry;
use crate::tokenizer::ContentTokenizer;
use docx2html_core::{ConversionError, Docx2Html, Result};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path, PathBuf};

/// Storage collaborator that hands out document bytes by file name
pub trait DocumentSource {
    /// Bytes of the named document, or `None` if it is not available
    fn fetch(&self, filename: &str) -> Option<Vec<u8>>;
}

/// Documents held in memory, keyed by file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemorySource {
    documents: HashMap<String, Vec<u8>>,
}

impl InMemorySource {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a document
    #[must_use = "returns the source with the document added"]
    pub fn with_document(mut self, filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.documents.insert(filename.into(), bytes);
        self
    }
}

impl DocumentSource for InMemorySource {
    fn fetch(&self, filename: &str) -> Option<Vec<u8>> {
        self.documents.get(filename).cloned()
    }
}

/// Documents stored as files below a root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    #[inline]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentSource for DirectorySource {
    fn fetch(&self, filename: &str) -> Option<Vec<u8>> {
        let relative = Path::new(filename);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            warn!("Refusing document name outside the source directory: {filename}");
            return None;
        }
        match std::fs::read(self.root.join(relative)) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!("Document {filename} not available: {e}");
                None
            }
        }
    }
}

/// DOCX → HTML converter
///
/// Converters hold only their options; every call builds its own side
/// tables, so one converter can be shared freely between threads.
///
/// # Examples
///
/// ```rust
/// use docx2html_backend::{ConverterOptions, DocxConverter};
/// use docx2html_core::Docx2Html;
///
/// let converter = DocxConverter::with_options(ConverterOptions::default().with_images(false));
/// assert_eq!(converter.convert(None).unwrap(), Docx2Html::EMPTY);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocxConverter {
    options: ConverterOptions,
}

impl DocxConverter {
    /// Converter with default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub const fn with_options(options: ConverterOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub const fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// Convert a package to HTML plus metadata
    ///
    /// Absent or empty input yields [`Docx2Html::EMPTY`].
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::PackageLoad`] if the bytes are not a ZIP
    /// archive, the archive has no `word/document.xml`, or that part is not
    /// well-formed XML. Problems in optional parts never fail the call.
    pub fn convert(&self, bytes: Option<&[u8]>) -> Result<Docx2Html> {
        let Some(bytes) = bytes.filter(|b| !b.is_empty()) else {
            debug!("No document bytes, returning empty result");
            return Ok(Docx2Html::EMPTY);
        };

        let mut package = DocxPackage::open(bytes)?;
        let document_xml = read_document_part(&mut package)?;
        debug!("{DOCUMENT_PART}: {} bytes", document_xml.len());

        let document = roxmltree::Document::parse(&document_xml).map_err(|e| {
            ConversionError::PackageLoad(format!("malformed {DOCUMENT_PART}: {e}"))
        })?;

        let styles = StyleRegistry::load(&mut package);
        let numbering = NumberingRegistry::load(&mut package);
        let relationships = Relationships::load(&mut package);
        let images = if self.options.embed_images {
            let content_types = ContentTypes::load(&mut package);
            ImageResolver::load(&mut package, &relationships, &content_types)
        } else {
            ImageResolver::default()
        };

        let tokenizer = ContentTokenizer::new(&styles, &numbering, &images);
        let tokens = tokenizer.tokenize_document(&document);
        debug!("Tokenized {} body nodes", tokens.len());
        let nodes = BorderNumberMerger::merge(NumberingListAssembler::assemble(tokens));
        debug!("{} top-level nodes after list assembly and merge", nodes.len());

        let html = HtmlRenderer::new(self.options.embed_images).render(&nodes);

        let properties = if self.options.extract_properties {
            extract_properties(&mut package)
        } else {
            BTreeMap::new()
        };
        let ecli_list = if self.options.extract_footer_ecli {
            extract_footer_eclis(&document, &relationships, &mut package)
        } else {
            Vec::new()
        };

        debug!(
            "Converted document: {} bytes of html, {} ECLI(s), {} properties",
            html.len(),
            ecli_list.len(),
            properties.len()
        );
        Ok(Docx2Html {
            html,
            ecli_list,
            properties,
        })
    }

    /// Fetch a document from `source` and convert it
    ///
    /// An absent file name, or a source that cannot provide the document,
    /// yields [`Docx2Html::EMPTY`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::convert`].
    pub fn convert_from_source(
        &self,
        source: &impl DocumentSource,
        filename: Option<&str>,
    ) -> Result<Docx2Html> {
        let Some(filename) = filename else {
            return Ok(Docx2Html::EMPTY);
        };
        let bytes = source.fetch(filename);
        if bytes.is_none() {
            debug!("Source has no document named {filename}");
        }
        self.convert(bytes.as_deref())
    }
}

/// Convert with default options
///
/// # Errors
///
/// See [`DocxConverter::convert`].
pub fn convert(bytes: Option<&[u8]>) -> Result<Docx2Html> {
    DocxConverter::new().convert(bytes)
}

/// Raw text of `word/document.xml`, checked to be well-formed XML
///
/// This is an auxiliary path for callers that index the raw markup; it is
/// independent of the HTML conversion.
///
/// # Errors
///
/// Returns [`ConversionError::PackageLoad`] if the package or the part cannot
/// be read, and [`ConversionError::TextExtraction`] if the part does not parse.
pub fn extract_document_xml(bytes: &[u8]) -> Result<String> {
    let mut package = DocxPackage::open(bytes)?;
    let document_xml = read_document_part(&mut package)?;
    roxmltree::Document::parse(&document_xml)
        .map_err(|e| ConversionError::TextExtraction(e.to_string()))?;
    Ok(document_xml)
}

fn read_document_part(package: &mut DocxPackage<'_>) -> Result<String> {
    if !package.has_part(DOCUMENT_PART) {
        return Err(ConversionError::PackageLoad(format!(
            "missing part {DOCUMENT_PART}"
        )));
    }
    package
        .extract_part_as_string(DOCUMENT_PART)
        .map_err(|e| match e {
            ConversionError::Io(io) => {
                ConversionError::PackageLoad(format!("unreadable {DOCUMENT_PART}: {io}"))
            }
            other => other,
        })
}
