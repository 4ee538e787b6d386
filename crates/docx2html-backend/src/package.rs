//! Word-processing package access
//!
//! A DOCX file is a ZIP archive of XML parts:
//! - `word/document.xml`: main content (paragraphs, tables, ...)
//! - `word/styles.xml`: style definitions
//! - `word/numbering.xml`: list definitions
//! - `word/_rels/document.xml.rels`: relationships (images, footers)
//! - `word/footer*.xml`: footers
//! - `word/media/*`: embedded images
//! - `docProps/custom.xml`: custom document properties
//! - `[Content_Types].xml`: media type of every part

use crate::xml::get_attr;
use docx2html_core::{ConversionError, Result};
use log::warn;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Main document part
pub const DOCUMENT_PART: &str = "word/document.xml";
/// Relationships of the main document part
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
/// Style definitions
pub const STYLES_PART: &str = "word/styles.xml";
/// Numbering definitions
pub const NUMBERING_PART: &str = "word/numbering.xml";
/// Custom document properties
pub const CUSTOM_PROPERTIES_PART: &str = "docProps/custom.xml";
/// Content type declarations
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Relationship type suffix of footer parts
pub const FOOTER_REL_TYPE: &str = "/footer";
/// Relationship type suffix of image parts
pub const IMAGE_REL_TYPE: &str = "/image";

/// An opened package backed by an in-memory byte slice
pub struct DocxPackage<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> DocxPackage<'a> {
    /// Open a package from raw bytes
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::PackageLoad`] if the bytes are not a ZIP
    /// archive.
    pub fn open(bytes: &'a [u8]) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ConversionError::PackageLoad(format!("not a ZIP archive: {e}")))?;
        Ok(Self { archive })
    }

    /// Whether the archive contains a part with this name
    #[inline]
    pub fn has_part(&self, name: &str) -> bool {
        self.archive.file_names().any(|n| n == name)
    }

    /// Read a part's raw bytes
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::PackageLoad`] if the part is missing and
    /// [`ConversionError::Io`] if it cannot be decompressed.
    pub fn extract_part(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|_| ConversionError::PackageLoad(format!("missing part {name}")))?;

        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        Ok(content)
    }

    /// Read a part as UTF-8 text, dropping a leading byte order mark
    ///
    /// # Errors
    ///
    /// Same as [`Self::extract_part`], plus [`ConversionError::PackageLoad`]
    /// if the part is not valid UTF-8.
    pub fn extract_part_as_string(&mut self, name: &str) -> Result<String> {
        let bytes = self.extract_part(name)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| ConversionError::PackageLoad(format!("part {name} is not UTF-8: {e}")))?;
        Ok(match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        })
    }

    /// Read an optional part; absence and read failures both yield `None`
    pub fn optional_part_as_string(&mut self, name: &str) -> Option<String> {
        if !self.has_part(name) {
            return None;
        }
        match self.extract_part_as_string(name) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Ignoring unreadable part {name}: {e}");
                None
            }
        }
    }
}

/// One `<Relationship>` entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relationship {
    /// Relationship type URI
    pub rel_type: String,
    /// Target as written in the relationships part
    pub target: String,
    /// `TargetMode="External"`
    pub external: bool,
}

impl Relationship {
    /// Package part name of an internal target, resolved against `word/`
    pub fn part_name(&self) -> Option<String> {
        if self.external {
            return None;
        }
        Some(resolve_target("word", &self.target))
    }
}

/// Relationship id → relationship for the main document part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    by_id: HashMap<String, Relationship>,
}

impl Relationships {
    /// Parse a `.rels` part
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed.
    pub fn parse(xml_content: &str) -> std::result::Result<Self, quick_xml::Error> {
        let mut by_id = HashMap::new();
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e) | Event::Empty(ref e))
                    if e.name().local_name().as_ref() == b"Relationship" =>
                {
                    if let (Some(id), Some(target)) = (get_attr(e, b"Id"), get_attr(e, b"Target")) {
                        let relationship = Relationship {
                            rel_type: get_attr(e, b"Type").unwrap_or_default(),
                            target,
                            external: get_attr(e, b"TargetMode").as_deref() == Some("External"),
                        };
                        by_id.insert(id, relationship);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(e),
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { by_id })
    }

    /// Load the main document's relationships; missing or broken parts give
    /// an empty table
    pub fn load(package: &mut DocxPackage<'_>) -> Self {
        let Some(xml_content) = package.optional_part_as_string(DOCUMENT_RELS_PART) else {
            return Self::default();
        };
        Self::parse(&xml_content).unwrap_or_else(|e| {
            warn!("Ignoring malformed {DOCUMENT_RELS_PART}: {e}");
            Self::default()
        })
    }

    /// Look up a relationship by id
    #[inline]
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// Relationships whose type ends with `suffix` (e.g. [`IMAGE_REL_TYPE`])
    pub fn of_type<'s>(
        &'s self,
        suffix: &'s str,
    ) -> impl Iterator<Item = (&'s String, &'s Relationship)> + 's {
        self.by_id
            .iter()
            .filter(move |(_, rel)| rel.rel_type.ends_with(suffix))
    }

    /// Number of relationships
    #[inline]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether there are no relationships
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// `[Content_Types].xml`: default types per extension and per-part overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    /// Parse the content types part
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed.
    pub fn parse(xml_content: &str) -> std::result::Result<Self, quick_xml::Error> {
        let mut types = Self::default();
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
                    match e.name().local_name().as_ref() {
                        b"Default" => {
                            if let (Some(ext), Some(ct)) =
                                (get_attr(e, b"Extension"), get_attr(e, b"ContentType"))
                            {
                                types.defaults.insert(ext.to_ascii_lowercase(), ct);
                            }
                        }
                        b"Override" => {
                            if let (Some(part), Some(ct)) =
                                (get_attr(e, b"PartName"), get_attr(e, b"ContentType"))
                            {
                                let part = part.trim_start_matches('/').to_string();
                                types.overrides.insert(part, ct);
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(e),
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Load from the package; missing or broken parts give an empty table
    pub fn load(package: &mut DocxPackage<'_>) -> Self {
        let Some(xml_content) = package.optional_part_as_string(CONTENT_TYPES_PART) else {
            return Self::default();
        };
        Self::parse(&xml_content).unwrap_or_else(|e| {
            warn!("Ignoring malformed {CONTENT_TYPES_PART}: {e}");
            Self::default()
        })
    }

    /// Declared content type of a part (override first, then extension)
    pub fn content_type_of(&self, part_name: &str) -> Option<&str> {
        if let Some(ct) = self.overrides.get(part_name.trim_start_matches('/')) {
            return Some(ct);
        }
        let ext = part_extension(part_name)?;
        self.defaults.get(&ext).map(String::as_str)
    }
}

/// Lower-cased file extension of a part name
pub fn part_extension(part_name: &str) -> Option<String> {
    std::path::Path::new(part_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Resolve a relationship target relative to `base_dir` into a part name
///
/// Absolute targets (`/word/media/x.png`) lose their leading slash; `..`
/// segments are collapsed.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("{base_dir}/{target}"),
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn zip_bytes(parts: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_open_rejects_non_zip() {
        let result = DocxPackage::open(b"definitely not a zip");
        assert!(matches!(result, Err(ConversionError::PackageLoad(_))));
    }

    #[test]
    fn test_extract_part_and_bom() {
        let bytes = zip_bytes(&[("word/document.xml", "\u{feff}<doc/>".as_bytes())]);
        let mut package = DocxPackage::open(&bytes).unwrap();
        assert!(package.has_part(DOCUMENT_PART));
        assert_eq!(package.extract_part_as_string(DOCUMENT_PART).unwrap(), "<doc/>");
        assert!(matches!(
            package.extract_part("word/styles.xml"),
            Err(ConversionError::PackageLoad(_))
        ));
        assert!(package.optional_part_as_string(STYLES_PART).is_none());
    }

    #[test]
    fn test_parse_relationships() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
            <Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/>
            <Relationship Id="rId10" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.org" TargetMode="External"/>
        </Relationships>"#;

        let rels = Relationships::parse(xml).unwrap();
        assert_eq!(rels.len(), 3);
        assert_eq!(
            rels.get("rId4").unwrap().part_name().as_deref(),
            Some("word/media/image1.png")
        );
        assert_eq!(
            rels.get("rId9").unwrap().part_name().as_deref(),
            Some("word/footer1.xml")
        );
        assert!(rels.get("rId10").unwrap().part_name().is_none());
        assert_eq!(rels.of_type(IMAGE_REL_TYPE).count(), 1);
        assert_eq!(rels.of_type(FOOTER_REL_TYPE).count(), 1);
    }

    #[test]
    fn test_parse_content_types() {
        let xml = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
            <Default Extension="EMF" ContentType="image/x-emf"/>
            <Default Extension="png" ContentType="image/png"/>
            <Override PartName="/word/media/image9.bin" ContentType="image/jpeg"/>
        </Types>"#;

        let types = ContentTypes::parse(xml).unwrap();
        assert_eq!(types.content_type_of("word/media/image1.emf"), Some("image/x-emf"));
        assert_eq!(types.content_type_of("word/media/image2.PNG"), Some("image/png"));
        assert_eq!(types.content_type_of("/word/media/image9.bin"), Some("image/jpeg"));
        assert_eq!(types.content_type_of("word/media/image3.gif"), None);
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("word", "media/a.png"), "word/media/a.png");
        assert_eq!(resolve_target("word", "/word/media/a.png"), "word/media/a.png");
        assert_eq!(resolve_target("word", "../customXml/item1.xml"), "customXml/item1.xml");
        assert_eq!(resolve_target("word", "./footer2.xml"), "word/footer2.xml");
    }
}
