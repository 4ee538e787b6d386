//! In-memory DOCX packages for integration tests

#![allow(dead_code)] // Each test binary uses a different subset

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Styles: `RandNummer` marks border numbers
pub const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Standard"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="RandNummer"><w:name w:val="RandNummer"/><w:basedOn w:val="Standard"/></w:style>
  <w:style w:type="paragraph" w:styleId="Zentriert"><w:pPr><w:jc w:val="center"/></w:pPr></w:style>
</w:styles>"#;

/// Numbering instances:
/// - 1: bullets on every level
/// - 2: decimal on every level (`%1.`, start 1)
/// - 3: decimal level 0, legal lower-roman level 1
/// - 4: decimal without start value (`%1.`)
pub const NUMBERING_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="10">
    <w:lvl w:ilvl="0"><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/></w:lvl>
    <w:lvl w:ilvl="1"><w:numFmt w:val="bullet"/><w:lvlText w:val="o"/></w:lvl>
    <w:lvl w:ilvl="2"><w:numFmt w:val="bullet"/><w:lvlText w:val="-"/></w:lvl>
    <w:lvl w:ilvl="3"><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/></w:lvl>
    <w:lvl w:ilvl="4"><w:numFmt w:val="bullet"/><w:lvlText w:val="o"/></w:lvl>
  </w:abstractNum>
  <w:abstractNum w:abstractNumId="20">
    <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl>
    <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%2."/></w:lvl>
    <w:lvl w:ilvl="2"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%3."/></w:lvl>
    <w:lvl w:ilvl="3"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%4."/></w:lvl>
    <w:lvl w:ilvl="4"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%5."/></w:lvl>
  </w:abstractNum>
  <w:abstractNum w:abstractNumId="30">
    <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl>
    <w:lvl w:ilvl="1"><w:start w:val="1"/><w:isLgl/><w:numFmt w:val="lowerRoman"/><w:lvlText w:val="%1.%2"/></w:lvl>
  </w:abstractNum>
  <w:abstractNum w:abstractNumId="40">
    <w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="10"/></w:num>
  <w:num w:numId="2"><w:abstractNumId w:val="20"/></w:num>
  <w:num w:numId="3"><w:abstractNumId w:val="30"/></w:num>
  <w:num w:numId="4"><w:abstractNumId w:val="40"/></w:num>
</w:numbering>"#;

/// Bullet list numbering instance
pub const BULLET: i32 = 1;
/// Decimal list numbering instance
pub const DECIMAL: i32 = 2;
/// Decimal with a legal second level
pub const LEGAL: i32 = 3;
/// Decimal without start value
pub const NO_START: i32 = 4;

/// Escape text for use inside `<w:t>`
pub fn xml_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// `<w:p>` with one run
pub fn paragraph(text: &str) -> String {
    format!(
        r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        xml_text(text)
    )
}

/// `<w:p>` with a paragraph style
pub fn styled_paragraph(style: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{style}"/></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        xml_text(text)
    )
}

/// Border-number paragraph
pub fn border_number(number: &str) -> String {
    styled_paragraph("RandNummer", number)
}

/// Numbered paragraph
pub fn list_paragraph(num_id: i32, ilvl: u32, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="{ilvl}"/><w:numId w:val="{num_id}"/></w:numPr></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        xml_text(text)
    )
}

/// Footer part with one paragraph per line
pub fn footer(lines: &[&str]) -> String {
    let paragraphs: String = lines.iter().map(|line| paragraph(line)).collect();
    format!(r#"<w:ftr xmlns:w="{W_NS}" xmlns:r="{R_NS}">{paragraphs}</w:ftr>"#)
}

/// Builder for a minimal DOCX package
#[derive(Debug, Clone)]
pub struct DocxBuilder {
    body: String,
    styles: Option<String>,
    numbering: Option<String>,
    relationships: Vec<(String, String, String)>,
    parts: Vec<(String, Vec<u8>)>,
    custom_properties: Vec<(String, String)>,
    include_document: bool,
}

impl Default for DocxBuilder {
    fn default() -> Self {
        Self {
            body: String::new(),
            styles: Some(STYLES_XML.to_string()),
            numbering: Some(NUMBERING_XML.to_string()),
            relationships: Vec::new(),
            parts: Vec::new(),
            custom_properties: Vec::new(),
            include_document: true,
        }
    }
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw body XML
    pub fn body(mut self, xml: &str) -> Self {
        self.body.push_str(xml);
        self
    }

    pub fn paragraph(self, text: &str) -> Self {
        self.body(&paragraph(text))
    }

    pub fn border_number(self, number: &str) -> Self {
        self.body(&border_number(number))
    }

    pub fn list(self, num_id: i32, ilvl: u32, text: &str) -> Self {
        self.body(&list_paragraph(num_id, ilvl, text))
    }

    pub fn styles(mut self, xml: Option<&str>) -> Self {
        self.styles = xml.map(str::to_string);
        self
    }

    pub fn numbering(mut self, xml: Option<&str>) -> Self {
        self.numbering = xml.map(str::to_string);
        self
    }

    /// Add a part referenced from the document relationships
    pub fn related_part(
        mut self,
        rel_id: &str,
        rel_type: &str,
        target: &str,
        bytes: &[u8],
    ) -> Self {
        self.relationships.push((
            rel_id.to_string(),
            format!("{REL_BASE}/{rel_type}"),
            target.to_string(),
        ));
        self.parts.push((format!("word/{target}"), bytes.to_vec()));
        self
    }

    pub fn footer_part(self, rel_id: &str, target: &str, xml: &str) -> Self {
        self.related_part(rel_id, "footer", target, xml.as_bytes())
    }

    pub fn image_part(self, rel_id: &str, target: &str, bytes: &[u8]) -> Self {
        self.related_part(rel_id, "image", target, bytes)
    }

    pub fn custom_property(mut self, name: &str, value: &str) -> Self {
        self.custom_properties.push((name.to_string(), value.to_string()));
        self
    }

    /// Leave `word/document.xml` out of the package
    pub fn without_document(mut self) -> Self {
        self.include_document = false;
        self
    }

    pub fn document_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><w:body>{}</w:body></w:document>"#,
            self.body
        )
    }

    fn relationships_xml(&self) -> String {
        let entries: String = self
            .relationships
            .iter()
            .map(|(id, rel_type, target)| {
                format!(r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"/>"#)
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{entries}</Relationships>"#
        )
    }

    fn custom_xml(&self) -> String {
        let entries: String = self
            .custom_properties
            .iter()
            .enumerate()
            .map(|(i, (name, value))| {
                format!(
                    r#"<property fmtid="{{D5CDD505-2E9C-101B-9397-08002B2CF9AE}}" pid="{}" name="{name}"><vt:lpwstr>{}</vt:lpwstr></property>"#,
                    i + 2,
                    xml_text(value)
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/custom-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">{entries}</Properties>"#
        )
    }

    /// Write the package
    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let mut add = |name: &str, bytes: &[u8]| {
            zip.start_file(name, SimpleFileOptions::default()).unwrap();
            zip.write_all(bytes).unwrap();
        };

        add(
            "[Content_Types].xml",
            br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/></Types>"#,
        );
        if self.include_document {
            add("word/document.xml", self.document_xml().as_bytes());
        }
        if let Some(styles) = &self.styles {
            add("word/styles.xml", styles.as_bytes());
        }
        if let Some(numbering) = &self.numbering {
            add("word/numbering.xml", numbering.as_bytes());
        }
        add("word/_rels/document.xml.rels", self.relationships_xml().as_bytes());
        for (name, bytes) in &self.parts {
            add(name, bytes);
        }
        if !self.custom_properties.is_empty() {
            add("docProps/custom.xml", self.custom_xml().as_bytes());
        }

        zip.finish().unwrap().into_inner()
    }
}

/// Install a test logger once (`RUST_LOG=debug cargo test` shows pipeline logs)
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
