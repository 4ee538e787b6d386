//! Style side-table (`word/styles.xml`)
//!
//! ## XML Structure
//! ```xml
//! <w:styles>
//!   <w:style w:type="paragraph" w:styleId="RandNummer">
//!     <w:name w:val="Randnummer"/>
//!     <w:basedOn w:val="Standard"/>
//!     <w:pPr>
//!       <w:jc w:val="right"/>
//!       <w:numPr><w:numId w:val="3"/><w:ilvl w:val="0"/></w:numPr>
//!     </w:pPr>
//!     <w:rPr><w:b/><w:sz w:val="20"/></w:rPr>
//!   </w:style>
//! </w:styles>
//! ```

use crate::package::{DocxPackage, STYLES_PART};
use crate::xml::{get_attr, get_attr_i32, half_points_to_pt, toggle_on};
use docx2html_core::{Alignment, ParagraphStyle, RunFlags};
use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::{HashMap, HashSet};

/// Style ids / names that mark a paragraph as a margin number
const BORDER_NUMBER_STYLES: [&str; 2] = ["randnummer", "bordernumber"];

/// Maximum `basedOn` chain length followed during resolution
const MAX_INHERITANCE_DEPTH: usize = 32;

/// `w:type` of a style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StyleKind {
    /// Paragraph style
    #[default]
    Paragraph,
    /// Character (run) style
    Character,
    /// Table style
    Table,
    /// Numbering style
    Numbering,
}

impl StyleKind {
    fn parse(value: &str) -> Self {
        match value {
            "character" => Self::Character,
            "table" => Self::Table,
            "numbering" => Self::Numbering,
            _ => Self::Paragraph,
        }
    }
}

/// Vertical alignment of a run (`w:vertAlign`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    /// Normal baseline
    Baseline,
    /// Raised
    Superscript,
    /// Lowered
    Subscript,
}

impl VerticalAlign {
    /// Parse the `w:val` of `w:vertAlign`
    pub fn parse(value: &str) -> Self {
        match value {
            "superscript" => Self::Superscript,
            "subscript" => Self::Subscript,
            _ => Self::Baseline,
        }
    }
}

/// Character properties; `None` means "inherit"
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RunProperties {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strike: Option<bool>,
    pub vertical_align: Option<VerticalAlign>,
    /// Size in points
    pub font_size: Option<String>,
    /// Hex colour without `#`
    pub color: Option<String>,
}

impl RunProperties {
    /// Values set in `over` replace the ones in `self`
    #[must_use]
    pub fn overlay(&self, over: &Self) -> Self {
        Self {
            bold: over.bold.or(self.bold),
            italic: over.italic.or(self.italic),
            underline: over.underline.or(self.underline),
            strike: over.strike.or(self.strike),
            vertical_align: over.vertical_align.or(self.vertical_align),
            font_size: over.font_size.clone().or_else(|| self.font_size.clone()),
            color: over.color.clone().or_else(|| self.color.clone()),
        }
    }

    /// Collapse into render flags
    pub fn flags(&self) -> RunFlags {
        RunFlags {
            bold: self.bold.unwrap_or(false),
            italic: self.italic.unwrap_or(false),
            underline: self.underline.unwrap_or(false),
            strike: self.strike.unwrap_or(false),
            superscript: self.vertical_align == Some(VerticalAlign::Superscript),
            subscript: self.vertical_align == Some(VerticalAlign::Subscript),
        }
    }
}

/// Colour value as written in `w:color`; `auto` means "no colour"
pub fn parse_color(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("auto") {
        None
    } else {
        Some(value.to_ascii_uppercase())
    }
}

/// Underline is on for every `w:u` value except `none`
pub fn underline_on(value: Option<&str>) -> bool {
    value.map_or(true, |v| v != "none")
}

/// One `<w:style>` element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDefinition {
    pub id: String,
    pub name: Option<String>,
    pub kind: StyleKind,
    pub based_on: Option<String>,
    pub alignment: Option<Alignment>,
    /// `w:pPr/w:numPr/w:numId`
    pub num_id: Option<i32>,
    /// `w:pPr/w:numPr/w:ilvl`
    pub ilvl: Option<i32>,
    pub run: RunProperties,
}

/// Style id → definition, with `basedOn` resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleRegistry {
    styles: HashMap<String, StyleDefinition>,
}

impl StyleRegistry {
    /// Parse `word/styles.xml`
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed.
    pub fn parse(xml_content: &str) -> Result<Self, quick_xml::Error> {
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(true);

        let mut styles = HashMap::new();
        let mut current: Option<StyleDefinition> = None;
        // Local names of the open ancestors of the current event
        let mut path: Vec<Vec<u8>> = Vec::new();

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    handle_style_element(&mut current, &path, e);
                    path.push(e.local_name().as_ref().to_vec());
                }
                Ok(Event::Empty(ref e)) => handle_style_element(&mut current, &path, e),
                Ok(Event::End(ref e)) => {
                    path.pop();
                    if e.local_name().as_ref() == b"style" {
                        if let Some(style) = current.take() {
                            styles.insert(style.id.clone(), style);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(e),
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { styles })
    }

    /// Load from the package; a missing or malformed part yields an empty
    /// registry
    pub fn load(package: &mut DocxPackage<'_>) -> Self {
        let Some(xml_content) = package.optional_part_as_string(STYLES_PART) else {
            return Self::default();
        };
        match Self::parse(&xml_content) {
            Ok(registry) => {
                debug!("Loaded {} styles", registry.len());
                registry
            }
            Err(e) => {
                warn!("Ignoring malformed {STYLES_PART}: {e}");
                Self::default()
            }
        }
    }

    /// Build a registry from definitions
    pub fn from_definitions(definitions: impl IntoIterator<Item = StyleDefinition>) -> Self {
        Self {
            styles: definitions
                .into_iter()
                .map(|style| (style.id.clone(), style))
                .collect(),
        }
    }

    #[inline]
    pub fn get(&self, style_id: &str) -> Option<&StyleDefinition> {
        self.styles.get(style_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Style followed by its `basedOn` ancestors, nearest first
    fn chain(&self, style_id: &str) -> Vec<&StyleDefinition> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(style_id);

        while let Some(id) = next {
            if chain.len() >= MAX_INHERITANCE_DEPTH || !seen.insert(id) {
                break;
            }
            let Some(style) = self.styles.get(id) else {
                break;
            };
            chain.push(style);
            next = style.based_on.as_deref();
        }
        chain
    }

    /// Whether paragraphs of this style are margin numbers
    ///
    /// Matches the style id or its display name, ignoring case.
    pub fn is_border_number_style(&self, style_id: &str) -> bool {
        let is_marker = |s: &str| {
            BORDER_NUMBER_STYLES
                .iter()
                .any(|marker| s.eq_ignore_ascii_case(marker))
        };
        if is_marker(style_id) {
            return true;
        }
        self.get(style_id)
            .and_then(|style| style.name.as_deref())
            .is_some_and(is_marker)
    }

    /// Numbering inherited from the style chain: `(numId, ilvl)`
    pub fn numbering(&self, style_id: &str) -> Option<(i32, i32)> {
        let chain = self.chain(style_id);
        let num_id = chain.iter().find_map(|style| style.num_id)?;
        let ilvl = chain.iter().find_map(|style| style.ilvl).unwrap_or(0);
        Some((num_id, ilvl))
    }

    /// Character properties resolved along the style chain
    pub fn run_properties(&self, style_id: &str) -> RunProperties {
        self.chain(style_id)
            .iter()
            .rev()
            .fold(RunProperties::default(), |acc, style| acc.overlay(&style.run))
    }

    /// Paragraph formatting resolved along the style chain
    pub fn paragraph_style(&self, style_id: &str) -> ParagraphStyle {
        let chain = self.chain(style_id);
        let run = self.run_properties(style_id);
        ParagraphStyle {
            alignment: chain.iter().find_map(|style| style.alignment),
            bold: run.bold.unwrap_or(false),
            italic: run.italic.unwrap_or(false),
            font_size: run.font_size,
            color: run.color,
        }
    }
}

/// Whether `path` ends with the given local names
fn path_ends_with(path: &[Vec<u8>], suffix: &[&[u8]]) -> bool {
    path.len() >= suffix.len()
        && path[path.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(a, b)| a.as_slice() == *b)
}

fn handle_style_element(
    current: &mut Option<StyleDefinition>,
    path: &[Vec<u8>],
    e: &BytesStart<'_>,
) {
    let local = e.local_name();
    let local = local.as_ref();

    if local == b"style" {
        *current = get_attr(e, b"styleId").map(|id| StyleDefinition {
            id,
            kind: get_attr(e, b"type").map_or_else(StyleKind::default, |t| StyleKind::parse(&t)),
            ..StyleDefinition::default()
        });
        return;
    }

    let Some(style) = current.as_mut() else {
        return;
    };

    if path_ends_with(path, &[b"style"]) {
        match local {
            b"name" => style.name = get_attr(e, b"val"),
            b"basedOn" => style.based_on = get_attr(e, b"val"),
            _ => {}
        }
    } else if path_ends_with(path, &[b"style", b"pPr"]) {
        if local == b"jc" {
            style.alignment = get_attr(e, b"val").and_then(|v| Alignment::parse_jc(&v));
        }
    } else if path_ends_with(path, &[b"style", b"pPr", b"numPr"]) {
        match local {
            b"numId" => style.num_id = get_attr_i32(e, b"val"),
            b"ilvl" => style.ilvl = get_attr_i32(e, b"val"),
            _ => {}
        }
    } else if path_ends_with(path, &[b"style", b"rPr"]) {
        let run = &mut style.run;
        match local {
            b"b" => run.bold = Some(toggle_on(e)),
            b"i" => run.italic = Some(toggle_on(e)),
            b"u" => run.underline = Some(underline_on(get_attr(e, b"val").as_deref())),
            b"strike" | b"dstrike" => run.strike = Some(toggle_on(e)),
            b"vertAlign" => {
                run.vertical_align = get_attr(e, b"val").map(|v| VerticalAlign::parse(&v));
            }
            b"sz" => run.font_size = get_attr(e, b"val").and_then(|v| half_points_to_pt(&v)),
            b"color" => run.color = get_attr(e, b"val").and_then(|v| parse_color(&v)),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults><w:rPrDefault><w:rPr><w:sz w:val="24"/></w:rPr></w:rPrDefault></w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Standard">
    <w:name w:val="Normal"/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading">
    <w:name w:val="Überschrift"/>
    <w:basedOn w:val="Standard"/>
    <w:pPr><w:jc w:val="center"/></w:pPr>
    <w:rPr><w:b/><w:sz w:val="28"/><w:color w:val="1f3864"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="SubHeading">
    <w:name w:val="Unterüberschrift"/>
    <w:basedOn w:val="Heading"/>
    <w:rPr><w:b w:val="0"/><w:i/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="RN">
    <w:name w:val="RandNummer"/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="ListeNummern">
    <w:name w:val="Liste Nummern"/>
    <w:pPr><w:numPr><w:numId w:val="7"/></w:numPr></w:pPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="ListeNummern2">
    <w:basedOn w:val="ListeNummern"/>
    <w:pPr><w:numPr><w:ilvl w:val="1"/></w:numPr></w:pPr>
  </w:style>
  <w:style w:type="character" w:styleId="Hochgestellt">
    <w:rPr><w:vertAlign w:val="superscript"/><w:u w:val="single"/></w:rPr>
  </w:style>
  <w:style w:type="table" w:styleId="Grid">
    <w:tblStylePr w:type="firstRow"><w:rPr><w:b/></w:rPr></w:tblStylePr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="LoopA"><w:basedOn w:val="LoopB"/></w:style>
  <w:style w:type="paragraph" w:styleId="LoopB"><w:basedOn w:val="LoopA"/></w:style>
</w:styles>"#;

    fn registry() -> StyleRegistry {
        StyleRegistry::parse(STYLES_XML).unwrap()
    }

    #[test]
    fn test_parse_style_definitions() {
        let registry = registry();
        assert_eq!(registry.len(), 10);

        let heading = registry.get("Heading").unwrap();
        assert_eq!(heading.name.as_deref(), Some("Überschrift"));
        assert_eq!(heading.based_on.as_deref(), Some("Standard"));
        assert_eq!(heading.alignment, Some(Alignment::Center));
        assert_eq!(heading.run.bold, Some(true));
        assert_eq!(heading.run.font_size.as_deref(), Some("14"));
        assert_eq!(heading.run.color.as_deref(), Some("1F3864"));

        assert_eq!(registry.get("Hochgestellt").unwrap().kind, StyleKind::Character);
    }

    #[test]
    fn test_table_style_conditional_props_ignored() {
        let grid = registry().get("Grid").cloned().unwrap();
        assert_eq!(grid.kind, StyleKind::Table);
        assert_eq!(grid.run.bold, None);
    }

    #[test]
    fn test_based_on_inheritance() {
        let registry = registry();
        let style = registry.paragraph_style("SubHeading");
        assert_eq!(style.alignment, Some(Alignment::Center));
        assert!(!style.bold, "explicit w:val=0 overrides the base style");
        assert!(style.italic);
        assert_eq!(style.font_size.as_deref(), Some("14"));

        assert!(registry.paragraph_style("Standard").is_plain());
        assert!(registry.paragraph_style("Unknown").is_plain());
    }

    #[test]
    fn test_inheritance_cycle_terminates() {
        let registry = registry();
        assert!(registry.paragraph_style("LoopA").is_plain());
        assert_eq!(registry.numbering("LoopB"), None);
    }

    #[test]
    fn test_border_number_style_detection() {
        let registry = registry();
        assert!(registry.is_border_number_style("RN"), "matched by name");
        assert!(registry.is_border_number_style("Randnummer"), "matched by id");
        assert!(registry.is_border_number_style("BORDERNUMBER"));
        assert!(!registry.is_border_number_style("Heading"));
    }

    #[test]
    fn test_from_definitions_resolves_chain() {
        let registry = StyleRegistry::from_definitions([
            StyleDefinition {
                id: "Basis".to_string(),
                alignment: Some(Alignment::Justify),
                ..StyleDefinition::default()
            },
            StyleDefinition {
                id: "Leitsatz".to_string(),
                based_on: Some("Basis".to_string()),
                num_id: Some(5),
                ..StyleDefinition::default()
            },
        ]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.paragraph_style("Leitsatz").alignment, Some(Alignment::Justify));
        assert_eq!(registry.numbering("Leitsatz"), Some((5, 0)));
    }

    #[test]
    fn test_style_numbering_inheritance() {
        let registry = registry();
        assert_eq!(registry.numbering("ListeNummern"), Some((7, 0)));
        assert_eq!(registry.numbering("ListeNummern2"), Some((7, 1)));
        assert_eq!(registry.numbering("Heading"), None);
    }

    #[test]
    fn test_character_style_flags() {
        let flags = registry().run_properties("Hochgestellt").flags();
        assert!(flags.superscript);
        assert!(flags.underline);
        assert!(!flags.bold);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(StyleRegistry::parse("<w:styles><w:style></w:styles>").is_err());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("auto"), None);
        assert_eq!(parse_color("ff0000"), Some("FF0000".to_string()));
        assert!(underline_on(None));
        assert!(!underline_on(Some("none")));
    }
}
