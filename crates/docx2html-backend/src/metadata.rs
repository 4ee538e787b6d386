//! Side-channel metadata: custom document properties and footer ECLIs
//!
//! Both extractors are best effort. A missing or broken part is logged and
//! yields no metadata; it never fails the conversion.

use crate::package::{DocxPackage, Relationships, CUSTOM_PROPERTIES_PART};
use crate::xml::{get_attr, in_unselected_branch, is_w, nearest_w_ancestor, R_NS, W_NS};
use docx2html_core::PropertyKey;
use log::{debug, trace, warn};
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::collections::BTreeMap;

/// European Case Law Identifier: `ECLI:<country>:<court>:<year>:<ordinal>`
static ECLI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"ECLI:[A-Za-z]{2}:[A-Za-z0-9.]{1,7}:\d{4}:[A-Za-z0-9.]+")
        .expect("Invalid ECLI regex")
});

/// Footer reference types that are scanned
const FOOTER_TYPES: [&str; 3] = ["default", "first", "even"];

/// Parse `docProps/custom.xml` into the recognized properties
///
/// ```xml
/// <Properties xmlns:vt="…/docPropsVTypes">
///   <property fmtid="{D5CDD505-…}" pid="2" name="Aktenzeichen">
///     <vt:lpwstr>II ZR 1/23</vt:lpwstr>
///   </property>
/// </Properties>
/// ```
///
/// Values are the trimmed text of the typed child; a later property with the
/// same name replaces an earlier one.
///
/// # Errors
///
/// Returns an error if the XML is malformed.
pub fn parse_custom_properties(
    xml_content: &str,
) -> Result<BTreeMap<PropertyKey, String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut properties = BTreeMap::new();
    let mut current: Option<(String, String)> = None;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"property" => {
                current = get_attr(e, b"name").map(|name| (name, String::new()));
            }
            Ok(Event::Text(ref t)) => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&t.unescape()?);
                }
            }
            Ok(Event::CData(ref t)) => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&String::from_utf8_lossy(t));
                }
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"property" => {
                if let Some((name, value)) = current.take() {
                    match PropertyKey::from_property_name(&name) {
                        Some(key) => {
                            properties.insert(key, value.trim().to_string());
                        }
                        None => trace!("Ignoring custom property {name:?}"),
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e),
            _ => {}
        }
        buf.clear();
    }

    Ok(properties)
}

/// Load the recognized custom properties from the package
pub fn extract_properties(package: &mut DocxPackage<'_>) -> BTreeMap<PropertyKey, String> {
    let Some(xml_content) = package.optional_part_as_string(CUSTOM_PROPERTIES_PART) else {
        return BTreeMap::new();
    };
    match parse_custom_properties(&xml_content) {
        Ok(properties) => {
            debug!("Found {} recognized custom properties", properties.len());
            properties
        }
        Err(e) => {
            warn!("Ignoring malformed {CUSTOM_PROPERTIES_PART}: {e}");
            BTreeMap::new()
        }
    }
}

/// All ECLI tokens in `text`, in order, without trailing punctuation
pub fn find_eclis(text: &str) -> Vec<String> {
    ECLI_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(&['.', ',', ';', ':'][..]).to_string())
        .collect()
}

/// ECLIs of one footer part: each paragraph's run text is scanned separately
///
/// A paragraph owns only the text whose nearest enclosing paragraph it is, so
/// text-box paragraphs are scanned once, on their own. Of an
/// `mc:AlternateContent` only the selected branch is read.
///
/// # Errors
///
/// Returns an error if the footer XML is malformed.
pub fn footer_eclis(footer_xml: &str) -> Result<Vec<String>, roxmltree::Error> {
    let footer = roxmltree::Document::parse(footer_xml)?;
    let mut eclis = Vec::new();

    let paragraphs = footer
        .descendants()
        .filter(|n| is_w(*n, "p") && !in_unselected_branch(*n));
    for paragraph in paragraphs {
        let text: String = paragraph
            .descendants()
            .filter(|n| is_w(*n, "t"))
            .filter(|n| nearest_w_ancestor(*n, "p") == Some(paragraph))
            .filter(|n| !in_unselected_branch(*n))
            .filter_map(|n| n.text())
            .collect();
        eclis.extend(find_eclis(&text));
    }
    Ok(eclis)
}

/// Collect ECLIs from the footers referenced by every section
///
/// Sections are visited in document order; inside a section the default,
/// first-page and even-page footers are visited in declaration order. The
/// same footer referenced twice is scanned twice.
pub fn extract_footer_eclis(
    document: &roxmltree::Document<'_>,
    relationships: &Relationships,
    package: &mut DocxPackage<'_>,
) -> Vec<String> {
    let mut eclis = Vec::new();

    for section in document.descendants().filter(|n| is_w(*n, "sectPr")) {
        for reference in section.children().filter(|n| is_w(*n, "footerReference")) {
            let footer_type = reference.attribute((W_NS, "type")).unwrap_or("default");
            if !FOOTER_TYPES.contains(&footer_type) {
                continue;
            }
            let Some(part_name) = reference
                .attribute((R_NS, "id"))
                .and_then(|id| relationships.get(id))
                .and_then(|rel| rel.part_name())
            else {
                debug!("Footer reference of type {footer_type} does not resolve");
                continue;
            };
            let Some(footer_xml) = package.optional_part_as_string(&part_name) else {
                continue;
            };
            match footer_eclis(&footer_xml) {
                Ok(found) => {
                    trace!("{} ECLI(s) in {part_name}", found.len());
                    eclis.extend(found);
                }
                Err(e) => warn!("Ignoring malformed footer {part_name}: {e}"),
            }
        }
    }
    eclis
}
