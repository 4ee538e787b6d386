//! Numbering side-table (`word/numbering.xml`)
//!
//! ## XML Structure
//! ```xml
//! <w:numbering>
//!   <w:abstractNum w:abstractNumId="0">
//!     <w:lvl w:ilvl="0">
//!       <w:start w:val="1"/>
//!       <w:numFmt w:val="decimal"/>  <!-- 1, 2, 3 -->
//!       <w:lvlText w:val="%1."/>
//!       <w:lvlJc w:val="left"/>
//!     </w:lvl>
//!     <w:lvl w:ilvl="1">
//!       <w:isLgl/>
//!       <w:numFmt w:val="lowerRoman"/>
//!       <w:rPr><w:color w:val="FF0000"/><w:sz w:val="20"/></w:rPr>
//!     </w:lvl>
//!   </w:abstractNum>
//!   <w:num w:numId="1">
//!     <w:abstractNumId w:val="0"/>
//!     <w:lvlOverride w:ilvl="0"><w:startOverride w:val="5"/></w:lvlOverride>
//!     <w:lvlOverride w:ilvl="1"><w:lvl w:ilvl="1">…</w:lvl></w:lvlOverride>
//!   </w:num>
//! </w:numbering>
//! ```
//!
//! Paragraphs reference a `numId` and an `ilvl`; the registry resolves the
//! pair through the `num` → `abstractNum` indirection into a
//! [`NumberingIndex`].

use crate::package::{DocxPackage, NUMBERING_PART};
use crate::styles::parse_color;
use crate::xml::{get_attr, get_attr_i32, half_points_to_pt, toggle_on};
use docx2html_core::{NumberingFormat, NumberingIndex};
use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Level definition within an abstract numbering
///
/// Corresponds to `<w:lvl w:ilvl="0">`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LevelDefinition {
    /// Indentation level (0, 1, 2, ...)
    pub ilvl: i32,
    /// Number format (decimal, roman, letter, bullet)
    pub num_fmt: NumberingFormat,
    /// Starting value, if the level defines one
    pub start_val: Option<i32>,
    /// Level text pattern (e.g., "%1.%2." for hierarchical numbering)
    pub lvl_text: Option<String>,
    /// `w:isLgl`
    pub is_legal: bool,
    /// `w:lvlJc`
    pub justification: Option<String>,
    /// `w:suff`
    pub suffix: Option<String>,
    /// Marker colour
    pub color: Option<String>,
    /// Marker font (`w:rFonts/@w:ascii`)
    pub font: Option<String>,
    /// Marker size in points
    pub font_size: Option<String>,
}

/// Abstract numbering definition
///
/// Corresponds to `<w:abstractNum w:abstractNumId="...">`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbstractNum {
    /// Abstract numbering ID
    pub abstract_num_id: i32,
    /// Map ilvl → `LevelDefinition`
    pub levels: HashMap<i32, LevelDefinition>,
}

/// Numbering instance (`<w:num>`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct NumInstance {
    abstract_num_id: Option<i32>,
    /// ilvl → `w:startOverride`
    start_overrides: HashMap<i32, i32>,
    /// ilvl → level redefined inside `w:lvlOverride`
    level_overrides: HashMap<i32, LevelDefinition>,
}

/// All numbering definitions of a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberingRegistry {
    /// Map numId → instance
    nums: HashMap<i32, NumInstance>,
    /// Map abstractNumId → `AbstractNum`
    abstract_nums: HashMap<i32, AbstractNum>,
}

impl NumberingRegistry {
    /// Parse `word/numbering.xml`
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed.
    pub fn parse(xml_content: &str) -> Result<Self, quick_xml::Error> {
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(true);

        let mut state = ParseState::default();
        let mut path: Vec<Vec<u8>> = Vec::new();

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    state.element(&path, e);
                    path.push(e.local_name().as_ref().to_vec());
                }
                Ok(Event::Empty(ref e)) => {
                    state.element(&path, e);
                    // An empty container closes immediately
                    state.end(e.local_name().as_ref(), path.len());
                }
                Ok(Event::End(ref e)) => {
                    path.pop();
                    state.end(e.local_name().as_ref(), path.len());
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(e),
                _ => {}
            }
            buf.clear();
        }

        Ok(state.registry)
    }

    /// Load from the package; a missing or malformed part yields an empty
    /// registry (documents without lists have no numbering part)
    pub fn load(package: &mut DocxPackage<'_>) -> Self {
        let Some(xml_content) = package.optional_part_as_string(NUMBERING_PART) else {
            return Self::default();
        };
        match Self::parse(&xml_content) {
            Ok(registry) => {
                debug!(
                    "Loaded {} numbering instances over {} abstract definitions",
                    registry.nums.len(),
                    registry.abstract_nums.len()
                );
                registry
            }
            Err(e) => {
                warn!("Ignoring malformed {NUMBERING_PART}: {e}");
                Self::default()
            }
        }
    }

    /// Get level definition for numId and ilvl
    ///
    /// A level redefined in the instance's `w:lvlOverride` replaces the
    /// abstract definition's level.
    #[must_use = "returns the level definition if found"]
    pub fn get_level(&self, num_id: i32, ilvl: i32) -> Option<&LevelDefinition> {
        let num = self.nums.get(&num_id)?;
        if let Some(level) = num.level_overrides.get(&ilvl) {
            return Some(level);
        }
        let abstract_num_id = num.abstract_num_id?;
        self.abstract_nums.get(&abstract_num_id)?.levels.get(&ilvl)
    }

    /// Resolve a paragraph's `(numId, ilvl)` into a numbering descriptor
    ///
    /// `numId` 0 means "numbering removed"; unknown ids and levels yield
    /// `None`, so the paragraph is treated as plain text.
    #[must_use = "returns the resolved numbering descriptor"]
    pub fn index_for(&self, num_id: i32, ilvl: i32) -> Option<NumberingIndex> {
        if num_id == 0 {
            return None;
        }
        let level = u32::try_from(ilvl).ok()?;
        let definition = self.get_level(num_id, ilvl)?;

        let start = self
            .nums
            .get(&num_id)
            .and_then(|num| num.start_overrides.get(&ilvl).copied())
            .or(definition.start_val);

        let mut index = NumberingIndex::new(level, definition.num_fmt)
            .with_pattern(
                start.map(|s| s.to_string()).unwrap_or_default(),
                definition.lvl_text.clone().unwrap_or_default(),
            )
            .with_legal(definition.is_legal);
        index.color = definition.color.clone();
        index.font_style = definition.font.clone();
        index.font_size = definition.font_size.clone();
        index.justification = definition.justification.clone();
        index.suffix = definition.suffix.clone();
        Some(index)
    }
}

#[derive(Default)]
struct ParseState {
    registry: NumberingRegistry,
    current_abstract: Option<AbstractNum>,
    current_level: Option<LevelDefinition>,
    current_num: Option<(i32, NumInstance)>,
    current_override_ilvl: Option<i32>,
}

impl ParseState {
    fn element(&mut self, path: &[Vec<u8>], e: &BytesStart<'_>) {
        let parent = path.last().map(Vec::as_slice);
        match (parent, e.local_name().as_ref()) {
            (_, b"abstractNum") => {
                self.current_abstract = get_attr_i32(e, b"abstractNumId").map(|id| AbstractNum {
                    abstract_num_id: id,
                    levels: HashMap::new(),
                });
            }
            (Some(b"abstractNum" | b"lvlOverride"), b"lvl") => {
                self.current_level = get_attr_i32(e, b"ilvl").map(|ilvl| LevelDefinition {
                    ilvl,
                    ..LevelDefinition::default()
                });
            }
            (Some(b"lvl"), local) => {
                if let Some(level) = self.current_level.as_mut() {
                    match local {
                        b"start" => level.start_val = get_attr_i32(e, b"val"),
                        b"numFmt" => {
                            level.num_fmt = get_attr(e, b"val")
                                .map_or_else(NumberingFormat::default, |v| {
                                    NumberingFormat::parse_format(&v)
                                });
                        }
                        b"lvlText" => level.lvl_text = get_attr(e, b"val"),
                        b"isLgl" => level.is_legal = toggle_on(e),
                        b"lvlJc" => level.justification = get_attr(e, b"val"),
                        b"suff" => level.suffix = get_attr(e, b"val"),
                        _ => {}
                    }
                }
            }
            (Some(b"rPr"), local) => {
                if let Some(level) = self.current_level.as_mut() {
                    match local {
                        b"color" => {
                            level.color = get_attr(e, b"val").and_then(|v| parse_color(&v));
                        }
                        b"rFonts" => level.font = get_attr(e, b"ascii"),
                        b"sz" => {
                            level.font_size =
                                get_attr(e, b"val").and_then(|v| half_points_to_pt(&v));
                        }
                        _ => {}
                    }
                }
            }
            (Some(b"numbering"), b"num") => {
                self.current_num =
                    get_attr_i32(e, b"numId").map(|id| (id, NumInstance::default()));
            }
            (Some(b"num"), b"abstractNumId") => {
                if let Some((_, num)) = self.current_num.as_mut() {
                    num.abstract_num_id = get_attr_i32(e, b"val");
                }
            }
            (Some(b"num"), b"lvlOverride") => {
                self.current_override_ilvl = get_attr_i32(e, b"ilvl");
            }
            (Some(b"lvlOverride"), b"startOverride") => {
                if let (Some((_, num)), Some(ilvl), Some(start)) = (
                    self.current_num.as_mut(),
                    self.current_override_ilvl,
                    get_attr_i32(e, b"val"),
                ) {
                    num.start_overrides.insert(ilvl, start);
                }
            }
            _ => {}
        }
    }

    /// `depth` is the number of open ancestors of the closed element
    fn end(&mut self, local: &[u8], depth: usize) {
        match local {
            // numbering/abstractNum/lvl
            b"lvl" if depth == 2 => {
                if let (Some(abstract_num), Some(level)) =
                    (self.current_abstract.as_mut(), self.current_level.take())
                {
                    abstract_num.levels.insert(level.ilvl, level);
                }
            }
            // numbering/num/lvlOverride/lvl
            b"lvl" if depth == 3 && self.current_override_ilvl.is_some() => {
                if let (Some((_, num)), Some(level)) =
                    (self.current_num.as_mut(), self.current_level.take())
                {
                    num.level_overrides.insert(level.ilvl, level);
                }
            }
            b"abstractNum" => {
                if let Some(abstract_num) = self.current_abstract.take() {
                    self.registry
                        .abstract_nums
                        .insert(abstract_num.abstract_num_id, abstract_num);
                }
            }
            b"lvlOverride" => self.current_override_ilvl = None,
            b"num" => {
                if let Some((id, num)) = self.current_num.take() {
                    self.registry.nums.insert(id, num);
                }
            }
            _ => {}
        }
    }
}
