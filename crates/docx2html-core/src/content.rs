//! Content nodes produced by the tokenizer and rewritten by the list and
//! border-number passes.
//!
//! The body of a word-processing package is a flat, ordered stream. The
//! tokenizer turns it into a sequence of [`ContentNode`]s; the list assembler
//! replaces runs of [`ContentNode::ListEntry`] with nested
//! [`ContentNode::List`] containers, and the border-number merger moves
//! trailing content into [`ContentNode::BorderNumber`] markers.

use crate::numbering::{NumberingFormat, NumberingIndex};
use serde::{Deserialize, Serialize};

/// A block-level content node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentNode {
    /// Plain paragraph
    TextParagraph(Paragraph),
    /// Margin number marker with the content it numbers
    BorderNumber(BorderNumber),
    /// Table with recursively tokenized cells
    Table(Table),
    /// Flat list entry as found in the source stream
    ListEntry(ListEntry),
    /// Nested list container built from consecutive list entries
    List(ListContainer),
}

impl ContentNode {
    /// Convenience constructor for a paragraph holding a single plain run
    #[inline]
    #[must_use = "creates a paragraph node"]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::TextParagraph(Paragraph::from_text(text))
    }

    /// Convenience constructor for a bare border-number marker
    #[inline]
    #[must_use = "creates a border-number node"]
    pub fn border_number(number_text: impl Into<String>) -> Self {
        Self::BorderNumber(BorderNumber::new(number_text))
    }

    /// Convenience constructor for a list entry holding one paragraph
    #[inline]
    #[must_use = "creates a list entry node"]
    pub fn list_entry(text: impl Into<String>, index: NumberingIndex) -> Self {
        Self::ListEntry(ListEntry {
            text: vec![Self::paragraph(text)],
            index,
        })
    }

    /// Whether this node is a border-number marker
    #[inline]
    #[must_use = "returns whether this is a border-number marker"]
    pub const fn is_border_number(&self) -> bool {
        matches!(self, Self::BorderNumber(_))
    }

    /// Whether this node opens a structural block of its own (list or table)
    #[inline]
    #[must_use = "returns whether this node is a list or table block"]
    pub const fn is_structural_block(&self) -> bool {
        matches!(self, Self::Table(_) | Self::ListEntry(_) | Self::List(_))
    }

    /// Concatenated text of this node and all its children
    #[must_use = "returns the plain text content"]
    pub fn plain_text(&self) -> String {
        match self {
            Self::TextParagraph(paragraph) => paragraph.plain_text(),
            Self::BorderNumber(border_number) => {
                let mut text = border_number.number_text.clone();
                for node in &border_number.content {
                    text.push(' ');
                    text.push_str(&node.plain_text());
                }
                text
            }
            Self::Table(table) => table
                .rows
                .iter()
                .flatten()
                .flat_map(|cell| cell.content.iter())
                .map(Self::plain_text)
                .collect::<Vec<_>>()
                .join(" "),
            Self::ListEntry(entry) => entry
                .text
                .iter()
                .map(Self::plain_text)
                .collect::<Vec<_>>()
                .join(" "),
            Self::List(list) => list
                .items
                .iter()
                .flat_map(|item| item.content.iter())
                .map(Self::plain_text)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Paragraph: inline content plus resolved paragraph style
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Inline content in document order
    pub runs: Vec<Inline>,
    /// Paragraph-level formatting
    #[serde(default)]
    pub style: ParagraphStyle,
}

impl Paragraph {
    /// Create a paragraph with a single unformatted text run
    #[inline]
    #[must_use = "creates a paragraph"]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Inline::Text(TextRun::plain(text))],
            style: ParagraphStyle::default(),
        }
    }

    /// Concatenated text of all text runs (tabs become `\t`, breaks `\n`)
    #[must_use = "returns the plain text content"]
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for run in &self.runs {
            match run {
                Inline::Text(run) => text.push_str(&run.text),
                Inline::Tab => text.push('\t'),
                Inline::LineBreak => text.push('\n'),
                Inline::Image(_) => {}
            }
        }
        text
    }

    /// Whether the paragraph has no visible content
    #[inline]
    #[must_use = "returns whether the paragraph is empty"]
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|run| match run {
            Inline::Text(run) => run.text.is_empty(),
            Inline::Image(_) | Inline::Tab | Inline::LineBreak => false,
        })
    }
}

/// Paragraph alignment (`w:jc`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Left / start
    Left,
    /// Centered
    Center,
    /// Right / end
    Right,
    /// Justified (`both`, `distribute`)
    Justify,
}

impl Alignment {
    /// Parse the `w:val` of `w:jc`
    #[inline]
    #[must_use = "returns the parsed alignment"]
    pub fn parse_jc(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            "both" | "distribute" | "justify" => Some(Self::Justify),
            _ => None,
        }
    }

    /// CSS `text-align` value
    #[inline]
    #[must_use = "returns the css text-align value"]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }
}

/// Paragraph-level formatting resolved from the style side-table
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Text alignment
    pub alignment: Option<Alignment>,
    /// Bold paragraph text
    pub bold: bool,
    /// Italic paragraph text
    pub italic: bool,
    /// Font size in points (e.g. `"12"`, `"10.5"`)
    pub font_size: Option<String>,
    /// Text colour as hex without `#`
    pub color: Option<String>,
}

impl ParagraphStyle {
    /// Whether no formatting is set
    #[inline]
    #[must_use = "returns whether the style carries no formatting"]
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// Inline content of a paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inline {
    /// Text with character formatting
    Text(TextRun),
    /// Tab character (`w:tab`)
    Tab,
    /// Line break (`w:br`, `w:cr`)
    LineBreak,
    /// Embedded image (`w:drawing`)
    Image(InlineImage),
}

/// A run of text sharing one set of formatting flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRun {
    /// Text content
    pub text: String,
    /// Character formatting
    #[serde(default)]
    pub flags: RunFlags,
}

impl TextRun {
    /// Unformatted run
    #[inline]
    #[must_use = "creates a text run"]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            flags: RunFlags::default(),
        }
    }

    /// Run with explicit flags
    #[inline]
    #[must_use = "creates a text run"]
    pub fn with_flags(text: impl Into<String>, flags: RunFlags) -> Self {
        Self {
            text: text.into(),
            flags,
        }
    }
}

/// Character formatting flags of a run
#[allow(clippy::struct_excessive_bools)] // One flag per OOXML toggle property
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunFlags {
    /// `w:b`
    pub bold: bool,
    /// `w:i`
    pub italic: bool,
    /// `w:u` (any underline style except `none`)
    pub underline: bool,
    /// `w:strike` / `w:dstrike`
    pub strike: bool,
    /// `w:vertAlign w:val="superscript"`
    pub superscript: bool,
    /// `w:vertAlign w:val="subscript"`
    pub subscript: bool,
}

impl RunFlags {
    /// Whether no flag is set
    #[inline]
    #[must_use = "returns whether the run is unformatted"]
    pub const fn is_plain(self) -> bool {
        !(self.bold
            || self.italic
            || self.underline
            || self.strike
            || self.superscript
            || self.subscript)
    }

    /// Union of two flag sets
    #[inline]
    #[must_use = "returns the merged flags"]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            strike: self.strike || other.strike,
            superscript: self.superscript || other.superscript,
            subscript: self.subscript || other.subscript,
        }
    }
}

/// Image resolved from the package's media parts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InlineImage {
    /// Relationship id the image was referenced by
    pub rel_id: String,
    /// MIME type of the image part
    pub content_type: String,
    /// Raw image bytes
    pub data: Vec<u8>,
    /// Display width in CSS pixels
    pub width_px: Option<u32>,
    /// Display height in CSS pixels
    pub height_px: Option<u32>,
    /// Alternative text (`wp:docPr/@descr`)
    pub alt_text: Option<String>,
}

/// Margin number marker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderNumber {
    /// Marker text, e.g. `"1"`
    pub number_text: String,
    /// Absorbed content; empty when the marker stands alone
    #[serde(default)]
    pub content: Vec<ContentNode>,
}

impl BorderNumber {
    /// Marker without content
    #[inline]
    #[must_use = "creates a border-number marker"]
    pub fn new(number_text: impl Into<String>) -> Self {
        Self {
            number_text: number_text.into(),
            content: Vec::new(),
        }
    }
}

/// Table: rows of cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in document order
    pub rows: Vec<Vec<TableCell>>,
}

/// Table cell holding its own content stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content (paragraphs, lists, nested tables)
    pub content: Vec<ContentNode>,
    /// Number of grid columns spanned (`w:gridSpan`)
    pub column_span: u32,
}

impl TableCell {
    /// Single-column cell
    #[inline]
    #[must_use = "creates a table cell"]
    pub const fn new(content: Vec<ContentNode>) -> Self {
        Self {
            content,
            column_span: 1,
        }
    }
}

/// Flat list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    /// Entry content, normally one paragraph
    pub text: Vec<ContentNode>,
    /// Resolved numbering descriptor
    pub index: NumberingIndex,
}

/// Nested list container (`<ul>` / `<ol>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListContainer {
    /// Format shared by all items of this container
    pub format: NumberingFormat,
    /// Items in order
    pub items: Vec<ListItem>,
}

impl ListContainer {
    /// Empty container of the given format
    #[inline]
    #[must_use = "creates an empty list container"]
    pub const fn new(format: NumberingFormat) -> Self {
        Self {
            format,
            items: Vec::new(),
        }
    }
}

/// List item (`<li>`); nested containers live in its content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Item content in order
    pub content: Vec<ContentNode>,
}
