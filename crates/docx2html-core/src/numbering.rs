//! Numbering descriptors attached to list entries.
//!
//! A list entry in a word-processing package only knows its nesting level and
//! a reference into the numbering side-table. The tokenizer resolves that
//! reference into a [`NumberingIndex`], which is all the list assembler needs.

use serde::{Deserialize, Serialize};

/// List numbering format.
///
/// Maps `<w:numFmt w:val="..."/>` values onto the six formats the HTML output
/// distinguishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NumberingFormat {
    /// Bullet (non-numbered), also used for unknown formats
    #[default]
    Bullet,
    /// Decimal: 1, 2, 3
    Decimal,
    /// Lower letter: a, b, c
    LowerLetter,
    /// Upper letter: A, B, C
    UpperLetter,
    /// Lower roman: i, ii, iii
    LowerRoman,
    /// Upper roman: I, II, III
    UpperRoman,
}

impl NumberingFormat {
    /// Parse from the `w:val` attribute of `w:numFmt`
    ///
    /// Zero-padded and other decimal variants collapse onto [`Self::Decimal`];
    /// anything unrecognized (including `none`) is treated as a bullet.
    #[inline]
    #[must_use = "returns the parsed numbering format"]
    pub fn parse_format(s: &str) -> Self {
        match s {
            "decimal" | "decimalZero" | "decimalEnclosedParen" | "decimalEnclosedFullstop"
            | "decimalEnclosedCircle" | "ordinal" => Self::Decimal,
            "lowerLetter" => Self::LowerLetter,
            "upperLetter" => Self::UpperLetter,
            "lowerRoman" => Self::LowerRoman,
            "upperRoman" => Self::UpperRoman,
            _ => Self::Bullet,
        }
    }

    /// CSS `list-style-type` glyph for this format
    #[inline]
    #[must_use = "returns the css list-style-type value"]
    pub const fn list_style_type(self) -> &'static str {
        match self {
            Self::Bullet => "disc",
            Self::Decimal => "decimal",
            Self::LowerLetter => "lower-latin",
            Self::UpperLetter => "upper-latin",
            Self::LowerRoman => "lower-roman",
            Self::UpperRoman => "upper-roman",
        }
    }

    /// Check if this format is a bullet list
    #[inline]
    #[must_use = "returns whether this format renders as an unordered list"]
    pub const fn is_bullet(self) -> bool {
        matches!(self, Self::Bullet)
    }

    /// HTML container tag: `ul` for bullets, `ol` otherwise
    #[inline]
    #[must_use = "returns the html list container tag"]
    pub const fn container_tag(self) -> &'static str {
        if self.is_bullet() {
            "ul"
        } else {
            "ol"
        }
    }
}

impl std::fmt::Display for NumberingFormat {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Bullet => "BULLET",
            Self::Decimal => "DECIMAL",
            Self::LowerLetter => "LOWER_LETTER",
            Self::UpperLetter => "UPPER_LETTER",
            Self::LowerRoman => "LOWER_ROMAN",
            Self::UpperRoman => "UPPER_ROMAN",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for NumberingFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.to_lowercase().chars().filter(|c| *c != '_').collect();
        match normalized.as_str() {
            "bullet" => Ok(Self::Bullet),
            "decimal" => Ok(Self::Decimal),
            "lowerletter" => Ok(Self::LowerLetter),
            "upperletter" => Ok(Self::UpperLetter),
            "lowerroman" => Ok(Self::LowerRoman),
            "upperroman" => Ok(Self::UpperRoman),
            _ => Err(format!(
                "unknown numbering format: '{s}' (expected: bullet, decimal, lower_letter, \
                upper_letter, lower_roman, upper_roman)"
            )),
        }
    }
}

/// Per-entry numbering descriptor.
///
/// `start_value` and `level_text` are carried for completeness but do not
/// influence the rendered markup: browsers number list items themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberingIndex {
    /// Zero-based nesting depth (`w:ilvl`)
    pub level: u32,
    /// Effective format; DECIMAL whenever `is_legal` is set
    pub format: NumberingFormat,
    /// Raw `w:start` value, empty when the level defines none
    pub start_value: String,
    /// Level text pattern, e.g. `"%1.%2."`
    pub level_text: String,
    /// Legal numbering override (`w:isLgl`)
    pub is_legal: bool,
    /// Marker colour from the level's run properties (hex, without `#`)
    pub color: Option<String>,
    /// Marker font family
    pub font_style: Option<String>,
    /// Marker font size in points
    pub font_size: Option<String>,
    /// Marker justification (`w:lvlJc`)
    pub justification: Option<String>,
    /// Separator between marker and text (`tab`, `space`, `nothing`)
    pub suffix: Option<String>,
}

impl NumberingIndex {
    /// Create a descriptor with the given level and format and no extras
    #[inline]
    #[must_use = "creates a numbering descriptor"]
    pub fn new(level: u32, format: NumberingFormat) -> Self {
        Self {
            level,
            format,
            ..Default::default()
        }
    }

    /// Set the legal numbering flag; forces the format to DECIMAL
    #[inline]
    #[must_use = "returns the descriptor with the legal flag applied"]
    pub fn with_legal(mut self, is_legal: bool) -> Self {
        self.is_legal = is_legal;
        if is_legal {
            self.format = NumberingFormat::Decimal;
        }
        self
    }

    /// Set start value and level text
    #[inline]
    #[must_use = "returns the descriptor with start value and level text set"]
    pub fn with_pattern(
        mut self,
        start_value: impl Into<String>,
        level_text: impl Into<String>,
    ) -> Self {
        self.start_value = start_value.into();
        self.level_text = level_text.into();
        self
    }
}
