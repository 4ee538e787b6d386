//! Conversion result returned to callers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Custom document properties the converter recognizes.
///
/// Property names in the source package are German; anything not listed here
/// is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyKey {
    /// `Aktenzeichen`
    FileNumber,
    /// `Gerichtstyp`
    CourtType,
    /// `Spruchkoerper`
    AppraisalBody,
    /// `Rechtskraft`
    LegalEffect,
}

impl PropertyKey {
    /// Map a custom property name onto a key
    #[inline]
    #[must_use = "returns the recognized property key, if any"]
    pub fn from_property_name(name: &str) -> Option<Self> {
        match name {
            "Aktenzeichen" => Some(Self::FileNumber),
            "Gerichtstyp" => Some(Self::CourtType),
            "Spruchkoerper" => Some(Self::AppraisalBody),
            "Rechtskraft" => Some(Self::LegalEffect),
            _ => None,
        }
    }

    /// Property name as stored in the package
    #[inline]
    #[must_use = "returns the source property name"]
    pub const fn property_name(self) -> &'static str {
        match self {
            Self::FileNumber => "Aktenzeichen",
            Self::CourtType => "Gerichtstyp",
            Self::AppraisalBody => "Spruchkoerper",
            Self::LegalEffect => "Rechtskraft",
        }
    }
}

impl std::fmt::Display for PropertyKey {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FileNumber => "FILE_NUMBER",
            Self::CourtType => "COURT_TYPE",
            Self::AppraisalBody => "APPRAISAL_BODY",
            Self::LegalEffect => "LEGAL_EFFECT",
        };
        write!(f, "{s}")
    }
}

/// HTML conversion result with metadata gathered from side channels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Docx2Html {
    /// Rendered document body
    pub html: String,
    /// ECLI identifiers found in the footers, in discovery order
    pub ecli_list: Vec<String>,
    /// Recognized custom document properties
    pub properties: BTreeMap<PropertyKey, String>,
}

impl Docx2Html {
    /// Result for "no document available"
    pub const EMPTY: Self = Self {
        html: String::new(),
        ecli_list: Vec::new(),
        properties: BTreeMap::new(),
    };

    /// Whether this is the [`Self::EMPTY`] sentinel
    #[inline]
    #[must_use = "returns whether the result carries no content"]
    pub fn is_empty(&self) -> bool {
        self.html.is_empty() && self.ecli_list.is_empty() && self.properties.is_empty()
    }

    /// Serialize to a JSON string (`html`, `ecliList`, `properties`)
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[inline]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_name_mapping() {
        assert_eq!(
            PropertyKey::from_property_name("Aktenzeichen"),
            Some(PropertyKey::FileNumber)
        );
        assert_eq!(
            PropertyKey::from_property_name("Gerichtstyp"),
            Some(PropertyKey::CourtType)
        );
        assert_eq!(
            PropertyKey::from_property_name("Spruchkoerper"),
            Some(PropertyKey::AppraisalBody)
        );
        assert_eq!(
            PropertyKey::from_property_name("Rechtskraft"),
            Some(PropertyKey::LegalEffect)
        );
        assert_eq!(PropertyKey::from_property_name("Autor"), None);
        assert_eq!(PropertyKey::from_property_name("aktenzeichen"), None);
    }

    #[test]
    fn test_property_name_roundtrip() {
        for key in [
            PropertyKey::FileNumber,
            PropertyKey::CourtType,
            PropertyKey::AppraisalBody,
            PropertyKey::LegalEffect,
        ] {
            assert_eq!(PropertyKey::from_property_name(key.property_name()), Some(key));
        }
    }

    #[test]
    fn test_empty_sentinel() {
        assert!(Docx2Html::EMPTY.is_empty());
        assert_eq!(Docx2Html::EMPTY, Docx2Html::default());

        let result = Docx2Html {
            html: "<p>x</p>".to_string(),
            ..Docx2Html::default()
        };
        assert!(!result.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let mut properties = BTreeMap::new();
        properties.insert(PropertyKey::FileNumber, "II ZR 1/23".to_string());
        let result = Docx2Html {
            html: "<p>x</p>".to_string(),
            ecli_list: vec!["ECLI:DE:BGH:2023:010123UIIZR1.23.0".to_string()],
            properties,
        };

        let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(value["html"], "<p>x</p>");
        assert_eq!(value["ecliList"][0], "ECLI:DE:BGH:2023:010123UIIZR1.23.0");
        assert_eq!(value["properties"]["FILE_NUMBER"], "II ZR 1/23");
    }
}
