//! Converter configuration

use serde::{Deserialize, Serialize};

/// Options for a conversion run
///
/// All side channels are on by default. Options are plain values: a caller
/// may deserialize them from its own configuration file and hand them to
/// [`crate::DocxConverter::with_options`].
///
/// # Examples
///
/// ```rust
/// use docx2html_backend::ConverterOptions;
///
/// let options = ConverterOptions::default().with_images(false);
/// assert!(!options.embed_images);
/// assert!(options.extract_properties);
/// ```
#[allow(clippy::struct_excessive_bools)] // Independent feature toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterOptions {
    /// Render images as `data:` URIs; when off, images are left out of the HTML
    pub embed_images: bool,

    /// Read recognized custom document properties from `docProps/custom.xml`
    pub extract_properties: bool,

    /// Scan default, first-page and even-page footers for ECLI identifiers
    pub extract_footer_ecli: bool,
}

impl Default for ConverterOptions {
    #[inline]
    fn default() -> Self {
        Self {
            embed_images: true,
            extract_properties: true,
            extract_footer_ecli: true,
        }
    }
}

impl ConverterOptions {
    /// Create options with image embedding toggled
    #[inline]
    #[must_use = "returns options with image embedding configured"]
    pub const fn with_images(mut self, enable: bool) -> Self {
        self.embed_images = enable;
        self
    }

    /// Create options with custom property extraction toggled
    #[inline]
    #[must_use = "returns options with property extraction configured"]
    pub const fn with_properties(mut self, enable: bool) -> Self {
        self.extract_properties = enable;
        self
    }

    /// Create options with footer ECLI extraction toggled
    #[inline]
    #[must_use = "returns options with footer ECLI extraction configured"]
    pub const fn with_footer_ecli(mut self, enable: bool) -> Self {
        self.extract_footer_ecli = enable;
        self
    }
}
