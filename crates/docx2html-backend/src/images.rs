//! Embedded image lookup: relationship id → media part
//!
//! Word stores pictures as separate parts (`word/media/image1.png`) and
//! references them from `a:blip/@r:embed` through the document relationships.
//! The resolver reads every image part once per conversion.

use crate::package::{part_extension, ContentTypes, DocxPackage, Relationships, IMAGE_REL_TYPE};
use log::{debug, warn};
use std::collections::HashMap;

/// PNG image MIME type
pub const MIME_IMAGE_PNG: &str = "image/png";

/// JPEG image MIME type
pub const MIME_IMAGE_JPEG: &str = "image/jpeg";

/// GIF image MIME type
pub const MIME_IMAGE_GIF: &str = "image/gif";

/// BMP image MIME type
pub const MIME_IMAGE_BMP: &str = "image/bmp";

/// SVG image MIME type
pub const MIME_IMAGE_SVG: &str = "image/svg+xml";

/// TIFF image MIME type
pub const MIME_IMAGE_TIFF: &str = "image/tiff";

/// Enhanced metafile MIME type
pub const MIME_IMAGE_EMF: &str = "image/x-emf";

/// Windows metafile MIME type
pub const MIME_IMAGE_WMF: &str = "image/x-wmf";

/// Generic binary data MIME type (fallback)
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

/// Get the MIME type for an image file extension (case-insensitive).
///
/// # Examples
///
/// ```
/// use docx2html_backend::images::{mime_type_from_extension, MIME_IMAGE_EMF, MIME_OCTET_STREAM};
///
/// assert_eq!(mime_type_from_extension("EMF", MIME_OCTET_STREAM), MIME_IMAGE_EMF);
/// assert_eq!(mime_type_from_extension("xyz", MIME_OCTET_STREAM), MIME_OCTET_STREAM);
/// ```
#[inline]
#[must_use = "returns the MIME type for the given extension"]
pub fn mime_type_from_extension<'a>(extension: &str, fallback: &'a str) -> &'a str {
    match extension.to_ascii_lowercase().as_str() {
        "png" => MIME_IMAGE_PNG,
        "jpg" | "jpeg" | "jpe" => MIME_IMAGE_JPEG,
        "gif" => MIME_IMAGE_GIF,
        "bmp" => MIME_IMAGE_BMP,
        "svg" => MIME_IMAGE_SVG,
        "tif" | "tiff" => MIME_IMAGE_TIFF,
        "emf" => MIME_IMAGE_EMF,
        "wmf" => MIME_IMAGE_WMF,
        _ => fallback,
    }
}

/// An image part's media type and content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocxImagePart {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Relationship id → image part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageResolver {
    images: HashMap<String, DocxImagePart>,
}

impl ImageResolver {
    /// Read all image parts referenced by the document relationships
    ///
    /// Missing or unreadable parts are skipped; images referencing them are
    /// dropped during tokenizing.
    pub fn load(
        package: &mut DocxPackage<'_>,
        relationships: &Relationships,
        content_types: &ContentTypes,
    ) -> Self {
        let mut images = HashMap::new();

        for (rel_id, relationship) in relationships.of_type(IMAGE_REL_TYPE) {
            let Some(part_name) = relationship.part_name() else {
                debug!("Skipping external image {rel_id} → {}", relationship.target);
                continue;
            };
            let bytes = match package.extract_part(&part_name) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Skipping image {rel_id}: {e}");
                    continue;
                }
            };
            let content_type = content_types
                .content_type_of(&part_name)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    let ext = part_extension(&part_name).unwrap_or_default();
                    mime_type_from_extension(&ext, MIME_OCTET_STREAM).to_string()
                });

            images.insert(rel_id.clone(), DocxImagePart { content_type, bytes });
        }

        debug!("Resolved {} image parts", images.len());
        Self { images }
    }

    /// Build a resolver from known parts
    pub fn from_parts(parts: impl IntoIterator<Item = (String, DocxImagePart)>) -> Self {
        Self {
            images: parts.into_iter().collect(),
        }
    }

    #[inline]
    pub fn get(&self, rel_id: &str) -> Option<&DocxImagePart> {
        self.images.get(rel_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
