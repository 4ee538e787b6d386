//! Error types for DOCX conversion.
//!
//! Only two failures are visible to callers of the converter: the package
//! could not be loaded at all, or the auxiliary raw-text path produced
//! something that does not parse as XML. Everything else (unknown styles,
//! unresolved images, unrecognized custom properties) is tolerated and never
//! surfaces as an error.

use thiserror::Error;

/// Errors that can occur while converting a word-processing package.
///
/// # Examples
///
/// ```rust,ignore
/// // Note: the converter lives in the docx2html-backend crate
/// use docx2html_backend::convert;
/// use docx2html_core::ConversionError;
///
/// match convert(Some(&bytes)) {
///     Ok(result) => println!("{} bytes of html", result.html.len()),
///     Err(ConversionError::PackageLoad(msg)) => eprintln!("corrupt package: {msg}"),
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The package is not a readable ZIP archive, lacks its main document
    /// part, or the main document part is not well-formed XML.
    ///
    /// Fatal for the whole call. The caller decides whether to retry.
    #[error("Could not load docx package: {0}")]
    PackageLoad(String),

    /// The raw document text extracted for preview could not be re-parsed as
    /// XML.
    ///
    /// Only raised by the auxiliary extraction path; the HTML pipeline never
    /// produces it.
    #[error("Could not parse extracted document text as XML: {0}")]
    TextExtraction(String),

    /// I/O error while reading the input stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for [`Result<T, ConversionError>`].
pub type Result<T> = std::result::Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_load_display() {
        let error = ConversionError::PackageLoad("invalid Zip archive".to_string());
        assert_eq!(
            error.to_string(),
            "Could not load docx package: invalid Zip archive"
        );
    }

    #[test]
    fn test_text_extraction_display_is_distinct() {
        let load = ConversionError::PackageLoad("x".to_string()).to_string();
        let extraction = ConversionError::TextExtraction("x".to_string()).to_string();
        assert_ne!(load, extraction);
        assert!(extraction.contains("XML"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err: ConversionError = io_err.into();

        match err {
            ConversionError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn inner() -> Result<String> {
            Err(ConversionError::PackageLoad("missing word/document.xml".to_string()))
        }

        fn outer() -> Result<String> {
            let _html = inner()?;
            Ok("unreachable".to_string())
        }

        match outer() {
            Err(ConversionError::PackageLoad(msg)) => {
                assert_eq!(msg, "missing word/document.xml");
            }
            _ => panic!("Expected PackageLoad to propagate"),
        }
    }

    #[test]
    fn test_error_size() {
        let size = std::mem::size_of::<ConversionError>();
        assert!(
            size < 64,
            "ConversionError size is {size} bytes, consider boxing large variants"
        );
    }
}
