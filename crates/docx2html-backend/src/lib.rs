//! # docx2html backend
//!
//! Converts word-processing packages (DOCX) of court decisions into semantic
//! HTML fragments, together with the metadata the documentation platform
//! indexes them by.
//!
//! ## Pipeline
//!
//! 1. [`package`]: open the ZIP container, read relationships and content types
//! 2. [`styles`], [`numbering`], [`images`]: per-document side tables
//! 3. [`tokenizer`]: body elements → flat [`ContentNode`](docx2html_core::ContentNode) stream
//! 4. [`assembler`]: consecutive list entries → nested `<ul>`/`<ol>` containers
//! 5. [`border_number`]: margin numbers absorb the paragraphs they number
//! 6. [`render`]: node tree → HTML
//!
//! [`metadata`] reads custom document properties and footer ECLIs on the side.
//!
//! ## Usage
//!
//! ```no_run
//! use docx2html_backend::{ConverterOptions, DocxConverter};
//!
//! let bytes = std::fs::read("urteil.docx")?;
//! let converter = DocxConverter::with_options(ConverterOptions::default());
//! let result = converter.convert(Some(bytes.as_slice()))?;
//! println!("{}", result.html);
//! println!("ECLIs: {:?}", result.ecli_list);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Absent input is not an error:
//!
//! ```rust
//! assert!(docx2html_backend::convert(None).unwrap().is_empty());
//! ```

pub mod assembler;
pub mod border_number;
pub mod converter;
pub mod images;
pub mod metadata;
pub mod numbering;
pub mod options;
pub mod package;
pub mod render;
pub mod styles;
pub mod tokenizer;
pub mod xml;

pub use assembler::NumberingListAssembler;
pub use border_number::BorderNumberMerger;
pub use converter::{
    convert, extract_document_xml, DirectorySource, DocumentSource, DocxConverter, InMemorySource,
};
pub use images::{DocxImagePart, ImageResolver};
pub use numbering::NumberingRegistry;
pub use options::ConverterOptions;
pub use render::HtmlRenderer;
pub use styles::StyleRegistry;
pub use tokenizer::ContentTokenizer;

pub use docx2html_core::{ConversionError, Docx2Html, PropertyKey, Result};
