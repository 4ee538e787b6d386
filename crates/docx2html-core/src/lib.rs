//! # docx2html core types
//!
//! Content model, conversion result and error types shared by the DOCX to
//! HTML converter of the case-law documentation platform.
//!
//! The converter itself (package loading, tokenizing, list assembly,
//! border-number merging, rendering) lives in the `docx2html-backend` crate.
//! This crate only holds the data that flows between those stages:
//!
//! - [`ContentNode`]: closed sum type for block content
//! - [`NumberingIndex`] / [`NumberingFormat`]: per-entry list numbering
//! - [`Docx2Html`] / [`PropertyKey`]: the final result
//! - [`ConversionError`]: the two externally visible failures
//!
//! ## Example
//!
//! ```rust
//! use docx2html_core::{ContentNode, NumberingFormat, NumberingIndex};
//!
//! let entry = ContentNode::list_entry("first", NumberingIndex::new(0, NumberingFormat::Decimal));
//! assert!(entry.is_structural_block());
//! assert_eq!(NumberingFormat::Decimal.list_style_type(), "decimal");
//! ```

pub mod content;
pub mod error;
pub mod numbering;
pub mod result;

pub use content::{
    Alignment, BorderNumber, ContentNode, Inline, InlineImage, ListContainer, ListEntry, ListItem,
    Paragraph, ParagraphStyle, RunFlags, Table, TableCell, TextRun,
};
pub use error::{ConversionError, Result};
pub use numbering::{NumberingFormat, NumberingIndex};
pub use result::{Docx2Html, PropertyKey};
