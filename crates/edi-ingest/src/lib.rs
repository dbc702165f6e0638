//! X12 ingestion: tokenization and envelope hierarchy.
//!
//! ```ignore
//! use edi_ingest::parse;
//!
//! let outcome = parse(&raw)?;
//! println!("{} segments", outcome.segment_count());
//! println!("sender: {}", outcome.document.interchange.sender_id);
//! ```

pub mod error;
pub mod hierarchy;
pub mod tokenizer;

pub use error::{IngestError, Result, SegmentError, SegmentErrorKind};
pub use hierarchy::{
    Hierarchy, StructureWarning, build_document, parse_group, parse_interchange,
    parse_transaction,
};
pub use tokenizer::{
    DEFAULT_COMPONENT_SEPARATOR, DEFAULT_ELEMENT_SEPARATOR, TokenizerOptions, Tokenized,
    tokenize, tokenize_bytes, tokenize_segment, tokenize_with,
};

use edi_model::{ParsedDocument, Segment};
use serde::Serialize;

/// Tokenized segments plus the structure built from them.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome {
    pub segments: Vec<Segment>,
    pub document: ParsedDocument,
    pub segment_errors: Vec<SegmentError>,
    pub warnings: Vec<StructureWarning>,
}

impl ParseOutcome {
    /// Number of top-level segments that tokenized.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

/// Tokenize and build, reading delimiters from the `ISA` header when present.
pub fn parse(text: &str) -> Result<ParseOutcome> {
    parse_with(text, &TokenizerOptions::detect_or_default(text))
}

/// Tokenize and build with explicit delimiters.
pub fn parse_with(text: &str, options: &TokenizerOptions) -> Result<ParseOutcome> {
    let Tokenized { segments, errors } = tokenize_with(text, options)?;
    let Hierarchy { document, warnings } = build_document(&segments);
    Ok(ParseOutcome {
        segments,
        document,
        segment_errors: errors,
        warnings,
    })
}

/// Bytes inspected when reading delimiters from the `ISA` header of raw input.
pub const HEADER_SCAN_BYTES: usize = 1024;

/// Tokenize and build raw bytes. Delimiters come from the `ISA` header when
/// present; bytes that are not UTF-8 fail only the segments they appear in.
pub fn parse_bytes(bytes: &[u8]) -> Result<ParseOutcome> {
    parse_bytes_with(bytes, &detect_bytes(bytes))
}

/// [`parse_bytes`] with explicit delimiters.
pub fn parse_bytes_with(bytes: &[u8], options: &TokenizerOptions) -> Result<ParseOutcome> {
    let Tokenized { segments, errors } = tokenize_bytes(bytes, options)?;
    let Hierarchy { document, warnings } = build_document(&segments);
    Ok(ParseOutcome {
        segments,
        document,
        segment_errors: errors,
        warnings,
    })
}

/// Delimiters declared by the `ISA` header at the start of `bytes`, or the defaults.
pub fn detect_bytes(bytes: &[u8]) -> TokenizerOptions {
    let head = &bytes[..bytes.len().min(HEADER_SCAN_BYTES)];
    TokenizerOptions::detect_or_default(&String::from_utf8_lossy(head))
}

/// Cheap pre-check: the first non-blank content is an `ISA` segment.
pub fn looks_like_x12(text: &str) -> bool {
    text.trim_start_matches(|c: char| c == '\u{feff}' || c.is_whitespace())
        .starts_with("ISA")
}
