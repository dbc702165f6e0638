//! Segment tokenizer.
//!
//! Splits raw X12 text into segments (line breaks or a configured terminator),
//! segments into elements (`*`), and composite elements into components (`:`).
//! Tokenization is best-effort: a segment that fails is recorded in
//! [`Tokenized::errors`] and the rest of the input is still processed.

use edi_model::{Element, Segment};
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result, SegmentError, SegmentErrorKind};

pub const DEFAULT_ELEMENT_SEPARATOR: char = '*';
pub const DEFAULT_COMPONENT_SEPARATOR: char = ':';

const BYTE_ORDER_MARK: char = '\u{feff}';
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Delimiters used to split the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerOptions {
    pub element_separator: char,
    pub component_separator: char,
    /// Extra segment terminator (e.g. `~`). Line breaks always terminate segments.
    pub segment_terminator: Option<char>,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            element_separator: DEFAULT_ELEMENT_SEPARATOR,
            component_separator: DEFAULT_COMPONENT_SEPARATOR,
            segment_terminator: None,
        }
    }
}

impl TokenizerOptions {
    #[must_use]
    pub fn with_segment_terminator(mut self, terminator: char) -> Self {
        self.segment_terminator = Some(terminator);
        self
    }

    #[must_use]
    pub fn with_element_separator(mut self, separator: char) -> Self {
        self.element_separator = separator;
        self
    }

    #[must_use]
    pub fn with_component_separator(mut self, separator: char) -> Self {
        self.component_separator = separator;
        self
    }

    /// Read the delimiters declared by a leading `ISA` segment.
    ///
    /// The character after `ISA` is the element separator, the first character
    /// of `ISA16` is the component separator, and a non-whitespace character
    /// right after it is the segment terminator.
    pub fn detect(text: &str) -> Option<Self> {
        let body = text.trim_start_matches(|c: char| c == BYTE_ORDER_MARK || c.is_whitespace());
        let rest = body.strip_prefix("ISA")?;
        let element_separator = rest.chars().next()?;
        if element_separator.is_ascii_alphanumeric() || element_separator.is_whitespace() {
            return None;
        }
        // `rest` starts with the separator, so ISA16 is piece 16.
        let isa16 = rest.split(element_separator).nth(16)?;
        let mut chars = isa16.chars();
        let component_separator = chars.next().filter(|c| !c.is_whitespace())?;
        let segment_terminator = chars.next().filter(|c| !c.is_whitespace());
        Some(Self {
            element_separator,
            component_separator,
            segment_terminator,
        })
    }

    /// [`detect`](Self::detect), falling back to the defaults.
    pub fn detect_or_default(text: &str) -> Self {
        Self::detect(text).unwrap_or_default()
    }

    fn is_segment_break(&self, c: char) -> bool {
        c == '\n' || c == '\r' || Some(c) == self.segment_terminator
    }
}

/// Result of a best-effort tokenization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tokenized {
    pub segments: Vec<Segment>,
    pub errors: Vec<SegmentError>,
}

impl Tokenized {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Re-join the raw segment text with `terminator`.
    pub fn rejoin(&self, terminator: &str) -> String {
        self.segments
            .iter()
            .map(Segment::raw)
            .collect::<Vec<_>>()
            .join(terminator)
    }
}

/// Tokenize with the default delimiters.
///
/// # Errors
///
/// [`IngestError::EmptyInput`] when no segment survives.
pub fn tokenize(text: &str) -> Result<Tokenized> {
    tokenize_with(text, &TokenizerOptions::default())
}

/// Tokenize text with explicit delimiters.
pub fn tokenize_with(text: &str, options: &TokenizerOptions) -> Result<Tokenized> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut tokenized = Tokenized::default();
    for (offset, piece) in split_segments(text, *options).enumerate() {
        push_piece(&mut tokenized, offset + 1, piece, options);
    }
    finish(tokenized)
}

/// Tokenize raw bytes. Segments that are not valid UTF-8 are recorded as
/// errors and skipped.
pub fn tokenize_bytes(bytes: &[u8], options: &TokenizerOptions) -> Result<Tokenized> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let terminator = options
        .segment_terminator
        .filter(char::is_ascii)
        .map(|c| c as u8);
    let mut tokenized = Tokenized::default();
    let mut index = 0usize;

    for line in bytes.split(|b| *b == b'\n' || *b == b'\r' || Some(*b) == terminator) {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match std::str::from_utf8(line) {
            Ok(text) => {
                for piece in split_segments(text, *options) {
                    index += 1;
                    push_piece(&mut tokenized, index, piece, options);
                }
            }
            Err(err) => {
                index += 1;
                let kind = SegmentErrorKind::InvalidEncoding {
                    valid_up_to: err.valid_up_to(),
                };
                tracing::debug!(index, %kind, "skipping segment");
                tokenized.errors.push(SegmentError {
                    index,
                    raw: String::from_utf8_lossy(line).into_owned(),
                    kind,
                });
            }
        }
    }
    finish(tokenized)
}

/// Tokenize a single segment's text.
pub fn tokenize_segment(
    piece: &str,
    options: &TokenizerOptions,
) -> std::result::Result<Segment, SegmentErrorKind> {
    let mut parts = piece.split(options.element_separator);
    let segment_id = parts.next().unwrap_or_default().trim();
    if segment_id.is_empty() {
        return Err(SegmentErrorKind::MissingSegmentId);
    }
    if !is_valid_segment_id(segment_id) {
        return Err(SegmentErrorKind::InvalidSegmentId {
            id: segment_id.to_string(),
        });
    }

    // ISA16 declares the component separator, so ISA elements are never split.
    let split_components = segment_id != "ISA";
    let elements = parts
        .map(|part| {
            if split_components && part.contains(options.component_separator) {
                Element::Composite(
                    part.split(options.component_separator)
                        .map(str::to_string)
                        .collect(),
                )
            } else {
                Element::Simple(part.to_string())
            }
        })
        .collect();

    Ok(Segment::new(segment_id, elements, piece))
}

/// X12 segment identifiers are two or three ASCII alphanumerics.
fn is_valid_segment_id(id: &str) -> bool {
    (2..=3).contains(&id.len()) && id.chars().all(|c| c.is_ascii_alphanumeric())
}

fn split_segments(text: &str, options: TokenizerOptions) -> impl Iterator<Item = &str> {
    text.split(move |c: char| options.is_segment_break(c))
        .filter(|piece| !piece.trim().is_empty())
}

fn push_piece(tokenized: &mut Tokenized, index: usize, piece: &str, options: &TokenizerOptions) {
    match tokenize_segment(piece, options) {
        Ok(segment) => tokenized.segments.push(segment),
        Err(kind) => {
            tracing::debug!(index, %kind, "skipping segment");
            tokenized.errors.push(SegmentError {
                index,
                raw: piece.to_string(),
                kind,
            });
        }
    }
}

fn finish(tokenized: Tokenized) -> Result<Tokenized> {
    if tokenized.segments.is_empty() {
        return Err(IngestError::EmptyInput {
            errors: tokenized.errors,
        });
    }
    tracing::debug!(
        segments = tokenized.segments.len(),
        errors = tokenized.errors.len(),
        "tokenized input"
    );
    Ok(tokenized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_elements_and_components() {
        let tokenized = tokenize("SEG*a*b:c*d").unwrap();
        let segment = &tokenized.segments[0];
        assert_eq!(segment.segment_id(), "SEG");
        assert_eq!(
            segment.elements(),
            &[
                Element::from("a"),
                Element::Composite(vec!["b".into(), "c".into()]),
                Element::from("d"),
            ]
        );
        assert_eq!(segment.raw(), "SEG*a*b:c*d");
    }

    #[test]
    fn any_line_break_separates_segments() {
        let tokenized = tokenize("ST*837*0001\r\nBHT*0019\rNM1*85\nSE*4*0001").unwrap();
        let ids: Vec<_> = tokenized.segments.iter().map(Segment::segment_id).collect();
        assert_eq!(ids, ["ST", "BHT", "NM1", "SE"]);
    }

    #[test]
    fn configured_terminator_and_blank_lines() {
        let options = TokenizerOptions::default().with_segment_terminator('~');
        let tokenized = tokenize_with("ST*837*0001~\n\n  \nSE*2*0001~\n", &options).unwrap();
        assert_eq!(tokenized.segment_count(), 2);
        assert!(!tokenized.has_errors());
    }

    #[test]
    fn blank_input_is_empty() {
        let err = tokenize("\n  \r\n\t\n").unwrap_err();
        let IngestError::EmptyInput { errors } = &err;
        assert!(errors.is_empty());
        assert_eq!(err.messages(), ["no segments found in input"]);
    }

    #[test]
    fn bad_segments_are_recorded_not_fatal() {
        let tokenized = tokenize("ST*837*0001\n*orphan*element\nthis is not x12\nSE*2*0001").unwrap();
        assert_eq!(tokenized.segment_count(), 2);
        assert_eq!(tokenized.errors.len(), 2);
        assert_eq!(tokenized.errors[0].index, 2);
        assert_eq!(tokenized.errors[0].kind, SegmentErrorKind::MissingSegmentId);
        assert_eq!(tokenized.errors[1].index, 3);
        assert!(matches!(
            tokenized.errors[1].kind,
            SegmentErrorKind::InvalidSegmentId { .. }
        ));
    }

    #[test]
    fn all_segments_failing_is_empty_input_with_errors() {
        let err = tokenize("not x12 at all\n*").unwrap_err();
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn invalid_utf8_segment_is_skipped() {
        let bytes = b"ST*837*0001\nNM1*85*\xFF\xFE\nSE*3*0001\n";
        let tokenized = tokenize_bytes(bytes, &TokenizerOptions::default()).unwrap();
        assert_eq!(tokenized.segment_count(), 2);
        assert_eq!(tokenized.errors.len(), 1);
        assert_eq!(tokenized.errors[0].index, 2);
        assert_eq!(
            tokenized.errors[0].kind,
            SegmentErrorKind::InvalidEncoding { valid_up_to: 7 }
        );
    }

    #[test]
    fn isa_elements_are_not_split() {
        let tokenized = tokenize("ISA*00*A:B*:").unwrap();
        let isa = &tokenized.segments[0];
        assert_eq!(isa.elements()[1], Element::from("A:B"));
        assert_eq!(isa.elements()[2], Element::from(":"));
    }

    #[test]
    fn detects_delimiters_from_isa() {
        let text = "ISA|00|          |00|          |ZZ|SENDER         |ZZ|RECEIVER       \
                    |240101|1200|^|00501|000000001|0|P|>~GS|HC~";
        let options = TokenizerOptions::detect(text).unwrap();
        assert_eq!(options.element_separator, '|');
        assert_eq!(options.component_separator, '>');
        assert_eq!(options.segment_terminator, Some('~'));
    }

    #[test]
    fn detect_without_terminator() {
        let text = "ISA*00*          *00*          *ZZ*SENDERID       *ZZ*RECEIVERID     \
                    *240101*1200*^*00501*000000001*0*P*:\nGS*HC";
        let options = TokenizerOptions::detect(text).unwrap();
        assert_eq!(options, TokenizerOptions::default());
        assert_eq!(TokenizerOptions::detect("GS*HC"), None);
    }

    #[test]
    fn leading_bom_is_ignored() {
        let tokenized = tokenize("\u{feff}ST*837*0001").unwrap();
        assert_eq!(tokenized.segments[0].segment_id(), "ST");
    }
}
