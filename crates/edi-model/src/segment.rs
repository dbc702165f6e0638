//! Tokenized X12 segments.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single element of a segment.
///
/// Serializes as a plain string, or as an array of strings for composites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    Simple(String),
    Composite(Vec<String>),
}

impl Element {
    /// Text form of the element. Composites are re-joined with `:`.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Element::Simple(value) => Cow::Borrowed(value.as_str()),
            Element::Composite(parts) => Cow::Owned(parts.join(":")),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::Simple(value.to_string())
    }
}

/// One parsed segment. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    segment_id: String,
    elements: Vec<Element>,
    raw: String,
}

impl Segment {
    pub fn new(segment_id: impl Into<String>, elements: Vec<Element>, raw: impl Into<String>) -> Self {
        Self {
            segment_id: segment_id.into(),
            elements,
            raw: raw.into(),
        }
    }

    pub fn segment_id(&self) -> &str {
        &self.segment_id
    }

    /// Elements after the segment identifier.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// The segment text exactly as it appeared in the input.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Element at a 1-based position (`NM1*85` has `NM101 == "85"`).
    pub fn element(&self, position: usize) -> Option<&Element> {
        position
            .checked_sub(1)
            .and_then(|idx| self.elements.get(idx))
    }

    /// Trimmed text of the element at a 1-based position, or `""` when absent.
    pub fn field(&self, position: usize) -> String {
        self.element(position)
            .map(|element| element.as_text().trim().to_string())
            .unwrap_or_default()
    }

    /// Reference designator for an element, e.g. `NM103`.
    pub fn designator(&self, position: usize) -> String {
        format!("{}{:02}", self.segment_id, position)
    }
}
