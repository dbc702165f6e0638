//! Rule-based validation of parsed X12 documents.
//!
//! Rules are plain data ([`ValidationRule`]) supplied by a [`RuleSource`]:
//! a CSV or JSON file, the built-in [`default_rules`], or anything else that
//! implements the trait. The engine reports findings as [`ValidationError`]
//! values; a document with findings is still a valid input.

pub mod checks;
pub mod engine;
pub mod error;
pub mod index;
pub mod rules;

pub use engine::RuleEngine;
pub use error::{Result, RuleLoadError};
pub use index::{CompiledRule, RuleIndex};
pub use rules::{
    RuleSet, RuleSource, default_rules, load_rules, load_rules_csv, load_rules_json,
    read_rules_csv,
};

use edi_model::{ParsedDocument, ValidationError, ValidationRule};

/// Validate a document against a rule list. Inactive rules are ignored.
pub fn validate(document: &ParsedDocument, rules: &[ValidationRule]) -> Vec<ValidationError> {
    RuleEngine::new(rules).validate(document)
}
