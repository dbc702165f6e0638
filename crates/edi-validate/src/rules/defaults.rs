//! Built-in baseline rule set.

use super::loader::read_rules_csv;
use super::registry::RuleSet;
use crate::error::Result;

const DEFAULT_RULES_CSV: &str = include_str!("../../rules/default_rules.csv");

/// Envelope and common-segment rules shipped with the crate.
pub fn default_rules() -> Result<RuleSet> {
    read_rules_csv(DEFAULT_RULES_CSV.as_bytes())
}
