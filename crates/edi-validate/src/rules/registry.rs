//! Validation rule collections.

use std::collections::HashSet;

use edi_model::ValidationRule;

use crate::error::{Result, RuleLoadError};

/// Anything that can hand the engine its active rules.
///
/// The engine never mutates rules; sources may reload between calls.
pub trait RuleSource: Send + Sync {
    /// Rules with `is_active == true`, in configuration order.
    fn active_rules(&self) -> Result<Vec<ValidationRule>>;
}

/// Ordered rule collection with unique names.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<ValidationRule>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Build from rules, rejecting duplicate names.
    pub fn from_rules(rules: Vec<ValidationRule>) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.name.as_str()) {
                return Err(RuleLoadError::DuplicateName(rule.name.clone()));
            }
        }
        Ok(Self { rules })
    }

    /// Add a rule, rejecting a duplicate name.
    pub fn insert(&mut self, rule: ValidationRule) -> Result<()> {
        if self.get(&rule.name).is_some() {
            return Err(RuleLoadError::DuplicateName(rule.name));
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ValidationRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationRule> {
        self.rules.iter()
    }

    pub fn active(&self) -> impl Iterator<Item = &ValidationRule> {
        self.rules.iter().filter(|rule| rule.is_active)
    }

    pub fn into_rules(self) -> Vec<ValidationRule> {
        self.rules
    }
}

impl RuleSource for RuleSet {
    fn active_rules(&self) -> Result<Vec<ValidationRule>> {
        Ok(self.active().cloned().collect())
    }
}
