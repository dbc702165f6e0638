//! Rule sources: loaders, the built-in set, and the `RuleSource` seam.

mod defaults;
mod loader;
mod registry;

pub use defaults::default_rules;
pub use loader::{load_rules, load_rules_csv, load_rules_json, read_rules_csv};
pub use registry::{RuleSet, RuleSource};
