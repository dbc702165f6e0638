//! `edi.toml` configuration.
//!
//! ```toml
//! [tokenizer]
//! segment_terminator = "~"
//!
//! [rules]
//! path = "rules/payer.csv"
//!
//! [store]
//! dir = ".edi/transactions"
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use edi_ingest::TokenizerOptions;
use serde::{Deserialize, Serialize};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "edi.toml";

const DEFAULT_STORE_DIR: &str = ".edi/transactions";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EdiConfig {
    pub tokenizer: TokenizerSection,
    pub rules: RulesSection,
    pub store: StoreSection,
}

/// Delimiter overrides. When all are unset, delimiters are read from each
/// file's `ISA` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenizerSection {
    pub element_separator: Option<char>,
    pub component_separator: Option<char>,
    pub segment_terminator: Option<char>,
}

impl TokenizerSection {
    /// Fixed tokenizer options, or `None` to detect per file.
    pub fn options(&self) -> Option<TokenizerOptions> {
        if self.element_separator.is_none()
            && self.component_separator.is_none()
            && self.segment_terminator.is_none()
        {
            return None;
        }
        let mut options = TokenizerOptions::default();
        if let Some(separator) = self.element_separator {
            options = options.with_element_separator(separator);
        }
        if let Some(separator) = self.component_separator {
            options = options.with_component_separator(separator);
        }
        if let Some(terminator) = self.segment_terminator {
            options = options.with_segment_terminator(terminator);
        }
        Some(options)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesSection {
    /// CSV or JSON rules file; the built-in rules are used when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    /// Directory of the JSON transaction store.
    pub dir: PathBuf,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_STORE_DIR),
        }
    }
}

impl EdiConfig {
    /// Parse configuration text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse configuration")
    }

    /// Rules path from a flag, falling back to the file value.
    pub fn rules_path(&self, flag: Option<&Path>) -> Option<PathBuf> {
        flag.map(Path::to_path_buf).or_else(|| self.rules.path.clone())
    }

    /// Store directory from a flag, falling back to the file value.
    pub fn store_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map_or_else(|| self.store.dir.clone(), Path::to_path_buf)
    }
}

/// Load configuration.
///
/// An explicit path must exist. Without one, `edi.toml` in the working
/// directory is used when present, defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<EdiConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                return Ok(EdiConfig::default());
            }
            default
        }
    };

    let text = fs::read_to_string(&path)
        .with_context(|| format!("read configuration {}", path.display()))?;
    let config = EdiConfig::from_toml(&text)
        .with_context(|| format!("invalid configuration {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}
