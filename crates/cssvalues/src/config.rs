//! Processor configuration.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields the standard behavior:
//!
//! ```yaml
//! alias_prefix: i__const_
//! substitute_at_rules: [media, supports]
//! max_nesting_depth: 64
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default prefix for generated import aliases.
pub const DEFAULT_ALIAS_PREFIX: &str = "i__const_";

/// Default bracket nesting depth the substitution engine descends into.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Settings for a [`ValuesProcessor`](crate::ValuesProcessor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorConfig {
    /// Prefix of generated aliases (`<prefix><name>_<seq>`).
    pub alias_prefix: String,

    /// At-rules whose parameters are rewritten like declaration values.
    /// Matched case-insensitively.
    pub substitute_at_rules: Vec<String>,

    /// Bracket depth past which text is copied without substitution.
    pub max_nesting_depth: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            alias_prefix: DEFAULT_ALIAS_PREFIX.to_string(),
            substitute_at_rules: vec!["media".to_string(), "supports".to_string()],
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ProcessorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the alias prefix.
    pub fn alias_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.alias_prefix = prefix.into();
        self
    }

    /// Replaces the list of at-rules whose parameters are substituted.
    pub fn substitute_at_rules<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.substitute_at_rules = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the maximum bracket nesting depth.
    pub fn max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Returns true if parameters of `@<name>` should be substituted.
    pub fn substitutes_at_rule(&self, name: &str) -> bool {
        self.substitute_at_rules
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(name))
    }

    /// Parses a configuration from YAML.
    ///
    /// Missing keys take their defaults; unknown keys are rejected.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }
}
