//! Import registry: import requests grouped by source, with alias generation.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::table::DefinitionTable;

/// Where imported names come from.
///
/// Identity is the exact reference text, so `"./a.css"` and `'./a.css'` are
/// different sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "reference", rename_all = "lowercase")]
pub enum ImportSource {
    /// A quoted path, quotes included.
    Literal(String),
    /// A bare identifier that was not a known path constant when the import
    /// was processed. Left for a downstream pass to resolve.
    Unresolved(String),
}

impl ImportSource {
    /// Resolves the source operand of an import statement.
    ///
    /// A quoted operand is used as-is. A bare identifier is looked up in the
    /// table as it stands: a local constant holding a quoted string resolves
    /// to that string; anything else stays unresolved.
    pub fn resolve(operand: &str, table: &DefinitionTable) -> Self {
        if is_quoted(operand) {
            return ImportSource::Literal(operand.to_string());
        }
        match table.get(operand) {
            Some(def) if def.is_local() && is_quoted(&def.value) => {
                ImportSource::Literal(def.value.clone())
            }
            _ => ImportSource::Unresolved(operand.to_string()),
        }
    }

    /// Reference text as written inside `:import(...)`.
    pub fn reference(&self) -> &str {
        match self {
            ImportSource::Literal(text) | ImportSource::Unresolved(text) => text,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ImportSource::Literal(_))
    }
}

impl fmt::Display for ImportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reference())
    }
}

/// One imported name: `alias` stands in locally for `remote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedName {
    pub remote: String,
    pub alias: String,
}

/// All names requested from one source, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportGroup {
    pub source: ImportSource,
    pub names: Vec<ImportedName>,
}

/// Import requests grouped by source in first-appearance order.
///
/// Owns the alias counter: every registered name gets the next sequence
/// number, so aliases are unique across the whole stylesheet.
#[derive(Debug, Clone)]
pub struct ImportRegistry {
    prefix: String,
    groups: Vec<ImportGroup>,
    index: HashMap<String, usize>,
    next_seq: usize,
}

impl ImportRegistry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            groups: Vec::new(),
            index: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Registers `remote` imported from `source` under the local name
    /// `local`, returning the generated alias.
    pub fn register(&mut self, source: &ImportSource, remote: &str, local: &str) -> String {
        let alias = make_alias(&self.prefix, local, self.next_seq);
        self.next_seq += 1;

        let slot = match self.index.get(source.reference()) {
            Some(&slot) => slot,
            None => {
                self.index
                    .insert(source.reference().to_string(), self.groups.len());
                self.groups.push(ImportGroup {
                    source: source.clone(),
                    names: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        self.groups[slot].names.push(ImportedName {
            remote: remote.to_string(),
            alias: alias.clone(),
        });
        alias
    }

    pub fn groups(&self) -> &[ImportGroup] {
        &self.groups
    }

    /// Consumes the registry, returning its groups.
    pub fn into_groups(self) -> Vec<ImportGroup> {
        self.groups
    }
}

/// Builds `<prefix><local>_<seq>`, with every character of `local` outside
/// `[A-Za-z0-9_]` replaced by `_`.
fn make_alias(prefix: &str, local: &str, seq: usize) -> String {
    let sanitized: String = local
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("{}{}_{}", prefix, sanitized, seq)
}

pub(crate) fn is_quoted(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
}
