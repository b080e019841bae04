//! Definition table: the insertion-ordered map of known constants.

use std::collections::HashMap;

use serde::Serialize;

/// How a constant got its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionKind {
    /// Declared in this stylesheet; the value is fully substituted.
    Local,
    /// Imported from another stylesheet; usages are replaced by `alias`,
    /// which a later stage resolves against the source's `:export` block.
    ImportedAlias { alias: String },
}

/// A named constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    /// Resolved text for [`DefinitionKind::Local`]; the remote name for
    /// [`DefinitionKind::ImportedAlias`].
    pub value: String,
    pub kind: DefinitionKind,
}

impl Definition {
    pub fn local(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: DefinitionKind::Local,
        }
    }

    pub fn imported(
        name: impl Into<String>,
        remote: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: remote.into(),
            kind: DefinitionKind::ImportedAlias {
                alias: alias.into(),
            },
        }
    }

    /// Text that replaces a usage of this constant, and that the `:export`
    /// block lists for it.
    pub fn replacement(&self) -> &str {
        match &self.kind {
            DefinitionKind::Local => &self.value,
            DefinitionKind::ImportedAlias { alias } => alias,
        }
    }

    pub fn is_local(&self) -> bool {
        self.kind == DefinitionKind::Local
    }
}

/// One `name: value` entry of the `:export` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEntry {
    pub name: String,
    pub value: String,
}

/// Insertion-ordered constant table.
///
/// Redefining a name replaces its entry in place; iteration order is always
/// the order in which names were first defined.
#[derive(Debug, Clone, Default)]
pub struct DefinitionTable {
    entries: Vec<Definition>,
    index: HashMap<String, usize>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a definition. Returns the definition it replaced.
    pub fn set(&mut self, definition: Definition) -> Option<Definition> {
        match self.index.get(&definition.name) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot], definition)),
            None => {
                self.index
                    .insert(definition.name.clone(), self.entries.len());
                self.entries.push(definition);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    /// Replacement text for `name`, if it is defined.
    pub fn replacement(&self, name: &str) -> Option<&str> {
        self.get(name).map(Definition::replacement)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of the `:export` block, in table order.
    pub fn exports(&self) -> Vec<ExportEntry> {
        self.entries
            .iter()
            .map(|def| ExportEntry {
                name: def.name.clone(),
                value: def.replacement().to_string(),
            })
            .collect()
    }
}
