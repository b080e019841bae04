//! The `@value` engine.
//!
//! A single left-to-right pass over the top-level statements of a
//! [`Stylesheet`]:
//!
//! 1. Each `@value` statement is classified as a definition,
//!    an import or a malformed statement.
//! 2. Definitions are substituted against the table as it stands at that
//!    point, then recorded in the [`DefinitionTable`]. Values are stored
//!    fully resolved, so later statements never re-expand them and a
//!    redefinition cannot change text that was already substituted.
//! 3. Imports are recorded in the [`ImportRegistry`], which hands out a
//!    unique alias per imported name.
//! 4. After the pass, every `@value` statement is removed, the rest of the
//!    tree is rewritten with the final table, and the `:import` / `:export`
//!    rules are inserted where the first `@value` statement was.
//!
//! # Example
//!
//! ```rust
//! use cssvalues::{Stylesheet, ValuesProcessor};
//!
//! let mut sheet = Stylesheet::parse(
//!     "@value primary: red;\n@value accent from \"./theme.css\";\n.a { color: primary; border-color: accent; }",
//! ).unwrap();
//! let report = ValuesProcessor::default().process(&mut sheet);
//!
//! assert!(report.diagnostics.is_empty());
//! assert_eq!(sheet.find_rule(".a").unwrap().value_of("color"), Some("red"));
//! assert_eq!(
//!     sheet.find_rule(".a").unwrap().value_of("border-color"),
//!     Some("i__const_accent_0")
//! );
//! ```

mod classify;
mod emit;
mod imports;
mod substitute;
mod table;

pub use imports::{ImportGroup, ImportRegistry, ImportSource, ImportedName};
pub use substitute::Substituter;
pub use table::{Definition, DefinitionKind, DefinitionTable, ExportEntry};

use log::{debug, warn};
use serde::Serialize;

use crate::config::ProcessorConfig;
use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::tree::{AtRule, Node, Stylesheet};
use classify::{classify, ImportName, Statement};
use emit::{synthesized_rules, Rewriter};

/// Outcome of processing one stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValuesReport {
    /// Diagnostics in the order their statements appear.
    pub diagnostics: Vec<Diagnostic>,
    /// Contents of the synthesized `:export` rule.
    pub exports: Vec<ExportEntry>,
    /// Contents of the synthesized `:import` rules.
    pub imports: Vec<ImportGroup>,
}

impl ValuesReport {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Looks up the exported text for `name`.
    pub fn export(&self, name: &str) -> Option<&str> {
        self.exports
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value.as_str())
    }
}

/// Resolves `@value` constants in a stylesheet.
///
/// Holds only configuration; all per-stylesheet state lives inside one
/// [`process`](Self::process) call, so a processor can be shared across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct ValuesProcessor {
    config: ProcessorConfig,
}

impl ValuesProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Processes `sheet` in place.
    ///
    /// Never fails: malformed statements are reported in the returned
    /// [`ValuesReport`] and otherwise ignored.
    pub fn process(&self, sheet: &mut Stylesheet) -> ValuesReport {
        let first_statement = sheet
            .nodes
            .iter()
            .position(|node| matches!(node, Node::AtRule(at_rule) if at_rule.is_value_statement()));
        let Some(insert_at) = first_statement else {
            debug!("no @value statements; stylesheet left unchanged");
            return ValuesReport::default();
        };

        let mut pass = Pass::new(&self.config);
        let mut kept = Vec::with_capacity(sheet.nodes.len());
        for node in std::mem::take(&mut sheet.nodes) {
            match node {
                Node::AtRule(at_rule) if at_rule.is_value_statement() => pass.statement(&at_rule),
                other => kept.push(other),
            }
        }

        let mut rewriter = Rewriter::new(&pass.table, &self.config);
        rewriter.rewrite(&mut kept);
        let overflow_sites = rewriter.into_overflow_sites();
        for site in overflow_sites {
            pass.nesting_too_deep(site);
        }

        let synthesized = synthesized_rules(pass.registry.groups(), &pass.table);
        let tail = kept.split_off(insert_at);
        kept.extend(synthesized);
        kept.extend(tail);
        sheet.nodes = kept;

        pass.finish()
    }

    /// Processes `sheet` in place, also forwarding each diagnostic to `sink`.
    pub fn process_with_sink<S>(&self, sheet: &mut Stylesheet, sink: &mut S) -> ValuesReport
    where
        S: DiagnosticSink + ?Sized,
    {
        let report = self.process(sheet);
        for diagnostic in &report.diagnostics {
            sink.report(diagnostic.clone());
        }
        report
    }
}

/// State of one processing call.
struct Pass<'c> {
    config: &'c ProcessorConfig,
    table: DefinitionTable,
    registry: ImportRegistry,
    diagnostics: Vec<Diagnostic>,
}

impl<'c> Pass<'c> {
    fn new(config: &'c ProcessorConfig) -> Self {
        Self {
            config,
            table: DefinitionTable::new(),
            registry: ImportRegistry::new(config.alias_prefix.clone()),
            diagnostics: Vec::new(),
        }
    }

    fn statement(&mut self, at_rule: &AtRule) {
        let source_text = format!("@{} {}", at_rule.name, at_rule.params.trim_end());

        if at_rule.nodes.is_some() {
            self.report(Diagnostic::malformed(
                format!("Invalid value definition: {}", at_rule.params.trim()),
                source_text,
            ));
            return;
        }

        for statement in classify(&at_rule.params) {
            match statement {
                Statement::Definition { name, value } => self.define(name, &value, &source_text),
                Statement::Import { names, source } => self.import(&names, &source),
                Statement::Malformed { message } => {
                    self.report(Diagnostic::malformed(message, source_text.clone()))
                }
            }
        }
    }

    fn define(&mut self, name: String, value: &str, source_text: &str) {
        let mut subst = Substituter::new(&self.table, self.config.max_nesting_depth);
        let resolved = subst.value(value);
        let overflowed = subst.take_overflow();
        if overflowed {
            self.nesting_too_deep(source_text.to_string());
        }

        debug!("@value {} = {:?}", name, resolved);
        if let Some(previous) = self.table.set(Definition::local(name, resolved)) {
            debug!("@value {} redefined (was {:?})", previous.name, previous.replacement());
        }
    }

    fn import(&mut self, names: &[ImportName], operand: &str) {
        let source = ImportSource::resolve(operand, &self.table);
        if !source.is_resolved() {
            debug!("import source {} is not a known path constant", operand);
        }

        for name in names {
            let alias = self.registry.register(&source, &name.remote, &name.local);
            debug!(
                "@value {} imported as {} from {} ({})",
                name.local, name.remote, source, alias
            );
            self.table
                .set(Definition::imported(name.local.clone(), name.remote.clone(), alias));
        }
    }

    fn nesting_too_deep(&mut self, source_text: String) {
        let message = format!(
            "Nesting deeper than {} levels; inner text left unsubstituted",
            self.config.max_nesting_depth
        );
        self.report(Diagnostic::new(
            DiagnosticKind::NestingTooDeep,
            message,
            source_text,
        ));
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{} ({})", diagnostic.message, diagnostic.source_text.trim());
        self.diagnostics.push(diagnostic);
    }

    fn finish(self) -> ValuesReport {
        ValuesReport {
            diagnostics: self.diagnostics,
            exports: self.table.exports(),
            imports: self.registry.into_groups(),
        }
    }
}
