//! Emission stage: rewrites the remaining tree and builds the synthesized
//! `:import` / `:export` rules.

use log::debug;

use super::imports::ImportGroup;
use super::substitute::Substituter;
use super::table::DefinitionTable;
use crate::config::ProcessorConfig;
use crate::tree::{Node, Rule};

/// Walks a tree in order, substituting selectors, declaration values and
/// the parameters of configured at-rules.
pub(super) struct Rewriter<'a> {
    subst: Substituter<'a>,
    config: &'a ProcessorConfig,
    overflow_sites: Vec<String>,
}

impl<'a> Rewriter<'a> {
    pub fn new(table: &'a DefinitionTable, config: &'a ProcessorConfig) -> Self {
        Self {
            subst: Substituter::new(table, config.max_nesting_depth),
            config,
            overflow_sites: Vec::new(),
        }
    }

    pub fn rewrite(&mut self, nodes: &mut [Node]) {
        for node in nodes {
            match node {
                Node::Rule(rule) => {
                    let selector = self.subst.selector(&rule.selector);
                    self.check_overflow(&rule.selector);
                    rule.selector = selector;
                    self.rewrite(&mut rule.nodes);
                }
                Node::AtRule(at_rule) => {
                    if self.config.substitutes_at_rule(&at_rule.name) {
                        let params = self.subst.value(&at_rule.params);
                        self.check_overflow(&format!("@{} {}", at_rule.name, at_rule.params.trim()));
                        at_rule.params = params;
                    }
                    if let Some(children) = at_rule.nodes.as_mut() {
                        self.rewrite(children);
                    }
                }
                Node::Declaration(decl) => {
                    let value = self.subst.value(&decl.value);
                    self.check_overflow(&format!("{}: {}", decl.property, decl.value));
                    decl.value = value;
                }
                Node::Comment(_) => {}
            }
        }
    }

    /// Source text of every statement where nesting went past the limit.
    pub fn into_overflow_sites(self) -> Vec<String> {
        self.overflow_sites
    }

    fn check_overflow(&mut self, site: &str) {
        if self.subst.take_overflow() {
            self.overflow_sites.push(site.to_string());
        }
    }
}

/// Builds the `:import(...)` rules, in registry order, followed by the
/// `:export` rule. Empty when there is nothing to import or export.
pub(super) fn synthesized_rules(groups: &[ImportGroup], table: &DefinitionTable) -> Vec<Node> {
    let mut rules: Vec<Node> = groups
        .iter()
        .map(|group| {
            let rule = group.names.iter().fold(
                Rule::new(format!(":import({})", group.source.reference())),
                |rule, name| rule.declaration(&name.alias, &name.remote),
            );
            Node::Rule(rule)
        })
        .collect();

    if !table.is_empty() {
        let export = table
            .iter()
            .fold(Rule::new(":export"), |rule, def| {
                rule.declaration(&def.name, def.replacement())
            });
        rules.push(Node::Rule(export));
    }

    debug!(
        "synthesized {} import rule(s) and {} export(s)",
        groups.len(),
        table.len()
    );
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{AtRule, Declaration, Stylesheet};
    use crate::values::imports::{ImportRegistry, ImportSource};
    use crate::values::table::Definition;

    fn table() -> DefinitionTable {
        let mut table = DefinitionTable::new();
        table.set(Definition::local("small", "(max-width: 599px)"));
        table.set(Definition::local("primary", "red"));
        table
    }

    #[test]
    fn test_rewrites_nested_blocks() {
        let table = table();
        let config = ProcessorConfig::default();
        let mut sheet = Stylesheet {
            nodes: vec![AtRule::block(
                "media",
                "small",
                vec![Rule::new(".primary").declaration("color", "primary").into()],
            )
            .into()],
        };

        let mut rewriter = Rewriter::new(&table, &config);
        rewriter.rewrite(&mut sheet.nodes);
        assert!(rewriter.into_overflow_sites().is_empty());
        assert_eq!(
            sheet.to_css(),
            "@media (max-width: 599px) {\n  .red {\n    color: red\n  }\n}\n"
        );
    }

    #[test]
    fn test_leaves_unlisted_at_rules() {
        let table = table();
        let config = ProcessorConfig::default().substitute_at_rules(Vec::<String>::new());
        let mut nodes: Vec<Node> = vec![AtRule::statement("import", "primary").into()];
        Rewriter::new(&table, &config).rewrite(&mut nodes);
        assert_eq!(nodes, vec![Node::AtRule(AtRule::statement("import", "primary"))]);
    }

    #[test]
    fn test_records_overflow_site() {
        let table = table();
        let config = ProcessorConfig::default().max_nesting_depth(0);
        let mut nodes: Vec<Node> = vec![Declaration::new("width", "calc(primary)").into()];
        let mut rewriter = Rewriter::new(&table, &config);
        rewriter.rewrite(&mut nodes);
        assert_eq!(rewriter.into_overflow_sites(), vec!["width: calc(primary)"]);
    }

    #[test]
    fn test_synthesized_import_then_export() {
        let mut registry = ImportRegistry::new("i__const_");
        let mut table = DefinitionTable::new();
        let source = ImportSource::Unresolved("colors".into());
        let alias = registry.register(&source, "red", "red");
        table.set(Definition::imported("red", "red", alias));
        table.set(Definition::local("colors", "\"./colors.css\""));

        let sheet = Stylesheet {
            nodes: synthesized_rules(registry.groups(), &table),
        };
        assert_eq!(
            sheet.to_css(),
            ":import(colors) {\n  i__const_red_0: red\n}\n\
             :export {\n  red: i__const_red_0;\n  colors: \"./colors.css\"\n}\n"
        );
    }

    #[test]
    fn test_nothing_synthesized_when_empty() {
        assert!(synthesized_rules(&[], &DefinitionTable::new()).is_empty());
    }
}
