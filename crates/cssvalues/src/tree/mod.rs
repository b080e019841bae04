//! Mutable stylesheet tree.
//!
//! The tree is shallow: statements keep their selector, prelude
//! and value text as written, so the values engine can rewrite text in place
//! without knowing anything about CSS grammar beyond token boundaries.
//!
//! - [`Stylesheet`]: ordered top-level statements
//! - [`Node`]: a style rule, an at-rule, a declaration or a comment
//! - [`parse_stylesheet`]: builds a tree from text (backed by `cssparser`)
//! - [`Stylesheet::to_css`]: serializes the tree back to text
//!
//! Comments between top-level statements are kept as [`Node::Comment`].
//! Comments inside blocks are not retained.

mod parser;
mod serialize;

pub use parser::parse_stylesheet;

use std::fmt;

/// A parsed stylesheet: the ordered list of top-level statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
}

/// One statement of a stylesheet or block body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Rule(Rule),
    AtRule(AtRule),
    Declaration(Declaration),
    /// Comment text without the `/*` and `*/` delimiters.
    Comment(String),
}

/// A style rule: `selector { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Selector text, trimmed.
    pub selector: String,
    /// Declarations and nested rules.
    pub nodes: Vec<Node>,
    /// Whether the last declaration is followed by `;` when serialized.
    pub semicolon: bool,
}

/// An at-rule, with or without a block: `@name params;` or `@name params { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// Name without the `@`.
    pub name: String,
    /// Prelude text as written, leading whitespace removed. Trailing
    /// whitespace before the terminator is kept because `@value` statements
    /// give it meaning.
    pub params: String,
    /// Block body, `None` for statement at-rules.
    pub nodes: Option<Vec<Node>>,
    /// Whether the last declaration in the block is followed by `;`.
    pub semicolon: bool,
}

/// A declaration: `property: value [!important]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    /// Value text with `!important` removed. Surrounding whitespace is
    /// trimmed by the parser; synthesized declarations keep it verbatim.
    pub value: String,
    pub important: bool,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses stylesheet text. See [`parse_stylesheet`].
    pub fn parse(css: &str) -> Result<Self, crate::ParseError> {
        parse_stylesheet(css)
    }

    /// Serializes the stylesheet to text.
    pub fn to_css(&self) -> String {
        serialize::nodes_to_css(&self.nodes)
    }

    /// Finds the first top-level rule with the given selector.
    pub fn find_rule(&self, selector: &str) -> Option<&Rule> {
        self.nodes.iter().find_map(|node| match node {
            Node::Rule(rule) if rule.selector == selector => Some(rule),
            _ => None,
        })
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl Rule {
    /// Creates an empty rule. Its last declaration serializes without `;`.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            nodes: Vec::new(),
            semicolon: false,
        }
    }

    /// Appends a declaration, builder style.
    pub fn declaration(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.nodes
            .push(Node::Declaration(Declaration::new(property, value)));
        self
    }

    /// Iterates over the direct declarations of this rule.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Declaration(decl) => Some(decl),
            _ => None,
        })
    }

    /// Returns the value of the last declaration of `property`, if any.
    pub fn value_of(&self, property: &str) -> Option<&str> {
        self.declarations()
            .filter(|decl| decl.property == property)
            .last()
            .map(|decl| decl.value.as_str())
    }
}

impl AtRule {
    /// Creates a statement at-rule (no block).
    pub fn statement(name: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            nodes: None,
            semicolon: false,
        }
    }

    /// Creates an at-rule with a block body.
    pub fn block(name: impl Into<String>, params: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            nodes: Some(nodes),
            semicolon: true,
        }
    }

    /// Returns true for `@value` (case-insensitive).
    pub fn is_value_statement(&self) -> bool {
        self.name.eq_ignore_ascii_case("value")
    }
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important: false,
        }
    }
}

impl From<Rule> for Node {
    fn from(rule: Rule) -> Self {
        Node::Rule(rule)
    }
}

impl From<AtRule> for Node {
    fn from(at_rule: AtRule) -> Self {
        Node::AtRule(at_rule)
    }
}

impl From<Declaration> for Node {
    fn from(decl: Declaration) -> Self {
        Node::Declaration(decl)
    }
}
