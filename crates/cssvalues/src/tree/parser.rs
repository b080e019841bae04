//! Stylesheet tree builder.
//!
//! Built on `cssparser` (the tokenizer used by Firefox) for robust handling of
//! strings, comments, escapes and nested blocks. Selector, prelude and value
//! text is captured as the raw source slice rather than re-serialized from
//! tokens, so whitespace and comments inside a statement survive exactly as
//! written.
//!
//! # Statement preludes
//!
//! An at-rule prelude runs until the first top-level `;` or `{`. A `@value`
//! statement missing its `;` therefore swallows the statement that follows,
//! exactly as any CSS tokenizer would; the values engine detects and reports
//! that case.
//!
//! # Block bodies
//!
//! At-rules that contain rules (`@media`, `@supports`, `@layer`, `@container`,
//! `@document`, `@scope`, `@keyframes`) have their bodies parsed as rule
//! lists. Style rule bodies hold declarations and nested rules. Every other
//! block is parsed as a list of declarations. Invalid items inside a block
//! are skipped; an invalid top-level statement fails the whole parse.
//!
//! Comments between top-level statements become [`Node::Comment`]s. Comments
//! inside blocks are dropped.

use cssparser::{
    AtRuleParser, BasicParseErrorKind, CowRcStr, DeclarationParser, ParseError as CssParseError,
    ParseErrorKind, Parser, ParserInput, ParserState, QualifiedRuleParser, RuleBodyItemParser,
    RuleBodyParser, StyleSheetParser, Token,
};
use log::debug;

use super::{AtRule, Declaration, Node, Rule, Stylesheet};
use crate::error::ParseError;

/// At-rules whose blocks hold rules rather than declarations.
const RULE_LIST_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "layer",
    "container",
    "document",
    "scope",
    "keyframes",
    "-webkit-keyframes",
    "-moz-keyframes",
];

/// Parses stylesheet text into a [`Stylesheet`].
///
/// # Errors
///
/// Returns [`ParseError::Syntax`] for the first top-level statement that is
/// not a valid rule or at-rule, such as a selector with no block.
///
/// # Example
///
/// ```rust
/// use cssvalues::{parse_stylesheet, Node};
///
/// let sheet = parse_stylesheet("@value primary: red;\n.a { color: primary; }").unwrap();
/// assert_eq!(sheet.nodes.len(), 2);
/// assert!(matches!(&sheet.nodes[0], Node::AtRule(at) if at.is_value_statement()));
/// ```
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet, ParseError> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut node_parser = NodeParser { body: Body::Rules };

    let mut nodes = Vec::new();
    let mut statements = StyleSheetParser::new(&mut parser, &mut node_parser);
    loop {
        take_comments(statements.input, &mut nodes);
        match statements.next() {
            Some(Ok(node)) => nodes.push(node),
            Some(Err((err, near))) => return Err(syntax_error(err, near)),
            None => break,
        }
    }

    debug!("parsed stylesheet with {} top-level statements", nodes.len());
    Ok(Stylesheet { nodes })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Body {
    Declarations,
    Rules,
    /// Declarations mixed with nested rules.
    Style,
}

struct NodeParser {
    body: Body,
}

struct AtRulePrelude {
    name: String,
    params: String,
}

impl<'i> QualifiedRuleParser<'i> for NodeParser {
    type Prelude = String;
    type QualifiedRule = Node;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, CssParseError<'i, Self::Error>> {
        Ok(consume_raw(input).trim().to_string())
    }

    fn parse_block<'t>(
        &mut self,
        selector: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, CssParseError<'i, Self::Error>> {
        let (nodes, semicolon) = parse_body(input, Body::Style);
        Ok(Node::Rule(Rule {
            selector,
            nodes,
            semicolon,
        }))
    }
}

impl<'i> AtRuleParser<'i> for NodeParser {
    type Prelude = AtRulePrelude;
    type AtRule = Node;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, CssParseError<'i, Self::Error>> {
        Ok(AtRulePrelude {
            name: name.as_ref().to_string(),
            params: consume_raw(input).trim_start().to_string(),
        })
    }

    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        Ok(Node::AtRule(AtRule::statement(prelude.name, prelude.params)))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, CssParseError<'i, Self::Error>> {
        let body = if holds_rules(&prelude.name) {
            Body::Rules
        } else {
            Body::Declarations
        };
        let (nodes, semicolon) = parse_body(input, body);
        Ok(Node::AtRule(AtRule {
            name: prelude.name,
            params: prelude.params,
            nodes: Some(nodes),
            semicolon,
        }))
    }
}

impl<'i> DeclarationParser<'i> for NodeParser {
    type Declaration = Node;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, CssParseError<'i, Self::Error>> {
        let (value, important) = split_important(consume_raw(input));
        Ok(Node::Declaration(Declaration {
            property: name.as_ref().to_string(),
            value,
            important,
        }))
    }
}

impl<'i> RuleBodyItemParser<'i, Node, ()> for NodeParser {
    fn parse_declarations(&self) -> bool {
        self.body != Body::Rules
    }

    fn parse_qualified(&self) -> bool {
        self.body != Body::Declarations
    }
}

/// Parses a block body, skipping invalid items. Also reports whether the
/// body text ends with `;`.
fn parse_body<'i, 't>(input: &mut Parser<'i, 't>, body: Body) -> (Vec<Node>, bool) {
    let start = input.position();
    let mut parser = NodeParser { body };
    let mut nodes = Vec::new();

    for result in RuleBodyParser::new(input, &mut parser) {
        match result {
            Ok(node) => nodes.push(node),
            Err((_, skipped)) => debug!("skipping invalid block item: {:?}", skipped.trim()),
        }
    }

    let semicolon = input.slice_from(start).trim_end().ends_with(';');
    (nodes, semicolon)
}

/// Consumes whitespace and comments up to the next statement, keeping the
/// comments.
fn take_comments(input: &mut Parser<'_, '_>, nodes: &mut Vec<Node>) {
    loop {
        let state = input.state();
        let token = input.next_including_whitespace_and_comments().cloned();
        match token {
            Ok(Token::Comment(text)) => nodes.push(Node::Comment(text.to_string())),
            Ok(Token::WhiteSpace(_)) | Ok(Token::CDO) | Ok(Token::CDC) => {}
            _ => {
                input.reset(&state);
                return;
            }
        }
    }
}

/// Consumes the rest of the (delimited) input and returns its source text.
fn consume_raw<'i, 't>(input: &mut Parser<'i, 't>) -> &'i str {
    let start = input.position();
    while input.next_including_whitespace_and_comments().is_ok() {}
    input.slice_from(start)
}

fn holds_rules(at_rule_name: &str) -> bool {
    RULE_LIST_AT_RULES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(at_rule_name))
}

/// Splits a trailing `!important` off a raw declaration value.
fn split_important(raw: &str) -> (String, bool) {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if let Some(head) = lower.strip_suffix("important") {
        if let Some(value) = head.trim_end().strip_suffix('!') {
            return (trimmed[..value.len()].trim_end().to_string(), true);
        }
    }
    (trimmed.to_string(), false)
}

fn syntax_error(err: CssParseError<'_, ()>, near: &str) -> ParseError {
    let message = match &err.kind {
        ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => {
            "unexpected end of input".to_string()
        }
        ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
            format!("unexpected token {:?}", token)
        }
        ParseErrorKind::Basic(BasicParseErrorKind::QualifiedRuleInvalid) => {
            "invalid rule".to_string()
        }
        other => format!("{:?}", other),
    };
    ParseError::Syntax {
        line: err.location.line + 1,
        column: err.location.column,
        message,
        near: near.trim().to_string(),
    }
}
