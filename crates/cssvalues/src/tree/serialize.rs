//! Tree serialization.
//!
//! Output is normalized: one statement per line, two-space indentation per
//! block level. A block whose `semicolon` flag is false has no `;` after its
//! last declaration, which is how synthesized `:import`/`:export` blocks are
//! written.

use super::{AtRule, Declaration, Node, Rule};

const INDENT: &str = "  ";

pub(super) fn nodes_to_css(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node, 0);
    }
    out
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    match node {
        Node::Rule(rule) => write_rule(out, rule, depth),
        Node::AtRule(at_rule) => write_at_rule(out, at_rule, depth),
        Node::Declaration(decl) => {
            indent(out, depth);
            write_declaration(out, decl);
            out.push_str(";\n");
        }
        Node::Comment(text) => {
            indent(out, depth);
            out.push_str("/*");
            out.push_str(text);
            out.push_str("*/\n");
        }
    }
}

fn write_rule(out: &mut String, rule: &Rule, depth: usize) {
    indent(out, depth);
    out.push_str(&rule.selector);
    out.push(' ');
    write_block(out, &rule.nodes, rule.semicolon, depth);
}

fn write_at_rule(out: &mut String, at_rule: &AtRule, depth: usize) {
    indent(out, depth);
    out.push('@');
    out.push_str(&at_rule.name);
    let params = at_rule.params.trim();
    if !params.is_empty() {
        out.push(' ');
        out.push_str(params);
    }
    match &at_rule.nodes {
        Some(nodes) => {
            out.push(' ');
            write_block(out, nodes, at_rule.semicolon, depth);
        }
        None => out.push_str(";\n"),
    }
}

fn write_block(out: &mut String, nodes: &[Node], semicolon: bool, depth: usize) {
    if nodes.is_empty() {
        out.push_str("{}\n");
        return;
    }

    out.push_str("{\n");
    let last = nodes.len() - 1;
    for (i, node) in nodes.iter().enumerate() {
        match node {
            Node::Declaration(decl) => {
                indent(out, depth + 1);
                write_declaration(out, decl);
                if i != last || semicolon {
                    out.push(';');
                }
                out.push('\n');
            }
            other => write_node(out, other, depth + 1),
        }
    }
    indent(out, depth);
    out.push_str("}\n");
}

fn write_declaration(out: &mut String, decl: &Declaration) {
    out.push_str(&decl.property);
    out.push_str(": ");
    out.push_str(&decl.value);
    if decl.important {
        out.push_str(" !important");
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
