//! Substitution engine: exact-token replacement of constant names.
//!
//! Text is split by a small tokenizer into identifier runs, quoted strings,
//! comments, bracketed groups and single punctuation characters. Groups are
//! rewritten recursively, so names used as function arguments at any depth
//! (`calc(base * 2)`, `color(red lightness(50%))`) are found without
//! special-casing any syntax form.
//!
//! An identifier is replaced only when the whole run equals a defined name:
//! with `primary` defined, `primary-dark` and `xprimary` are left alone.
//!
//! # Modes
//!
//! - **Value**: every identifier is a candidate, including unquoted
//!   `url(...)` arguments. Strings, comments and hash literals (`#fff`) are
//!   copied verbatim. A `.` ends an identifier, so `a.5em` is `a` followed by
//!   `.5em`.
//! - **Selector**: only the name after a `.` or `#` sigil is a candidate, so
//!   type selectors, pseudo-classes and attribute selectors are never
//!   touched. Pseudo-class arguments such as `:not(.a)` are scanned.

use std::iter::Peekable;

use super::table::DefinitionTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Value,
    Selector,
}

/// Rewrites text against a snapshot of the definition table.
pub struct Substituter<'a> {
    table: &'a DefinitionTable,
    max_depth: usize,
    overflowed: bool,
}

impl<'a> Substituter<'a> {
    pub fn new(table: &'a DefinitionTable, max_depth: usize) -> Self {
        Self {
            table,
            max_depth,
            overflowed: false,
        }
    }

    /// Rewrites a declaration value, `@value` right-hand side or at-rule
    /// prelude.
    pub fn value(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        self.rewrite(text, Mode::Value, 0, &mut out);
        out
    }

    /// Rewrites the class and id names of a selector.
    pub fn selector(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        self.rewrite(text, Mode::Selector, 0, &mut out);
        out
    }

    /// Returns whether any rewrite since the last call hit the nesting limit,
    /// and clears the flag.
    pub fn take_overflow(&mut self) -> bool {
        std::mem::take(&mut self.overflowed)
    }

    fn rewrite(&mut self, text: &str, mode: Mode, depth: usize, out: &mut String) {
        let mut tokens = Tokenizer::new(text).peekable();

        while let Some(token) = tokens.next() {
            match token {
                Token::Ident(name) if mode == Mode::Value => out.push_str(self.lookup(name)),
                Token::Other(sigil) if sigil == "." || sigil == "#" => {
                    out.push_str(sigil);
                    if let Some(name) = next_ident(&mut tokens) {
                        // `#fff` in a value is a color, not a name.
                        let candidate = mode == Mode::Selector;
                        out.push_str(if candidate { self.lookup(name) } else { name });
                    }
                }
                Token::Group { open, inner, close } => {
                    out.push(open);
                    if mode == Mode::Selector && open == '[' {
                        out.push_str(inner);
                    } else if depth >= self.max_depth {
                        self.overflowed = true;
                        out.push_str(inner);
                    } else {
                        self.rewrite(inner, mode, depth + 1, out);
                    }
                    out.push_str(close);
                }
                Token::Ident(text)
                | Token::Str(text)
                | Token::Comment(text)
                | Token::Other(text) => out.push_str(text),
            }
        }
    }

    fn lookup<'t>(&'t self, name: &'t str) -> &'t str {
        self.table.replacement(name).unwrap_or(name)
    }
}

fn next_ident<'s, I>(tokens: &mut Peekable<I>) -> Option<&'s str>
where
    I: Iterator<Item = Token<'s>>,
{
    match tokens.peek() {
        Some(&Token::Ident(name)) => {
            tokens.next();
            Some(name)
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'s> {
    Ident(&'s str),
    Str(&'s str),
    Comment(&'s str),
    /// A bracketed group. `close` is empty when the group is unterminated.
    Group {
        open: char,
        inner: &'s str,
        close: &'s str,
    },
    Other(&'s str),
}

struct Tokenizer<'s> {
    input: &'s str,
    pos: usize,
}

impl<'s> Tokenizer<'s> {
    fn new(input: &'s str) -> Self {
        Self { input, pos: 0 }
    }
}

impl<'s> Iterator for Tokenizer<'s> {
    type Item = Token<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.input[self.pos..];
        let c = rest.chars().next()?;

        let (token, len) = if is_ident_char(c) || c == '\\' {
            let len = ident_len(rest);
            (Token::Ident(&rest[..len]), len)
        } else if c == '"' || c == '\'' {
            let len = string_len(rest);
            (Token::Str(&rest[..len]), len)
        } else if rest.starts_with("/*") {
            let len = comment_len(rest);
            (Token::Comment(&rest[..len]), len)
        } else if let Some(closer) = closing_bracket(c) {
            let (inner_end, close_len) = group_len(rest, closer);
            let token = Token::Group {
                open: c,
                inner: &rest[1..inner_end],
                close: &rest[inner_end..inner_end + close_len],
            };
            (token, inner_end + close_len)
        } else {
            let len = c.len_utf8();
            (Token::Other(&rest[..len]), len)
        };

        self.pos += len;
        Some(token)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

fn closing_bracket(c: char) -> Option<char> {
    match c {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

/// Length of the identifier run at the start of `text`; escapes (`\:`)
/// belong to the identifier.
fn ident_len(text: &str) -> usize {
    let mut len = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            len += 1 + chars.next().map_or(0, char::len_utf8);
        } else if is_ident_char(c) {
            len += c.len_utf8();
        } else {
            break;
        }
    }
    len
}

/// Length of the quoted string at the start of `text`, quotes included.
fn string_len(text: &str) -> usize {
    let mut chars = text.char_indices();
    let quote = match chars.next() {
        Some((_, q)) => q,
        None => return 0,
    };
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == quote {
            return i + 1;
        }
    }
    text.len()
}

fn comment_len(text: &str) -> usize {
    text[2..].find("*/").map_or(text.len(), |end| end + 4)
}

/// Scans a group opened by the first (ASCII) character of `text`. Returns
/// the byte offset where the inner text ends and the length of the closer
/// (0 when unterminated).
fn group_len(text: &str, closer: char) -> (usize, usize) {
    let mut pending: Vec<char> = Vec::new();
    let mut i = 1;

    while i < text.len() {
        let tail = &text[i..];
        let Some(c) = tail.chars().next() else {
            break;
        };
        if c == '"' || c == '\'' {
            i += string_len(tail);
            continue;
        }
        if tail.starts_with("/*") {
            i += comment_len(tail);
            continue;
        }
        if c == '\\' {
            i += ident_len(tail).max(1);
            continue;
        }

        if let Some(nested) = closing_bracket(c) {
            pending.push(nested);
        } else if pending.last() == Some(&c) {
            pending.pop();
        } else if pending.is_empty() && c == closer {
            return (i, c.len_utf8());
        }
        i += c.len_utf8();
    }

    (text.len(), 0)
}
