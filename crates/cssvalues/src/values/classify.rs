//! Statement classifier: turns the parameter text of one `@value` statement
//! into definitions, imports or a malformed-statement message.
//!
//! Accepted forms:
//!
//! ```text
//! name: value                     definition
//! name value                      definition, colon omitted
//! name from "./file.css"          import of one name
//! a, b as c from "./file.css"     import list, `remote as local` renames
//! (a, b) from colors              parenthesized list, bare source
//! ```

/// One classified `@value` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Statement {
    /// `name: value`, value still unsubstituted.
    Definition { name: String, value: String },
    /// `names from source`, source as written.
    Import {
        names: Vec<ImportName>,
        source: String,
    },
    /// Diagnostic message for a statement with no effect.
    Malformed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportName {
    pub remote: String,
    pub local: String,
}

const KEYWORD: &str = "@value";

/// Classifies the raw parameter text of a `@value` statement.
///
/// Usually yields a single statement. When the text contains further
/// `@value` keywords, the statement lost its terminator and swallowed the
/// ones after it: the result is one `Malformed` entry for the whole text,
/// followed by the classification of each swallowed statement.
pub(crate) fn classify(params: &str) -> Vec<Statement> {
    let keywords = keyword_positions(params);
    if keywords.is_empty() {
        return vec![classify_single(params)];
    }

    let mut statements = vec![Statement::Malformed {
        message: format!("Invalid value definition: {}", params.trim()),
    }];
    for (i, &start) in keywords.iter().enumerate() {
        let end = keywords.get(i + 1).copied().unwrap_or(params.len());
        statements.push(classify_single(&params[start + KEYWORD.len()..end]));
    }
    statements
}

fn classify_single(text: &str) -> Statement {
    match parse_import(text) {
        Some(Ok(statement)) => statement,
        Some(Err(())) => Statement::Malformed {
            message: format!("Invalid value import: {}", text.trim()),
        },
        None => parse_definition(text),
    }
}

fn parse_definition(text: &str) -> Statement {
    let text = text.trim_start();
    let name_len = name_len(text);
    if name_len == 0 {
        return malformed_definition(text.trim());
    }
    let (name, rest) = text.split_at(name_len);

    let after_space = rest.trim_start();
    let (value, has_colon) = if let Some(value) = after_space.strip_prefix(':') {
        (value, true)
    } else if rest.starts_with(char::is_whitespace) {
        (rest, false)
    } else {
        return malformed_definition(text.trim());
    };

    if strip_comments(value).trim().is_empty() {
        // `name: ;` keeps its exact whitespace.
        if has_colon && !value.is_empty() && value.chars().all(char::is_whitespace) {
            return Statement::Definition {
                name: name.to_string(),
                value: value.to_string(),
            };
        }
        return malformed_definition(&format!("{}:", name));
    }

    Statement::Definition {
        name: name.to_string(),
        value: value.trim().to_string(),
    }
}

fn malformed_definition(detail: &str) -> Statement {
    Statement::Malformed {
        message: format!("Invalid value definition: {}", detail),
    }
}

/// Recognizes `<names> from <source>`.
///
/// Returns `None` when the text is not shaped like an import at all, and
/// `Some(Err(()))` when it is but the name list is unreadable.
fn parse_import(text: &str) -> Option<Result<Statement, ()>> {
    let text = text.trim();
    let source_start = text.len() - source_len(text)?;
    let (head, source) = text.split_at(source_start);

    let head = head.strip_suffix(char::is_whitespace)?.trim_end();
    let names = head.strip_suffix("from")?;
    if !names.ends_with(char::is_whitespace) {
        return None;
    }
    let names = names.trim();
    if names.is_empty() || names.contains(':') {
        return None;
    }

    Some(parse_name_list(names).map(|names| Statement::Import {
        names,
        source: source.to_string(),
    }))
}

/// Length of the import source at the end of `text`: a quoted string or a
/// bare `[A-Za-z0-9_-]` run.
fn source_len(text: &str) -> Option<usize> {
    let last = text.chars().last()?;
    if last == '"' || last == '\'' {
        let open = text[..text.len() - 1].rfind(last)?;
        return Some(text.len() - open);
    }
    let len: usize = text
        .chars()
        .rev()
        .take_while(|&c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        .map(char::len_utf8)
        .sum();
    (len > 0).then_some(len)
}

fn parse_name_list(names: &str) -> Result<Vec<ImportName>, ()> {
    let names = names
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(names);

    names
        .split(',')
        .map(|entry| {
            let words: Vec<&str> = entry.split_whitespace().collect();
            let (remote, local) = match words.as_slice() {
                [name] => (*name, *name),
                [remote, "as", local] => (*remote, *local),
                _ => return Err(()),
            };
            if is_name(remote) && is_name(local) {
                Ok(ImportName {
                    remote: remote.to_string(),
                    local: local.to_string(),
                })
            } else {
                Err(())
            }
        })
        .collect()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

fn name_len(text: &str) -> usize {
    text.chars()
        .take_while(|&c| is_name_char(c))
        .map(char::len_utf8)
        .sum()
}

fn is_name(text: &str) -> bool {
    !text.is_empty() && name_len(text) == text.len()
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Byte offsets of `@value` keywords (any case, whole word) outside strings
/// and comments.
fn keyword_positions(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut positions = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = match text[i + 2..].find("*/") {
                    Some(end) => i + 2 + end + 2,
                    None => bytes.len(),
                };
            }
            b'@' => {
                let end = i + KEYWORD.len();
                let is_keyword = text
                    .get(i..end)
                    .is_some_and(|word| word.eq_ignore_ascii_case(KEYWORD))
                    && !text[end..].starts_with(is_name_char);
                if is_keyword {
                    positions.push(i);
                    i = end;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    positions
}
