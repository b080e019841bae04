//! Non-fatal diagnostics produced while processing `@value` statements.

use std::fmt;

use serde::Serialize;

/// Category of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A `@value` statement that could not be classified: a missing
    /// terminator swallowed the next statement, the value is empty, or the
    /// import list is unreadable. The statement has no effect.
    MalformedDeclaration,
    /// Bracket nesting went past the configured depth; the innermost text
    /// was copied through without substitution.
    NestingTooDeep,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::MalformedDeclaration => write!(f, "malformed-declaration"),
            DiagnosticKind::NestingTooDeep => write!(f, "nesting-too-deep"),
        }
    }
}

/// A warning anchored to the statement that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Human-readable message, e.g. `Invalid value definition: v-comment:`.
    pub message: String,
    /// Text of the statement or fragment the diagnostic refers to.
    pub source_text: String,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        message: impl Into<String>,
        source_text: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source_text: source_text.into(),
        }
    }

    /// Creates a [`DiagnosticKind::MalformedDeclaration`] diagnostic.
    pub fn malformed(message: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::MalformedDeclaration, message, source_text)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Receiver for diagnostics emitted during a processing pass.
///
/// Diagnostics arrive in the order the offending statements appear in the
/// stylesheet. Reporting never interrupts the pass.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}
