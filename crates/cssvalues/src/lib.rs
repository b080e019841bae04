//! cssvalues - named stylesheet constants with `@value`.
//!
//! A stylesheet can declare constants, import constants from other
//! stylesheets, and use them anywhere a value or a class/id name is written.
//! Processing replaces every usage with the constant's final text and
//! replaces the `@value` statements with `:import(...)` / `:export` rules that
//! a module-aware bundler can link across files.
//!
//! # Quick Start
//!
//! ```rust
//! let out = cssvalues::transform(
//!     "@value primary: #c00;\n@value gap: 4px;\n@value banner: promo;\n\
//!      @value accent from \"./theme.css\";\n\
//!      .banner { color: primary; margin: calc(gap * 2); border-color: accent; }",
//! )
//! .unwrap();
//!
//! assert!(out.report.diagnostics.is_empty());
//! assert!(out.css.contains(".promo {\n  color: #c00;"));
//! assert!(out.css.contains("margin: calc(4px * 2)"));
//! assert!(out.css.contains(":import(\"./theme.css\") {\n  i__const_accent_0: accent\n}"));
//! ```
//!
//! # Statement forms
//!
//! ```text
//! @value name: value;                     local constant
//! @value name value;                      colon may be omitted
//! @value a, b as c from "./file.css";     import, `remote as local` renames
//! @value (a, b) from path;                path may be a constant holding a string
//! ```
//!
//! Values are resolved when they are declared, using the constants declared
//! before them. Malformed statements produce a [`Diagnostic`] and are dropped;
//! processing never stops on them.
//!
//! # Modules
//!
//! - [`tree`]: the stylesheet tree, its `cssparser`-based builder and its serializer
//! - [`values`]: the `@value` engine ([`ValuesProcessor`])
//! - [`config`]: [`ProcessorConfig`], loadable from YAML
//! - [`diagnostic`]: non-fatal [`Diagnostic`]s and the [`DiagnosticSink`] trait

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod tree;
pub mod values;

pub use config::ProcessorConfig;
pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};
pub use error::{ConfigError, ParseError};
pub use tree::{parse_stylesheet, AtRule, Declaration, Node, Rule, Stylesheet};
pub use values::{ValuesProcessor, ValuesReport};

/// Result of [`transform`]: the processed stylesheet text and the report.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub css: String,
    pub report: ValuesReport,
}

/// Parses, processes and serializes a stylesheet with the default
/// configuration.
///
/// # Errors
///
/// Returns [`ParseError`] if the text is not a valid stylesheet.
/// Problems in `@value` statements are reported in
/// [`Transformed::report`] instead.
pub fn transform(css: &str) -> Result<Transformed, ParseError> {
    transform_with(css, &ValuesProcessor::default())
}

/// Like [`transform`], with a caller-supplied processor.
pub fn transform_with(css: &str, processor: &ValuesProcessor) -> Result<Transformed, ParseError> {
    let mut sheet = parse_stylesheet(css)?;
    let report = processor.process(&mut sheet);
    Ok(Transformed {
        css: sheet.to_css(),
        report,
    })
}
