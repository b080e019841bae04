use std::fs;
use std::path::Path;

use anyhow::Context;
use console::{style, Term};
use cssvalues::values::{ExportEntry, ImportGroup};
use cssvalues::{Diagnostic, ValuesReport};
use serde::Serialize;

/// Print each diagnostic to stderr as `warning[kind]: message`, followed by
/// the offending statement.
pub fn print_diagnostics(diagnostics: &[Diagnostic], input_name: &str) -> anyhow::Result<()> {
    let term = Term::stderr();
    for diagnostic in diagnostics {
        term.write_line(&format!(
            "{}{} {}",
            style("warning").yellow().bold(),
            style(format!("[{}]:", diagnostic.kind)).bold(),
            diagnostic.message.replace('\n', "\\n"),
        ))?;
        term.write_line(&format!(
            "  {} {}: {}",
            style("-->").blue().bold(),
            input_name,
            style(diagnostic.source_text.trim().replace('\n', "\\n")).dim(),
        ))?;
    }
    Ok(())
}

/// JSON document written by `--exports-json`.
#[derive(Debug, Serialize)]
pub struct ExportsDocument<'a> {
    pub exports: &'a [ExportEntry],
    pub imports: &'a [ImportGroup],
    pub diagnostics: usize,
}

impl<'a> From<&'a ValuesReport> for ExportsDocument<'a> {
    fn from(report: &'a ValuesReport) -> Self {
        Self {
            exports: &report.exports,
            imports: &report.imports,
            diagnostics: report.diagnostics.len(),
        }
    }
}

pub fn write_exports_json(path: &Path, report: &ValuesReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&ExportsDocument::from(report))?;
    fs::write(path, json + "\n")
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exports_document_shape() {
        let out = cssvalues::transform("@value a from colors;\n@value b: 1px;").unwrap();
        let value = serde_json::to_value(ExportsDocument::from(&out.report)).unwrap();

        assert_eq!(value["exports"][0]["name"], "a");
        assert_eq!(value["exports"][0]["value"], "i__const_a_0");
        assert_eq!(value["exports"][1]["value"], "1px");
        assert_eq!(value["imports"][0]["source"]["kind"], "unresolved");
        assert_eq!(value["imports"][0]["source"]["reference"], "colors");
        assert_eq!(value["imports"][0]["names"][0]["alias"], "i__const_a_0");
        assert_eq!(value["diagnostics"], 0);
    }
}
