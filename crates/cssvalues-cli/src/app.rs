use std::path::PathBuf;

use clap::Parser;

/// cssvalues - resolve @value constants in a stylesheet
#[derive(Debug, Parser)]
#[command(name = "cssvalues", version, about, long_about = None)]
pub struct Cli {
    /// Stylesheet to process. Reads standard input when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write the processed stylesheet here instead of standard output.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Processor configuration (YAML).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the prefix of generated import aliases.
    #[arg(long, value_name = "PREFIX")]
    pub alias_prefix: Option<String>,

    /// Write the export and import lists as JSON.
    #[arg(long, value_name = "FILE")]
    pub exports_json: Option<PathBuf>,

    /// Exit with status 2 if any diagnostics were produced.
    #[arg(long)]
    pub deny_warnings: bool,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Options that only affect how the tool reports.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Display name of the input, for messages.
    pub fn input_name(&self) -> String {
        match self.input.as_deref() {
            Some(path) if path.as_os_str() != "-" => path.display().to_string(),
            _ => "<stdin>".to_string(),
        }
    }

    pub fn reads_stdin(&self) -> bool {
        match self.input.as_deref() {
            Some(path) => path.as_os_str() == "-",
            None => true,
        }
    }
}
