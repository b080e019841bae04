mod app;
mod output;

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cssvalues::{ProcessorConfig, ValuesProcessor};
use log::debug;

use crate::app::Cli;

/// Exit status when `--deny-warnings` is set and diagnostics were produced.
const EXIT_DIAGNOSTICS: u8 = 2;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Diagnostics are printed by `output`; the log only adds detail with --verbose.
    let level = if cli.global.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Error
    };
    env_logger::Builder::new()
        .filter_module("cssvalues", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    run(&cli)
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => ProcessorConfig::from_file(path)?,
        None => ProcessorConfig::default(),
    };
    if let Some(prefix) = &cli.alias_prefix {
        config = config.alias_prefix(prefix.as_str());
    }
    debug!("processor config: {:?}", config);

    let input_name = cli.input_name();
    let css = read_input(cli).with_context(|| format!("failed to read {}", input_name))?;

    let processor = ValuesProcessor::new(config);
    let out = cssvalues::transform_with(&css, &processor)
        .with_context(|| format!("failed to parse {}", input_name))?;

    output::print_diagnostics(&out.report.diagnostics, &input_name)?;

    match &cli.output {
        Some(path) => fs::write(path, &out.css)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout().write_all(out.css.as_bytes())?,
    }

    if let Some(path) = &cli.exports_json {
        output::write_exports_json(path, &out.report)?;
    }

    if cli.deny_warnings && out.report.has_diagnostics() {
        return Ok(ExitCode::from(EXIT_DIAGNOSTICS));
    }
    Ok(ExitCode::SUCCESS)
}

fn read_input(cli: &Cli) -> io::Result<String> {
    match &cli.input {
        Some(path) if !cli.reads_stdin() => fs::read_to_string(path),
        _ => {
            let mut css = String::new();
            io::stdin().read_to_string(&mut css)?;
            Ok(css)
        }
    }
}
