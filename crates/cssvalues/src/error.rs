//! Error types for stylesheet parsing and processor configuration.
//!
//! Problems inside `@value` statements are never errors: they are reported as
//! [`Diagnostic`](crate::Diagnostic)s and processing continues. The types here
//! cover the two places where a caller genuinely cannot proceed: text that
//! does not tokenize into a stylesheet, and a configuration file that cannot
//! be read.

use std::io;
use std::path::PathBuf;

/// Error returned when stylesheet text cannot be turned into a [`Stylesheet`](crate::Stylesheet).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A top-level statement could not be parsed.
    #[error("CSS syntax error at line {line}, column {column}: {message}")]
    Syntax {
        /// 1-based line of the failing statement.
        line: u32,
        /// 1-based column of the failing statement.
        column: u32,
        /// Description of the tokenizer failure.
        message: String,
        /// Source text of the statement that failed.
        near: String,
    },
}

impl ParseError {
    /// Line the error was reported on (1-based).
    pub fn line(&self) -> u32 {
        match self {
            ParseError::Syntax { line, .. } => *line,
        }
    }

    /// Source text of the statement that failed.
    pub fn near(&self) -> &str {
        match self {
            ParseError::Syntax { near, .. } => near,
        }
    }
}

/// Error returned when loading a [`ProcessorConfig`](crate::ProcessorConfig) fails.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid YAML or has unknown keys.
    #[error("invalid processor config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = ParseError::Syntax {
            line: 3,
            column: 7,
            message: "unexpected end of input".to_string(),
            near: ".orphan".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("column 7"));
        assert!(msg.contains("unexpected end of input"));
        assert_eq!(err.line(), 3);
        assert_eq!(err.near(), ".orphan");
    }

    #[test]
    fn test_config_io_error_mentions_path() {
        let err = ConfigError::Io {
            path: PathBuf::from("missing/values.yaml"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("missing/values.yaml"));
    }
}
