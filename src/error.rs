//! Error taxonomy for syscall number resolution
//!
//! Every variant is fatal at process scope. An architecture whose macro is
//! simply undefined is not an error and never reaches this type.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can occur while discovering, resolving or emitting syscall numbers
#[derive(Error, Debug)]
pub enum NrError {
    #[error(
        "didn't find anywhere near enough syscalls: found {found}, expected at least {threshold}"
    )]
    CorpusIntegrity {
        found: usize,
        threshold: usize,
        /// Raw search output, dumped for diagnosis
        raw: String,
    },

    #[error("`{tool}` failed with {status}: {stderr}")]
    Toolchain {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Failed to run `{tool}`: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("\"{0}\" looks like an expression, but not a supported one")]
    UnsupportedExpression(String),

    #[error("Unsupported macro shape for {name}: \"{token}\"")]
    UnsupportedMacroShape { name: String, token: String },

    #[error("{}:{line}: malformed table row {text:?}", path.display())]
    MalformedTableRow {
        path: PathBuf,
        line: usize,
        text: String,
    },

    #[error("{arch}: more than one syscall maps to constant {name}")]
    DuplicateConstant { arch: String, name: String },

    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for resolution operations
pub type Result<T> = std::result::Result<T, NrError>;
