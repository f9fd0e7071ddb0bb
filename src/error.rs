//! Error taxonomy for the generation pipeline.
//!
//! Orchestration-layer failures (bad configuration, unreadable spec, a
//! generator failing mid-emit) are fatal and abort the run. Resolution-layer
//! ambiguities are never errors: they degrade to a best-guess name and are
//! reported as [`Warning`]s in the run summary.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal failure raised by the pipeline or one of its collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid layer/generator mapping, missing spec file, or a
    /// malformed `stratagen.toml`.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The OpenAPI document failed to parse or is semantically unusable.
    #[error("invalid OpenAPI document: {0}")]
    Validation(String),

    /// A specific generator failed while emitting files.
    #[error("generator '{generator}' failed for domain '{domain}': {message}")]
    Generation {
        domain: String,
        generator: String,
        message: String,
    },

    /// Local filesystem I/O failure. Not retried; there is no transient
    /// failure model for local writes.
    #[error("filesystem error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template rendering failure inside a leaf generator.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn generation(
        domain: impl Into<String>,
        generator: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Generation {
            domain: domain.into(),
            generator: generator.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Non-fatal finding surfaced during a run, printed as a summary at the end.
///
/// Covers schema-resolution ambiguities (the fallback ladder bottomed out),
/// duplicate operation ids, and anything else a generator wants the user to
/// review without aborting generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub domain: String,
    pub generator: String,
    pub message: String,
}

impl Warning {
    pub fn new(
        domain: impl Into<String>,
        generator: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Warning {
            domain: domain.into(),
            generator: generator.into(),
            message: message.into(),
        }
    }
}

/// Print collected warnings in the summary format shown after a run.
pub fn print_warnings(warnings: &[Warning]) {
    if warnings.is_empty() {
        return;
    }
    eprintln!("\n⚠️  {} warning(s):\n", warnings.len());
    for w in warnings {
        eprintln!("[{} / {}] {}", w.domain, w.generator, w.message);
    }
}
