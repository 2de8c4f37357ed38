//! Error types for the fragattack checker
//!
//! Only setup problems are errors. A case that fails or stays inconclusive
//! is a recorded outcome, never an `Error`.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the fragattack checker
#[derive(Error, Debug)]
pub enum Error {
    // === Setup Errors ===
    #[error("fragattack script '{0}' not found. Pass its location with --script")]
    ScriptNotFound(String),

    #[error("Failed to execute '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Sanity check '{0}' failed! Check your setup.")]
    SanityCheckFailed(String),

    // === Catalog Errors ===
    #[error("Test case '{0}' is scheduled more than once")]
    DuplicateCase(String),

    #[error("Test case '{name}' {problem}")]
    InvalidCase { name: String, problem: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a spawn error for the given program
    pub fn spawn(program: &str, source: io::Error) -> Self {
        Self::Spawn {
            program: program.to_string(),
            source,
        }
    }

    /// Create an invalid case error
    pub fn invalid_case(name: &str, problem: &str) -> Self {
        Self::InvalidCase {
            name: name.to_string(),
            problem: problem.to_string(),
        }
    }

    /// Whether this error aborts the run because the test environment is broken
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            Error::ScriptNotFound(_) | Error::Spawn { .. } | Error::SanityCheckFailed(_)
        )
    }
}
