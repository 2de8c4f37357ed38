//! Fragattack checker - batch runner for fragattack test cases
//!
//! Runs a fixed catalog of fragattack invocations against one wireless
//! interface, retries inconclusive results and reports pass/fail per case.

pub mod checks;
pub mod cli;
pub mod common;

// Re-export commonly used types for tests
pub use checks::{Catalog, Orchestrator, ResultsMap};
pub use common::{CheckerConfig, Error, Result};
