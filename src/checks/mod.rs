//! Batch execution of fragattack test cases
//!
//! Runs each catalog case through the external script, classifies the
//! script's output, retries inconclusive results and renders a report.

pub mod catalog;
pub mod orchestrator;
pub mod outcome;
pub mod process;
pub mod report;
pub mod retry;

pub use catalog::{CaseGroup, Catalog, TestCase};
pub use orchestrator::{CaseResult, Orchestrator, ResultsMap};
pub use outcome::{classify, Outcome};
pub use process::{CommandRunner, Invocation, ProcessOutput, ProcessRunner};
pub use retry::RetryController;
