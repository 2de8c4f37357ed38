//! Retry controller
//!
//! Turns the script's noisy per-attempt verdicts into one boolean by
//! re-running inconclusive attempts up to a fixed bound.

use tracing::debug;

use crate::common::Result;

use super::outcome::{classify, Outcome};
use super::process::{CommandRunner, Invocation};

/// Runs an invocation until it is conclusive or the retry budget is spent
pub struct RetryController<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    max_retries: u32,
}

impl<'a, R: CommandRunner + ?Sized> RetryController<'a, R> {
    pub fn new(runner: &'a R, max_retries: u32) -> Self {
        Self {
            runner,
            max_retries,
        }
    }

    /// Run `invocation`, retrying while the result is inconclusive
    ///
    /// At most `max_retries + 1` attempts are made. An inconclusive result
    /// on the last attempt counts as failure. Only a spawn error is
    /// returned as `Err`.
    pub async fn run_with_retry(&self, invocation: &Invocation) -> Result<bool> {
        let mut retry = 0;
        loop {
            debug!("[>] $ {}", invocation);
            let output = self.runner.run(invocation).await?;

            debug!("STDOUT:\n{}", output.stdout_text());
            if !output.stderr.is_empty() {
                debug!("STDERR:\n{}", output.stderr_text());
            }

            let outcome = classify(&output);
            debug!(
                attempt = retry + 1,
                exit_code = ?output.exit_code,
                %outcome,
                "attempt finished"
            );

            let success = match outcome {
                Outcome::Success => true,
                Outcome::Inconclusive if retry < self.max_retries => {
                    retry += 1;
                    debug!("Inconclusive, retrying ({}/{})", retry, self.max_retries);
                    continue;
                }
                Outcome::Inconclusive => {
                    debug!("Still inconclusive after {} retries", self.max_retries);
                    false
                }
                Outcome::Failure => false,
            };

            debug!(
                "{}",
                if success { "Test completed" } else { "Test not completed" }
            );
            return Ok(success);
        }
    }
}
