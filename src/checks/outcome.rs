//! Outcome classification
//!
//! The script's own output is the only verdict we get. It prints a fixed
//! line when a test completes and asks for a retry when its timing-based
//! detection was not sure.

use std::fmt;

use serde::Serialize;

use super::process::ProcessOutput;

/// Printed by the script when the test completed conclusively
pub const SUCCESS_MARKER: &str = "TEST COMPLETED SUCCESSFULLY";

/// Printed by the script when the result is ambiguous
pub const RETRY_MARKER: &str = "Retry to be sure, or manually check result";

/// Classification of a single attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
    /// Ambiguous; the retry controller may run the attempt again
    Inconclusive,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
            Outcome::Inconclusive => "inconclusive",
        };
        f.write_str(s)
    }
}

/// Classify one attempt
///
/// The success marker wins regardless of exit status. On a zero exit only
/// stdout is searched for the retry marker; on a non-zero exit the marker
/// may appear on either stream.
pub fn classify(output: &ProcessOutput) -> Outcome {
    if contains(&output.stdout, SUCCESS_MARKER) {
        return Outcome::Success;
    }

    let retry_requested = if output.exited_ok() {
        contains(&output.stdout, RETRY_MARKER)
    } else {
        contains(&output.stdout, RETRY_MARKER) || contains(&output.stderr, RETRY_MARKER)
    };

    if retry_requested {
        Outcome::Inconclusive
    } else {
        Outcome::Failure
    }
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    let needle = needle.as_bytes();
    haystack.windows(needle.len()).any(|w| w == needle)
}
