//! Mock fragattack script for integration testing
//!
//! Prints the same markers as the real script without touching any
//! hardware. Behavior is selected through environment variables:
//!
//! - `MOCK_FRAGATTACK_FAIL`: `;`-separated substrings; a matching command
//!   line prints a failure and exits 1
//! - `MOCK_FRAGATTACK_INCONCLUSIVE`: same matching, prints the retry hint
//! - `MOCK_FRAGATTACK_NEEDS_ICMP_SIZE`: the `I,E,E` ping only passes with
//!   `--icmp-size`
//! - `MOCK_FRAGATTACK_LOG`: file that every command line is appended to

use std::io::Write;

const SUCCESS_MARKER: &str = "TEST COMPLETED SUCCESSFULLY";
const RETRY_MARKER: &str = "Retry to be sure, or manually check result";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let line = args.join(" ");

    if let Ok(path) = std::env::var("MOCK_FRAGATTACK_LOG") {
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
        {
            let _ = writeln!(file, "{line}");
        }
    }

    println!("[mock] $ fragattack {line}");

    if matches_env("MOCK_FRAGATTACK_FAIL", &line) {
        println!("[mock] Test timed out");
        eprintln!("[mock] no reply received");
        std::process::exit(1);
    }

    if matches_env("MOCK_FRAGATTACK_INCONCLUSIVE", &line) {
        println!("[mock] No reply. {RETRY_MARKER}.");
        return;
    }

    let needs_icmp = std::env::var_os("MOCK_FRAGATTACK_NEEDS_ICMP_SIZE").is_some();
    let plain_fragments = args.iter().any(|a| a == "I,E,E")
        && !args.iter().any(|a| a == "--inc-pn" || a == "--icmp-size");
    if needs_icmp && plain_fragments {
        println!("[mock] Test timed out");
        std::process::exit(1);
    }

    println!("[mock] >>> {SUCCESS_MARKER}");
}

fn matches_env(var: &str, line: &str) -> bool {
    std::env::var(var)
        .map(|patterns| {
            patterns
                .split(';')
                .filter(|p| !p.is_empty())
                .any(|p| line.contains(p))
        })
        .unwrap_or(false)
}
