//! Result rendering
//!
//! The stored flag means "the attack worked", which is bad news for the
//! device under test, so `true` renders as FAIL and `false` as OK.

use std::fmt::Write;

use colored::Colorize;

use crate::common::Result;

use super::catalog::{section_for, SECTIONS};
use super::orchestrator::{CaseResult, ResultsMap};

const RULE_WIDTH: usize = 40;

/// Uncolored verdict token for a stored flag
pub fn verdict_token(attack_succeeded: bool) -> &'static str {
    if attack_succeeded {
        "FAIL"
    } else {
        "OK"
    }
}

/// Colored verdict token for a stored flag
pub fn verdict(attack_succeeded: bool) -> String {
    let token = verdict_token(attack_succeeded);
    if attack_succeeded {
        token.red().bold().to_string()
    } else {
        token.green().bold().to_string()
    }
}

/// Render the categorized pass/fail table
pub fn render(results: &ResultsMap) -> String {
    let mut out = String::new();

    for (title, prefix) in SECTIONS {
        let _ = writeln!(out, "\n| {}", title.bold());
        let mut any = false;
        for entry in results.with_prefix(prefix) {
            render_entry(&mut out, entry);
            any = true;
        }
        if !any {
            let _ = writeln!(out, "| {}", "Skipped...".dimmed());
        }
    }

    let unsectioned: Vec<&CaseResult> = results
        .entries()
        .iter()
        .filter(|e| section_for(&e.name).is_none())
        .collect();
    if !unsectioned.is_empty() {
        let _ = writeln!(out, "\n| {}", "Other".bold());
        for entry in unsectioned {
            render_entry(&mut out, entry);
        }
    }

    if results.is_empty() {
        let _ = writeln!(out, "\nNo checks were run");
        return out;
    }

    let failed = results.entries().iter().filter(|e| e.attack_succeeded).count();
    let passed = results.len() - failed;
    let _ = writeln!(
        out,
        "\n{} {}, {} {}",
        passed,
        "OK".green(),
        failed,
        "FAIL".red()
    );

    out
}

fn render_entry(out: &mut String, entry: &CaseResult) {
    let _ = writeln!(out, "|{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "| {} | {}",
        entry.args.join(" "),
        verdict(entry.attack_succeeded)
    );
}

/// Render the results as a JSON array
pub fn render_json(results: &ResultsMap) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}
