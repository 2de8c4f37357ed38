//! Test catalog
//!
//! The fixed set of fragattack invocations run by the checker. Each case's
//! arguments are appended to `<script> <interface>`.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::common::{join_args, CheckerConfig, Error, Result};

/// Enable/disable group a case belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseGroup {
    /// Core checks, always run
    AlwaysRun,
    /// Verdict also needs a packet capture inspected by hand
    ManualAnalysis,
    /// Rekeying edge cases; prone to hanging the script
    MixedKey,
}

impl CaseGroup {
    /// Whether the group runs under `config`
    pub fn enabled(self, config: &CheckerConfig) -> bool {
        match self {
            CaseGroup::AlwaysRun => true,
            CaseGroup::ManualAnalysis => config.manual_analysis,
            CaseGroup::MixedKey => config.mixed_key,
        }
    }
}

impl fmt::Display for CaseGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaseGroup::AlwaysRun => "always",
            CaseGroup::ManualAnalysis => "manual",
            CaseGroup::MixedKey => "mixed-key",
        };
        f.write_str(s)
    }
}

/// A named fragattack invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    pub name: String,
    pub args: Vec<String>,
    pub group: CaseGroup,
}

impl TestCase {
    pub fn new<S: AsRef<str>>(name: &str, args: &[S], group: CaseGroup) -> Self {
        Self {
            name: name.to_string(),
            args: args.iter().map(|s| s.as_ref().to_string()).collect(),
            group,
        }
    }

    /// Arguments as one space separated line
    pub fn command_line(&self) -> String {
        join_args(&self.args)
    }
}

/// Report sections as (title, case name prefix), in display order
pub const SECTIONS: &[(&str, &str)] = &[
    ("A-MSDU", "amsdu"),
    ("Mixed Key", "mixed_key"),
    ("Cache", "cache_"),
    ("Non-consecutive PNs", "nc_pns"),
    ("Mixed Plain / Encrypted", "mixed_plain"),
    ("Broadcast Fragment", "bcast"),
    ("A-MSDU EAPOL", "eapol_amsdu"),
    ("Manual Analysis", "manual_"),
];

/// Title of the report section a case name falls in
pub fn section_for(name: &str) -> Option<&'static str> {
    SECTIONS
        .iter()
        .find(|(_, prefix)| name.starts_with(prefix))
        .map(|(title, _)| *title)
}

/// Minimal connectivity probe; its failure means the setup is broken
pub const SANITY_PING: &[&str] = &["ping"];

/// Encrypted fragment exchange; some stacks only pass with a smaller payload
pub const SANITY_FRAGMENTS: &[&str] = &["ping", "I,E,E"];

const ATTACKS: &[(&str, &[&str])] = &[
    ("amsdu", &["amsdu-inject"]),
    ("amsdu_bad", &["amsdu-inject-bad"]),
    ("cache_1", &["ping", "I,E,R,AE"]),
    ("cache_2", &["ping", "I,E,R,E"]),
    ("cache_3", &["ping", "I,E,R,AE", "--full-recon"]),
    ("cache_4", &["ping", "I,E,R,E", "--full-recon"]),
    ("nc_pns", &["ping", "I,E,E", "--inc-pn", "2"]),
    ("mixed_plain_1", &["ping", "I,E,P"]),
    ("mixed_plain_2", &["ping", "I,P,E"]),
    ("mixed_plain_3", &["ping", "I,P"]),
    ("mixed_plain_4", &["ping", "I,P,P"]),
    ("mixed_plain_5", &["linux-plain"]),
    ("bcast", &["ping", "I,D,P", "--bcast-ra"]),
    ("eapol_amsdu", &["eapol-amsdu", "I,P"]),
    ("eapol_amsdu_bad", &["eapol-amsdu-bad", "I,P"]),
];

const MANUAL_ANALYSIS_ATTACKS: &[(&str, &[&str])] = &[
    ("manual_frag_sep", &["ping-frag-sep"]),
    ("manual_frag_sep_pn", &["ping-frag-sep", "--pn-per-qos"]),
    ("manual_bcast_dst", &["ping", "I,P", "--bcast-dst"]),
];

const MIXED_KEY_ATTACKS: &[(&str, &[&str])] = &[
    ("mixed_key", &["ping", "I,F,BE,AE"]),
    ("mixed_key_consecutive", &["ping", "I,F,BE,AE", "--pn-per-qos"]),
];

/// An ordered, read-only collection of test cases
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cases: Vec<TestCase>,
}

impl Catalog {
    pub fn new(cases: Vec<TestCase>) -> Self {
        Self { cases }
    }

    /// The built-in fragattack catalog
    pub fn builtin() -> Self {
        let groups = [
            (CaseGroup::AlwaysRun, ATTACKS),
            (CaseGroup::ManualAnalysis, MANUAL_ANALYSIS_ATTACKS),
            (CaseGroup::MixedKey, MIXED_KEY_ATTACKS),
        ];
        let cases = groups
            .iter()
            .flat_map(|&(group, table)| {
                table
                    .iter()
                    .map(move |&(name, args)| TestCase::new(name, args, group))
            })
            .collect();
        Self { cases }
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn get(&self, name: &str) -> Option<&TestCase> {
        self.cases.iter().find(|c| c.name == name)
    }

    pub fn group(&self, group: CaseGroup) -> impl Iterator<Item = &TestCase> {
        self.cases.iter().filter(move |c| c.group == group)
    }

    /// Check names are unique and each maps to exactly one report section
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for case in &self.cases {
            if !seen.insert(case.name.as_str()) {
                return Err(Error::DuplicateCase(case.name.clone()));
            }
            let sections = SECTIONS
                .iter()
                .filter(|(_, prefix)| case.name.starts_with(prefix))
                .count();
            match sections {
                0 => return Err(Error::invalid_case(&case.name, "matches no report section")),
                1 => {}
                _ => {
                    return Err(Error::invalid_case(
                        &case.name,
                        "matches more than one report section",
                    ))
                }
            }
        }
        Ok(())
    }

    /// Human-readable listing used by `--list`
    pub fn listing(&self) -> String {
        let width = self.cases.iter().map(|c| c.name.len()).max().unwrap_or(0);
        let mut out = String::new();
        for case in &self.cases {
            out.push_str(&format!(
                "{:<width$}  {:<9}  {:<24}  {}\n",
                case.name,
                case.group.to_string(),
                section_for(&case.name).unwrap_or("-"),
                case.command_line(),
                width = width
            ));
        }
        out
    }
}
