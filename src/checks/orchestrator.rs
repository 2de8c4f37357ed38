//! Batch orchestrator
//!
//! Sanity checks first, then every enabled catalog group in order. Cases
//! run one at a time: they all share a single wireless interface.

use serde::Serialize;
use tracing::info;

use crate::common::{join_args, CheckerConfig, Error, Result};

use super::catalog::{CaseGroup, Catalog, TestCase, SANITY_FRAGMENTS, SANITY_PING};
use super::process::{CommandRunner, Invocation};
use super::report::verdict_token;
use super::retry::RetryController;

/// Final verdict of one case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseResult {
    pub name: String,
    pub args: Vec<String>,
    /// The script reported the test completed, i.e. the device accepted the attack
    pub attack_succeeded: bool,
}

/// Case name to final verdict, in the order cases were run
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ResultsMap {
    entries: Vec<CaseResult>,
}

impl ResultsMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the verdict for `case`; each name may be recorded once
    pub fn record(&mut self, case: &TestCase, attack_succeeded: bool) -> Result<()> {
        if self.get(&case.name).is_some() {
            return Err(Error::DuplicateCase(case.name.clone()));
        }
        self.entries.push(CaseResult {
            name: case.name.clone(),
            args: case.args.clone(),
            attack_succeeded,
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.attack_succeeded)
    }

    pub fn entries(&self) -> &[CaseResult] {
        &self.entries
    }

    /// Entries whose name starts with `prefix`
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a CaseResult> {
        self.entries.iter().filter(move |e| e.name.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Runs the sanity checks and the enabled catalog groups
pub struct Orchestrator<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    catalog: &'a Catalog,
    config: &'a CheckerConfig,
}

impl<'a, R: CommandRunner + ?Sized> Orchestrator<'a, R> {
    pub fn new(runner: &'a R, catalog: &'a Catalog, config: &'a CheckerConfig) -> Self {
        Self {
            runner,
            catalog,
            config,
        }
    }

    /// Execute the whole batch
    ///
    /// A failed sanity check aborts before any catalog case runs. A failing
    /// case is only a recorded `false`.
    pub async fn run(&self) -> Result<ResultsMap> {
        self.catalog.validate()?;

        let retry = RetryController::new(self.runner, self.config.max_retries);
        let base = Invocation::new(&self.config.script, vec![self.config.interface.clone()]);
        let base = self.sanity_checks(&retry, base).await?;

        let mut results = ResultsMap::new();
        for group in [CaseGroup::AlwaysRun, CaseGroup::ManualAnalysis, CaseGroup::MixedKey] {
            if !group.enabled(self.config) {
                info!("[ ] Skipping {} attacks", group);
                continue;
            }
            if group != CaseGroup::AlwaysRun {
                info!("[*] Executing {} attacks", group);
            }
            for case in self.catalog.group(group) {
                info!("[*] Checking {}", case.name);
                let success = retry.run_with_retry(&base.with_args(&case.args)).await?;
                info!(case = %case.name, "{}", verdict_token(success));
                results.record(case, success)?;
            }
        }

        Ok(results)
    }

    /// Run both sanity checks and return the base invocation for the rest of the run
    async fn sanity_checks(
        &self,
        retry: &RetryController<'_, R>,
        base: Invocation,
    ) -> Result<Invocation> {
        info!("[*] Performing sanity checks...");

        if !retry.run_with_retry(&base.with_args(SANITY_PING)).await? {
            return Err(Error::SanityCheckFailed(join_args(SANITY_PING)));
        }

        let fragments = base.with_args(SANITY_FRAGMENTS);
        if retry.run_with_retry(&fragments).await? {
            return Ok(base);
        }

        let icmp_size = self.config.icmp_size.to_string();
        let reduced = ["--icmp-size", icmp_size.as_str()];
        if !retry.run_with_retry(&fragments.with_args(&reduced)).await? {
            return Err(Error::SanityCheckFailed(join_args(SANITY_FRAGMENTS)));
        }

        info!("[*] Need to set ICMP size to {}", icmp_size);
        Ok(base.with_args(&reduced))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::process::fake::{failure, inconclusive, success, ScriptedRunner};
    use std::path::PathBuf;

    fn config() -> CheckerConfig {
        let mut config = CheckerConfig::new("wlan0");
        config.script = PathBuf::from("./fragattack.py");
        config
    }

    fn is_sanity_fragments(inv: &Invocation) -> bool {
        inv.args.len() >= 3 && inv.args[1] == "ping" && inv.args[2] == "I,E,E"
            && !inv.args.contains(&"--inc-pn".to_string())
    }

    fn single_case_catalog() -> Catalog {
        Catalog::new(vec![TestCase::new("amsdu", &["amsdu-inject"], CaseGroup::AlwaysRun)])
    }

    #[tokio::test]
    async fn test_single_case_run() {
        let runner = ScriptedRunner::new(|_, _| success());
        let catalog = single_case_catalog();
        let config = config();

        let results = Orchestrator::new(&runner, &catalog, &config).run().await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results.get("amsdu"), Some(true));

        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].args, vec!["wlan0", "ping"]);
        assert_eq!(calls[1].args, vec!["wlan0", "ping", "I,E,E"]);
        assert_eq!(calls[2].args, vec!["wlan0", "amsdu-inject"]);
        assert!(calls.iter().all(|c| c.program == PathBuf::from("./fragattack.py")));
    }

    #[tokio::test]
    async fn test_first_sanity_failure_aborts() {
        let runner = ScriptedRunner::new(|_, _| failure());
        let catalog = Catalog::builtin();
        let config = config();

        let err = Orchestrator::new(&runner, &catalog, &config).run().await.unwrap_err();
        assert!(matches!(err, Error::SanityCheckFailed(ref check) if check == "ping"));
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_icmp_size_adjustment_applies_to_rest_of_run() {
        let runner = ScriptedRunner::new(|inv, _| {
            let reduced = inv.args.contains(&"--icmp-size".to_string());
            if is_sanity_fragments(inv) && !reduced {
                failure()
            } else {
                success()
            }
        });
        let catalog = Catalog::builtin();
        let config = config();

        let results = Orchestrator::new(&runner, &catalog, &config).run().await.unwrap();
        assert_eq!(results.get("cache_1"), Some(true));

        let calls = runner.calls();
        assert_eq!(calls[2].args, vec!["wlan0", "ping", "I,E,E", "--icmp-size", "100"]);
        for call in &calls[3..] {
            assert_eq!(&call.args[..3], &["wlan0", "--icmp-size", "100"]);
        }
    }

    #[tokio::test]
    async fn test_icmp_size_adjustment_failure_aborts() {
        let runner = ScriptedRunner::new(|inv, _| {
            if is_sanity_fragments(inv) {
                failure()
            } else {
                success()
            }
        });
        let catalog = Catalog::builtin();
        let config = config();

        let err = Orchestrator::new(&runner, &catalog, &config).run().await.unwrap_err();
        assert!(matches!(err, Error::SanityCheckFailed(ref check) if check == "ping I,E,E"));
        assert_eq!(runner.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_optional_groups() {
        let runner = ScriptedRunner::new(|_, _| failure());
        let runner_ok = ScriptedRunner::new(|_, _| success());
        let catalog = Catalog::builtin();

        let mut config = config();
        config.mixed_key = false;
        let results = Orchestrator::new(&runner_ok, &catalog, &config).run().await.unwrap();
        assert_eq!(results.len(), 15);
        assert_eq!(results.get("mixed_key"), None);
        assert_eq!(results.get("manual_frag_sep"), None);

        config.mixed_key = true;
        config.manual_analysis = true;
        let results = Orchestrator::new(&runner_ok, &catalog, &config).run().await.unwrap();
        assert_eq!(results.len(), 20);
        assert_eq!(results.get("mixed_key_consecutive"), Some(true));
        assert_eq!(results.get("manual_bcast_dst"), Some(true));

        // a failing setup never reaches the catalog
        assert!(Orchestrator::new(&runner, &catalog, &config).run().await.is_err());
    }

    #[tokio::test]
    async fn test_case_failure_does_not_abort() {
        let runner = ScriptedRunner::new(|inv, _| {
            if inv.args.contains(&"amsdu-inject".to_string()) {
                failure()
            } else {
                success()
            }
        });
        let catalog = Catalog::builtin();
        let config = config();

        let results = Orchestrator::new(&runner, &catalog, &config).run().await.unwrap();
        assert_eq!(results.get("amsdu"), Some(false));
        assert_eq!(results.get("amsdu_bad"), Some(true));
        assert_eq!(results.len(), 17);
    }

    #[tokio::test]
    async fn test_inconclusive_case_retried() {
        let runner = ScriptedRunner::new(|inv, _| {
            if inv.args.contains(&"amsdu-inject".to_string()) {
                inconclusive()
            } else {
                success()
            }
        });
        let catalog = single_case_catalog();
        let config = config();

        let results = Orchestrator::new(&runner, &catalog, &config).run().await.unwrap();
        assert_eq!(results.get("amsdu"), Some(false));
        let attempts = runner
            .calls()
            .iter()
            .filter(|c| c.args.contains(&"amsdu-inject".to_string()))
            .count();
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn test_duplicate_catalog_rejected_before_running() {
        let runner = ScriptedRunner::new(|_, _| success());
        let catalog = Catalog::new(vec![
            TestCase::new("bcast", &["ping"], CaseGroup::AlwaysRun),
            TestCase::new("bcast", &["ping"], CaseGroup::AlwaysRun),
        ]);
        let config = config();

        let err = Orchestrator::new(&runner, &catalog, &config).run().await.unwrap_err();
        assert!(matches!(err, Error::DuplicateCase(_)));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_results_map_rejects_duplicates() {
        let case = TestCase::new("cache_1", &["ping"], CaseGroup::AlwaysRun);
        let mut results = ResultsMap::new();
        results.record(&case, true).unwrap();
        assert!(matches!(results.record(&case, false), Err(Error::DuplicateCase(_))));
        assert_eq!(results.get("cache_1"), Some(true));
    }
}
