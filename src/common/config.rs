//! Run configuration
//!
//! There are no configuration files: everything comes from the command
//! line and is validated here before the first subprocess is spawned.

use std::path::{Path, PathBuf};

use super::{Error, Result};

/// Default location of the fragattack script
pub const DEFAULT_SCRIPT: &str = "./fragattack.py";

/// Default retry bound for inconclusive results
pub const DEFAULT_RETRIES: u32 = 2;

/// Default reduced ICMP payload for network stacks that drop the full one
pub const DEFAULT_ICMP_SIZE: u32 = 100;

/// Configuration for one batch run
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// External script invoked for every case
    pub script: PathBuf,

    /// Wireless interface handed to the script
    pub interface: String,

    /// Extra attempts allowed for an inconclusive case
    pub max_retries: u32,

    /// Run the cases whose verdict needs a capture to be inspected by hand
    pub manual_analysis: bool,

    /// Run the mixed-key cases, which may hang the script
    pub mixed_key: bool,

    /// Payload size used when the sanity check needs a smaller ping
    pub icmp_size: u32,
}

impl CheckerConfig {
    /// Create a configuration with defaults for everything but the interface
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            script: PathBuf::from(DEFAULT_SCRIPT),
            interface: interface.into(),
            max_retries: DEFAULT_RETRIES,
            manual_analysis: false,
            mixed_key: true,
            icmp_size: DEFAULT_ICMP_SIZE,
        }
    }

    /// Check the configuration and resolve the script location
    ///
    /// A bare program name is looked up in `PATH`; anything with a
    /// directory component must exist as given.
    pub fn validate(mut self) -> Result<Self> {
        if self.interface.is_empty() {
            return Err(Error::Config("interface name must not be empty".to_string()));
        }
        if self.interface.chars().any(char::is_whitespace) {
            return Err(Error::Config(format!(
                "interface name '{}' contains whitespace",
                self.interface
            )));
        }
        if self.icmp_size == 0 {
            return Err(Error::Config("--icmp-size must be positive".to_string()));
        }

        self.script = resolve_script(&self.script)?;
        Ok(self)
    }
}

fn resolve_script(script: &Path) -> Result<PathBuf> {
    let has_dir = script
        .parent()
        .map(|p| !p.as_os_str().is_empty())
        .unwrap_or(false);

    if has_dir || script.is_absolute() {
        if script.is_file() {
            return Ok(script.to_path_buf());
        }
        return Err(Error::ScriptNotFound(script.display().to_string()));
    }

    which::which(script).map_err(|_| Error::ScriptNotFound(script.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = CheckerConfig::new("wlan0");
        assert_eq!(config.script, PathBuf::from("./fragattack.py"));
        assert_eq!(config.max_retries, 2);
        assert!(config.mixed_key);
        assert!(!config.manual_analysis);
        assert_eq!(config.icmp_size, 100);
    }

    #[test]
    fn test_rejects_bad_interface() {
        let err = CheckerConfig::new("").validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = CheckerConfig::new("wlan 0").validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_script_path() {
        let dir = tempdir().unwrap();
        let mut config = CheckerConfig::new("wlan0");
        config.script = dir.path().join("fragattack.py");

        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::ScriptNotFound(_)));
        assert!(err.is_setup_failure());
    }

    #[test]
    fn test_existing_script_path() {
        let dir = tempdir().unwrap();
        let script = dir.path().join("fragattack.py");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();

        let mut config = CheckerConfig::new("wlan0");
        config.script = script.clone();
        assert_eq!(config.validate().unwrap().script, script);
    }

    #[test]
    fn test_bare_name_not_on_path() {
        let mut config = CheckerConfig::new("wlan0");
        config.script = PathBuf::from("definitely-not-a-real-fragattack-binary");
        assert!(matches!(config.validate(), Err(Error::ScriptNotFound(_))));
    }
}
