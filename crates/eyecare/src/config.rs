//! Configuration management for eyecare.
//!
//! This module provides configuration loading and validation using figment,
//! supporting a TOML config file, environment variables, and defaults.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::plan::RecoveryPlanTable;
use crate::surgery::SurgeryType;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "eyecare";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "EYECARE_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `EYECARE_`, sections split on `__`)
/// 2. TOML config file at `~/.config/eyecare/config.toml`
/// 3. Default values
///
/// Extra recovery plan entries are given per surgery type, keyed by day:
///
/// ```toml
/// [plans.PRK]
/// 1 = "Day 1: Keep the bandage contact lens in"
/// 5 = "Day 5: Bandage lens removal appointment"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Session behaviour.
    pub session: SessionConfig,
    /// Document import limits.
    pub documents: DocumentConfig,
    /// Extra plan entries: surgery type -> day -> instruction.
    pub plans: BTreeMap<String, BTreeMap<String, String>>,
}

/// Session-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Start sessions with the stock medications, checklist and videos.
    pub seed_defaults: bool,
    /// Prompt shown by the interactive session.
    pub prompt: String,
}

/// Document import configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Largest file accepted per selection, in bytes.
    pub max_size_bytes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed_defaults: true,
            prompt: "eyecare> ".to_string(),
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: 25 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        debug!("Loading configuration from {}", config_file.display());

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.documents.max_size_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "documents.max_size_bytes must be greater than 0".to_string(),
            });
        }

        self.plan_entries().map(|_| ())
    }

    /// The built-in plan table with configured entries merged over it.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured day or instruction is invalid.
    pub fn recovery_plans(&self) -> Result<RecoveryPlanTable> {
        let mut table = RecoveryPlanTable::builtin();
        for (key, entries) in self.plan_entries()? {
            debug!(plan = %key, entries = entries.len(), "merging configured plan entries");
            table.merge(key, entries);
        }
        Ok(table)
    }

    /// Parse the configured plan entries into `(plan key, [(day, text)])`.
    fn plan_entries(&self) -> Result<Vec<(String, Vec<(u32, String)>)>> {
        self.plans
            .iter()
            .map(|(name, days)| {
                let key = plan_key(name);
                let entries = days
                    .iter()
                    .map(|(day, text)| parse_plan_entry(&key, day, text))
                    .collect::<Result<Vec<_>>>()?;
                Ok((key, entries))
            })
            .collect()
    }
}

/// Canonical plan key: known surgery types are matched case-insensitively,
/// anything else is used verbatim.
pub(crate) fn plan_key(name: &str) -> String {
    SurgeryType::from_str(name).map_or_else(|_| name.to_string(), |t| t.as_str().to_string())
}

fn parse_plan_entry(key: &str, day: &str, text: &str) -> Result<(u32, String)> {
    let parsed = day
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|d| *d >= 1)
        .ok_or_else(|| Error::ConfigValidation {
            message: format!("plans.{key}: day '{day}' must be a whole number of at least 1"),
        })?;
    if text.trim().is_empty() {
        return Err(Error::ConfigValidation {
            message: format!("plans.{key}: instruction for day {parsed} is empty"),
        });
    }
    Ok((parsed, text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.session.seed_defaults);
        assert_eq!(config.session.prompt, "eyecare> ");
        assert_eq!(config.documents.max_size_bytes, 25 * 1024 * 1024);
        assert!(config.plans.is_empty());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_document_limit() {
        let mut config = Config::default();
        config.documents.max_size_bytes = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("max_size_bytes"));
    }

    #[test]
    fn test_validate_bad_plan_day() {
        let mut config = Config::default();
        config
            .plans
            .entry("LASIK".to_string())
            .or_default()
            .insert("soon".to_string(), "Day ?: whenever".to_string());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("plans.LASIK"));
        assert!(err.contains("soon"));
    }

    #[test]
    fn test_validate_day_zero_rejected() {
        let mut config = Config::default();
        config
            .plans
            .entry("PRK".to_string())
            .or_default()
            .insert("0".to_string(), "Day 0: surgery".to_string());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_instruction_rejected() {
        let mut config = Config::default();
        config
            .plans
            .entry("ICL".to_string())
            .or_default()
            .insert("2".to_string(), "   ".to_string());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("empty"));
    }

    #[test]
    fn test_recovery_plans_defaults_to_builtin() {
        let table = Config::default().recovery_plans().unwrap();
        assert_eq!(table, RecoveryPlanTable::builtin());
    }

    #[test]
    fn test_recovery_plans_merges_configured_entries() {
        let mut config = Config::default();
        let prk = config.plans.entry("prk".to_string()).or_default();
        prk.insert("5".to_string(), "Day 5: Bandage lens removal".to_string());
        let lasik = config.plans.entry("LASIK".to_string()).or_default();
        lasik.insert("7".to_string(), "Day 7: Follow-up with Dr. Ortiz".to_string());

        let table = config.recovery_plans().unwrap();

        assert_eq!(
            table.get("PRK").unwrap().instruction(5),
            Some("Day 5: Bandage lens removal")
        );
        assert_eq!(
            table.get("LASIK").unwrap().instruction(7),
            Some("Day 7: Follow-up with Dr. Ortiz")
        );
        assert_eq!(
            table.get("LASIK").unwrap().instruction(1),
            Some("Day 1: Rest your eyes, use prescribed eye drops every 4 hours, wear protective glasses")
        );
    }

    #[test]
    fn test_plan_key_normalizes_known_types() {
        assert_eq!(plan_key("lasik"), "LASIK");
        assert_eq!(plan_key("cataract"), "Cataract");
        assert_eq!(plan_key("SMILE"), "SMILE");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("eyecare"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    /// Run `f` with the process environment isolated from other config tests.
    fn with_env(f: impl FnOnce(&mut figment::Jail) -> Result<()>) {
        figment::Jail::expect_with(|jail| f(jail).map_err(|e| figment::Error::from(e.to_string())));
    }

    #[test]
    fn test_load_nonexistent_config() {
        with_env(|_| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_file() {
        with_env(|_| {
            let file = write_config(
                r#"
[session]
seed_defaults = false

[documents]
max_size_bytes = 4096

[plans.PRK]
1 = "Day 1: Keep the bandage contact lens in"
5 = "Day 5: Bandage lens removal appointment"
"#,
            );

            let config = Config::load_from(Some(file.path().to_path_buf()))?;

            assert!(!config.session.seed_defaults);
            assert_eq!(config.session.prompt, "eyecare> ");
            assert_eq!(config.documents.max_size_bytes, 4096);
            let table = config.recovery_plans()?;
            assert_eq!(table.get("PRK").unwrap().len(), 2);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        with_env(|jail| {
            let file = write_config(
                r#"
[documents]
max_size_bytes = 1024

[plans.PRK]
1 = "Day 1: Keep the bandage contact lens in"
"#,
            );
            jail.set_env("EYECARE_DOCUMENTS__MAX_SIZE_BYTES", 8192);
            jail.set_env("EYECARE_SESSION__PROMPT", "care>");
            jail.set_env("EYECARE_PLANS__PRK__4", "Day 4: Avoid rubbing under the lens");

            let config = Config::load_from(Some(file.path().to_path_buf()))?;

            assert_eq!(config.documents.max_size_bytes, 8192);
            assert_eq!(config.session.prompt, "care>");
            let table = config.recovery_plans()?;
            let prk = table.get("PRK").unwrap();
            assert_eq!(prk.instruction(1), Some("Day 1: Keep the bandage contact lens in"));
            assert_eq!(prk.instruction(4), Some("Day 4: Avoid rubbing under the lens"));
            Ok(())
        });
    }

    #[test]
    fn test_env_ignores_other_prefixes() {
        with_env(|jail| {
            jail.set_env("CARE_DOCUMENTS__MAX_SIZE_BYTES", 1);
            jail.set_env("EYECARE_DOCUMENTS_MAX_SIZE_BYTES", 1);

            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))?;
            assert_eq!(config.documents.max_size_bytes, DocumentConfig::default().max_size_bytes);
            Ok(())
        });
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        with_env(|_| {
            let file = write_config("[documents]\nmax_size_bytes = 0\n");

            let result = Config::load_from(Some(file.path().to_path_buf()));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_load_from_file_reports_type_errors() {
        with_env(|_| {
            let file = write_config("[session]\nseed_defaults = \"sometimes\"\n");

            let result = Config::load_from(Some(file.path().to_path_buf()));
            assert!(matches!(result, Err(Error::ConfigLoad(_))));
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("seed_defaults"));
        assert!(json.contains("max_size_bytes"));
    }
}
