//! Garden Configuration
//!
//! Configuration for the journal, loaded from
//! `$XDG_CONFIG_HOME/secret-garden/garden.toml`.
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [vault]
//! passphrases = ["garden", "secret", "bloom"]
//!
//! [storage]
//! data_dir = "/home/me/.local/share/secret-garden"
//! autosave_drafts = true
//!
//! [feedback]
//! error_flash_ms = 3000
//! save_flash_ms = 2000
//! flip_settle_ms = 1000
//! draft_debounce_ms = 1000
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `GARDEN_DATA_DIR` | `storage.data_dir` |
//! | `GARDEN_AUTOSAVE_DRAFTS` | `storage.autosave_drafts` |
//! | `GARDEN_PASSPHRASES` | `vault.passphrases` (comma separated) |
//! | `GARDEN_ERROR_FLASH_MS` | `feedback.error_flash_ms` |
//! | `GARDEN_SAVE_FLASH_MS` | `feedback.save_flash_ms` |
//! | `GARDEN_FLIP_SETTLE_MS` | `feedback.flip_settle_ms` |
//! | `GARDEN_DRAFT_DEBOUNCE_MS` | `feedback.draft_debounce_ms` |

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Passphrases accepted when nothing else is configured
pub const DEFAULT_PASSPHRASES: [&str; 3] = ["garden", "secret", "bloom"];

// =============================================================================
// Error Types
// =============================================================================

/// Why the configuration could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read
    #[error("Could not read garden config at {path}: {source}")]
    ReadError {
        /// Config file path
        path: PathBuf,
        /// IO failure
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("Malformed garden config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value was parsed but cannot be used
    #[error("Unusable garden config: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Highest-priority layer that set a value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Command-line flag
    Cli,
    /// `GARDEN_*` environment variable
    Env,
    /// `garden.toml`
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => f.write_str("command line"),
            Self::Env => f.write_str("environment"),
            Self::File => f.write_str("garden.toml"),
            Self::Default => f.write_str("built-in defaults"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Vault section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultToml {
    /// Accepted passphrases (compared lower-cased and trimmed)
    pub passphrases: Option<Vec<String>>,
}

/// Storage section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageToml {
    /// Directory holding the journal files
    pub data_dir: Option<String>,

    /// Whether unsaved buffers are autosaved as drafts
    pub autosave_drafts: Option<bool>,
}

/// Feedback timing section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackToml {
    /// How long a wrong-passphrase message stays up
    pub error_flash_ms: Option<u64>,

    /// How long the save indicator stays up
    pub save_flash_ms: Option<u64>,

    /// How long a penny spins before landing
    pub flip_settle_ms: Option<u64>,

    /// Quiet time after the last keystroke before a draft is written
    pub draft_debounce_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenToml {
    /// Vault configuration section
    pub vault: VaultToml,

    /// Storage configuration section
    pub storage: StorageToml,

    /// Feedback timing configuration section
    pub feedback: FeedbackToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration for the journal
#[derive(Clone, Debug)]
pub struct GardenConfig {
    /// Accepted passphrases, already lower-cased and trimmed
    pub passphrases: Vec<String>,

    /// Directory holding the journal files
    pub data_dir: PathBuf,

    /// Whether unsaved buffers are autosaved as drafts
    pub autosave_drafts: bool,

    /// How long a wrong-passphrase message stays up
    pub error_flash: Duration,

    /// How long the save indicator stays up
    pub save_flash: Duration,

    /// How long a penny spins before landing
    pub flip_settle: Duration,

    /// Quiet time after the last keystroke before a draft is written
    pub draft_debounce: Duration,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            passphrases: DEFAULT_PASSPHRASES.iter().map(|p| (*p).to_string()).collect(),
            data_dir: default_data_dir(),
            autosave_drafts: true,
            error_flash: Duration::from_millis(3000),
            save_flash: Duration::from_millis(2000),
            flip_settle: Duration::from_millis(1000),
            draft_debounce: Duration::from_millis(1000),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl GardenConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with a specific data directory
    #[must_use]
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Whether `candidate`, lower-cased and trimmed, opens the vault
    #[must_use]
    pub fn accepts(&self, candidate: &str) -> bool {
        let candidate = normalize_passphrase(candidate);
        !candidate.is_empty()
            && self.passphrases.iter().any(|p| *p == candidate)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.passphrases.iter().all(String::is_empty) {
            return Err(ConfigError::ValidationError(
                "vault.passphrases must contain at least one non-empty passphrase".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/secret-garden/garden.toml` or
/// `~/.config/secret-garden/garden.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("secret-garden").join("garden.toml"))
}

/// Get the default data directory
///
/// Returns `$XDG_DATA_HOME/secret-garden`, or `.secret-garden` in the working
/// directory when no data directory can be determined.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(".secret-garden"),
        |p| p.join("secret-garden"),
    )
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<GardenConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed, or
/// if the result leaves the vault without any passphrase.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<GardenConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration reading environment variables through `env`
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<GardenConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = GardenConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: GardenToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut GardenConfig, toml: &GardenToml) {
    if let Some(ref passphrases) = toml.vault.passphrases {
        config.passphrases = normalize_passphrases(passphrases.iter().map(String::as_str));
    }

    if let Some(ref dir) = toml.storage.data_dir {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(enabled) = toml.storage.autosave_drafts {
        config.autosave_drafts = enabled;
    }

    if let Some(ms) = toml.feedback.error_flash_ms {
        config.error_flash = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.feedback.save_flash_ms {
        config.save_flash = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.feedback.flip_settle_ms {
        config.flip_settle = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.feedback.draft_debounce_ms {
        config.draft_debounce = Duration::from_millis(ms);
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config<F>(config: &mut GardenConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = env("GARDEN_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
        config.source = ConfigSource::Env;
    }
    if let Some(enabled) = env("GARDEN_AUTOSAVE_DRAFTS") {
        config.autosave_drafts = enabled != "0" && enabled.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
    if let Some(list) = env("GARDEN_PASSPHRASES") {
        config.passphrases = normalize_passphrases(list.split(','));
        config.source = ConfigSource::Env;
    }

    let durations = [
        ("GARDEN_ERROR_FLASH_MS", &mut config.error_flash),
        ("GARDEN_SAVE_FLASH_MS", &mut config.save_flash),
        ("GARDEN_FLIP_SETTLE_MS", &mut config.flip_settle),
        ("GARDEN_DRAFT_DEBOUNCE_MS", &mut config.draft_debounce),
    ];
    let mut from_env = false;
    for (key, slot) in durations {
        if let Some(ms) = env(key).and_then(|v| v.parse::<u64>().ok()) {
            *slot = Duration::from_millis(ms);
            from_env = true;
        }
    }
    if from_env {
        config.source = ConfigSource::Env;
    }
}

fn normalize_passphrase(passphrase: &str) -> String {
    passphrase.trim().to_lowercase()
}

/// Normalized passphrases with blank entries dropped
fn normalize_passphrases<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    raw.into_iter()
        .map(normalize_passphrase)
        .filter(|p| !p.is_empty())
        .collect()
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Data directory override
    pub data_dir: Option<PathBuf>,

    /// Draft autosave override
    pub autosave_drafts: Option<bool>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set data directory override
    #[must_use]
    pub fn with_data_dir(mut self, path: PathBuf) -> Self {
        self.data_dir = Some(path);
        self
    }

    /// Set draft autosave override
    #[must_use]
    pub fn with_autosave_drafts(mut self, enabled: bool) -> Self {
        self.autosave_drafts = Some(enabled);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut GardenConfig) {
        if self.data_dir.is_some() || self.autosave_drafts.is_some() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref dir) = self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(enabled) = self.autosave_drafts {
            config.autosave_drafts = enabled;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // Default Configuration Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = GardenConfig::default();

        assert_eq!(config.passphrases, vec!["garden", "secret", "bloom"]);
        assert!(config.autosave_drafts);
        assert_eq!(config.error_flash, Duration::from_secs(3));
        assert_eq!(config.save_flash, Duration::from_secs(2));
        assert_eq!(config.flip_settle, Duration::from_secs(1));
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("secret-garden"));
            assert!(p.to_string_lossy().ends_with("garden.toml"));
        }
    }

    #[test]
    fn test_accepts_is_case_and_space_insensitive() {
        let config = GardenConfig::default();
        assert!(config.accepts("garden"));
        assert!(config.accepts("  BLOOM "));
        assert!(!config.accepts("weeds"));
        assert!(!config.accepts(""));
    }

    // =========================================================================
    // TOML Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_valid_toml() {
        let file = toml_file(
            r#"
[vault]
passphrases = ["  Rose ", "tulip"]

[storage]
data_dir = "/tmp/garden-test"
autosave_drafts = false

[feedback]
error_flash_ms = 500
save_flash_ms = 250
flip_settle_ms = 10
draft_debounce_ms = 20
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.passphrases, vec!["rose", "tulip"]);
        assert!(config.accepts("ROSE"));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/garden-test"));
        assert!(!config.autosave_drafts);
        assert_eq!(config.error_flash, Duration::from_millis(500));
        assert_eq!(config.save_flash, Duration::from_millis(250));
        assert_eq!(config.flip_settle, Duration::from_millis(10));
        assert_eq!(config.draft_debounce, Duration::from_millis(20));
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let file = toml_file("[feedback]\nsave_flash_ms = 100\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.save_flash, Duration::from_millis(100));
        assert_eq!(config.error_flash, Duration::from_secs(3));
        assert_eq!(config.passphrases.len(), 3);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let file = toml_file("[vault\npassphrases = ");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_empty_passphrases_rejected() {
        let file = toml_file("[vault]\npassphrases = [\"  \"]\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_blank_passphrases_are_dropped() {
        let env = env_from(&[("GARDEN_PASSPHRASES", "garden,")]);
        let config = load_config_with_env(None, env).unwrap();
        assert_eq!(config.passphrases, vec!["garden"]);
        assert!(!config.accepts(""));
        assert!(!config.accepts("   "));

        let file = toml_file("[vault]\npassphrases = [\"Fern\", \" \"]\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.passphrases, vec!["fern"]);
        assert!(!config.accepts(" "));
    }

    #[test]
    fn test_only_commas_rejected() {
        let env = env_from(&[("GARDEN_PASSPHRASES", " , ,")]);
        let result = load_config_with_env(None, env);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config =
            load_config_with_env(Some(PathBuf::from("/nonexistent/garden.toml")), no_env).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    // =========================================================================
    // Priority Tests
    // =========================================================================

    #[test]
    fn test_env_overrides_file() {
        let file = toml_file("[storage]\ndata_dir = \"/from/file\"\n");
        let env = env_from(&[
            ("GARDEN_DATA_DIR", "/from/env"),
            ("GARDEN_PASSPHRASES", "Moss, fern"),
            ("GARDEN_FLIP_SETTLE_MS", "5"),
            ("GARDEN_AUTOSAVE_DRAFTS", "false"),
        ]);

        let config = load_config_with_env(Some(file.path().to_path_buf()), env).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/from/env"));
        assert_eq!(config.passphrases, vec!["moss", "fern"]);
        assert_eq!(config.flip_settle, Duration::from_millis(5));
        assert!(!config.autosave_drafts);
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_unparsable_env_duration_ignored() {
        let env = env_from(&[("GARDEN_SAVE_FLASH_MS", "soon")]);
        let config = load_config_with_env(None, env).unwrap();
        assert_eq!(config.save_flash, Duration::from_secs(2));
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides_env() {
        let env = env_from(&[("GARDEN_DATA_DIR", "/from/env")]);
        let mut config = load_config_with_env(None, env).unwrap();

        ConfigOverrides::new()
            .with_data_dir(PathBuf::from("/from/cli"))
            .with_autosave_drafts(false)
            .apply(&mut config);

        assert_eq!(config.data_dir, PathBuf::from("/from/cli"));
        assert!(!config.autosave_drafts);
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_empty_overrides_keep_source() {
        let mut config = GardenConfig::default();
        ConfigOverrides::new().apply(&mut config);
        assert_eq!(config.source(), ConfigSource::Default);
    }
}
