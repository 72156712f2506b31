// Configuration loading and parsing (report.toml, credentials.toml).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub report: ReportConfig,
    pub llm: LlmConfig,
    pub owners: OwnerAliases,
    pub credentials: CredentialsConfig,
}

// ---------------------------------------------------------------------------
// report.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire report.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ReportFile {
    league: LeagueConfig,
    #[serde(default)]
    report: ReportConfig,
    #[serde(default)]
    llm: LlmConfig,
    #[serde(default)]
    owners: OwnerAliases,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    /// Sleeper league identifier.
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Target week. When omitted, the current week is taken from the
    /// league state endpoint at run time.
    #[serde(default)]
    pub week: Option<u32>,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            week: None,
            output_dir: default_output_dir(),
            tone: default_tone(),
            language: default_language(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Curated owner labels, keyed case-insensitively.
///
/// `team_names` maps known team names to fixed short labels. `aliases` is a
/// catch-all table also probed with display names and usernames, which covers
/// mid-season renames. Both may be empty; that only affects labeling quality.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwnerAliases {
    #[serde(default)]
    pub team_names: HashMap<String, String>,
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

fn default_output_dir() -> String {
    "reports".to_string()
}

fn default_tone() -> String {
    "witty".to_string()
}

fn default_language() -> String {
    "de".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-5-20250929".to_string()
}

fn default_max_tokens() -> u32 {
    1500
}

const TONES: &[&str] = &["neutral", "witty", "trash"];
const LANGUAGES: &[&str] = &["de", "en"];

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub anthropic_api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/report.toml` and
/// (optionally) `config/credentials.toml`, relative to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- report.toml (required) ---
    let report_path = config_dir.join("report.toml");
    let report_text = read_file(&report_path)?;
    let report_file: ReportFile =
        toml::from_str(&report_text).map_err(|e| ConfigError::ParseError {
            path: report_path.clone(),
            source: e,
        })?;

    // --- credentials.toml (optional file; the key itself is validated) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        league: report_file.league,
        report: report_file.report,
        llm: report_file.llm,
        owners: report_file.owners,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);
        if target.exists() {
            continue;
        }

        std::fs::copy(&path, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {} to {}: {e}", path.display(), target.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.id.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.id".into(),
            message: "must be set to a Sleeper league id".into(),
        });
    }

    if !TONES.contains(&config.report.tone.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "report.tone".into(),
            message: format!(
                "must be one of {}, got `{}`",
                TONES.join(", "),
                config.report.tone
            ),
        });
    }

    if !LANGUAGES.contains(&config.report.language.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "report.language".into(),
            message: format!(
                "must be one of {}, got `{}`",
                LANGUAGES.join(", "),
                config.report.language
            ),
        });
    }

    if config.llm.max_tokens == 0 {
        return Err(ConfigError::ValidationError {
            field: "llm.max_tokens".into(),
            message: "must be greater than 0".into(),
        });
    }

    match &config.credentials.anthropic_api_key {
        Some(key) if !key.trim().is_empty() => {}
        _ => {
            return Err(ConfigError::ValidationError {
                field: "credentials.anthropic_api_key".into(),
                message: "must be set in config/credentials.toml".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
