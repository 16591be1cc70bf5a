//! Configuration for reelmatch.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (REELMATCH_HOME, REELMATCH_SOURCE_URL)
//! 2. Config file (.reelmatch/config.yaml)
//! 3. Defaults (~/.reelmatch, public stream index)
//!
//! Config file discovery:
//! - Searches current directory and parents for .reelmatch/config.yaml
//! - `paths.home` is relative to the .reelmatch/ directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::SkillIdentity;
use crate::sync::{SyncSchedule, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_DELAY, DEFAULT_MIN_DELAY};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Snapshot served by the public stream index
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/OpenJarbas/streamindex/main/TheCGBros.json";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub sync: Option<SyncConfig>,
    #[serde(default)]
    pub skill: Option<SkillConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .reelmatch/)
    pub home: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncConfig {
    pub source_url: Option<String>,
    pub bootstrap_url: Option<String>,
    pub min_delay_seconds: Option<u64>,
    pub max_delay_seconds: Option<u64>,
    pub fetch_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillConfig {
    pub skill_id: Option<String>,
    pub provider_name: Option<String>,
    #[serde(default)]
    pub provider_aliases: Vec<String>,
    pub icon: Option<String>,
    pub background: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the state directory
    pub home: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Sync settings
    pub sync: SyncSettings,
    /// Skill identity and vocabulary settings
    pub skill: SkillSettings,
}

#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub source_url: String,
    pub bootstrap_url: Option<String>,
    pub min_delay_seconds: u64,
    pub max_delay_seconds: u64,
    pub fetch_timeout_seconds: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            bootstrap_url: None,
            min_delay_seconds: DEFAULT_MIN_DELAY.as_secs(),
            max_delay_seconds: DEFAULT_MAX_DELAY.as_secs(),
            fetch_timeout_seconds: DEFAULT_FETCH_TIMEOUT.as_secs(),
        }
    }
}

impl SyncSettings {
    pub fn schedule(&self) -> SyncSchedule {
        SyncSchedule::new(
            Duration::from_secs(self.min_delay_seconds),
            Duration::from_secs(self.max_delay_seconds),
        )
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkillSettings {
    pub identity: SkillIdentity,
    /// Provider aliases (empty = built-in list)
    pub provider_aliases: Vec<String>,
}

impl ResolvedConfig {
    /// Path of the persisted catalog
    pub fn catalog_path(&self) -> PathBuf {
        self.home.join("catalog.json")
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".reelmatch").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

fn sync_settings(config: Option<&SyncConfig>) -> SyncSettings {
    let defaults = SyncSettings::default();
    let Some(config) = config else {
        return defaults;
    };

    SyncSettings {
        source_url: config.source_url.clone().unwrap_or(defaults.source_url),
        bootstrap_url: config.bootstrap_url.clone(),
        min_delay_seconds: config.min_delay_seconds.unwrap_or(defaults.min_delay_seconds),
        max_delay_seconds: config.max_delay_seconds.unwrap_or(defaults.max_delay_seconds),
        fetch_timeout_seconds: match config.fetch_timeout_seconds {
            Some(0) => {
                tracing::warn!("fetch_timeout_seconds must be at least 1, using 1");
                1
            }
            Some(seconds) => seconds,
            None => defaults.fetch_timeout_seconds,
        },
    }
}

fn skill_settings(config: Option<&SkillConfig>) -> SkillSettings {
    let defaults = SkillIdentity::default();
    let Some(config) = config else {
        return SkillSettings::default();
    };

    SkillSettings {
        identity: SkillIdentity {
            skill_id: config.skill_id.clone().unwrap_or(defaults.skill_id),
            provider_name: config.provider_name.clone().unwrap_or(defaults.provider_name),
            skill_icon: config.icon.clone().unwrap_or(defaults.skill_icon),
            default_bg: config.background.clone().unwrap_or(defaults.default_bg),
        },
        provider_aliases: config.provider_aliases.clone(),
    }
}

/// Resolve settings from an optional config file plus environment overrides
fn resolve(config_file: Option<PathBuf>) -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".reelmatch");

    let parsed = config_file
        .as_deref()
        .map(load_config_file)
        .transpose()?;

    // Resolve home path
    let home = if let Ok(env_home) = std::env::var("REELMATCH_HOME") {
        PathBuf::from(env_home)
    } else if let (Some(config_path), Some(home_path)) = (
        config_file.as_deref(),
        parsed.as_ref().and_then(|c| c.paths.home.as_deref()),
    ) {
        // home is relative to .reelmatch/ directory
        let dot_dir = config_path.parent().unwrap_or(Path::new("."));
        resolve_path(dot_dir, home_path)
    } else {
        default_home
    };

    let mut sync = sync_settings(parsed.as_ref().and_then(|c| c.sync.as_ref()));
    if let Ok(url) = std::env::var("REELMATCH_SOURCE_URL") {
        sync.source_url = url;
    }

    let skill = skill_settings(parsed.as_ref().and_then(|c| c.skill.as_ref()));

    Ok(ResolvedConfig {
        home,
        config_file,
        sync,
        skill,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    resolve(find_config_file())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}
