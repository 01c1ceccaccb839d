use async_once_cell::OnceCell;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use super::{util, CLI_NAME};

lazy_static! {
    pub static ref SETTINGS: Arc<OnceCell<Settings>> = Arc::new(OnceCell::new());
}

static DEFAULT_DB_FILE: &str = "fyyur.db";
static DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings global store is uninitialized")]
    Uninitialized,

    #[error("Could not locate program directories")]
    Directories,

    #[error("Could not read the config file: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Path is not valid UTF-8: {0:?}")]
    Path(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub db: String,
    #[serde(default = "default_true")]
    pub csrf: bool,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u64,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default)]
    pub pool: PoolSettings,
}

/// Database connection pool limits. Timeouts are in seconds, an
/// `idle_timeout` of 0 keeps idle connections forever.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub timeout: u64,
    pub idle_timeout: u64,
    pub log_statements: bool,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            timeout: 8,
            idle_timeout: 300,
            log_statements: false,
        }
    }
}

impl PoolSettings {
    /// The limits to use for `url`. An in-memory SQLite database lives as long
    /// as its connection, so it gets exactly one that is never recycled.
    pub fn for_url(&self, url: &str) -> Self {
        if url.contains(":memory:") {
            Self {
                max_connections: 1,
                min_connections: 1,
                idle_timeout: 0,
                ..self.clone()
            }
        } else {
            self.clone()
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db: String::new(),
            csrf: default_true(),
            recent_limit: default_recent_limit(),
            static_dir: default_static_dir(),
            pool: PoolSettings::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_recent_limit() -> u64 {
    5
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn project_dirs() -> Result<ProjectDirs, SettingsError> {
    ProjectDirs::from("com", "github", CLI_NAME).ok_or(SettingsError::Directories)
}

pub fn load(path: Option<PathBuf>) -> Result<Settings, SettingsError> {
    let path = match path {
        Some(path) => path,
        None => project_dirs()?
            .config_dir()
            .join(PathBuf::from(DEFAULT_CONFIG_FILE)),
    };
    tracing::info! {?path, "Loading config file"};
    let content = fs::read_to_string(path).unwrap_or_default();
    let set = parse(content.as_str())?;
    tracing::trace! {settings = ?set, "Loaded settings"};
    Ok(set)
}

pub fn parse(content: &str) -> Result<Settings, SettingsError> {
    let set: Settings = toml::from_str(content)?;
    generate_default(set)
}

pub fn generate_default(mut set: Settings) -> Result<Settings, SettingsError> {
    if set.db == String::default() {
        let data_dir = project_dirs()?.data_dir().to_path_buf();
        util::mkdirp(&data_dir)?;
        let file = data_dir.join(DEFAULT_DB_FILE);
        set.db = format!("sqlite://{}?mode=rwc", util::path_to_str(&file)?);
    }
    if !set.csrf {
        tracing::warn!("CSRF protection is disabled");
    }
    Ok(set)
}

pub fn get_settings() -> Result<&'static Settings, SettingsError> {
    SETTINGS.get().ok_or(SettingsError::Uninitialized)
}
