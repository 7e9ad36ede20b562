//! Configuration loading and folder resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or unreadable config file never stops startup; it is logged
//! and the remaining tiers are used.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const ENV_ROOT_FOLDER: &str = "SIGNAGE_ROOT_FOLDER";
pub const ENV_ASSET_FOLDER: &str = "SIGNAGE_ASSET_FOLDER";
pub const ENV_PORT: &str = "SIGNAGE_PORT";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "signage.db";

/// Built-in defaults used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub asset_folder: PathBuf,
    pub listen_ip: String,
    pub listen_port: u16,
    pub static_folder: PathBuf,
    pub viewer_log: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            root_folder: home.join(".signage"),
            asset_folder: home.join("signage_assets"),
            listen_ip: "0.0.0.0".to_string(),
            listen_port: 8080,
            static_folder: PathBuf::from("static"),
            viewer_log: PathBuf::from("/tmp/screenly_viewer.log"),
            log_level: "info".to_string(),
        }
    }
}

/// Optional settings read from `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub root_folder: Option<PathBuf>,
    #[serde(default)]
    pub asset_folder: Option<PathBuf>,
    #[serde(default)]
    pub listen_ip: Option<String>,
    #[serde(default)]
    pub listen_port: Option<u16>,
    #[serde(default)]
    pub static_folder: Option<PathBuf>,
    #[serde(default)]
    pub viewer_log: Option<PathBuf>,
    /// Timeout for remote URI checks; no timeout when unset
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging section of `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default)]
    pub level: Option<String>,
}

impl TomlConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

/// Where the TOML config came from
#[derive(Debug, Clone)]
pub enum ConfigOrigin {
    File(PathBuf),
    Missing,
    Invalid { path: PathBuf, reason: String },
}

/// TOML config plus its origin, loaded before logging is set up
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub origin: ConfigOrigin,
}

impl LoadedConfig {
    /// Report the outcome once the tracing subscriber is installed
    pub fn log_origin(&self) {
        match &self.origin {
            ConfigOrigin::File(path) => info!("Loaded config file {}", path.display()),
            ConfigOrigin::Missing => info!("No config file found, using defaults"),
            ConfigOrigin::Invalid { path, reason } => {
                warn!("Ignoring config file {}: {}", path.display(), reason)
            }
        }
    }
}

/// Load `explicit` if given, otherwise the first config file found
///
/// Never fails: an unreadable file yields an empty config and an
/// `Invalid` origin.
pub fn load_config(explicit: Option<&Path>) -> LoadedConfig {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match config_file_path() {
            Some(path) => path,
            None => {
                return LoadedConfig {
                    config: TomlConfig::default(),
                    origin: ConfigOrigin::Missing,
                }
            }
        },
    };

    match TomlConfig::load(&path) {
        Ok(config) => LoadedConfig {
            config,
            origin: ConfigOrigin::File(path),
        },
        Err(e) => LoadedConfig {
            config: TomlConfig::default(),
            origin: ConfigOrigin::Invalid {
                path,
                reason: e.to_string(),
            },
        },
    }
}

/// Locate `config.toml`: user config dir first, then `/etc/signage`
pub fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("signage").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    let system_config = PathBuf::from("/etc/signage/config.toml");
    if system_config.exists() {
        return Some(system_config);
    }

    None
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub asset_folder: Option<PathBuf>,
    pub listen_ip: Option<String>,
    pub listen_port: Option<u16>,
    pub static_folder: Option<PathBuf>,
}

/// Fully resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub root_folder: PathBuf,
    pub asset_folder: PathBuf,
    pub database_path: PathBuf,
    pub listen_ip: String,
    pub listen_port: u16,
    pub static_folder: PathBuf,
    pub viewer_log: PathBuf,
    pub fetch_timeout: Option<Duration>,
    pub log_level: String,
}

impl Settings {
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig, defaults: CompiledDefaults) -> Result<Self> {
        let root_folder = cli
            .root_folder
            .clone()
            .or_else(|| env_path(ENV_ROOT_FOLDER))
            .or_else(|| toml.root_folder.clone())
            .unwrap_or(defaults.root_folder);

        let asset_folder = cli
            .asset_folder
            .clone()
            .or_else(|| env_path(ENV_ASSET_FOLDER))
            .or_else(|| toml.asset_folder.clone())
            .unwrap_or(defaults.asset_folder);

        let listen_port = match cli.listen_port {
            Some(port) => port,
            None => match std::env::var(ENV_PORT) {
                Ok(value) => value.parse::<u16>().map_err(|_| {
                    Error::Config(format!("{} is not a valid port: {}", ENV_PORT, value))
                })?,
                Err(_) => toml.listen_port.unwrap_or(defaults.listen_port),
            },
        };

        let listen_ip = cli
            .listen_ip
            .clone()
            .or_else(|| toml.listen_ip.clone())
            .unwrap_or(defaults.listen_ip);

        let static_folder = cli
            .static_folder
            .clone()
            .or_else(|| toml.static_folder.clone())
            .unwrap_or(defaults.static_folder);

        Ok(Self {
            database_path: root_folder.join(DATABASE_FILE),
            root_folder,
            asset_folder,
            listen_ip,
            listen_port,
            static_folder,
            viewer_log: toml.viewer_log.clone().unwrap_or(defaults.viewer_log),
            fetch_timeout: toml.fetch_timeout_secs.map(Duration::from_secs),
            log_level: toml.logging.level.clone().unwrap_or(defaults.log_level),
        })
    }

    /// `ip:port` to bind
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_ip, self.listen_port)
    }

    /// Create the root and asset folders if they are missing
    pub fn ensure_folders(&self) -> Result<()> {
        for folder in [&self.root_folder, &self.asset_folder] {
            if !folder.is_dir() {
                std::fs::create_dir_all(folder)?;
                info!("Created folder {}", folder.display());
            }
        }
        Ok(())
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}
