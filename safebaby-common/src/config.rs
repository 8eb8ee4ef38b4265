//! Configuration loading and data folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the data folder
pub const DATA_DIR_ENV: &str = "SAFEBABY_DATA";

/// Resolve the data folder following priority order:
/// 1. Command-line argument (highest priority)
/// 2. SAFEBABY_DATA environment variable
/// 3. TOML config file (`data_dir` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = config_file_path() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(data_dir) = config.get("data_dir").and_then(|v| v.as_str()) {
                    return PathBuf::from(data_dir);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir()
}

/// Default configuration file path for the platform
fn config_file_path() -> Result<PathBuf> {
    let path = dirs::config_dir()
        .map(|d| d.join("safebaby").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Config(format!("Config file not found: {:?}", path)))
    }
}

/// OS-dependent default data folder path
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("safebaby"))
        .unwrap_or_else(|| PathBuf::from("./safebaby_data"))
}

/// Ensure the data folder exists, creating it if needed
pub fn ensure_data_dir(data_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;
    Ok(())
}

/// Path of the SQLite database inside the data folder
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join("safebaby.db")
}

/// Service configuration loaded from TOML with environment overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the external product metadata API
    #[serde(default = "default_product_api_base")]
    pub product_api_base: String,

    /// Base URL of the AI vision/analysis API
    #[serde(default = "default_vision_api_base")]
    pub vision_api_base: String,

    /// API key for the AI vision/analysis API
    pub vision_api_key: Option<String>,

    /// Photo scan timeout in milliseconds
    #[serde(default = "default_scan_timeout_ms")]
    pub scan_timeout_ms: u64,
}

fn default_port() -> u16 {
    5730
}

fn default_product_api_base() -> String {
    "https://world.openfoodfacts.org".to_string()
}

fn default_vision_api_base() -> String {
    "https://api.safebaby-vision.example.com/v1".to_string()
}

fn default_scan_timeout_ms() -> u64 {
    30_000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            product_api_base: default_product_api_base(),
            vision_api_base: default_vision_api_base(),
            vision_api_key: None,
            scan_timeout_ms: default_scan_timeout_ms(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from `<data_dir>/safebaby.toml` (if present),
    /// then apply environment variable overrides.
    ///
    /// Env overrides: SAFEBABY_PORT, SAFEBABY_PRODUCT_API_BASE,
    /// SAFEBABY_VISION_API_BASE, SAFEBABY_VISION_API_KEY.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let toml_path = data_dir.join("safebaby.toml");

        let mut config = if toml_path.exists() {
            let content = std::fs::read_to_string(&toml_path)
                .map_err(|e| Error::Config(format!("Read config failed: {}", e)))?;
            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Parse config failed: {}", e)))?
        } else {
            Self::default()
        };

        if let Ok(port) = std::env::var("SAFEBABY_PORT") {
            config.port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid SAFEBABY_PORT: {}", port)))?;
        }
        if let Ok(base) = std::env::var("SAFEBABY_PRODUCT_API_BASE") {
            config.product_api_base = base;
        }
        if let Ok(base) = std::env::var("SAFEBABY_VISION_API_BASE") {
            config.vision_api_base = base;
        }
        if let Ok(key) = std::env::var("SAFEBABY_VISION_API_KEY") {
            if !key.trim().is_empty() {
                config.vision_api_key = Some(key);
            }
        }

        Ok(config)
    }

    /// Return the vision API key or a configuration error with remediation steps
    pub fn require_vision_key(&self) -> Result<&str> {
        match self.vision_api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(Error::Config(
                "Vision API key not configured. Please configure using one of:\n\
                 1. Environment: SAFEBABY_VISION_API_KEY=your-key-here\n\
                 2. TOML config: <data_dir>/safebaby.toml (vision_api_key = \"your-key\")"
                    .to_string(),
            )),
        }
    }
}
