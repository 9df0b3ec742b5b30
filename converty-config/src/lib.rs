//! Configuration loading and validation for Converty.
//!
//! Configuration is read from an optional file (toml, yaml or json,
//! inferred from the extension) into a raw shape where every section and
//! field is optional, then resolved against defaults and validated into the
//! dense [`Config`] used by the rest of the system.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Raw on-disk configuration; every section and field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: Option<ServerSection>,
    #[serde(default)]
    pub logging: Option<LoggingSection>,
    #[serde(default)]
    pub storage: Option<StorageSection>,
    #[serde(default)]
    pub conversion: Option<ConversionSection>,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub json: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct StorageSection {
    /// Directory that receives conversion outputs.
    #[serde(default)]
    pub output_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConversionSection {
    /// Default encoder quality for image targets, in [0, 100].
    #[serde(default)]
    pub image_quality: Option<u8>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Resolved configuration with every field populated.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub conversion: ConversionConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StorageConfig {
    pub output_dir: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionConfig {
    pub image_quality: u8,
}

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8687;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_OUTPUT_DIR: &str = "./converty";
pub const DEFAULT_IMAGE_QUALITY: u8 = 85;

/// Load a RawConfigFile from a path. The format is inferred from the
/// extension: .toml, .yaml/.yml, .json
pub fn load_raw_from_file<P: AsRef<Path>>(path: P) -> Result<RawConfigFile, ConfigError> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    parse_config_str(&s, ext.as_deref())
}

fn parse_config_str(s: &str, ext: Option<&str>) -> Result<RawConfigFile, ConfigError> {
    match ext {
        Some("toml") => toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string())),
        Some("yaml" | "yml") => {
            serde_yaml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
        }
        Some("json") => serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string())),
        other => Err(ConfigError::Parse(format!(
            "unsupported config format: {}",
            other.unwrap_or("<none>")
        ))),
    }
}

/// Load and validate configuration. With no path, the defaults are used.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<Config, ConfigError> {
    let raw = match path {
        Some(p) => load_raw_from_file(p)?,
        None => RawConfigFile::default(),
    };
    let config = resolve(raw);
    validate(&config)?;
    Ok(config)
}

fn resolve(raw: RawConfigFile) -> Config {
    let server = raw.server.unwrap_or(ServerSection {
        host: None,
        port: None,
    });
    let logging = raw.logging.unwrap_or(LoggingSection {
        level: None,
        json: None,
    });
    let storage = raw.storage.unwrap_or(StorageSection { output_dir: None });
    let conversion = raw.conversion.unwrap_or(ConversionSection {
        image_quality: None,
    });

    Config {
        server: ServerConfig {
            host: server.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: server.port.unwrap_or(DEFAULT_PORT),
        },
        logging: LoggingConfig {
            level: logging.level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            json: logging.json.unwrap_or(false),
        },
        storage: StorageConfig {
            output_dir: storage
                .output_dir
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
        },
        conversion: ConversionConfig {
            image_quality: conversion.image_quality.unwrap_or(DEFAULT_IMAGE_QUALITY),
        },
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.server.host.trim().is_empty() {
        return Err(ConfigError::Validation("server.host must not be empty".into()));
    }
    if config.server.port == 0 {
        return Err(ConfigError::Validation("server.port must be non-zero".into()));
    }
    if config.storage.output_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "storage.output_dir must not be empty".into(),
        ));
    }
    if config.conversion.image_quality > 100 {
        return Err(ConfigError::Validation(
            "conversion.image_quality must be in [0, 100]".into(),
        ));
    }
    Ok(())
}
