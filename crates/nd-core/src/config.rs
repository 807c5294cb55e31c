//! Configuration system for nvdis

use crate::error::{NvdisError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub syntax: SyntaxConfig,
    pub decoder: DecoderConfig,
    pub debug: DebugConfig,
}

/// General listing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Address of the first word read from stdin
    pub base_address: u64,
    /// Print the raw word next to each instruction
    pub show_encoding: bool,
}

/// Operand spelling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxConfig {
    pub register_sigil: String,
    /// Immediates with a magnitude below this print in decimal
    pub hex_threshold: u64,
    pub uppercase_hex: bool,
}

/// Decoder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Worker threads used for long streams; 1 decodes inline
    pub threads: usize,
}

/// Debug settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub log_level: LogLevel,
    /// Log every table row match at trace level
    pub trace_decode: bool,
}

/// Logging level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            base_address: 0,
            show_encoding: true,
        }
    }
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            register_sigil: "$".to_string(),
            hex_threshold: 10,
            uppercase_hex: false,
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self { threads: 1 }
    }
}

impl Config {
    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`, writing the defaults there if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| NvdisError::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| NvdisError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nvdis")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.base_address, 0);
        assert!(config.general.show_encoding);
        assert_eq!(config.syntax.register_sigil, "$");
        assert_eq!(config.syntax.hex_threshold, 10);
        assert!(!config.syntax.uppercase_hex);
        assert_eq!(config.decoder.threads, 1);
        assert_eq!(config.debug.log_level, LogLevel::Info);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.decoder.threads = 4;
        config.syntax.uppercase_hex = true;
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed.decoder.threads, 4);
        assert!(parsed.syntax.uppercase_hex);
    }

    #[test]
    fn test_partial_config() {
        let parsed = Config::from_toml_str(
            "[general]\nbase_address = 4096\n\n[debug]\nlog_level = \"Trace\"\n",
        )
        .unwrap();
        assert_eq!(parsed.general.base_address, 0x1000);
        assert!(parsed.general.show_encoding);
        assert_eq!(parsed.debug.log_level, LogLevel::Trace);
        assert_eq!(parsed.syntax.hex_threshold, 10);
    }

    #[test]
    fn test_invalid_config() {
        let err = Config::from_toml_str("[decoder]\nthreads = \"many\"\n").unwrap_err();
        assert!(matches!(err, NvdisError::Config(_)));
    }

    #[test]
    fn test_log_level_directive() {
        assert_eq!(LogLevel::Off.as_directive(), "off");
        assert_eq!(LogLevel::Debug.as_directive(), "debug");
    }

    #[test]
    fn test_load_creates_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nvdis").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.decoder.threads, 1);
        assert!(path.exists());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("register_sigil"));
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.general.base_address = 0x2000;
        config.syntax.register_sigil = "%".to_string();
        config.debug.trace_decode = true;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.general.base_address, 0x2000);
        assert_eq!(loaded.syntax.register_sigil, "%");
        assert!(loaded.debug.trace_decode);
    }

    #[test]
    fn test_load_rejects_bad_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[general\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(NvdisError::Config(_))));
    }
}
