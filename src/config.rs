//! Configuration file handling.
//!
//! This module handles loading `config.toml` from the user's config
//! directory (or `$HELFETCH_CONFIG`) and merging it with CLI arguments.

use crate::display::Color;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an explicit configuration file.
pub const CONFIG_ENV: &str = "HELFETCH_CONFIG";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Color per display role.
    #[serde(default)]
    pub colors: ColorConfig,

    /// Which report sections are shown.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Network lookup settings.
    #[serde(default)]
    pub network: NetworkConfig,
}

/// Report colors.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorConfig {
    #[serde(default = "default_info_key_color")]
    pub info_key_color: Color,

    #[serde(default = "default_info_value_color")]
    pub info_value_color: Color,

    #[serde(default = "default_logo_color")]
    pub logo_color: Color,

    #[serde(default = "default_quote_color")]
    pub quote_color: Color,

    #[serde(default = "default_recommendation_color")]
    pub recommendation_color: Color,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            info_key_color: default_info_key_color(),
            info_value_color: default_info_value_color(),
            logo_color: default_logo_color(),
            quote_color: default_quote_color(),
            recommendation_color: default_recommendation_color(),
        }
    }
}

fn default_info_key_color() -> Color {
    Color::LightYellow
}

fn default_info_value_color() -> Color {
    Color::White
}

fn default_logo_color() -> Color {
    Color::LightCyan
}

fn default_quote_color() -> Color {
    Color::LightGreen
}

fn default_recommendation_color() -> Color {
    Color::Yellow
}

/// Report section toggles.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Show the distribution logo.
    #[serde(default = "default_true")]
    pub logo: bool,

    /// Show the recommendations block.
    #[serde(default = "default_true")]
    pub recommendations: bool,

    /// Show the quote line.
    #[serde(default = "default_true")]
    pub quote: bool,

    /// Append usage bars to CPU, RAM, and disk percentages.
    #[serde(default)]
    pub usage_bars: bool,

    /// Number of segments in a usage bar.
    #[serde(default = "default_bar_length")]
    pub bar_length: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            logo: true,
            recommendations: true,
            quote: true,
            usage_bars: false,
            bar_length: default_bar_length(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Longest usage bar rendered, whatever the configuration asks for.
pub const MAX_BAR_LENGTH: usize = 100;

fn default_bar_length() -> usize {
    20
}

/// Network lookup settings.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// JSON endpoint returning public IP, ISP, and location.
    #[serde(default = "default_geo_endpoint")]
    pub geo_endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            geo_endpoint: default_geo_endpoint(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_geo_endpoint() -> String {
    "http://ip-api.com/json/".to_string()
}

fn default_timeout() -> u64 {
    2
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if no file exists, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        match Self::default_path() {
            Some(path) if path.exists() => Ok(Some(Self::load(&path)?)),
            _ => Ok(None),
        }
    }

    /// Resolves the configuration path from the environment.
    pub fn default_path() -> Option<PathBuf> {
        Self::path_from_env(|key| std::env::var_os(key).filter(|v| !v.is_empty()))
    }

    fn path_from_env<F>(var: F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<std::ffi::OsString>,
    {
        if let Some(explicit) = var(CONFIG_ENV) {
            return Some(PathBuf::from(explicit));
        }
        if let Some(xdg) = var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join("helfetch").join("config.toml"));
        }
        var("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("helfetch")
                .join("config.toml")
        })
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Flags only ever switch sections off.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if args.no_logo {
            self.display.logo = false;
        }
    }

    /// Bar length when usage bars are enabled, capped at `MAX_BAR_LENGTH`.
    pub fn usage_bars(&self) -> Option<usize> {
        (self.display.usage_bars && self.display.bar_length > 0)
            .then(|| self.display.bar_length.min(MAX_BAR_LENGTH))
    }
}
