//! pagesqr runtime configuration handling

use crate::analytics::AnalyticsOptions;
use crate::campaign::{Campaign, CampaignCatalog};
use crate::error::{Error, Result};
use crate::preset::DEFAULT_PRESET;
use crate::qr::{ErrorCorrectionLevel, HexColor, RenderStyle};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder GitHub Pages site used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://YOUR_USERNAME.github.io/qr-hosting/";

/// Directory artifacts are written to, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "assets/qr-codes";

/// Top-level configuration structure read from disk and environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagesQrConfig {
    /// GitHub Pages site hosting the redirect pages
    pub base_url: String,
    /// Directory PNG/SVG artifacts are written to
    pub output_dir: PathBuf,
    /// Default size preset name
    pub size: String,
    /// Default error correction level
    pub error_correction: ErrorCorrectionLevel,
    /// Decode every PNG after writing it
    pub verify: bool,
    /// Visual style shared by all renderings
    pub style: StyleOptions,
    /// Campaign table; the built-in campaigns are used when empty
    pub campaigns: Vec<Campaign>,
    /// Logging configuration
    pub logging: LoggingOptions,
    /// Analytics beacon configuration
    pub analytics: AnalyticsOptions,
}

impl Default for PagesQrConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            size: DEFAULT_PRESET.to_string(),
            error_correction: ErrorCorrectionLevel::Q,
            verify: false,
            style: StyleOptions::default(),
            campaigns: Vec::new(),
            logging: LoggingOptions::default(),
            analytics: AnalyticsOptions::default(),
        }
    }
}

impl PagesQrConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No pagesqr.toml / pagesqr.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["pagesqr.toml", "pagesqr.yaml", "pagesqr.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("pagesqr");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = env::var("PAGESQR_BASE_URL") {
            self.base_url = base_url;
        }
        if let Ok(dir) = env::var("PAGESQR_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Ok(size) = env::var("PAGESQR_SIZE") {
            self.size = size;
        }
        if let Ok(level) = env::var("PAGESQR_ERROR_CORRECTION") {
            match level.parse::<ErrorCorrectionLevel>() {
                Ok(parsed) => self.error_correction = parsed,
                Err(err) => tracing::warn!("Ignoring PAGESQR_ERROR_CORRECTION: {err}"),
            }
        }
        self.logging.apply_env_overrides();
    }

    /// Build the campaign catalog, defaulting to the built-in campaigns.
    pub fn catalog(&self) -> Result<CampaignCatalog> {
        if self.campaigns.is_empty() {
            Ok(CampaignCatalog::builtin())
        } else {
            CampaignCatalog::new(self.campaigns.iter().cloned())
        }
    }

    /// Produce a validated render style.
    pub fn render_style(&self) -> Result<RenderStyle> {
        self.style.to_render_style()
    }
}

/// User-facing style settings, validated into a [`RenderStyle`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    /// Quiet zone width in modules
    pub margin: u32,
    /// Dark module color (`#RRGGBB`)
    pub foreground: String,
    /// Background color (`#RRGGBB`)
    pub background: String,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            margin: 4,
            foreground: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl StyleOptions {
    /// Parse colors and bound the margin.
    pub fn to_render_style(&self) -> Result<RenderStyle> {
        if self.margin > 64 {
            return Err(Error::Config(format!(
                "Margin {} is too large, expected at most 64 modules",
                self.margin
            )));
        }

        Ok(RenderStyle {
            margin: self.margin,
            foreground: self.foreground.parse::<HexColor>()?,
            background: self.background.parse::<HexColor>()?,
        })
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `PAGESQR_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in console logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("PAGESQR_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("PAGESQR_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Ok(color) = env::var("PAGESQR_LOG_COLOR") {
            match color.to_ascii_lowercase().as_str() {
                "0" | "false" | "off" => self.color = false,
                "1" | "true" | "on" => self.color = true,
                _ => {}
            }
        }
        if let Ok(rotation) = env::var("PAGESQR_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::from_str(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}
