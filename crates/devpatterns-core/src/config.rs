//! Site configuration management.

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Code block rendering settings.
    #[serde(default)]
    pub code: CodeConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title, shown in the sidebar header and page titles.
    pub title: String,

    /// Base URL for the site (e.g., "https://example.com").
    pub base_url: String,

    /// Language code for the `<html lang>` attribute.
    #[serde(default = "default_language")]
    pub language: String,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Short text shown in the sidebar "About" block.
    #[serde(default)]
    pub about: Option<String>,

    /// Site author name.
    #[serde(default)]
    pub author: Option<String>,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Directory holding markdown content.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Output directory for generated site.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Syntax highlighting theme name.
    #[serde(default = "default_syntax_theme")]
    pub syntax_theme: String,

    /// Whether to generate drafts.
    #[serde(default)]
    pub drafts: bool,
}

/// Code block configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeConfig {
    /// Language assumed for code blocks without a tag.
    #[serde(default = "default_code_language")]
    pub default_language: String,

    /// Whether to render the line-number gutter.
    #[serde(default = "default_true")]
    pub line_numbers: bool,

    /// Milliseconds before a "copied" indicator reverts.
    #[serde(default = "default_copy_reset_ms")]
    pub copy_reset_ms: u64,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_output_dir() -> String {
    "public".to_string()
}

fn default_syntax_theme() -> String {
    "base16-ocean.dark".to_string()
}

fn default_code_language() -> String {
    "bash".to_string()
}

fn default_true() -> bool {
    true
}

fn default_copy_reset_ms() -> u64 {
    crate::copy::COPY_RESET_DELAY.as_millis() as u64
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Dev Patterns & Practices".to_string(),
            base_url: "http://localhost:3000".to_string(),
            language: default_language(),
            description: None,
            about: None,
            author: None,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            output_dir: default_output_dir(),
            syntax_theme: default_syntax_theme(),
            drafts: false,
        }
    }
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            default_language: default_code_language(),
            line_numbers: true,
            copy_reset_ms: default_copy_reset_ms(),
        }
    }
}

impl CodeConfig {
    /// The revert delay for the copy indicator.
    pub fn copy_reset_delay(&self) -> Duration {
        Duration::from_millis(self.copy_reset_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `DEVPATTERNS__SECTION__KEY` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("DEVPATTERNS").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if self.code.copy_reset_ms == 0 {
            return Err(CoreError::config("code.copy_reset_ms must be positive"));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        Ok(())
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}
