//! Malleable configuration system
//!
//! This crate provides centralized configuration management for Malleable,
//! loading settings from `malleable.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Main configuration structure for Malleable
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MalleableConfig {
    /// Host window settings
    pub window: WindowConfig,
    /// Chat and turn-streaming settings
    pub chat: ChatConfig,
    /// Visual appearance settings
    pub appearance: AppearanceConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Assistant backend settings
    pub assistant: AssistantConfig,
}

/// Host window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
}

/// What happens when the user sends while a turn is still streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SendPolicy {
    /// Fold the message into the running turn.
    #[default]
    Steer,
    /// Refuse the send with a busy error.
    Reject,
}

impl SendPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "steer" => Some(Self::Steer),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// Chat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Behaviour of a send issued while a turn is streaming
    pub send_policy: SendPolicy,
    /// How long to wait for a terminal event after an abort before giving up locally
    pub abort_timeout_ms: u64,
    /// Initial width of the chat panel in logical pixels
    pub panel_width: f32,
}

impl ChatConfig {
    /// Abort grace period as a `Duration`.
    pub fn abort_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.abort_timeout_ms)
    }
}

/// Colour theme of the host and, by filter emulation, of rendered content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appearance configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppearanceConfig {
    pub theme: Theme,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter handed to env_logger when `RUST_LOG` is unset
    pub filter: String,
}

/// Assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AssistantConfig {
    /// Working directory for tool execution (defaults to the process directory)
    pub working_directory: Option<PathBuf>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Malleable".to_string(),
            width: 1400,
            height: 900,
            min_width: 800,
            min_height: 600,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            send_policy: SendPolicy::Steer,
            abort_timeout_ms: 10_000,
            panel_width: 400.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl MalleableConfig {
    /// Load configuration from a TOML file
    ///
    /// # Returns
    /// * `Ok(MalleableConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if loading failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from `malleable.toml` in the current directory,
    /// or return the default configuration if the file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("malleable.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Unparseable values are ignored.
    pub fn merge_with_env(&mut self) {
        if let Ok(title) = std::env::var("MALLEABLE_TITLE") {
            self.window.title = title;
        }

        if let Ok(val) = std::env::var("MALLEABLE_SEND_POLICY") {
            if let Some(policy) = SendPolicy::parse(&val) {
                self.chat.send_policy = policy;
            }
        }
        if let Ok(val) = std::env::var("MALLEABLE_ABORT_TIMEOUT_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                self.chat.abort_timeout_ms = ms;
            }
        }

        if let Ok(val) = std::env::var("MALLEABLE_THEME") {
            if let Some(theme) = Theme::parse(&val) {
                self.appearance.theme = theme;
            }
        }

        if let Ok(dir) = std::env::var("MALLEABLE_CWD") {
            self.assistant.working_directory = Some(PathBuf::from(dir));
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from malleable.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
