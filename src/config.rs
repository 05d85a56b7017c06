//! Engine configuration loaded from TOML
//!
//! ```toml
//! [canvas]
//! width = 800
//! height = 480
//!
//! [layout]
//! max_depth = 10
//! min_widget_size = 10
//!
//! [live]
//! reconnect_delay_ms = 3000
//! poll_interval_ms = 5000
//! poll_while_connected = true
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::LayoutConfig;
use crate::live::FeedConfig;

/// Errors that can occur when loading engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Built-in configuration
const DEFAULT_CONFIG: &str = r#"
[canvas]
width = 480
height = 320

[layout]
max_depth = 10
min_widget_size = 10

[live]
reconnect_delay_ms = 3000
poll_interval_ms = 5000
poll_while_connected = true
"#;

#[derive(Deserialize, Default)]
struct TomlConfig {
    #[serde(default)]
    canvas: TomlCanvas,
    #[serde(default)]
    layout: TomlLayout,
    #[serde(default)]
    live: TomlLive,
}

#[derive(Deserialize, Default)]
struct TomlCanvas {
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Deserialize, Default)]
struct TomlLayout {
    max_depth: Option<usize>,
    min_widget_size: Option<f64>,
}

#[derive(Deserialize, Default)]
struct TomlLive {
    reconnect_delay_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
    poll_while_connected: Option<bool>,
}

/// Settings for layout and the live feed
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub layout: LayoutConfig,
    pub live: FeedConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut layout = LayoutConfig::default();
        let mut live = FeedConfig::default();

        if let Some(width) = parsed.canvas.width {
            layout.canvas_width = positive("canvas.width", width)?;
        }
        if let Some(height) = parsed.canvas.height {
            layout.canvas_height = positive("canvas.height", height)?;
        }
        if let Some(depth) = parsed.layout.max_depth {
            if depth == 0 {
                return Err(ConfigError::invalid("layout.max_depth", "must be at least 1"));
            }
            layout.max_depth = depth;
        }
        if let Some(size) = parsed.layout.min_widget_size {
            if !size.is_finite() || size < 0.0 {
                return Err(ConfigError::invalid(
                    "layout.min_widget_size",
                    format!("{size} is not a non-negative number"),
                ));
            }
            layout.min_widget_size = size;
        }
        if let Some(ms) = parsed.live.reconnect_delay_ms {
            live.reconnect_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parsed.live.poll_interval_ms {
            if ms == 0 {
                return Err(ConfigError::invalid("live.poll_interval_ms", "must be greater than 0"));
            }
            live.poll_interval = Duration::from_millis(ms);
        }
        if let Some(enabled) = parsed.live.poll_while_connected {
            live.poll_while_connected = enabled;
        }

        Ok(Self { layout, live })
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_live(mut self, live: FeedConfig) -> Self {
        self.live = live;
        self
    }
}

fn positive(key: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::invalid(key, format!("{value} is not a positive number")))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_str(DEFAULT_CONFIG).expect("Default config should be valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.layout.canvas_width, 480.0);
        assert_eq!(config.layout.canvas_height, 320.0);
        assert_eq!(config.layout.max_depth, 10);
        assert_eq!(config.live.reconnect_delay, Duration::from_secs(3));
        assert_eq!(config.live.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_str("[canvas]\nwidth = 800\nheight = 480\n").unwrap();
        assert_eq!(config.layout.canvas_width, 800.0);
        assert_eq!(config.layout.canvas_height, 480.0);
        assert_eq!(config.layout.max_depth, 10);
        assert!(config.live.poll_while_connected);
    }

    #[test]
    fn test_live_section() {
        let config = EngineConfig::from_str(
            "[live]\nreconnect_delay_ms = 1500\npoll_interval_ms = 10000\npoll_while_connected = false\n",
        )
        .unwrap();
        assert_eq!(config.live.reconnect_delay, Duration::from_millis(1500));
        assert_eq!(config.live.poll_interval, Duration::from_secs(10));
        assert!(!config.live.poll_while_connected);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            EngineConfig::from_str("[canvas]\nwidth = -1\n"),
            Err(ConfigError::Invalid { key: "canvas.width", .. })
        ));
        assert!(matches!(
            EngineConfig::from_str("[layout]\nmax_depth = 0\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            EngineConfig::from_str("[canvas\n"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::default()
            .with_layout(LayoutConfig::new().with_canvas(320.0, 240.0))
            .with_live(FeedConfig::new().with_poll_interval(Duration::from_secs(1)));
        assert_eq!(config.layout.canvas_width, 320.0);
        assert_eq!(config.live.poll_interval, Duration::from_secs(1));
    }
}
