//! Application configuration and errors shared by the native and web shells.

use peniko::Color;
use std::time::Duration;
use thiserror::Error;
use xray_core::config::ConfigError;
use xray_render::{ComposeStyle, DEFAULT_HINT, Fill, RendererError};

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unknown demo: {0}")]
    UnknownDemo(String),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Render error: {0}")]
    Render(#[from] RendererError),
    #[error("Malformed event script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("Event targets widget {target}, but only {count} are mounted")]
    NoSuchWidget { target: usize, count: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Shell configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Layout width of one widget.
    pub width: f64,
    /// Layout height of one widget.
    pub height: f64,
    /// Horizontal gap between widgets laid out side by side.
    pub gap: f64,
    /// Interval between animation frames.
    pub frame_interval: Duration,
    pub hint: String,
    pub hint_color: Option<Color>,
    /// Emit inline layout styles with the markup.
    pub inline_styles: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 333.0,
            gap: 32.0,
            frame_interval: Duration::from_millis(16),
            hint: DEFAULT_HINT.to_string(),
            hint_color: None,
            inline_styles: false,
        }
    }
}

impl AppConfig {
    /// Compose style for the configured hint.
    pub fn compose_style(&self) -> ComposeStyle {
        let fill = self.hint_color.map(Fill::Solid).unwrap_or_default();
        ComposeStyle::default()
            .with_hint(self.hint.clone())
            .with_hint_fill(fill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_uses_current_color() {
        let style = AppConfig::default().compose_style();
        assert_eq!(style.hint, DEFAULT_HINT);
        assert_eq!(style.hint_fill, Fill::CurrentColor);
    }

    #[test]
    fn test_custom_hint_color() {
        let config = AppConfig {
            hint_color: Some(Color::BLACK),
            ..AppConfig::default()
        };
        assert_eq!(config.compose_style().hint_fill, Fill::Solid(Color::BLACK));
    }
}
