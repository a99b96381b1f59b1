//! Configuration types for the Baudetail viewer.
//!
//! All types implement [`serde::Deserialize`] for loading from external
//! sources; every field is optional and falls back to the documented default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration.
//! - [`ViewerConfig`] - Initial view-state flags (sound, panel visibility).
//! - [`ContentConfig`] - Payload ingestion options.
//! - [`StyleConfig`] - Snapshot background and failure highlight colors.
//!
//! # Example
//!
//! ```
//! # use baudetail::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.viewer().sound_enabled());
//! assert!(config.content().sanitize_markup());
//! assert!(config.style().highlight_palette().is_ok());
//! ```

use serde::Deserialize;

use baudetail_core::color::Color;

use crate::binder::HighlightPalette;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    viewer: ViewerConfig,

    #[serde(default)]
    content: ContentConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(viewer: ViewerConfig, content: ContentConfig, style: StyleConfig) -> Self {
        Self {
            viewer,
            content,
            style,
        }
    }

    pub fn viewer(&self) -> &ViewerConfig {
        &self.viewer
    }

    pub fn content(&self) -> &ContentConfig {
        &self.content
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Initial values of the user-facing view-state flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    sound_enabled: bool,
    layer_panel_visible: bool,
    info_panel_visible: bool,
}

impl ViewerConfig {
    pub fn new(sound_enabled: bool, layer_panel_visible: bool, info_panel_visible: bool) -> Self {
        Self {
            sound_enabled,
            layer_panel_visible,
            info_panel_visible,
        }
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn layer_panel_visible(&self) -> bool {
        self.layer_panel_visible
    }

    pub fn info_panel_visible(&self) -> bool {
        self.info_panel_visible
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new(true, true, true)
    }
}

/// Options applied while ingesting a payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Strip scripts, event-handler attributes and script URLs from the markup.
    sanitize_markup: bool,
}

impl ContentConfig {
    pub fn new(sanitize_markup: bool) -> Self {
        Self { sanitize_markup }
    }

    pub fn sanitize_markup(&self) -> bool {
        self.sanitize_markup
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Visual styling of the overlay.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Snapshot background color, as a color string.
    #[serde(default)]
    background_color: Option<String>,

    /// Failure-scenario highlight colors, as color strings.
    #[serde(default)]
    highlight: HighlightConfig,
}

/// Highlight color overrides keyed by scenario severity.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct HighlightConfig {
    #[serde(default)]
    critical: Option<String>,
    #[serde(default)]
    high: Option<String>,
    #[serde(default)]
    medium: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is not a valid color.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the highlight palette with configured overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured highlight color is not a valid color.
    pub fn highlight_palette(&self) -> Result<HighlightPalette, String> {
        let defaults = HighlightPalette::default();
        let pick = |configured: &Option<String>, fallback: Color| {
            configured
                .as_deref()
                .map(Color::new)
                .transpose()
                .map(|color| color.unwrap_or(fallback))
                .map_err(|err| format!("Invalid highlight color in config: {err}"))
        };

        Ok(HighlightPalette::new(
            pick(&self.highlight.critical, defaults.critical())?,
            pick(&self.highlight.high, defaults.high())?,
            pick(&self.highlight.medium, defaults.medium())?,
        ))
    }
}
