use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{HistogramError, HistogramResult};
use crate::render::Color;

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load widget
/// setup without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionEngineConfig {
    pub viewport: Viewport,
    /// Fallback fill for bars inside an enabled segment.
    #[serde(default = "default_selection_color")]
    pub selection_color: Color,
    /// Fill for bars outside any segment or inside a disabled one.
    #[serde(default = "default_inactive_bar_color")]
    pub inactive_bar_color: Color,
    #[serde(default = "default_inactive_bar_opacity")]
    pub inactive_bar_opacity: f64,
    /// Fill for bars of a hovered segment when toggling is allowed.
    #[serde(default = "default_over_selection_color")]
    pub over_selection_color: Color,
    #[serde(default = "default_over_selection_opacity")]
    pub over_selection_opacity: f64,
    /// Marks the boundary columns of enabled segments; `None` disables the
    /// divider entirely.
    #[serde(default)]
    pub segment_divider_color: Option<Color>,
    /// Stroke and label color of the boundary handles.
    #[serde(default = "default_handle_color")]
    pub handle_color: Color,
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f64,
    /// Enables the two-phase edit flow on handle clicks.
    #[serde(default)]
    pub handle_edit: bool,
}

impl SelectionEngineConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            selection_color: default_selection_color(),
            inactive_bar_color: default_inactive_bar_color(),
            inactive_bar_opacity: default_inactive_bar_opacity(),
            over_selection_color: default_over_selection_color(),
            over_selection_opacity: default_over_selection_opacity(),
            segment_divider_color: None,
            handle_color: default_handle_color(),
            font_size_px: default_font_size_px(),
            handle_edit: false,
        }
    }

    /// Sets the fallback segment fill color.
    #[must_use]
    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    /// Sets fill and opacity for bars outside the active selection.
    #[must_use]
    pub fn with_inactive_bar_style(mut self, color: Color, opacity: f64) -> Self {
        self.inactive_bar_color = color;
        self.inactive_bar_opacity = opacity;
        self
    }

    /// Sets fill and opacity for hovered toggleable segments.
    #[must_use]
    pub fn with_over_selection_style(mut self, color: Color, opacity: f64) -> Self {
        self.over_selection_color = color;
        self.over_selection_opacity = opacity;
        self
    }

    /// Enables the segment divider with the given color.
    #[must_use]
    pub fn with_segment_divider_color(mut self, color: Color) -> Self {
        self.segment_divider_color = Some(color);
        self
    }

    /// Sets handle stroke and label color.
    #[must_use]
    pub fn with_handle_color(mut self, color: Color) -> Self {
        self.handle_color = color;
        self
    }

    /// Sets the label font size in pixels.
    #[must_use]
    pub fn with_font_size_px(mut self, font_size_px: f64) -> Self {
        self.font_size_px = font_size_px;
        self
    }

    /// Enables or disables the handle edit flow.
    #[must_use]
    pub fn with_handle_edit(mut self, enabled: bool) -> Self {
        self.handle_edit = enabled;
        self
    }

    pub fn validate(&self) -> HistogramResult<()> {
        if !self.viewport.is_valid() {
            return Err(HistogramError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        self.selection_color.validate()?;
        self.inactive_bar_color.validate()?;
        self.over_selection_color.validate()?;
        self.handle_color.validate()?;
        if let Some(divider) = self.segment_divider_color {
            divider.validate()?;
        }

        for (name, opacity) in [
            ("inactive bar", self.inactive_bar_opacity),
            ("over selection", self.over_selection_opacity),
        ] {
            if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
                return Err(HistogramError::InvalidData(format!(
                    "{name} opacity must be finite and in [0, 1]"
                )));
            }
        }

        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(HistogramError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> HistogramResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| HistogramError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> HistogramResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| HistogramError::InvalidData(format!("failed to parse config: {e}")))
    }
}

/// Options for `refresh` and `set_selection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefreshOptions {
    /// Sweep handles from the old layout instead of snapping to the new one.
    #[serde(default)]
    pub animate: bool,
}

impl RefreshOptions {
    #[must_use]
    pub fn animated() -> Self {
        Self { animate: true }
    }
}

fn default_selection_color() -> Color {
    Color::rgb(0.29, 0.53, 0.73)
}

fn default_inactive_bar_color() -> Color {
    Color::rgb(0.84, 0.84, 0.84)
}

fn default_inactive_bar_opacity() -> f64 {
    0.5
}

fn default_over_selection_color() -> Color {
    Color::rgb(0.20, 0.41, 0.60)
}

fn default_over_selection_opacity() -> f64 {
    0.7
}

fn default_handle_color() -> Color {
    Color::rgb(0.22, 0.22, 0.22)
}

fn default_font_size_px() -> f64 {
    11.0
}
