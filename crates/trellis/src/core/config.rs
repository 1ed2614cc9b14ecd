//! Device and layout configuration.

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    geom::{Rect, Size},
};

/// Screen geometry and layout metrics.
///
/// Defaults describe a 240×320 portrait panel with an 8×16 character cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Screen width in pixels.
    pub screen_width: u32,
    /// Screen height in pixels.
    pub screen_height: u32,
    /// Height of the status strip kept free below the base view.
    pub info_bar_height: u32,
    /// Character cell width.
    pub char_width: u32,
    /// Character cell height, also the text line pitch.
    pub line_height: u32,
    /// Vertical offset of the title line in a modal dialog.
    pub modal_title_top: u32,
    /// Vertical offset of the first message line in a modal dialog.
    pub modal_text_top: u32,
    /// Vertical offset of the first message line in a compact modal dialog.
    pub modal_compact_text_top: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_width: 240,
            screen_height: 320,
            info_bar_height: 16,
            char_width: 8,
            line_height: 16,
            modal_title_top: 8,
            modal_text_top: 120,
            modal_compact_text_top: 24,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// The screen size.
    pub fn screen_size(&self) -> Size {
        Size::new(self.screen_width, self.screen_height)
    }

    /// The screen as a rectangle at the origin.
    pub fn screen_rect(&self) -> Rect {
        self.screen_size().rect()
    }

    /// Width in pixels of `cells` character cells.
    pub fn cells_wide(&self, cells: u32) -> u32 {
        cells.saturating_mul(self.char_width)
    }

    /// Height in pixels of `lines` text lines.
    pub fn lines_high(&self, lines: u32) -> u32 {
        lines.saturating_mul(self.line_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn partial_json_keeps_defaults() -> Result<()> {
        let config = Config::from_json(r#"{ "screen_width": 320, "info_bar_height": 0 }"#)?;
        assert_eq!(config.screen_size(), Size::new(320, 320));
        assert_eq!(config.info_bar_height, 0);
        assert_eq!(config.line_height, 16);
        assert_eq!(config.modal_title_top, 8);
        Ok(())
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Config::from_json("{ screen_width: }"),
            Err(Error::Config(_))
        ));
    }
}
