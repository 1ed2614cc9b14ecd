//! Colors and text styles in the device's native RGB565 format.

/// A 16-bit RGB565 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u16);

impl Color {
    /// Pure black.
    pub const BLACK: Self = Self(0x0000);
    /// Pure white.
    pub const WHITE: Self = Self(0xFFFF);
    /// Dark grey used for window backgrounds.
    pub const DARK_GREY: Self = Self(0x2104);
    /// Light grey used for secondary text.
    pub const LIGHT_GREY: Self = Self(0xC618);
    /// Yellow used for focus highlights.
    pub const YELLOW: Self = Self(0xFFE0);

    /// Build a color from 8-bit channels, discarding the low bits.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self((((r as u16) >> 3) << 11) | (((g as u16) >> 2) << 5) | ((b as u16) >> 3))
    }
}

/// Foreground/background pair used for text and fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
    /// Text and outline color.
    pub fg: Color,
    /// Fill color.
    pub bg: Color,
}

impl Style {
    /// Construct a style.
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg }
    }

    /// Swap foreground and background, used to draw focused widgets.
    pub const fn invert(self) -> Self {
        Self {
            fg: self.bg,
            bg: self.fg,
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(Color::WHITE, Color::BLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb565_packing() {
        assert_eq!(Color::rgb(255, 255, 255), Color::WHITE);
        assert_eq!(Color::rgb(255, 255, 0), Color::YELLOW);
        assert_eq!(Color::rgb(0, 0, 0), Color::BLACK);
    }
}
