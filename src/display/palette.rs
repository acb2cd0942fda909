//! Terminal color palette and the role-based color scheme.

use serde::Deserialize;
use std::fmt;

/// ANSI reset sequence.
pub const RESET: &str = "\x1b[0m";

/// Named terminal colors recognised in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightMagenta,
    LightCyan,
    LightWhite,
    /// Also used for any unrecognised name.
    #[serde(other)]
    Reset,
}

impl Color {
    /// Returns the ANSI escape sequence for this color.
    pub fn code(self) -> &'static str {
        match self {
            Color::Red => "\x1b[0;31m",
            Color::Green => "\x1b[0;32m",
            Color::Yellow => "\x1b[0;33m",
            Color::Blue => "\x1b[0;34m",
            Color::Magenta => "\x1b[0;35m",
            Color::Cyan => "\x1b[0;36m",
            Color::White => "\x1b[0;37m",
            Color::LightRed => "\x1b[1;31m",
            Color::LightGreen => "\x1b[1;32m",
            Color::LightYellow => "\x1b[1;33m",
            Color::LightBlue => "\x1b[1;34m",
            Color::LightMagenta => "\x1b[1;35m",
            Color::LightCyan => "\x1b[1;36m",
            Color::LightWhite => "\x1b[1;37m",
            Color::Reset => RESET,
        }
    }

    /// Wraps `text` in this color followed by a reset.
    pub fn paint(self, text: &str) -> String {
        format!("{}{}{}", self.code(), text, RESET)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Color per display role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub info_key: Color,
    pub info_value: Color,
    pub logo: Color,
    pub quote: Color,
    pub recommendation: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            info_key: Color::LightYellow,
            info_value: Color::White,
            logo: Color::LightCyan,
            quote: Color::LightGreen,
            recommendation: Color::Yellow,
        }
    }
}

impl From<&crate::config::ColorConfig> for ColorScheme {
    fn from(config: &crate::config::ColorConfig) -> Self {
        Self {
            info_key: config.info_key_color,
            info_value: config.info_value_color,
            logo: config.logo_color,
            quote: config.quote_color,
            recommendation: config.recommendation_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_codes() {
        assert_eq!(Color::Red.code(), "\x1b[0;31m");
        assert_eq!(Color::LightCyan.code(), "\x1b[1;36m");
        assert_eq!(Color::Reset.code(), RESET);
    }

    #[test]
    fn test_paint() {
        assert_eq!(Color::Green.paint("ok"), "\x1b[0;32mok\x1b[0m");
    }

    #[test]
    fn test_default_scheme() {
        let scheme = ColorScheme::default();
        assert_eq!(scheme.info_key, Color::LightYellow);
        assert_eq!(scheme.info_value, Color::White);
        assert_eq!(scheme.logo, Color::LightCyan);
        assert_eq!(scheme.quote, Color::LightGreen);
    }
}
