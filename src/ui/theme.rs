//! Theme color definitions for console messages
//!
//! Provides dark and light palettes for status lines printed by the console.

use crate::config::Theme;
use crossterm::style::Color;

/// Color palette for console messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    /// Headers and menu titles
    pub heading: Color,
    /// Success messages
    pub success: Color,
    /// Warnings and cancellations
    pub warning: Color,
    /// Errors and rejected input
    pub error: Color,
    /// Informational notes
    pub info: Color,
}

impl ThemeColors {
    /// Create a color palette for the given theme variant
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    /// Dark theme - bright accents on a dark terminal
    pub fn dark() -> Self {
        Self {
            heading: Color::Rgb { r: 80, g: 200, b: 220 },
            success: Color::Rgb { r: 80, g: 200, b: 120 },
            warning: Color::Rgb { r: 240, g: 180, b: 80 },
            error: Color::Rgb { r: 240, g: 90, b: 100 },
            info: Color::Rgb { r: 200, g: 200, b: 210 },
        }
    }

    /// Light theme - high contrast for bright terminals
    pub fn light() -> Self {
        Self {
            heading: Color::Rgb { r: 0, g: 130, b: 160 },
            success: Color::Rgb { r: 30, g: 150, b: 70 },
            warning: Color::Rgb { r: 180, g: 120, b: 0 },
            error: Color::Rgb { r: 200, g: 50, b: 60 },
            info: Color::Rgb { r: 30, g: 30, b: 40 },
        }
    }
}
