//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

use crate::config::ThemeMode;
use crate::output::{percentage_band, Band};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Pick the palette: explicit config wins, otherwise ask the terminal for
/// its background luminance. Must run before the terminal enters raw mode.
pub fn resolve_theme(mode: ThemeMode) -> Theme {
    match mode {
        ThemeMode::Dark => Theme::Dark,
        ThemeMode::Light => Theme::Light,
        ThemeMode::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Theme::Light,
            _ => Theme::Dark,
        },
    }
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Percentage bands (traffic light)
    pub pct_high: Color,
    pub pct_mid: Color,
    pub pct_low: Color,

    // Table
    pub row_alt_bg: Color,
    pub header_style: Style,
    pub row_selected: Style,
    pub field_selected: Style,
    pub empty_cell: Color,

    // General
    pub muted: Color,
    pub title_color: Color,
    pub rank_color: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popups
    pub popup_border: Color,
    pub popup_title: Style,
}

impl ThemeColors {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            pct_high: Color::Green,
            pct_mid: Color::Yellow,
            pct_low: Color::Red,
            row_alt_bg: Color::Indexed(235),
            header_style: Style::new().bold(),
            row_selected: Style::new().bg(Color::Indexed(237)),
            field_selected: Style::new().reversed().bold(),
            empty_cell: Color::DarkGray,
            muted: Color::Gray,
            title_color: Color::Cyan,
            rank_color: Color::Green,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
        }
    }

    pub fn light() -> Self {
        Self {
            pct_high: Color::Rgb(0, 120, 40),
            pct_mid: Color::Rgb(160, 110, 0),
            pct_low: Color::Rgb(180, 20, 20),
            row_alt_bg: Color::Indexed(254),
            header_style: Style::new().bold(),
            row_selected: Style::new().bg(Color::Indexed(252)),
            field_selected: Style::new().reversed().bold(),
            empty_cell: Color::Indexed(246),
            muted: Color::Indexed(240),
            title_color: Color::Blue,
            rank_color: Color::Rgb(0, 120, 40),
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(0, 120, 40),
            flash_error: Color::Rgb(180, 20, 20),
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
        }
    }

    /// Color for a subject percentage: >= 70 high, >= 50 mid, else low
    pub fn percentage_color(&self, percentage: f64) -> Color {
        match percentage_band(percentage) {
            Band::High => self.pct_high,
            Band::Mid => self.pct_mid,
            Band::Low => self.pct_low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_modes_skip_detection() {
        assert_eq!(resolve_theme(ThemeMode::Dark), Theme::Dark);
        assert_eq!(resolve_theme(ThemeMode::Light), Theme::Light);
    }

    #[test]
    fn test_percentage_color_bands() {
        let colors = ThemeColors::dark();
        assert_eq!(colors.percentage_color(85.0), Color::Green);
        assert_eq!(colors.percentage_color(55.0), Color::Yellow);
        assert_eq!(colors.percentage_color(10.0), Color::Red);
        assert_eq!(colors.percentage_color(-33.33), Color::Red);
    }
}
