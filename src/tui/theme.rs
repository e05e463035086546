//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

use crate::config::ThemeMode;

/// Resolved background flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Pick the palette for the configured mode. `auto` asks the terminal for
/// its background luma and falls back to dark when it cannot tell.
pub fn resolve_theme(mode: ThemeMode) -> Theme {
    match mode {
        ThemeMode::Dark => Theme::Dark,
        ThemeMode::Light => Theme::Light,
        ThemeMode::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Theme::Light,
            Ok(_) => Theme::Dark,
            Err(e) => {
                tracing::debug!(error = %e, "could not detect terminal background");
                Theme::Dark
            }
        },
    }
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Score-based colors (traffic light pattern, high is good)
    pub score_high: Color,
    pub score_mid: Color,
    pub score_low: Color,
    pub bar_empty: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub header_style: Style,
    pub sort_header_style: Style,
    pub row_selected: Style,

    // Slider panel
    pub slider_fill: Color,
    pub slider_focus: Color,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,

    // Subset chips
    pub subset_on: Color,
    pub subset_off: Color,
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
            score_high: Color::Green,
            score_mid: Color::Yellow,
            score_low: Color::Red,
            bar_empty: Color::DarkGray,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            sort_header_style: Style::new().fg(Color::Cyan).bold().underlined(),
            row_selected: Style::new().reversed(),
            slider_fill: Color::Blue,
            slider_focus: Color::Cyan,
            muted: Color::Gray,
            title_color: Color::Cyan,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
            subset_on: Color::Green,
            subset_off: Color::DarkGray,
        }
    }

    pub fn light() -> Self {
        Self {
            score_high: Color::Green,
            score_mid: Color::Rgb(170, 120, 0),
            score_low: Color::Red,
            bar_empty: Color::Indexed(250),
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Indexed(244),
            header_style: Style::new().bold(),
            sort_header_style: Style::new().fg(Color::Blue).bold().underlined(),
            row_selected: Style::new().reversed(),
            slider_fill: Color::Blue,
            slider_focus: Color::Magenta,
            muted: Color::Indexed(242),
            title_color: Color::Blue,
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            popup_bg: Color::Indexed(255),
            subset_on: Color::Green,
            subset_off: Color::Indexed(248),
        }
    }

    /// Returns the appropriate color for a score based on its percentage of max score
    pub fn score_color(&self, score: f64, max_score: f64) -> Color {
        let percentage = if max_score > 0.0 {
            (score / max_score) * 100.0
        } else {
            0.0
        };

        if percentage >= 70.0 {
            self.score_high
        } else if percentage >= 40.0 {
            self.score_mid
        } else {
            self.score_low
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
    fn test_score_color_bands() {
        let colors = ThemeColors::dark();
        assert_eq!(colors.score_color(80.0, 100.0), colors.score_high);
        assert_eq!(colors.score_color(50.0, 100.0), colors.score_mid);
        assert_eq!(colors.score_color(10.0, 100.0), colors.score_low);
        assert_eq!(colors.score_color(10.0, 0.0), colors.score_low);
    }
}
