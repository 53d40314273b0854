//! Card styling configuration.

use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== CardStyles =====

/// Styles for the parts of a feed card.
///
/// Selection stays visible without colors through bold/reversed modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardStyles {
    /// Border of an unselected card.
    pub border: Style,
    /// Border of the selected card.
    pub selected_border: Style,
    /// Author name in the card title.
    pub author: Style,
    /// Card type line of image cards.
    pub image_meta: Style,
    /// Like counter.
    pub likes: Style,
    /// Placeholder fill.
    pub placeholder: Style,
    /// Bottom status line.
    pub status: Style,
}

impl CardStyles {
    /// Styles for the given color configuration.
    pub fn with_color_config(config: ColorConfig) -> Self {
        if config.colors_enabled() {
            Self {
                border: Style::default().fg(Color::DarkGray),
                selected_border: Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                author: Style::default().fg(Color::Cyan),
                image_meta: Style::default().fg(Color::Magenta),
                likes: Style::default().fg(Color::Red),
                placeholder: Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
                status: Style::default().fg(Color::Black).bg(Color::Gray),
            }
        } else {
            Self {
                border: Style::default(),
                selected_border: Style::default().add_modifier(Modifier::BOLD),
                author: Style::default(),
                image_meta: Style::default(),
                likes: Style::default(),
                placeholder: Style::default().add_modifier(Modifier::DIM),
                status: Style::default().add_modifier(Modifier::REVERSED),
            }
        }
    }
}

impl Default for CardStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

// ===== Tests =====
