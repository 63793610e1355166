//! Color theme system for redpen.
//!
//! A `Theme` holds named `ratatui::style::Color` fields for every surface redpen
//! renders. Two built-in themes are provided:
//!
//! - `dark`: ANSI 16 colors, works on any terminal.
//! - `catppuccin_mocha`: Catppuccin Mocha palette in RGB; needs truecolor.

use ratatui::style::Color;
use redpen_core::Category;

/// All color values used across redpen's UI surfaces.
///
/// Callers read fields directly, e.g. `Style::default().fg(theme.border_active)`.
/// Fields are named after the surface they color rather than the color itself
/// so a theme can remap any of them independently.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the focused panel.
    pub border_active: Color,
    /// Border color for unfocused panels.
    pub border_inactive: Color,

    // Text panel
    /// Unhighlighted text. `Color::Reset` keeps the terminal's own foreground.
    pub text_fg: Color,
    /// Foreground drawn over highlighted ranges (they use category backgrounds).
    pub highlight_fg: Color,
    /// Underline/border color marking the open suggestion.
    pub highlight_active: Color,
    /// Hints, excerpts, and explanations: anything secondary to the text.
    pub muted: Color,

    // Suggestion categories (highlight background and list badge)
    /// The four common categories get distinct colors so they can be told
    /// apart at a glance in the text panel.
    pub category_grammar: Color,
    pub category_style: Color,
    pub category_clarity: Color,
    pub category_conciseness: Color,
    /// Content, terminology, regulatory, consistency, and other.
    pub category_other: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_mode_normal: Color,
    pub status_mode_insert: Color,
    /// Mode indicator in EDIT mode; also colors the suggestion editor input.
    pub status_mode_edit: Color,
    pub ai_available: Color,
    pub ai_unavailable: Color,
    pub message_info: Color,
    /// Error messages; also the unsaved-text dialog border and an over-limit
    /// char counter.
    pub message_error: Color,
}

impl Theme {
    /// The built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            text_fg: Color::Reset,
            highlight_fg: Color::Black,
            highlight_active: Color::White,
            muted: Color::DarkGray,

            category_grammar: Color::Red,
            category_style: Color::Blue,
            category_clarity: Color::Yellow,
            category_conciseness: Color::Green,
            category_other: Color::Magenta,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
            status_mode_edit: Color::Yellow,
            ai_available: Color::Green,
            ai_unavailable: Color::Red,
            message_info: Color::Green,
            message_error: Color::Red,
        }
    }

    /// The Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let blue = Color::Rgb(137, 180, 250); // #89b4fa
        let mauve = Color::Rgb(203, 166, 247); // #cba6f7
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let base = Color::Rgb(30, 30, 46); // #1e1e2e
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            text_fg: text,
            highlight_fg: base,
            highlight_active: peach,
            muted: overlay1,

            category_grammar: red,
            category_style: blue,
            category_clarity: yellow,
            category_conciseness: green,
            category_other: mauve,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: blue,
            status_mode_insert: green,
            status_mode_edit: peach,
            ai_available: green,
            ai_unavailable: red,
            message_info: green,
            message_error: red,
        }
    }

    /// Looks up a built-in theme by name; unknown names get Catppuccin Mocha.
    ///
    /// # Arguments
    ///
    /// * `name`: the `theme` value from the config file, `dark` or
    ///   `catppuccin-mocha`
    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            "catppuccin-mocha" => Self::catppuccin_mocha(),
            other => {
                tracing::warn!(
                    target: "config",
                    theme = other,
                    "unknown theme; using catppuccin-mocha"
                );
                Self::catppuccin_mocha()
            }
        }
    }

    /// Highlight/badge color for a suggestion category.
    pub fn category_color(&self, category: Category) -> Color {
        match category {
            Category::Grammar => self.category_grammar,
            Category::Style => self.category_style,
            Category::Clarity => self.category_clarity,
            Category::Conciseness => self.category_conciseness,
            Category::Content
            | Category::Terminology
            | Category::Regulatory
            | Category::Consistency
            | Category::Other => self.category_other,
        }
    }
}
