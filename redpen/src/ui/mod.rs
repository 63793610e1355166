//! UI rendering module for redpen.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout arithmetic and the status bar live in
//! `layout.rs`; each panel has its own renderer.

mod layout;
pub mod help;
pub mod keybindings;
pub mod suggestion_list;
pub mod text_view;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, render_status_bar};

/// Renders one complete frame.
///
/// Panel rects and text geometry are cached in `state` so the next mouse event
/// can be hit-tested against what is on screen.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [text, suggestions, status_bar] = compute_layout(frame, state);
    state.panel_rects = [text, suggestions];

    text_view::render_text(frame, text, state, theme);
    suggestion_list::render_suggestions(frame, suggestions, state, theme);
    render_status_bar(frame, status_bar, state, theme);

    match state.mode {
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll),
        Mode::ConfirmQuit => help::render_confirm_quit(frame, theme),
        _ => {}
    }
}
