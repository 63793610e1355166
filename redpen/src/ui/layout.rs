//! Two-panel layout and status bar for redpen.
//!
//! Pure layout arithmetic plus the status bar. Called inside `terminal.draw()`
//! on every render so each frame reflects the current terminal size.
//!
//! # Panel geometry
//!
//! At `>= 80` columns the text and suggestion panels sit side by side, split by
//! `AppState.text_pct`. Narrower terminals stack them, text on top.
//!
//! `Spacing::Overlap(1)` combined with
//! `Block::merge_borders(MergeStrategy::Fuzzy)` makes adjacent panel borders
//! share a single column.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};
use redpen_core::validation::MAX_TEXT_CHARS;

use crate::app::{AppState, MessageKind, Mode};
use crate::theme::Theme;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Returns `[text, suggestions, status_bar]` for the current frame.
///
/// The status bar always takes the bottom row. The 80-column breakpoint is
/// where two side-by-side panels still leave room for a readable line of text.
///
/// # Arguments
///
/// * `frame`: current render frame; only its area is read
/// * `state`: supplies `text_pct`, the width share of the text panel
pub fn compute_layout(frame: &Frame, state: &AppState) -> [Rect; 3] {
    let rows = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]);
    let [main_area, status_bar] = frame.area().layout(&rows);

    let split = if frame.area().width >= 80 {
        Layout::horizontal([
            Constraint::Percentage(state.text_pct),
            Constraint::Percentage(100 - state.text_pct),
        ])
    } else {
        Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
    };
    let [text, suggestions] = main_area.layout(&split.spacing(Spacing::Overlap(1)));

    [text, suggestions, status_bar]
}

/// The inner `Rect` of a panel after removing its 1-cell border.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Bordered `Block` for a panel: `Thick` when focused, `Plain` otherwise.
///
/// `MergeStrategy::Fuzzy` because `Exact` produces wrong junctions when
/// `Thick` and `Plain` borders meet.
///
/// # Arguments
///
/// * `title`: text drawn into the top border
/// * `is_focused`: selects `border_active` and the thick border
/// * `theme`: active color theme
pub fn panel_block<'a>(title: &'a str, is_focused: bool, theme: &'a Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row status bar.
///
/// Left to right: mode, AI availability, analysing spinner, char counter, and
/// the current message (or a key hint when there is none).
///
/// # Arguments
///
/// * `frame`: current render frame provided by `terminal.draw()`
/// * `area`: the 1-row rect from [`compute_layout`]
/// * `state`: read only; the status bar never mutates application state
/// * `theme`: active color theme
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::EditSuggestion => (" EDIT ", theme.status_mode_edit),
        Mode::Normal | Mode::ConfirmQuit | Mode::HelpOverlay => {
            (" NORMAL ", theme.status_mode_normal)
        }
    };

    let (ai_text, ai_fg) = match state.ai_available {
        Some(true) => (" AI ● ", theme.ai_available),
        Some(false) => (" AI ○ ", theme.ai_unavailable),
        None => (" AI ? ", theme.muted),
    };

    let chars = match state.draft.as_ref() {
        Some(draft) if state.mode == Mode::Insert => draft.char_len(),
        _ => state.session.buffer().char_len(),
    };
    let counter_fg = if chars > MAX_TEXT_CHARS { theme.message_error } else { theme.status_bar_fg };

    let mut spans = vec![
        Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD)),
        Span::styled(ai_text, Style::default().fg(ai_fg)),
    ];
    if state.analyses_in_flight > 0 {
        let frame_idx = (state.tick_count % SPINNER.len() as u64) as usize;
        spans.push(Span::raw(format!(" {} analyzing ", SPINNER[frame_idx])));
    }
    let counter = format!(" {chars}/{MAX_TEXT_CHARS} ");
    spans.push(Span::styled(counter, Style::default().fg(counter_fg)));

    match state.message.as_ref() {
        Some(msg) => {
            let fg = match msg.kind {
                MessageKind::Info => theme.message_info,
                MessageKind::Error => theme.message_error,
            };
            spans.push(Span::styled(format!(" {} ", msg.text), Style::default().fg(fg)));
        }
        None => spans.push(Span::styled(" ? help ", Style::default().fg(theme.muted))),
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
