//! Text panel renderer.
//!
//! The buffer is wrapped into rows of char ranges, and each char is assigned at
//! most one suggestion. Overlapping highlights resolve in favour of the span
//! that comes later in store order. Every char is assumed to occupy one cell.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span as StyledSpan},
    widgets::Paragraph,
};
use redpen_core::Span;

use super::layout::{inner_rect, panel_block};
use crate::app::{AppState, Mode, PanelFocus, TextRow};
use crate::theme::Theme;

/// Splits `chars` into display rows at most `width` cells wide.
///
/// Newlines end a row and are not part of any row's range. Wrapping is
/// hard, at exactly `width` chars. An empty text still has one empty row.
pub fn wrap_rows(chars: &[char], width: usize) -> Vec<TextRow> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut start = 0;
    for (i, c) in chars.iter().enumerate() {
        if *c == '\n' {
            rows.push(TextRow { start, end: i });
            start = i + 1;
        } else if i - start == width {
            rows.push(TextRow { start, end: i });
            start = i;
        }
    }
    rows.push(TextRow { start, end: chars.len() });
    rows
}

/// For each of `len` chars, the store index of the span drawn over it.
pub fn layer_highlights<'a>(
    len: usize,
    spans: impl Iterator<Item = &'a Span>,
) -> Vec<Option<usize>> {
    let mut owner = vec![None; len];
    for (idx, span) in spans.enumerate() {
        let end = span.end.min(len);
        for slot in owner.iter_mut().take(end).skip(span.start) {
            *slot = Some(idx);
        }
    }
    owner
}

/// Renders the text panel and caches its geometry in `state` for mouse hits.
pub fn render_text(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Text;
    let inner = inner_rect(area);
    let title = if state.file_path.as_os_str().is_empty() {
        " Text ".to_owned()
    } else {
        format!(" Text: {} ", state.file_path.display())
    };
    frame.render_widget(panel_block(&title, is_focused, theme), area);

    let editing = state.mode == Mode::Insert && state.draft.is_some();
    let chars: Vec<char> = match state.draft.as_ref() {
        Some(draft) if editing => draft.text().chars().collect(),
        _ => state.session.text().chars().collect(),
    };
    let rows = wrap_rows(&chars, inner.width as usize);

    // Highlights refer to the committed text, so a draft with changes shows none.
    let owners = if editing && state.draft_pending {
        vec![None; chars.len()]
    } else {
        layer_highlights(chars.len(), state.session.store().iter())
    };
    if editing {
        if let Some(cursor) = state.draft.as_ref().map(|d| d.cursor()) {
            keep_cursor_visible(state, &rows, cursor, inner.height);
        }
    }
    let max_scroll = rows.len().saturating_sub(1).min(u16::MAX as usize) as u16;
    state.text_scroll = state.text_scroll.min(max_scroll);

    let spans: Vec<&Span> = state.session.store().iter().collect();
    let active = state.session.selection().active().map(str::to_owned);

    let base = Style::default().fg(theme.text_fg);
    let lines: Vec<Line> = rows
        .iter()
        .skip(state.text_scroll as usize)
        .take(inner.height as usize)
        .map(|row| {
            let mut out: Vec<StyledSpan> = Vec::new();
            let mut run = String::new();
            let mut run_style = base;
            for i in row.start..row.end {
                let owner = owners.get(i).copied().flatten().and_then(|idx| spans.get(idx));
                let style = match owner {
                    Some(span) => {
                        let mut s = Style::default()
                            .fg(theme.highlight_fg)
                            .bg(theme.category_color(span.category));
                        if active.as_deref() == Some(span.id.as_str()) {
                            s = s
                                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                                .underline_color(theme.highlight_active);
                        }
                        s
                    }
                    None => base,
                };
                if style != run_style && !run.is_empty() {
                    out.push(StyledSpan::styled(std::mem::take(&mut run), run_style));
                }
                run_style = style;
                run.push(display_char(chars[i]));
            }
            if !run.is_empty() {
                out.push(StyledSpan::styled(run, run_style));
            }
            Line::from(out)
        })
        .collect();

    if chars.is_empty() && !editing {
        let hint = Line::styled(
            "Press i to start typing, a to analyze.",
            Style::default().fg(theme.muted),
        );
        frame.render_widget(Paragraph::new(hint), inner);
    } else {
        frame.render_widget(Paragraph::new(lines), inner);
    }

    if editing {
        if let Some(cursor) = state.draft.as_ref().map(|d| d.cursor()) {
            if let Some(pos) = cursor_position(&rows, cursor, state.text_scroll, inner) {
                frame.set_cursor_position(pos);
            }
        }
    }

    state.text_inner = inner;
    state.text_viewport_height = inner.height;
    state.text_rows = rows;
}

fn display_char(c: char) -> char {
    if c.is_control() { ' ' } else { c }
}

/// Visual row holding char offset `cursor`. A cursor at a row's end belongs to
/// that row unless the next row starts there.
fn cursor_row(rows: &[TextRow], cursor: usize) -> usize {
    rows.iter()
        .rposition(|r| r.start <= cursor && cursor <= r.end)
        .unwrap_or(rows.len().saturating_sub(1))
}

fn keep_cursor_visible(state: &mut AppState, rows: &[TextRow], cursor: usize, height: u16) {
    let row = cursor_row(rows, cursor);
    let scroll = state.text_scroll as usize;
    let height = height.max(1) as usize;
    if row < scroll {
        state.text_scroll = row as u16;
    } else if row >= scroll + height {
        state.text_scroll = (row + 1 - height) as u16;
    }
}

fn cursor_position(rows: &[TextRow], cursor: usize, scroll: u16, inner: Rect) -> Option<Position> {
    let row = cursor_row(rows, cursor);
    let visual = row.checked_sub(scroll as usize)?;
    if visual >= inner.height as usize {
        return None;
    }
    let col = cursor - rows[row].start;
    Some(Position {
        x: inner.x + (col as u16).min(inner.width.saturating_sub(1)),
        y: inner.y + visual as u16,
    })
}
