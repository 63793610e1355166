//! Suggestion panel renderer.
//!
//! One list item per suggestion in store order. The open suggestion expands to
//! show its candidates with the candidate cursor. While the suggestion editor is
//! open its input replaces the field being edited and the badge shows the
//! pending category.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span as StyledSpan, Text},
    widgets::{List, ListItem, Paragraph, Wrap},
};
use redpen_core::Span;

use super::layout::{inner_rect, panel_block};
use crate::app::{AppState, EditTarget, Mode, PanelFocus};
use crate::theme::Theme;

/// Longest excerpt of the original text shown in an item header.
const EXCERPT_CHARS: usize = 32;

pub fn render_suggestions(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Suggestions;
    let count = state.session.store().len();
    let title = format!(" Suggestions ({count}) ");
    let inner = inner_rect(area);
    frame.render_widget(panel_block(&title, is_focused, theme), area);

    if count == 0 {
        let hint = if state.analyses_in_flight > 0 {
            "Analyzing..."
        } else {
            "No suggestions. Press a to analyze."
        };
        let line = Line::styled(hint, Style::default().fg(theme.muted));
        frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), inner);
        return;
    }

    let width = inner.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = state
        .session
        .store()
        .iter()
        .map(|span| {
            let open = state.session.selection().is_selected(&span.id);
            ListItem::new(item_text(span, open, state, theme, width))
        })
        .collect();

    let list = List::new(items)
        .highlight_symbol("> ")
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(list, inner, &mut state.suggestion_list_state);
}

fn item_text(
    span: &Span,
    open: bool,
    state: &AppState,
    theme: &Theme,
    width: usize,
) -> Text<'static> {
    // The editor for this span, if one is open.
    let edit = state
        .suggestion_edit
        .as_ref()
        .filter(|e| state.mode == Mode::EditSuggestion && e.original.id == span.id);
    let editor_style = Style::default()
        .fg(theme.status_mode_edit)
        .add_modifier(Modifier::UNDERLINED);

    let category = edit.map_or(span.category, |e| e.category);
    let badge_style = Style::default()
        .fg(theme.highlight_fg)
        .bg(theme.category_color(category))
        .add_modifier(Modifier::BOLD);
    let excerpt = excerpt(state.session.buffer().slice(span.start..span.end).unwrap_or_default());
    let mut header = vec![
        StyledSpan::styled(format!(" {} ", category.label()), badge_style),
        StyledSpan::raw(" "),
        StyledSpan::styled(format!("\"{excerpt}\""), Style::default().fg(theme.muted)),
    ];
    if edit.is_some() {
        header.push(StyledSpan::styled("  Tab: category", Style::default().fg(theme.muted)));
    }
    let mut lines = vec![Line::from(header)];

    match edit.filter(|e| e.target == EditTarget::Rationale) {
        Some(e) => lines.push(Line::styled(format!("  {}_", e.input.text()), editor_style)),
        None => {
            for chunk in wrap_words(&span.rationale, width) {
                lines.push(Line::from(format!("  {chunk}")));
            }
        }
    }

    if open {
        for (i, candidate) in span.candidates.iter().enumerate() {
            let current = i == state.candidate_cursor;
            let marker = if current { "  * " } else { "    " };
            let edit_text = edit
                .filter(|e| e.target == EditTarget::Candidate(i))
                .map(|e| e.input.text());
            let (text, style) = match edit_text {
                Some(t) => (format!("{t}_"), editor_style),
                None if current => (
                    candidate.text.clone(),
                    Style::default()
                        .fg(theme.highlight_active)
                        .add_modifier(Modifier::BOLD),
                ),
                None => (candidate.text.clone(), Style::default().fg(theme.text_fg)),
            };
            lines.push(Line::from(vec![StyledSpan::raw(marker), StyledSpan::styled(text, style)]));
            let explanation = candidate.explanation.as_deref().filter(|e| !e.is_empty());
            if let Some(explanation) = explanation {
                for chunk in wrap_words(explanation, width.saturating_sub(6)) {
                    let style = Style::default().fg(theme.muted);
                    lines.push(Line::styled(format!("      {chunk}"), style));
                }
            }
        }
    }
    lines.push(Line::default());
    Text::from(lines)
}

/// Single-line excerpt with newlines flattened, cut to [`EXCERPT_CHARS`].
fn excerpt(text: &str) -> String {
    let flat: String = text.chars().map(|c| if c.is_control() { ' ' } else { c }).collect();
    if flat.chars().count() > EXCERPT_CHARS {
        let cut: String = flat.chars().take(EXCERPT_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

/// Greedy word wrap. Words longer than `width` get a row of their own.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(8);
    let mut rows = Vec::new();
    let mut row = String::new();
    for word in text.split_whitespace() {
        let row_len = row.chars().count();
        if row_len > 0 && row_len + 1 + word.chars().count() > width {
            rows.push(std::mem::take(&mut row));
        }
        if !row.is_empty() {
            row.push(' ');
        }
        row.push_str(word);
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        let rows = wrap_words("one two three four", 9);
        assert_eq!(rows, vec!["one two", "three", "four"]);
    }

    #[test]
    fn blank_text_has_no_rows() {
        assert!(wrap_words("   ", 20).is_empty());
    }

    #[test]
    fn long_excerpts_are_cut() {
        let long = "x".repeat(100);
        assert_eq!(excerpt(&long).chars().count(), EXCERPT_CHARS);
        assert_eq!(excerpt("a\nb"), "a b");
    }
}
