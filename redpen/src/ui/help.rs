//! Modal overlays for redpen: help and quit confirmation.
//!
//! Both draw over the panel layout inside the same `terminal.draw()` closure,
//! erasing their area with `Clear` first.

use ratatui::{
    Frame,
    layout::Constraint,
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay as a centred modal, scrolled by `help_scroll` rows.
///
/// Skipped on terminals narrower than 40 columns.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 40 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));
    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help  (j/k scroll, ? or Esc to dismiss) ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Text"),
        Line::from("  i             Edit the text (Esc to finish)"),
        Line::from("  a / Ctrl-Enter  Analyze the text"),
        Line::from("  w             Write the text to its file"),
        Line::from("  u / Ctrl-z    Undo"),
        Line::from("  Ctrl-r / Ctrl-y  Redo"),
        Line::from("  Ctrl-d / Ctrl-u  Scroll text half page down / up"),
        Line::from(""),
        Line::from("Suggestions"),
        Line::from("  j / k         Next / previous suggestion"),
        Line::from("  Enter / Space Open or close the suggestion"),
        Line::from("  h / l         Previous / next candidate"),
        Line::from("  y             Apply the highlighted candidate"),
        Line::from("  n / x         Reject the suggestion"),
        Line::from("  e             Edit the highlighted candidate"),
        Line::from("  r             Edit the rationale"),
        Line::from("  click         Open the suggestion under the mouse"),
        Line::from(""),
        Line::from("Editing a suggestion"),
        Line::from("  Tab           Cycle the category"),
        Line::from("  Enter         Save the edit"),
        Line::from("  Esc           Discard the edit"),
        Line::from(""),
        Line::from("General"),
        Line::from("  Tab           Switch panel focus"),
        Line::from("  < / >         Shrink / grow the text panel"),
        Line::from("  Esc           Dismiss message, then close suggestion"),
        Line::from("  ?             Open / close this help"),
        Line::from("  q             Quit (asks first if the text is unsaved)"),
    ])
}

/// Renders the quit confirmation dialog.
pub fn render_confirm_quit(frame: &mut Frame, theme: &Theme) {
    let area = frame.area().centered(Constraint::Length(46), Constraint::Length(5));
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(" Unsaved text ")
        .border_style(Style::default().fg(theme.message_error));
    let body = Text::from(vec![
        Line::from("The text has changes that were not written."),
        Line::from("y quit   w write and quit   n cancel"),
    ]);
    frame.render_widget(Paragraph::new(body).block(block).wrap(Wrap { trim: true }), area);
}
