//! Keybinding dispatcher for redpen.
//!
//! Translates raw crossterm events into `AppState` intents and returns a
//! `KeyAction` telling the event loop whether to continue or quit. The
//! dispatcher branches first on `state.mode` so each mode has an isolated
//! handler.

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use crate::app::{AppState, Mode, PanelFocus};

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

/// Dispatches a key event to the handler matching the current mode.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmQuit => handle_confirm_quit(key, state),
        Mode::Normal => handle_normal(key, state),
        Mode::Insert => handle_insert(key, state),
        Mode::EditSuggestion => handle_edit_suggestion(key, state),
    }
}

/// Bracketed paste goes to whichever text input is open; Normal mode ignores it.
pub fn handle_paste(text: &str, state: &mut AppState) {
    match state.mode {
        Mode::Insert => state.edit_draft(|d| d.insert_str(text)),
        Mode::EditSuggestion => {
            if let Some(edit) = state.suggestion_edit.as_mut() {
                edit.input.insert_str(text);
            }
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        // Analysis and editing
        KeyCode::Char('a') => state.request_analysis(),
        KeyCode::Enter if ctrl => state.request_analysis(),
        KeyCode::Char('i') => state.begin_insert(),
        KeyCode::Char('w') => state.write_file(),

        // History
        KeyCode::Char('z') if ctrl => state.undo(),
        KeyCode::Char('r') | KeyCode::Char('y') if ctrl => state.redo(),
        KeyCode::Char('u') if ctrl => state.scroll_text_up(half_page(state)),
        KeyCode::Char('d') if ctrl => state.scroll_text_down(half_page(state)),
        KeyCode::Char('u') => state.undo(),

        // Suggestion list
        KeyCode::Char('j') | KeyCode::Down => state.next_suggestion(),
        KeyCode::Char('k') | KeyCode::Up => state.prev_suggestion(),
        KeyCode::Enter | KeyCode::Char(' ') => state.toggle_selected(),
        KeyCode::Char('l') | KeyCode::Right => state.next_candidate(),
        KeyCode::Char('h') | KeyCode::Left => state.prev_candidate(),
        KeyCode::Char('y') => state.accept_active(),
        KeyCode::Char('n') | KeyCode::Char('x') => state.reject_active(),
        KeyCode::Char('e') => state.begin_edit_candidate(),
        KeyCode::Char('r') => state.begin_edit_rationale(),

        // Layout
        KeyCode::Tab => state.focus = state.focus.toggle(),
        KeyCode::Char('<') => state.shrink_text_panel(),
        KeyCode::Char('>') => state.grow_text_panel(),

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
        }
        KeyCode::Esc => state.dismiss(),
        KeyCode::Char('q') => {
            if state.has_unsaved_text() {
                state.mode = Mode::ConfirmQuit;
            } else {
                return KeyAction::Quit;
            }
        }
        _ => {}
    }
    KeyAction::Continue
}

fn half_page(state: &AppState) -> u16 {
    (state.text_viewport_height / 2).max(1)
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Edits the draft. `Esc` commits it and returns to Normal mode.
fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => state.leave_insert(),
        KeyCode::Enter if ctrl => {
            state.leave_insert();
            state.request_analysis();
        }
        KeyCode::Enter => state.edit_draft(|d| d.insert_char('\n')),
        KeyCode::Backspace => state.edit_draft(|d| d.backspace()),
        KeyCode::Delete => state.edit_draft(|d| d.delete()),
        KeyCode::Left => state.edit_draft(|d| d.move_left()),
        KeyCode::Right => state.edit_draft(|d| d.move_right()),
        KeyCode::Home => state.edit_draft(|d| d.move_home()),
        KeyCode::End => state.edit_draft(|d| d.move_end()),
        KeyCode::Tab => state.edit_draft(|d| d.insert_char('\t')),
        KeyCode::Char(c) if !ctrl => state.edit_draft(|d| d.insert_char(c)),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// EditSuggestion mode
// ---------------------------------------------------------------------------

/// Single-line editor for a candidate or the rationale. `Tab` cycles the
/// category, `Enter` stores the edit, `Esc` discards it.
fn handle_edit_suggestion(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Enter => state.finish_edit(),
        KeyCode::Esc => state.cancel_edit(),
        KeyCode::Tab => state.cycle_edit_category(),
        code => {
            if let Some(edit) = state.suggestion_edit.as_mut() {
                let input = &mut edit.input;
                match code {
                    KeyCode::Backspace => input.backspace(),
                    KeyCode::Delete => input.delete(),
                    KeyCode::Left => input.move_left(),
                    KeyCode::Right => input.move_right(),
                    KeyCode::Home => input.move_home(),
                    KeyCode::End => input.move_end(),
                    KeyCode::Char(c) if !ctrl => input.insert_char(c),
                    _ => {}
                }
            }
        }
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('G') => state.help_scroll = u16::MAX,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// ConfirmQuit mode
// ---------------------------------------------------------------------------

/// `y` quits without writing, `w` writes then quits, `n`/`Esc` cancels.
fn handle_confirm_quit(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Quit,
        KeyCode::Char('w') => {
            state.write_file();
            if state.has_unsaved_text() {
                state.mode = Mode::Normal;
                KeyAction::Continue
            } else {
                KeyAction::Quit
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Left click focuses a panel and, on a highlight, selects it. The wheel
/// scrolls the text panel, the suggestion list, or the help overlay.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            handle_mouse_click(mouse.column, mouse.row, state);
        }
        MouseEventKind::ScrollUp => handle_mouse_scroll(state, false),
        MouseEventKind::ScrollDown => handle_mouse_scroll(state, true),
        _ => {}
    }
    KeyAction::Continue
}

fn handle_mouse_click(col: u16, row: u16, state: &mut AppState) {
    if state.mode != Mode::Normal {
        return;
    }
    let pos = Position { x: col, y: row };
    let [text, suggestions] = state.panel_rects;

    if text.contains(pos) {
        state.focus = PanelFocus::Text;
        if let Some(offset) = state.char_at(col, row) {
            state.select_at_offset(offset);
        }
    } else if suggestions.width > 0 && suggestions.contains(pos) {
        state.focus = PanelFocus::Suggestions;
    }
}

fn handle_mouse_scroll(state: &mut AppState, down: bool) {
    match (state.mode, state.focus, down) {
        (Mode::HelpOverlay, _, true) => {
            state.help_scroll = state.help_scroll.saturating_add(3);
        }
        (Mode::HelpOverlay, _, false) => {
            state.help_scroll = state.help_scroll.saturating_sub(3);
        }
        (_, PanelFocus::Suggestions, true) => state.next_suggestion(),
        (_, PanelFocus::Suggestions, false) => state.prev_suggestion(),
        (_, PanelFocus::Text, true) => state.scroll_text_down(3),
        (_, PanelFocus::Text, false) => state.scroll_text_up(3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use crossterm::event::KeyEventKind;
    use redpen_core::{Candidate, Category, Session, Span};
    use std::path::PathBuf;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn state(text: &str) -> AppState {
        AppState::new(
            Session::new(text),
            PathBuf::from("unused.txt"),
            Duration::from_millis(750),
        )
    }

    /// A state with one open suggestion over "Teh".
    fn state_with_open_suggestion() -> AppState {
        let mut s = state("Teh cat sat.");
        let candidates = vec![Candidate::new("The")];
        let span = Span::with_id("a", 0, 3, Category::Grammar, "typo", candidates);
        let ticket = s.session.begin_analysis();
        s.session.complete_analysis(ticket, vec![span]);
        s.select_id("a");
        s
    }

    #[test]
    fn quit_without_changes_is_immediate() {
        let mut s = state("Some text here.");
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut s), KeyAction::Quit);
    }

    #[test]
    fn insert_then_quit_asks_for_confirmation() {
        let mut s = state("Some text here.");
        handle_key(key(KeyCode::Char('i')), &mut s);
        handle_key(key(KeyCode::Char('!')), &mut s);
        handle_key(key(KeyCode::Esc), &mut s);
        assert_eq!(s.session.text(), "Some text here.!");

        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut s), KeyAction::Continue);
        assert_eq!(s.mode, Mode::ConfirmQuit);
        assert_eq!(handle_key(key(KeyCode::Esc), &mut s), KeyAction::Continue);
        assert_eq!(s.mode, Mode::Normal);
    }

    #[test]
    fn paste_only_lands_in_insert_mode() {
        let mut s = state("abc");
        handle_paste("xyz", &mut s);
        assert!(s.draft.is_none());

        handle_key(key(KeyCode::Char('i')), &mut s);
        handle_paste("xyz", &mut s);
        handle_key(key(KeyCode::Esc), &mut s);
        assert_eq!(s.session.text(), "abcxyz");
    }

    #[test]
    fn help_overlay_toggles() {
        let mut s = state("abc");
        handle_key(key(KeyCode::Char('?')), &mut s);
        assert_eq!(s.mode, Mode::HelpOverlay);
        handle_key(key(KeyCode::Char('?')), &mut s);
        assert_eq!(s.mode, Mode::Normal);
    }

    #[test]
    fn tab_in_the_editor_cycles_the_category() {
        let mut s = state_with_open_suggestion();
        handle_key(key(KeyCode::Char('r')), &mut s);
        assert_eq!(s.mode, Mode::EditSuggestion);

        handle_key(key(KeyCode::Tab), &mut s);
        handle_key(key(KeyCode::Char('!')), &mut s);
        handle_key(key(KeyCode::Enter), &mut s);

        let a = s.session.store().get("a").unwrap();
        assert_eq!(a.category, Category::Style);
        assert_eq!(a.rationale, "typo!");
        assert_eq!(s.focus, PanelFocus::Text, "Tab does not move focus while editing");
    }

    #[test]
    fn esc_discards_a_candidate_edit() {
        let mut s = state_with_open_suggestion();
        handle_key(key(KeyCode::Char('e')), &mut s);
        handle_key(key(KeyCode::Backspace), &mut s);
        handle_key(key(KeyCode::Esc), &mut s);

        assert_eq!(s.mode, Mode::Normal);
        assert_eq!(s.session.store().get("a").unwrap().candidates[0].text, "The");
    }
}
