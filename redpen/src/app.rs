//! Central application state for redpen.
//!
//! `AppState` owns the editing [`Session`] plus everything the terminal UI needs
//! around it: mode, focus, the Insert-mode draft, list cursors, cached geometry,
//! and the status message. Rendering reads it; the keybinding dispatcher and the
//! event loop mutate it through the intent methods below. No ratatui drawing
//! happens here.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use redpen_core::validation::validate_text;
use redpen_core::{AnalysisOutcome, Category, Session, Span, SpanPatch};
use tokio::sync::mpsc::UnboundedSender;

use crate::analysis::types::{AnalysisJob, AnalysisReply};
use crate::input::TextInput;

/// Which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Free-text editing of the buffer draft.
    Insert,
    /// Editing the open suggestion: one candidate or the rationale, plus its
    /// category.
    EditSuggestion,
    HelpOverlay,
    /// Shown on quit when the text has changed since it was last written.
    ConfirmQuit,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    #[default]
    Text,
    Suggestions,
}

impl PanelFocus {
    pub fn toggle(self) -> Self {
        match self {
            PanelFocus::Text => PanelFocus::Suggestions,
            PanelFocus::Suggestions => PanelFocus::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// A dismissable one-line message in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

/// Which text field of a suggestion the editor is changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Candidate(usize),
    Rationale,
}

/// In-progress edit of the open suggestion.
#[derive(Debug, Clone)]
pub struct SuggestionEdit {
    /// The suggestion as it was when editing began.
    pub original: Span,
    pub target: EditTarget,
    /// Category to store on save; `Tab` cycles it.
    pub category: Category,
    pub input: TextInput,
}

impl SuggestionEdit {
    /// The partial update this edit stands for. The category is only patched
    /// when it was changed.
    pub fn to_patch(&self) -> SpanPatch {
        let text = self.input.text();
        let mut patch = match self.target {
            EditTarget::Candidate(index) => SpanPatch::candidate_text(&self.original, index, text),
            EditTarget::Rationale => SpanPatch { rationale: Some(text), ..SpanPatch::default() },
        };
        if self.category != self.original.category {
            patch.category = Some(self.category);
        }
        patch
    }
}

/// One wrapped row of the text panel: the char range it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRow {
    pub start: usize,
    pub end: usize,
}

pub struct AppState {
    pub mode: Mode,
    pub focus: PanelFocus,
    pub session: Session,

    /// Insert-mode draft. Keystrokes land here; the session only sees commits.
    pub draft: Option<TextInput>,
    /// True when the draft has changes not yet committed to the session.
    pub draft_pending: bool,
    /// Idle time after which a pending draft is committed.
    pub commit_idle: Duration,

    pub suggestion_edit: Option<SuggestionEdit>,
    /// Highlighted candidate of the open suggestion.
    pub candidate_cursor: usize,
    pub suggestion_list_state: ListState,

    pub text_scroll: u16,
    pub help_scroll: u16,
    pub text_viewport_height: u16,
    /// Width percentage of the text panel; the suggestion panel gets the rest.
    pub text_pct: u16,
    /// `[text, suggestions]` outer rects from the last render, for mouse hits.
    pub panel_rects: [Rect; 2],
    /// Inner rect of the text panel from the last render.
    pub text_inner: Rect,
    /// Wrapped rows of the text panel from the last render.
    pub text_rows: Vec<TextRow>,

    /// Analysis requests sent and not yet answered.
    pub analyses_in_flight: usize,
    /// `None` until the first availability check answers.
    pub ai_available: Option<bool>,
    pub message: Option<StatusMessage>,
    /// Advances on every logic tick; drives the spinner.
    pub tick_count: u64,

    /// Where `w` writes the text.
    pub file_path: PathBuf,
    /// Session revision at the last load or write.
    pub saved_revision: u64,

    pub analysis_tx: Option<UnboundedSender<AnalysisJob>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            Session::default(),
            PathBuf::from("redpen.txt"),
            Duration::from_millis(750),
        )
    }
}

impl AppState {
    pub fn new(session: Session, file_path: PathBuf, commit_idle: Duration) -> Self {
        let saved_revision = session.revision();
        Self {
            mode: Mode::default(),
            focus: PanelFocus::default(),
            session,
            draft: None,
            draft_pending: false,
            commit_idle,
            suggestion_edit: None,
            candidate_cursor: 0,
            suggestion_list_state: ListState::default(),
            text_scroll: 0,
            help_scroll: 0,
            text_viewport_height: 0,
            text_pct: 60,
            panel_rects: [Rect::default(); 2],
            text_inner: Rect::default(),
            text_rows: Vec::new(),
            analyses_in_flight: 0,
            ai_available: None,
            message: None,
            tick_count: 0,
            file_path,
            saved_revision,
            analysis_tx: None,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage { kind: MessageKind::Info, text: text.into() });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage { kind: MessageKind::Error, text: text.into() });
    }

    /// True when quitting would lose text that has not been written.
    pub fn has_unsaved_text(&self) -> bool {
        self.draft_pending || self.session.revision() != self.saved_revision
    }

    // -----------------------------------------------------------------------
    // Draft editing and commits
    // -----------------------------------------------------------------------

    /// Enters Insert mode with a draft of the current text.
    pub fn begin_insert(&mut self) {
        self.draft = Some(TextInput::new(self.session.text()));
        self.draft_pending = false;
        self.mode = Mode::Insert;
    }

    /// Applies `edit` to the draft and marks it pending.
    pub fn edit_draft(&mut self, edit: impl FnOnce(&mut TextInput)) {
        if let Some(draft) = self.draft.as_mut() {
            let before = draft.char_len();
            let cursor = draft.cursor();
            edit(draft);
            if draft.char_len() != before || draft.cursor() != cursor {
                self.draft_pending = true;
            }
        }
    }

    /// Pushes a pending draft into the session as one plain edit.
    pub fn commit_draft(&mut self) {
        if !self.draft_pending {
            return;
        }
        self.draft_pending = false;
        let Some(text) = self.draft.as_ref().map(TextInput::text) else {
            return;
        };
        let had_suggestions = !self.session.store().is_empty();
        if self.session.edit_text(text) {
            tracing::debug!(target: "app", revision = self.session.revision(), "draft committed");
            self.reset_suggestion_cursor();
            if had_suggestions {
                self.info("Text changed; suggestions cleared. Press a to analyze again.");
            }
        }
    }

    /// Commits the draft and returns to Normal mode.
    pub fn leave_insert(&mut self) {
        self.commit_draft();
        self.draft = None;
        self.mode = Mode::Normal;
    }

    /// Logic tick: commits the draft once input has been idle long enough.
    pub fn on_tick(&mut self, now: Instant) {
        self.tick_count = self.tick_count.wrapping_add(1);
        let idle = self
            .draft
            .as_ref()
            .is_some_and(|d| now.duration_since(d.last_edit) >= self.commit_idle);
        if self.draft_pending && idle {
            self.commit_draft();
        }
    }

    // -----------------------------------------------------------------------
    // Analysis
    // -----------------------------------------------------------------------

    /// Validates the text and queues an analysis request.
    ///
    /// Invalid text is reported locally and never reaches the worker.
    pub fn request_analysis(&mut self) {
        self.commit_draft();
        if let Err(e) = validate_text(self.session.text()) {
            self.error(e.to_string());
            return;
        }
        let Some(tx) = self.analysis_tx.as_ref() else {
            self.error("Analysis is not available in this session.");
            return;
        };
        let ticket = self.session.begin_analysis();
        let job = AnalysisJob { ticket, text: self.session.text().to_owned() };
        if tx.send(job).is_err() {
            self.error("The analysis worker has stopped.");
            return;
        }
        tracing::info!(target: "app", seq = ticket.seq, "analysis requested");
        self.analyses_in_flight += 1;
        self.message = None;
    }

    /// Installs or reports a finished analysis.
    ///
    /// Failures leave the buffer and the visible suggestions untouched. Replies
    /// that are no longer current are dropped without a message.
    pub fn apply_analysis_reply(&mut self, reply: AnalysisReply) {
        self.analyses_in_flight = self.analyses_in_flight.saturating_sub(1);
        let AnalysisReply { ticket, result } = reply;
        match result {
            Ok(spans) => match self.session.complete_analysis(ticket, spans) {
                AnalysisOutcome::Applied(summary) => {
                    self.reset_suggestion_cursor();
                    if summary.kept == 0 {
                        self.info("No suggestions. Looks good!");
                    } else {
                        self.info(format!("{} suggestion(s) found.", summary.kept));
                    }
                }
                AnalysisOutcome::BufferChanged => {
                    if self.analyses_in_flight == 0 {
                        self.info("Text changed during analysis; results discarded.");
                    }
                }
                AnalysisOutcome::Superseded => {}
            },
            Err(e) => {
                if self.session.is_current(ticket) {
                    self.error(e.user_message());
                } else {
                    tracing::debug!(
                        target: "app",
                        seq = ticket.seq,
                        "ignoring failure of a stale analysis"
                    );
                }
            }
        }
    }

    pub fn set_ai_available(&mut self, available: bool) {
        if self.ai_available != Some(available) {
            tracing::info!(target: "app", available, "AI availability changed");
        }
        self.ai_available = Some(available);
    }

    // -----------------------------------------------------------------------
    // Suggestion navigation and gestures
    // -----------------------------------------------------------------------

    fn reset_suggestion_cursor(&mut self) {
        self.candidate_cursor = 0;
        if self.session.store().is_empty() {
            self.suggestion_list_state.select(None);
        } else {
            self.suggestion_list_state.select(Some(0));
        }
    }

    /// Keeps the list cursor within the store after removals.
    fn clamp_suggestion_cursor(&mut self) {
        let len = self.session.store().len();
        match self.suggestion_list_state.selected() {
            _ if len == 0 => self.suggestion_list_state.select(None),
            Some(i) if i >= len => self.suggestion_list_state.select(Some(len - 1)),
            None => self.suggestion_list_state.select(Some(0)),
            Some(_) => {}
        }
    }

    pub fn next_suggestion(&mut self) {
        let len = self.session.store().len();
        if len == 0 {
            return;
        }
        let next = self
            .suggestion_list_state
            .selected()
            .map_or(0, |i| (i + 1).min(len - 1));
        self.suggestion_list_state.select(Some(next));
    }

    pub fn prev_suggestion(&mut self) {
        if self.session.store().is_empty() {
            return;
        }
        let prev = self
            .suggestion_list_state
            .selected()
            .map_or(0, |i| i.saturating_sub(1));
        self.suggestion_list_state.select(Some(prev));
    }

    /// Opens or closes the suggestion under the list cursor.
    pub fn toggle_selected(&mut self) {
        let Some(id) = self
            .suggestion_list_state
            .selected()
            .and_then(|i| self.session.store().nth(i))
            .map(|s| s.id.clone())
        else {
            return;
        };
        self.select_id(&id);
    }

    /// Opens or closes `id` and moves the list cursor onto it.
    pub fn select_id(&mut self, id: &str) {
        if self.session.select(id) {
            self.candidate_cursor = 0;
            if let Some(pos) = self.session.store().position(id) {
                self.suggestion_list_state.select(Some(pos));
            }
        }
    }

    pub fn next_candidate(&mut self) {
        if let Some(span) = self.session.active() {
            let last = span.candidates.len().saturating_sub(1);
            self.candidate_cursor = (self.candidate_cursor + 1).min(last);
        }
    }

    pub fn prev_candidate(&mut self) {
        self.candidate_cursor = self.candidate_cursor.saturating_sub(1);
    }

    /// Applies the highlighted candidate of the open suggestion.
    pub fn accept_active(&mut self) {
        match self.session.accept(self.candidate_cursor) {
            Ok(Some(accepted)) => {
                let dropped = accepted.invalidated.len();
                if dropped > 0 {
                    self.info(format!("Applied. {dropped} overlapping suggestion(s) removed."));
                } else {
                    self.info("Applied.");
                }
                self.candidate_cursor = 0;
                self.clamp_suggestion_cursor();
            }
            Ok(None) => self.info("Select a suggestion first (Enter)."),
            Err(e) => self.error(e.to_string()),
        }
    }

    pub fn reject_active(&mut self) {
        if self.session.reject().is_some() {
            self.candidate_cursor = 0;
            self.clamp_suggestion_cursor();
        } else {
            self.info("Select a suggestion first (Enter).");
        }
    }

    // -----------------------------------------------------------------------
    // Suggestion editor
    // -----------------------------------------------------------------------

    /// Starts editing the highlighted candidate of the open suggestion.
    pub fn begin_edit_candidate(&mut self) {
        let Some(span) = self.session.active() else {
            self.info("Select a suggestion first (Enter).");
            return;
        };
        let index = self.candidate_cursor.min(span.candidates.len().saturating_sub(1));
        let text = span.candidates.get(index).map(|c| c.text.clone()).unwrap_or_default();
        self.begin_edit(EditTarget::Candidate(index), &text);
    }

    /// Starts editing the rationale of the open suggestion.
    pub fn begin_edit_rationale(&mut self) {
        let Some(text) = self.session.active().map(|s| s.rationale.clone()) else {
            self.info("Select a suggestion first (Enter).");
            return;
        };
        self.begin_edit(EditTarget::Rationale, &text);
    }

    fn begin_edit(&mut self, target: EditTarget, text: &str) {
        let Some(original) = self.session.active().cloned() else {
            return;
        };
        self.suggestion_edit = Some(SuggestionEdit {
            category: original.category,
            original,
            target,
            input: TextInput::new(text),
        });
        self.mode = Mode::EditSuggestion;
    }

    /// Moves the pending category to the next one.
    pub fn cycle_edit_category(&mut self) {
        if let Some(edit) = self.suggestion_edit.as_mut() {
            edit.category = edit.category.next();
        }
    }

    /// Stores the edit through the session.
    ///
    /// A blank text, or a suggestion removed meanwhile, is reported and nothing
    /// is changed.
    pub fn finish_edit(&mut self) {
        self.mode = Mode::Normal;
        let Some(edit) = self.suggestion_edit.take() else {
            return;
        };
        let patch = edit.to_patch();
        match self.session.update_suggestion(&edit.original.id, &patch) {
            Ok(_) => self.info("Suggestion updated."),
            Err(e) => {
                tracing::debug!(target: "app", error = %e, "suggestion edit rejected");
                self.error(e.to_string());
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.suggestion_edit = None;
        self.mode = Mode::Normal;
    }

    /// Esc in Normal mode: dismiss the message first, then close the suggestion.
    pub fn dismiss(&mut self) {
        if self.message.take().is_none() {
            self.session.clear_selection();
        }
    }

    pub fn undo(&mut self) {
        if self.session.undo() {
            self.after_history_jump();
        } else {
            self.info("Nothing to undo.");
        }
    }

    pub fn redo(&mut self) {
        if self.session.redo() {
            self.after_history_jump();
        } else {
            self.info("Nothing to redo.");
        }
    }

    fn after_history_jump(&mut self) {
        self.candidate_cursor = 0;
        self.clamp_suggestion_cursor();
    }

    // -----------------------------------------------------------------------
    // Text panel
    // -----------------------------------------------------------------------

    pub fn scroll_text_down(&mut self, lines: u16) {
        let max = self.text_rows.len().saturating_sub(1).min(u16::MAX as usize) as u16;
        self.text_scroll = self.text_scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_text_up(&mut self, lines: u16) {
        self.text_scroll = self.text_scroll.saturating_sub(lines);
    }

    /// Char offset under screen cell `(col, row)` in the text panel, if any.
    pub fn char_at(&self, col: u16, row: u16) -> Option<usize> {
        let inner = self.text_inner;
        let inside = col >= inner.x
            && row >= inner.y
            && col < inner.x + inner.width
            && row < inner.y + inner.height;
        if !inside {
            return None;
        }
        let visual = (row - inner.y) as usize + self.text_scroll as usize;
        let text_row = self.text_rows.get(visual)?;
        let offset = text_row.start + (col - inner.x) as usize;
        (offset < text_row.end).then_some(offset)
    }

    /// Opens the topmost suggestion covering char `offset`. Later spans in
    /// store order are drawn on top, so they win.
    pub fn select_at_offset(&mut self, offset: usize) {
        let hit = self
            .session
            .store()
            .iter()
            .filter(|s| s.start <= offset && offset < s.end)
            .last()
            .map(|s| s.id.clone());
        if let Some(id) = hit {
            self.focus = PanelFocus::Suggestions;
            self.select_id(&id);
        }
    }

    /// Grows the text panel by 5%, up to 80%.
    pub fn grow_text_panel(&mut self) {
        self.text_pct = (self.text_pct + 5).min(80);
    }

    /// Shrinks the text panel by 5%, down to 30%.
    pub fn shrink_text_panel(&mut self) {
        self.text_pct = self.text_pct.saturating_sub(5).max(30);
    }

    // -----------------------------------------------------------------------
    // File
    // -----------------------------------------------------------------------

    /// Writes the committed text to `file_path`.
    pub fn write_file(&mut self) {
        self.commit_draft();
        match std::fs::write(&self.file_path, self.session.text()) {
            Ok(()) => {
                self.saved_revision = self.session.revision();
                self.info(format!("Wrote {}", self.file_path.display()));
                tracing::info!(target: "app", path = %self.file_path.display(), "text written");
            }
            Err(e) => {
                tracing::warn!(
                    target: "app",
                    path = %self.file_path.display(),
                    error = %e,
                    "write failed"
                );
                self.error(format!("Could not write {}: {e}", self.file_path.display()));
            }
        }
    }
}
