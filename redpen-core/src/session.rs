//! The top-level editing session.
//!
//! `Session` is the single writer of the buffer/store/selection triple. The UI
//! reads snapshots through the accessors and expresses intents through the
//! transition methods; each method leaves the three values mutually consistent.
//!
//! # Analysis sequencing
//!
//! Every analysis dispatch takes an [`AnalysisTicket`] carrying a monotonic
//! sequence number and the buffer revision it was issued against. A response is
//! installed only if its revision is still current and its sequence number is
//! newer than the last response applied. Anything else is dropped, so responses
//! may arrive in any order.

use crate::buffer::TextBuffer;
use crate::error::SuggestionError;
use crate::reconcile::{self, Reconciled};
use crate::selection::Selection;
use crate::store::{ReplaceSummary, SuggestionStore};
use crate::types::{Span, SpanPatch};

/// Oldest history entries are discarded past this depth.
pub const HISTORY_LIMIT: usize = 100;

/// Identity of one analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket {
    pub seq: u64,
    pub revision: u64,
}

/// What happened to an analysis response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Applied(ReplaceSummary),
    /// A response from a later request was already applied.
    Superseded,
    /// The buffer changed after the request was dispatched.
    BufferChanged,
}

/// Result of a successful accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub applied: Span,
    pub invalidated: Vec<String>,
    pub delta: isize,
}

#[derive(Debug, Clone)]
struct Snapshot {
    buffer: TextBuffer,
    store: SuggestionStore,
}

#[derive(Debug, Default)]
struct History {
    past: Vec<Snapshot>,
    future: Vec<Snapshot>,
}

impl History {
    fn record(&mut self, snapshot: Snapshot) {
        self.past.push(snapshot);
        if self.past.len() > HISTORY_LIMIT {
            self.past.remove(0);
        }
        self.future.clear();
    }
}

#[derive(Debug, Default)]
pub struct Session {
    buffer: TextBuffer,
    store: SuggestionStore,
    selection: Selection,
    revision: u64,
    next_seq: u64,
    last_applied_seq: u64,
    history: History,
}

impl Session {
    pub fn new(text: impl Into<String>) -> Self {
        Self { buffer: TextBuffer::new(text), ..Self::default() }
    }

    pub fn text(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn store(&self) -> &SuggestionStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The currently open suggestion.
    pub fn active(&self) -> Option<&Span> {
        self.selection.active().and_then(|id| self.store.get(id))
    }

    /// Bumped on every buffer mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        !self.history.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.history.future.is_empty()
    }

    /// Toggles `id` open or closed. Returns `true` if the selection changed.
    pub fn select(&mut self, id: &str) -> bool {
        self.selection.select(id, &self.store)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Accepts candidate `index` of the active suggestion and closes it.
    ///
    /// `Ok(None)` when nothing is selected.
    pub fn accept(&mut self, index: usize) -> Result<Option<Accepted>, SuggestionError> {
        let Some(id) = self.selection.active().map(str::to_owned) else {
            return Ok(None);
        };
        let accepted = self.accept_id(&id, index)?;
        self.selection.clear();
        Ok(accepted)
    }

    /// Accepts candidate `index` of suggestion `id`. Absent ids are a no-op.
    ///
    /// # Errors
    ///
    /// `CandidateOutOfRange` with the session unchanged.
    pub fn accept_id(
        &mut self,
        id: &str,
        index: usize,
    ) -> Result<Option<Accepted>, SuggestionError> {
        let Some(Reconciled { buffer, store, applied, invalidated, delta }) =
            reconcile::apply_candidate(&self.buffer, &self.store, id, index)?
        else {
            return Ok(None);
        };
        self.record_history();
        self.buffer = buffer;
        self.store = store;
        self.bump_revision();
        self.selection.revalidate(&self.store);
        tracing::info!(
            target: "session",
            id,
            delta,
            invalidated = invalidated.len(),
            "accepted suggestion"
        );
        Ok(Some(Accepted { applied, invalidated, delta }))
    }

    /// Rejects the active suggestion and closes it. Returns the removed span.
    pub fn reject(&mut self) -> Option<Span> {
        let id = self.selection.active()?.to_owned();
        let removed = self.reject_id(&id);
        self.selection.clear();
        removed
    }

    /// Removes suggestion `id`. Absent ids are a no-op.
    pub fn reject_id(&mut self, id: &str) -> Option<Span> {
        let removed = self.store.remove(id);
        self.selection.revalidate(&self.store);
        if removed.is_some() {
            tracing::info!(target: "session", id, "rejected suggestion");
        }
        removed
    }

    /// Edit flow: merges `patch` into suggestion `id`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `EmptyCandidates`, or `BlankText`; the store is unchanged
    /// in every case.
    pub fn update_suggestion(
        &mut self,
        id: &str,
        patch: &SpanPatch,
    ) -> Result<&Span, SuggestionError> {
        self.store.update(id, patch)
    }

    /// Commits a plain user edit.
    ///
    /// Offsets after a free-form edit are unknown, so every suggestion is
    /// dropped. Returns `false` when the text did not change.
    pub fn edit_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.buffer.as_str() {
            return false;
        }
        self.record_history();
        self.buffer = TextBuffer::new(text);
        reconcile::invalidate_all(&mut self.store);
        self.selection.clear();
        self.bump_revision();
        true
    }

    /// Issues a ticket for an analysis of the current text.
    pub fn begin_analysis(&mut self) -> AnalysisTicket {
        self.next_seq += 1;
        AnalysisTicket { seq: self.next_seq, revision: self.revision }
    }

    /// True if a response for `ticket` would still be installed.
    pub fn is_current(&self, ticket: AnalysisTicket) -> bool {
        ticket.revision == self.revision && ticket.seq > self.last_applied_seq
    }

    /// Installs an analysis response unless it is stale.
    ///
    /// Installing replaces the store wholesale and closes the selection.
    pub fn complete_analysis(
        &mut self,
        ticket: AnalysisTicket,
        spans: Vec<Span>,
    ) -> AnalysisOutcome {
        if ticket.seq <= self.last_applied_seq {
            tracing::debug!(
                target: "session",
                seq = ticket.seq,
                last = self.last_applied_seq,
                "discarding superseded analysis"
            );
            return AnalysisOutcome::Superseded;
        }
        if ticket.revision != self.revision {
            tracing::debug!(
                target: "session",
                seq = ticket.seq,
                issued = ticket.revision,
                current = self.revision,
                "discarding analysis for an older buffer"
            );
            return AnalysisOutcome::BufferChanged;
        }
        self.last_applied_seq = ticket.seq;
        let summary = self.store.replace_all(spans, self.buffer.char_len());
        self.selection.clear();
        tracing::info!(
            target: "session",
            seq = ticket.seq,
            kept = summary.kept,
            dropped = summary.dropped,
            "installed analysis"
        );
        AnalysisOutcome::Applied(summary)
    }

    /// Restores the previous buffer/store pair. Returns `false` if there is none.
    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.history.past.pop() else {
            return false;
        };
        let current = self.swap_snapshot(prev);
        self.history.future.push(current);
        true
    }

    /// Re-applies the most recently undone change.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.future.pop() else {
            return false;
        };
        let current = self.swap_snapshot(next);
        self.history.past.push(current);
        true
    }

    fn swap_snapshot(&mut self, snapshot: Snapshot) -> Snapshot {
        let current = Snapshot {
            buffer: std::mem::replace(&mut self.buffer, snapshot.buffer),
            store: std::mem::replace(&mut self.store, snapshot.store),
        };
        self.selection.clear();
        self.bump_revision();
        current
    }

    fn record_history(&mut self) {
        self.history.record(Snapshot { buffer: self.buffer.clone(), store: self.store.clone() });
    }

    fn bump_revision(&mut self) {
        self.revision += 1;
    }
}
