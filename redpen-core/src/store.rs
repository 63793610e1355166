//! Ordered collection of suggestions keyed by id.
//!
//! Insertion order is preserved so the suggestion list and highlight layering
//! render the same way frame after frame. Spans may overlap; the store never
//! assumes disjoint ranges.

use crate::error::SuggestionError;
use crate::types::{Span, SpanPatch};

/// Result of [`SuggestionStore::replace_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaceSummary {
    pub kept: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionStore {
    spans: Vec<Span>,
}

impl SuggestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards every current span and installs `spans`.
    ///
    /// Spans that do not fit a buffer of `buffer_len` chars are dropped, as are
    /// later spans reusing an id already installed. Neither case is an error: a
    /// response may describe text that changed while it was in flight.
    pub fn replace_all(&mut self, spans: Vec<Span>, buffer_len: usize) -> ReplaceSummary {
        let incoming = spans.len();
        let mut next: Vec<Span> = Vec::with_capacity(incoming);
        for span in spans {
            if !span.is_valid_for(buffer_len) {
                tracing::debug!(
                    target: "store",
                    id = %span.id,
                    start = span.start,
                    end = span.end,
                    buffer_len,
                    "dropping out-of-range span"
                );
                continue;
            }
            if next.iter().any(|s| s.id == span.id) {
                tracing::debug!(target: "store", id = %span.id, "dropping duplicate span id");
                continue;
            }
            next.push(span);
        }
        self.spans = next;
        let summary = ReplaceSummary {
            kept: self.spans.len(),
            dropped: incoming - self.spans.len(),
        };
        tracing::debug!(
            target: "store",
            kept = summary.kept,
            dropped = summary.dropped,
            "replaced all spans"
        );
        summary
    }

    /// Removes `id`, returning it. Absent ids are a no-op so that accept and
    /// reject can be invoked twice without error.
    pub fn remove(&mut self, id: &str) -> Option<Span> {
        let idx = self.position(id)?;
        Some(self.spans.remove(idx))
    }

    /// Merges `patch` into the span `id` and returns the updated span.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` is absent, `EmptyCandidates` if the patch would leave
    /// no candidates, `BlankText` if it sets a blank candidate text or
    /// rationale. The store is unchanged on error.
    pub fn update(&mut self, id: &str, patch: &SpanPatch) -> Result<&Span, SuggestionError> {
        let idx = self
            .position(id)
            .ok_or_else(|| SuggestionError::NotFound { id: id.to_owned() })?;
        if let Some(candidates) = &patch.candidates {
            if candidates.is_empty() {
                return Err(SuggestionError::EmptyCandidates { id: id.to_owned() });
            }
            if candidates.iter().any(|c| c.text.trim().is_empty()) {
                return Err(SuggestionError::BlankText { id: id.to_owned(), field: "candidate" });
            }
        }
        if matches!(&patch.rationale, Some(r) if r.trim().is_empty()) {
            return Err(SuggestionError::BlankText { id: id.to_owned(), field: "rationale" });
        }
        self.spans[idx] = patch.merged_into(&self.spans[idx]);
        Ok(&self.spans[idx])
    }

    pub fn get(&self, id: &str) -> Option<&Span> {
        self.spans.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Index of `id` in insertion order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.spans.iter().position(|s| s.id == id)
    }

    /// Span at insertion-order index `idx`.
    pub fn nth(&self, idx: usize) -> Option<&Span> {
        self.spans.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Span> {
        self.spans.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.spans.iter().map(|s| s.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn clear(&mut self) {
        self.spans.clear();
    }

    /// Builds a store from spans the caller has already reconciled.
    pub(crate) fn from_reconciled(spans: Vec<Span>) -> Self {
        Self { spans }
    }
}
