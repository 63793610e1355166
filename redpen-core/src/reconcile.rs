//! Keeps the buffer and the suggestion store consistent across mutations.
//!
//! Applying a suggestion rewrites one range of the buffer. Every other span is
//! then classified against the *original* range of the applied span:
//!
//! | position of `t` relative to `s` | outcome                      |
//! |---------------------------------|------------------------------|
//! | `t.end <= s.start`              | unchanged                    |
//! | `t.start >= s.end`              | both offsets shifted by delta|
//! | anything else                   | removed (invalidated)        |
//!
//! Both functions are pure: they read the current snapshot and return a new one.

use crate::buffer::TextBuffer;
use crate::error::SuggestionError;
use crate::store::SuggestionStore;
use crate::types::Span;

/// The snapshot produced by applying one suggestion.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub buffer: TextBuffer,
    pub store: SuggestionStore,
    /// The span that was consumed.
    pub applied: Span,
    /// Ids of siblings removed because they overlapped the applied range.
    pub invalidated: Vec<String>,
    /// `len(replacement) - len(applied range)`, in chars.
    pub delta: isize,
}

/// Applies candidate `index` of suggestion `id`.
///
/// Returns `Ok(None)` when `id` is not in the store: accepting an already
/// consumed suggestion is a no-op.
///
/// # Errors
///
/// `CandidateOutOfRange` if the suggestion has no candidate at `index`.
pub fn apply_candidate(
    buffer: &TextBuffer,
    store: &SuggestionStore,
    id: &str,
    index: usize,
) -> Result<Option<Reconciled>, SuggestionError> {
    let Some(span) = store.get(id) else {
        return Ok(None);
    };
    let candidate = span.candidates.get(index).ok_or_else(|| SuggestionError::CandidateOutOfRange {
        id: id.to_owned(),
        index,
        len: span.candidates.len(),
    })?;
    Ok(apply_replacement(buffer, store, id, &candidate.text))
}

/// Replaces the range of suggestion `id` with `replacement` and reconciles the
/// remaining spans. `None` if `id` is absent or does not address `buffer`.
pub fn apply_replacement(
    buffer: &TextBuffer,
    store: &SuggestionStore,
    id: &str,
    replacement: &str,
) -> Option<Reconciled> {
    let applied = store.get(id)?.clone();
    let Some(new_buffer) = buffer.splice(applied.start, applied.end, replacement) else {
        tracing::warn!(
            target: "reconcile",
            id,
            start = applied.start,
            end = applied.end,
            buffer_len = buffer.char_len(),
            "span does not address the buffer; refusing to apply"
        );
        return None;
    };

    let replacement_len = replacement.chars().count() as isize;
    let delta = replacement_len - applied.len() as isize;
    let new_len = new_buffer.char_len();

    let mut kept = Vec::with_capacity(store.len().saturating_sub(1));
    let mut invalidated = Vec::new();
    for t in store.iter() {
        if t.id == applied.id {
            continue;
        }
        let next = if t.end <= applied.start {
            Some(t.clone())
        } else if t.start >= applied.end {
            t.shifted(delta)
        } else {
            None
        };
        match next {
            Some(span) if span.is_valid_for(new_len) => kept.push(span),
            _ => invalidated.push(t.id.clone()),
        }
    }

    tracing::debug!(
        target: "reconcile",
        id,
        delta,
        kept = kept.len(),
        invalidated = invalidated.len(),
        "applied suggestion"
    );

    Some(Reconciled {
        buffer: new_buffer,
        store: SuggestionStore::from_reconciled(kept),
        applied,
        invalidated,
        delta,
    })
}

/// Plain edits have unknown effects on offsets, so every span is dropped.
pub fn invalidate_all(store: &mut SuggestionStore) -> usize {
    let dropped = store.len();
    store.clear();
    if dropped > 0 {
        tracing::debug!(target: "reconcile", dropped, "plain edit invalidated all spans");
    }
    dropped
}
