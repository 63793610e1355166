//! Which suggestion, if any, is open for feedback.

use crate::store::SuggestionStore;

/// At most one active suggestion.
///
/// Every transition takes the store it must agree with, so a `Selected` id
/// always names a span that existed when the transition ran. Mutations of the
/// store are followed by [`Selection::revalidate`], which closes the selection
/// if its span is gone.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Selected(String),
}

impl Selection {
    /// The active id, if any.
    pub fn active(&self) -> Option<&str> {
        match self {
            Selection::Idle => None,
            Selection::Selected(id) => Some(id),
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.active() == Some(id)
    }

    /// Opens `id`, or closes it when it is already open.
    ///
    /// Unknown ids leave the selection unchanged. Returns `true` when the
    /// selection changed.
    pub fn select(&mut self, id: &str, store: &SuggestionStore) -> bool {
        if self.is_selected(id) {
            *self = Selection::Idle;
            return true;
        }
        if !store.contains(id) {
            return false;
        }
        *self = Selection::Selected(id.to_owned());
        true
    }

    pub fn clear(&mut self) {
        *self = Selection::Idle;
    }

    /// Forces `Idle` if the active span is no longer in `store`.
    pub fn revalidate(&mut self, store: &SuggestionStore) {
        if let Selection::Selected(id) = self {
            if !store.contains(id) {
                tracing::debug!(
                    target: "selection",
                    id = %id,
                    "active suggestion removed; closing"
                );
                *self = Selection::Idle;
            }
        }
    }
}
