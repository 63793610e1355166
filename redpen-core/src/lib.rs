//! redpen-core: the suggestion model behind the redpen editor.
//!
//! A [`Session`] owns one text buffer, the suggestions currently annotating it,
//! and the selection. Suggestions arrive from the remote analysis service through
//! [`AnalysisClient`], are applied or rejected by the user, and are kept at
//! correct offsets by the [`reconcile`] module. All offsets are char offsets.

pub mod buffer;
pub mod client;
pub mod error;
pub mod protocol;
pub mod reconcile;
pub mod selection;
pub mod session;
pub mod store;
pub mod types;
pub mod validation;

pub use buffer::TextBuffer;
pub use client::{AnalysisClient, HyperTransport, Transport};
pub use error::{ClientError, SuggestionError, ValidationError};
pub use selection::Selection;
pub use session::{Accepted, AnalysisOutcome, AnalysisTicket, Session};
pub use store::{ReplaceSummary, SuggestionStore};
pub use types::{Candidate, Category, Span, SpanPatch};
