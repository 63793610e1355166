//! JSON contracts of the analysis service and their mapping into [`Span`]s.
//!
//! Responses are checked here, item by item, so the rest of the crate only ever
//! sees well-formed spans. A malformed item is dropped with a warning; it does
//! not fail the whole response.

use serde::{Deserialize, Serialize};

use crate::types::{Candidate, Category, Span};

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub text: &'a str,
}

/// Success body of `POST /api/analyze`. Items stay untyped until
/// [`AnalyzeResponse::into_spans`] validates them one at a time.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub suggestions: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireSuggestion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// `[start, end)` in chars. Absent means the whole text.
    #[serde(default)]
    pub span: Option<(i64, i64)>,
    pub rationale: String,
    #[serde(default)]
    pub improvements: Vec<WireImprovement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireImprovement {
    pub text: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Success body of `GET /api/ai/status`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusResponse {
    pub available: bool,
}

/// Optional body of a non-2xx answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    /// FastAPI puts its error text here.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The best human-readable message in the body, if any.
    pub fn text(&self) -> Option<String> {
        if let Some(m) = self.message.as_deref().filter(|m| !m.trim().is_empty()) {
            return Some(m.to_owned());
        }
        match &self.detail {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

impl AnalyzeResponse {
    /// Maps every well-formed item into a span. `text_len` is the char length
    /// of the text that was analysed, used for items without a `span`.
    pub fn into_spans(self, text_len: usize) -> Vec<Span> {
        self.suggestions
            .into_iter()
            .enumerate()
            .filter_map(|(idx, raw)| match serde_json::from_value::<WireSuggestion>(raw) {
                Ok(wire) => wire.into_span(text_len).or_else(|| {
                    tracing::warn!(
                        target: "client",
                        idx,
                        "dropping suggestion with invalid span or no candidates"
                    );
                    None
                }),
                Err(e) => {
                    tracing::warn!(
                        target: "client",
                        idx,
                        error = %e,
                        "dropping malformed suggestion"
                    );
                    None
                }
            })
            .collect()
    }
}

impl WireSuggestion {
    /// `None` when the offsets are negative or reversed, or when no improvement
    /// carries text.
    pub fn into_span(self, text_len: usize) -> Option<Span> {
        let (start, end) = match self.span {
            Some((s, e)) => (usize::try_from(s).ok()?, usize::try_from(e).ok()?),
            None => (0, text_len),
        };
        if start > end {
            return None;
        }
        let candidates: Vec<Candidate> = self
            .improvements
            .into_iter()
            .filter(|i| !i.text.is_empty())
            .map(|i| Candidate {
                text: i.text,
                explanation: i.explanation.filter(|e| !e.is_empty()),
            })
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let category = self.kind.as_deref().map(Category::parse).unwrap_or_default();
        let span = match self.id.filter(|id| !id.is_empty()) {
            Some(id) => Span::with_id(id, start, end, category, self.rationale, candidates),
            None => Span::new(start, end, category, self.rationale, candidates),
        };
        Some(span)
    }
}
