/// The kind of improvement a suggestion proposes.
///
/// Purely descriptive: the category drives badge colours and labels in the UI but
/// never influences reconciliation. The analysis service reports it as a free
/// `type` string; [`Category::parse`] folds unknown or missing values into
/// [`Category::Other`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Grammar,
    Style,
    Clarity,
    Conciseness,
    Content,
    Terminology,
    Regulatory,
    Consistency,
    #[default]
    Other,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 9] = [
        Category::Grammar,
        Category::Style,
        Category::Clarity,
        Category::Conciseness,
        Category::Content,
        Category::Terminology,
        Category::Regulatory,
        Category::Consistency,
        Category::Other,
    ];

    /// The category after `self` in [`Category::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let idx = Category::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Category::ALL[(idx + 1) % Category::ALL.len()]
    }

    /// Parses the wire `type` string case-insensitively.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GRAMMAR" => Category::Grammar,
            "STYLE" => Category::Style,
            "CLARITY" => Category::Clarity,
            "CONCISENESS" => Category::Conciseness,
            "CONTENT" => Category::Content,
            "TERMINOLOGY" => Category::Terminology,
            "REGULATORY" => Category::Regulatory,
            "CONSISTENCY" => Category::Consistency,
            _ => Category::Other,
        }
    }

    /// Human-readable label used for badges and the edit panel.
    pub fn label(self) -> &'static str {
        match self {
            Category::Grammar => "Grammar",
            Category::Style => "Style",
            Category::Clarity => "Clarity",
            Category::Conciseness => "Conciseness",
            Category::Content => "Content",
            Category::Terminology => "Terminology",
            Category::Regulatory => "Regulatory",
            Category::Consistency => "Consistency",
            Category::Other => "Other",
        }
    }
}

/// One replacement option offered by a suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    /// Short note from the analysis service on why this option helps.
    pub explanation: Option<String>,
}

impl Candidate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), explanation: None }
    }
}

/// A suggestion: an annotated half-open char range `[start, end)` over the buffer.
///
/// Spans are never mutated in place. The reconciler produces shifted copies and the
/// store swaps in patched copies, so a `Span` held by the UI is always a consistent
/// snapshot of one moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub id: String,
    pub start: usize,
    pub end: usize,
    pub category: Category,
    pub rationale: String,
    /// Non-empty, ordered replacement options.
    pub candidates: Vec<Candidate>,
}

impl Span {
    /// Builds a span with a fresh UUID v4 id.
    pub fn new(
        start: usize,
        end: usize,
        category: Category,
        rationale: impl Into<String>,
        candidates: Vec<Candidate>,
    ) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), start, end, category, rationale, candidates)
    }

    pub fn with_id(
        id: impl Into<String>,
        start: usize,
        end: usize,
        category: Category,
        rationale: impl Into<String>,
        candidates: Vec<Candidate>,
    ) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            category,
            rationale: rationale.into(),
            candidates,
        }
    }

    /// True iff `start <= end <= buffer_len`. Offsets are unsigned, so the
    /// lower bound holds by construction.
    pub fn is_valid_for(&self, buffer_len: usize) -> bool {
        self.start <= self.end && self.end <= buffer_len
    }

    /// Number of chars the span covers.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when the two ranges share at least one position that an edit of
    /// `other` would rewrite. Touching ranges (`self.end == other.start`) do not
    /// overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }

    /// Returns a copy moved by `delta` chars, or `None` if either offset would
    /// become negative.
    pub fn shifted(&self, delta: isize) -> Option<Span> {
        let start = self.start.checked_add_signed(delta)?;
        let end = self.end.checked_add_signed(delta)?;
        Some(Span { start, end, ..self.clone() })
    }
}

/// A partial update merged into an existing span by the edit flow.
///
/// `None` fields are left untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpanPatch {
    pub category: Option<Category>,
    pub rationale: Option<String>,
    pub candidates: Option<Vec<Candidate>>,
}

impl SpanPatch {
    /// A patch that replaces the text of candidate `index`, keeping the others.
    pub fn candidate_text(span: &Span, index: usize, text: impl Into<String>) -> Self {
        let mut candidates = span.candidates.clone();
        if let Some(c) = candidates.get_mut(index) {
            c.text = text.into();
        }
        Self { candidates: Some(candidates), ..Self::default() }
    }

    pub(crate) fn merged_into(&self, span: &Span) -> Span {
        Span {
            id: span.id.clone(),
            start: span.start,
            end: span.end,
            category: self.category.unwrap_or(span.category),
            rationale: self.rationale.clone().unwrap_or_else(|| span.rationale.clone()),
            candidates: self.candidates.clone().unwrap_or_else(|| span.candidates.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_category_cycles_through_all() {
        let mut seen = vec![Category::Grammar];
        let mut c = Category::Grammar.next();
        while c != Category::Grammar {
            seen.push(c);
            c = c.next();
        }
        assert_eq!(seen, Category::ALL);
    }
}
