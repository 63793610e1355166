//! Integration tests for the editing session.
//!
//! Exercises: selection transitions, accept/reject idempotence, the edit flow,
//! plain edits, analysis sequencing, and undo/redo.

use redpen_core::session::HISTORY_LIMIT;
use redpen_core::{
    AnalysisOutcome, Candidate, Category, ReplaceSummary, Selection, Session, Span, SpanPatch,
    SuggestionError,
};

fn span(id: &str, start: usize, end: usize, candidates: &[&str]) -> Span {
    Span::with_id(
        id,
        start,
        end,
        Category::Style,
        "because",
        candidates.iter().map(|c| Candidate::new(*c)).collect(),
    )
}

/// A session over `text` with `spans` installed through a normal analysis round.
fn session_with(text: &str, spans: Vec<Span>) -> Session {
    let mut session = Session::new(text);
    let ticket = session.begin_analysis();
    let outcome = session.complete_analysis(ticket, spans);
    assert!(matches!(outcome, AnalysisOutcome::Applied(_)));
    session
}

fn assert_selection_consistent(session: &Session) {
    if let Some(id) = session.selection().active() {
        assert!(session.store().contains(id), "selection references removed id {id}");
    }
}

#[test]
fn select_toggles_and_switches() {
    let spans = vec![span("a", 0, 3, &["The"]), span("b", 8, 11, &["sits"])];
    let mut s = session_with("Teh cat sat on the mat.", spans);

    assert!(s.select("a"));
    assert_eq!(s.selection(), &Selection::Selected("a".into()));
    assert!(s.select("b"));
    assert_eq!(s.selection().active(), Some("b"));
    assert!(s.select("b"), "re-selecting the open suggestion closes it");
    assert_eq!(s.selection(), &Selection::Idle);
    assert!(!s.select("missing"), "unknown ids cannot be selected");
    assert_eq!(s.selection(), &Selection::Idle);
}

#[test]
fn accept_active_suggestion_closes_selection() {
    let mut s = session_with("Teh cat sat.", vec![span("typo", 0, 3, &["The"])]);
    s.select("typo");

    let accepted = s.accept(0).unwrap().expect("a suggestion was open");

    assert_eq!(accepted.applied.id, "typo");
    assert_eq!(s.text(), "The cat sat.");
    assert!(!s.store().contains("typo"));
    assert_eq!(s.selection(), &Selection::Idle);
}

#[test]
fn accept_and_reject_are_idempotent() {
    let spans = vec![span("a", 0, 3, &["The"]), span("b", 8, 11, &["sits"])];
    let mut once = session_with("Teh cat sat on the mat.", spans.clone());
    let mut twice = session_with("Teh cat sat on the mat.", spans);

    once.accept_id("a", 0).unwrap();
    twice.accept_id("a", 0).unwrap();
    assert!(twice.accept_id("a", 0).unwrap().is_none(), "second accept is a no-op");
    assert_eq!(once.text(), twice.text());
    assert_eq!(once.store(), twice.store());

    once.reject_id("b");
    twice.reject_id("b");
    assert!(twice.reject_id("b").is_none(), "second reject is a no-op");
    assert_eq!(once.store(), twice.store());
}

#[test]
fn reject_removes_only_that_suggestion() {
    let spans = vec![span("a", 0, 3, &["The"]), span("b", 1, 5, &["x"])];
    let mut s = session_with("Teh cat sat.", spans);
    s.select("b");

    let removed = s.reject().expect("b was open");

    assert_eq!(removed.id, "b");
    assert_eq!(s.text(), "Teh cat sat.", "reject never touches the buffer");
    assert!(s.store().contains("a"));
    assert_eq!(s.selection(), &Selection::Idle);
}

#[test]
fn accepting_another_span_closes_a_selection_it_invalidates() {
    let spans = vec![
        span("a", 0, 3, &["The"]),
        span("b", 1, 5, &["x"]),
        span("c", 8, 11, &["sits"]),
    ];
    let mut s = session_with("Teh cat sat.", spans);
    s.select("b");

    s.accept_id("a", 0).unwrap();
    assert_eq!(s.selection(), &Selection::Idle, "b was invalidated, selection must not dangle");

    s.select("c");
    let c = s.store().get("c").unwrap().clone();
    assert_eq!((c.start, c.end), (8, 11));
    assert_selection_consistent(&s);
}

#[test]
fn accepting_a_disjoint_span_keeps_the_selection() {
    let spans = vec![span("a", 0, 3, &["The"]), span("c", 8, 11, &["sits"])];
    let mut s = session_with("Teh cat sat.", spans);
    s.select("c");
    s.accept_id("a", 0).unwrap();
    assert_eq!(s.selection().active(), Some("c"));
}

#[test]
fn bad_candidate_index_leaves_state_untouched() {
    let mut s = session_with("Teh cat sat.", vec![span("a", 0, 3, &["The"])]);
    s.select("a");
    let rev = s.revision();

    let err = s.accept(5).unwrap_err();

    assert!(matches!(err, SuggestionError::CandidateOutOfRange { index: 5, len: 1, .. }));
    assert_eq!(s.text(), "Teh cat sat.");
    assert_eq!(s.selection().active(), Some("a"));
    assert_eq!(s.revision(), rev);
}

#[test]
fn update_merges_patch_or_reports_not_found() {
    let mut s = session_with("Teh cat sat.", vec![span("a", 0, 3, &["The", "Thy"])]);

    let patch = SpanPatch { rationale: Some("spelling".into()), ..SpanPatch::default() };
    let updated = s.update_suggestion("a", &patch).unwrap();
    assert_eq!(updated.rationale, "spelling");
    assert_eq!(updated.candidates.len(), 2, "unpatched fields are kept");

    let a = s.store().get("a").unwrap().clone();
    let patch = SpanPatch::candidate_text(&a, 1, "This");
    s.update_suggestion("a", &patch).unwrap();
    s.select("a");
    s.accept(1).unwrap();
    assert_eq!(s.text(), "This cat sat.");

    let err = s.update_suggestion("a", &SpanPatch::default()).unwrap_err();
    assert_eq!(err, SuggestionError::NotFound { id: "a".into() });
}

#[test]
fn update_rejects_emptying_candidates() {
    let mut s = session_with("Teh cat sat.", vec![span("a", 0, 3, &["The"])]);
    let before = s.store().clone();

    let patch = SpanPatch {
        candidates: Some(Vec::new()),
        rationale: Some("x".into()),
        ..SpanPatch::default()
    };
    let err = s.update_suggestion("a", &patch).unwrap_err();

    assert_eq!(err, SuggestionError::EmptyCandidates { id: "a".into() });
    assert_eq!(s.store(), &before, "no partial update applied");
}

#[test]
fn update_rejects_blank_candidate_and_rationale() {
    let mut s = session_with("Teh cat sat.", vec![span("a", 0, 3, &["The", "Thy"])]);
    let before = s.store().clone();
    let a = before.get("a").unwrap().clone();

    let err = s.update_suggestion("a", &SpanPatch::candidate_text(&a, 1, "  ")).unwrap_err();
    assert_eq!(err, SuggestionError::BlankText { id: "a".into(), field: "candidate" });

    let patch = SpanPatch { rationale: Some(String::new()), ..SpanPatch::default() };
    let err = s.update_suggestion("a", &patch).unwrap_err();
    assert_eq!(err, SuggestionError::BlankText { id: "a".into(), field: "rationale" });

    assert_eq!(s.store(), &before);
}

#[test]
fn update_can_recategorise() {
    let mut s = session_with("Teh cat sat.", vec![span("a", 0, 3, &["The"])]);
    let patch = SpanPatch { category: Some(Category::Grammar), ..SpanPatch::default() };

    let updated = s.update_suggestion("a", &patch).unwrap();

    assert_eq!(updated.category, Category::Grammar);
    assert_eq!(updated.rationale, "because");
}

#[test]
fn duplicate_ids_keep_the_first_span() {
    let mut s = Session::new("Teh cat sat.");
    let ticket = s.begin_analysis();

    let spans = vec![span("a", 0, 3, &["The"]), span("a", 4, 7, &["dog"])];
    let outcome = s.complete_analysis(ticket, spans);

    assert_eq!(outcome, AnalysisOutcome::Applied(ReplaceSummary { kept: 1, dropped: 1 }));
    assert_eq!(s.store().len(), 1);
    let a = s.store().get("a").unwrap();
    assert_eq!((a.start, a.end), (0, 3));
}

#[test]
fn plain_edit_drops_every_suggestion() {
    let mut s = session_with("Teh cat sat.", vec![span("a", 0, 3, &["The"])]);
    s.select("a");

    assert!(s.edit_text("Teh cat sat down."));

    assert!(s.store().is_empty());
    assert_eq!(s.selection(), &Selection::Idle);
    assert!(!s.edit_text("Teh cat sat down."), "unchanged text is not an edit");
}

#[test]
fn analysis_for_an_older_buffer_is_discarded() {
    let mut s = Session::new("Teh cat sat.");
    let ticket = s.begin_analysis();
    s.edit_text("Teh cat sat down.");

    let outcome = s.complete_analysis(ticket, vec![span("a", 0, 3, &["The"])]);

    assert_eq!(outcome, AnalysisOutcome::BufferChanged);
    assert!(s.store().is_empty());
}

#[test]
fn older_response_arriving_late_is_superseded() {
    let mut s = Session::new("Teh cat sat.");
    let first = s.begin_analysis();
    let second = s.begin_analysis();

    let outcome = s.complete_analysis(second, vec![span("new", 0, 3, &["The"])]);
    assert_eq!(outcome, AnalysisOutcome::Applied(ReplaceSummary { kept: 1, dropped: 0 }));
    assert!(!s.is_current(first));

    let outcome = s.complete_analysis(first, vec![span("old", 4, 7, &["dog"])]);
    assert_eq!(outcome, AnalysisOutcome::Superseded);
    assert!(s.store().contains("new"));
    assert!(!s.store().contains("old"));
}

#[test]
fn fresh_analysis_replaces_store_and_closes_selection() {
    let mut s = session_with("Teh cat sat.", vec![span("a", 0, 3, &["The"])]);
    s.select("a");

    let ticket = s.begin_analysis();
    let spans = vec![span("b", 4, 7, &["dog"]), span("oob", 4, 40, &["x"])];
    let outcome = s.complete_analysis(ticket, spans);

    assert_eq!(outcome, AnalysisOutcome::Applied(ReplaceSummary { kept: 1, dropped: 1 }));
    let ids: Vec<&str> = s.store().ids().collect();
    assert_eq!(ids, vec!["b"]);
    assert_eq!(s.selection(), &Selection::Idle);
}

#[test]
fn undo_and_redo_restore_buffer_and_store_together() {
    let spans = vec![span("a", 0, 3, &["The"]), span("b", 8, 11, &["sits"])];
    let mut s = session_with("Teh cat sat.", spans);
    s.accept_id("a", 0).unwrap();
    assert_eq!(s.text(), "The cat sat.");
    let after_accept = s.store().clone();

    assert!(s.undo());
    assert_eq!(s.text(), "Teh cat sat.");
    assert!(s.store().contains("a"), "undo brings the consumed suggestion back");
    assert!(s.can_redo());

    assert!(s.redo());
    assert_eq!(s.text(), "The cat sat.");
    assert_eq!(s.store(), &after_accept);
    assert!(!s.redo());
}

#[test]
fn new_edit_after_undo_discards_redo_branch() {
    let mut s = Session::new("first version");
    s.edit_text("second version");
    s.undo();
    s.edit_text("third version");

    assert!(!s.can_redo());
    assert!(s.undo());
    assert_eq!(s.text(), "first version");
}

#[test]
fn undo_invalidates_in_flight_analysis() {
    let mut s = Session::new("first version");
    s.edit_text("second version");
    let ticket = s.begin_analysis();
    s.undo();
    assert_eq!(s.complete_analysis(ticket, Vec::new()), AnalysisOutcome::BufferChanged);
}

#[test]
fn history_depth_is_bounded() {
    let mut s = Session::new("v0");
    for i in 1..=(HISTORY_LIMIT + 10) {
        s.edit_text(format!("v{i}"));
    }
    let mut undos = 0;
    while s.undo() {
        undos += 1;
    }
    assert_eq!(undos, HISTORY_LIMIT);
    assert_eq!(s.text(), "v10");
}
