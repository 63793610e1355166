//! Integration tests for applying suggestions to the buffer.
//!
//! Exercises: reconcile::apply_candidate, reconcile::apply_replacement,
//! reconcile::invalidate_all, SuggestionStore::replace_all.

use redpen_core::reconcile;
use redpen_core::{Candidate, Category, Span, SuggestionError, SuggestionStore, TextBuffer};

fn span(id: &str, start: usize, end: usize, candidates: &[&str]) -> Span {
    Span::with_id(
        id,
        start,
        end,
        Category::Grammar,
        "rationale",
        candidates.iter().map(|c| Candidate::new(*c)).collect(),
    )
}

fn store_of(spans: Vec<Span>, buffer: &TextBuffer) -> SuggestionStore {
    let mut store = SuggestionStore::new();
    let summary = store.replace_all(spans, buffer.char_len());
    assert_eq!(summary.dropped, 0, "fixture spans should all be valid");
    store
}

#[test]
fn accepting_a_typo_fix_rewrites_the_buffer_and_consumes_the_span() {
    let buffer = TextBuffer::new("Teh cat sat.");
    let store = store_of(vec![span("typo", 0, 3, &["The"])], &buffer);

    let out = reconcile::apply_candidate(&buffer, &store, "typo", 0)
        .unwrap()
        .expect("span exists");

    assert_eq!(out.buffer.as_str(), "The cat sat.");
    assert!(out.store.get("typo").is_none(), "applied span must be consumed");
    assert!(out.store.is_empty());
    assert_eq!(out.delta, 0);
    assert_eq!(buffer.as_str(), "Teh cat sat.", "input snapshot is untouched");
}

#[test]
fn overlapping_sibling_is_invalidated() {
    let buffer = TextBuffer::new("Teh cat sat on the mat.");
    let store = store_of(vec![span("a", 0, 3, &["The"]), span("b", 1, 5, &["x"])], &buffer);

    let out = reconcile::apply_candidate(&buffer, &store, "a", 0).unwrap().unwrap();

    assert!(out.store.is_empty(), "both spans should be gone");
    assert_eq!(out.invalidated, vec!["b".to_owned()]);
}

#[test]
fn later_sibling_shifts_by_the_length_delta() {
    let buffer = TextBuffer::new("Teh cat sat on the mat.");
    let store = store_of(vec![span("a", 0, 3, &["Thee"]), span("b", 10, 14, &["x"])], &buffer);

    let out = reconcile::apply_candidate(&buffer, &store, "a", 0).unwrap().unwrap();

    assert_eq!(out.delta, 1);
    let b = out.store.get("b").expect("disjoint sibling survives");
    assert_eq!((b.start, b.end), (11, 15));
    assert_eq!(
        out.buffer.slice(b.start..b.end),
        buffer.slice(10..14),
        "shifted span still addresses the same text"
    );
}

#[test]
fn earlier_sibling_is_unchanged_and_touching_ranges_do_not_overlap() {
    let buffer = TextBuffer::new("one two three");
    let store = store_of(
        vec![
            span("before", 0, 3, &["1"]),
            span("target", 4, 7, &["2"]),
            span("after", 7, 13, &["3"]),
        ],
        &buffer,
    );

    let out = reconcile::apply_candidate(&buffer, &store, "target", 0).unwrap().unwrap();

    assert_eq!(out.buffer.as_str(), "one 2 three");
    let before = out.store.get("before").unwrap();
    assert_eq!((before.start, before.end), (0, 3));
    let after = out.store.get("after").unwrap();
    assert_eq!((after.start, after.end), (5, 11));
    assert_eq!(out.buffer.slice(after.start..after.end), Some(" three"));
    assert!(out.invalidated.is_empty());
}

#[test]
fn shrinking_replacement_shifts_left_and_keeps_order() {
    let buffer = TextBuffer::new("a very very long sentence here");
    let store = store_of(
        vec![
            span("x", 2, 16, &["long"]),
            span("y", 17, 25, &["phrase"]),
            span("z", 26, 30, &["now"]),
        ],
        &buffer,
    );

    let out = reconcile::apply_candidate(&buffer, &store, "x", 0).unwrap().unwrap();

    assert_eq!(out.buffer.as_str(), "a long sentence here");
    assert_eq!(out.delta, -10);
    let ids: Vec<&str> = out.store.ids().collect();
    assert_eq!(ids, vec!["y", "z"], "insertion order is preserved");
    assert_eq!(out.buffer.slice(7..15), Some("sentence"));
    let y = out.store.get("y").unwrap();
    assert_eq!((y.start, y.end), (7, 15));
}

#[test]
fn insertion_point_inside_sibling_invalidates_it() {
    let buffer = TextBuffer::new("hello world");
    let store = store_of(vec![span("ins", 5, 5, &[","]), span("wide", 0, 11, &["hi"])], &buffer);

    let out = reconcile::apply_candidate(&buffer, &store, "ins", 0).unwrap().unwrap();

    assert_eq!(out.buffer.as_str(), "hello, world");
    assert!(out.store.is_empty());
    assert_eq!(out.invalidated, vec!["wide".to_owned()]);
}

#[test]
fn missing_id_is_a_no_op_and_bad_candidate_is_an_error() {
    let buffer = TextBuffer::new("Teh cat sat.");
    let store = store_of(vec![span("typo", 0, 3, &["The"])], &buffer);

    assert!(reconcile::apply_candidate(&buffer, &store, "gone", 0).unwrap().is_none());

    let err = reconcile::apply_candidate(&buffer, &store, "typo", 3).unwrap_err();
    assert_eq!(
        err,
        SuggestionError::CandidateOutOfRange { id: "typo".into(), index: 3, len: 1 }
    );
}

#[test]
fn multibyte_text_uses_char_offsets() {
    let buffer = TextBuffer::new("Ça va très bien, merci.");
    let spans = vec![span("a", 6, 10, &["vraiment"]), span("b", 17, 22, &["merci beaucoup"])];
    let store = store_of(spans, &buffer);

    let out = reconcile::apply_candidate(&buffer, &store, "a", 0).unwrap().unwrap();

    assert_eq!(out.buffer.as_str(), "Ça va vraiment bien, merci.");
    let b = out.store.get("b").unwrap();
    assert_eq!(out.buffer.slice(b.start..b.end), Some("merci"));
}

#[test]
fn invalidate_all_drops_everything() {
    let buffer = TextBuffer::new("Teh cat sat.");
    let mut store = store_of(vec![span("a", 0, 3, &["The"]), span("b", 4, 7, &["dog"])], &buffer);
    assert_eq!(reconcile::invalidate_all(&mut store), 2);
    assert!(store.is_empty());
}
