// Tests for transcript reconciliation
//
// These cover the merge rules that keep live-updating captions from
// producing duplicate rows: id-keyed identity, in-place text revision,
// first-seen timestamps, and batch idempotence.

use caption_scribe::capture::{RawCaption, Transcript};

fn raw(id: &str, speaker: &str, text: &str) -> RawCaption {
    RawCaption {
        caption_id: id.to_string(),
        speaker: speaker.to_string(),
        text: text.to_string(),
    }
}

#[test]
fn reconcile_appends_new_captions_in_batch_order() {
    let mut transcript = Transcript::new();

    let outcome = transcript.reconcile(
        &[raw("a", "Jane Doe", "Hello"), raw("b", "John Smith", "Hi")],
        "10:00:01 AM",
    );

    assert_eq!(outcome.appended, 2);
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript.entries()[0].caption_id, "a");
    assert_eq!(transcript.entries()[1].caption_id, "b");
}

#[test]
fn reconcile_is_idempotent() {
    let mut transcript = Transcript::new();
    let batch = [raw("a", "Jane Doe", "Hello"), raw("b", "John Smith", "Hi")];

    transcript.reconcile(&batch, "10:00:01 AM");
    let first_pass = transcript.snapshot();

    let outcome = transcript.reconcile(&batch, "10:00:05 AM");

    assert_eq!(outcome.appended, 0);
    assert_eq!(outcome.updated, 0);
    assert_eq!(outcome.unchanged, 2);
    assert_eq!(transcript.snapshot(), first_pass);
}

#[test]
fn revised_text_updates_in_place_and_keeps_first_seen_time() {
    let mut transcript = Transcript::new();

    transcript.reconcile(&[raw("a", "Jane Doe", "Hello")], "10:00:01 AM");
    let outcome = transcript.reconcile(&[raw("a", "Jane Doe", "Hello there")], "10:00:03 AM");

    assert_eq!(outcome.updated, 1);
    assert_eq!(transcript.len(), 1, "revision must not create a second row");

    let entry = &transcript.entries()[0];
    assert_eq!(entry.text, "Hello there");
    assert_eq!(entry.captured_at, "10:00:01 AM", "timestamp is first-seen");
    assert_eq!(entry.speaker, "Jane Doe");
}

#[test]
fn revisions_do_not_reorder_entries() {
    let mut transcript = Transcript::new();

    transcript.reconcile(
        &[raw("a", "Jane", "first"), raw("b", "John", "second")],
        "10:00:01 AM",
    );
    // Revise the earlier caption after the later one arrived
    transcript.reconcile(&[raw("a", "Jane", "first, revised")], "10:00:04 AM");

    let ids: Vec<&str> = transcript
        .entries()
        .iter()
        .map(|e| e.caption_id.as_str())
        .collect();
    assert_eq!(ids, ["a", "b"]);
    assert_eq!(transcript.entries()[0].text, "first, revised");
}

#[test]
fn captions_without_an_id_are_dropped() {
    let mut transcript = Transcript::new();

    let outcome = transcript.reconcile(
        &[raw("", "Jane", "orphan"), raw("a", "Jane", "kept")],
        "10:00:01 AM",
    );

    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.appended, 1);
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript.entries()[0].caption_id, "a");
}

#[test]
fn clear_empties_the_transcript() {
    let mut transcript = Transcript::new();
    transcript.reconcile(&[raw("a", "Jane", "Hello")], "10:00:01 AM");

    transcript.clear();

    assert!(transcript.is_empty());
    // A cleared id can be observed again as a fresh entry
    let outcome = transcript.reconcile(&[raw("a", "Jane", "Hello again")], "10:05:00 AM");
    assert_eq!(outcome.appended, 1);
    assert_eq!(transcript.entries()[0].captured_at, "10:05:00 AM");
}
