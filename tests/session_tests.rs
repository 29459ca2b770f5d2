// Tests for session tracking: title-derived meeting boundaries and the
// leave-control arming rules.

use caption_scribe::capture::{derive_meeting_title, CaptureSession, RawCaption};

const BRAND: &str = "Microsoft Teams";

fn raw(id: &str, speaker: &str, text: &str) -> RawCaption {
    RawCaption {
        caption_id: id.to_string(),
        speaker: speaker.to_string(),
        text: text.to_string(),
    }
}

#[test]
fn title_derivation_strips_count_prefix_and_brand() {
    assert_eq!(
        derive_meeting_title("(2) Weekly Sync Microsoft Teams", BRAND),
        "Weekly Sync"
    );
    assert_eq!(derive_meeting_title("Weekly Sync", BRAND), "Weekly Sync");
    assert_eq!(derive_meeting_title("(17)   Standup", BRAND), "Standup");
}

#[test]
fn title_derivation_keeps_non_count_parentheses() {
    assert_eq!(
        derive_meeting_title("(draft) Planning", BRAND),
        "(draft) Planning"
    );
    assert_eq!(derive_meeting_title("() Planning", BRAND), "() Planning");
}

#[test]
fn title_change_clears_the_transcript() {
    let mut session = CaptureSession::new(false);
    session.begin_capture();

    session.observe_title("Weekly Sync");
    session.apply_captions_at(&[raw("a", "Jane", "from the first meeting")], "10:00:01 AM");
    assert_eq!(session.transcript().len(), 1);

    // Same title observed again: nothing resets
    assert!(!session.observe_title("Weekly Sync"));
    assert_eq!(session.transcript().len(), 1);

    // Different title: new meeting, old entries must be gone
    assert!(session.observe_title("Retro"));
    assert!(session.transcript().is_empty());

    session.apply_captions_at(&[raw("b", "John", "from the second meeting")], "11:00:00 AM");
    let entries = session.transcript().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].caption_id, "b");
}

#[test]
fn leave_trigger_arms_once_per_control() {
    let mut session = CaptureSession::new(true);

    assert!(!session.leave_armed(), "nothing to arm before a control is seen");

    assert!(session.observe_leave_control("control-1"));
    assert!(session.leave_armed());

    // Re-observing the same control must not re-attach
    assert!(!session.observe_leave_control("control-1"));
    assert!(session.leave_armed());

    // A replaced control re-arms
    assert!(session.observe_leave_control("control-2"));
    assert!(session.leave_armed());
}

#[test]
fn leave_trigger_flag_toggles_idempotently() {
    let mut session = CaptureSession::new(false);
    session.observe_leave_control("control-1");
    assert!(!session.leave_armed(), "flag disabled, control stays unarmed");

    session.set_leave_trigger(true);
    assert!(session.leave_armed());

    // Setting the flag again while armed must not double-attach
    session.set_leave_trigger(true);
    assert!(session.leave_armed());

    session.set_leave_trigger(false);
    assert!(!session.leave_armed());

    session.set_leave_trigger(false);
    assert!(!session.leave_armed());
}

#[test]
fn snapshot_carries_meeting_metadata() {
    let mut session = CaptureSession::new(false);
    session.observe_title("Weekly Sync");
    session.observe_details("Mon, Aug 3 10:00 AM");
    session.apply_captions_at(&[raw("a", "Jane Doe", "Hello")], "10:00:01 AM");

    let snapshot = session.snapshot();
    assert_eq!(snapshot.meeting_title, "Weekly Sync");
    assert_eq!(snapshot.meeting_details, "Mon, Aug 3 10:00 AM");
    assert!(!snapshot.meeting_date.is_empty());
    assert_eq!(snapshot.transcript.len(), 1);
}

#[test]
fn stats_track_reconciliation_totals() {
    let mut session = CaptureSession::new(false);
    session.begin_capture();
    session.observe_title("Weekly Sync");

    session.apply_captions_at(&[raw("a", "Jane", "Hel")], "10:00:01 AM");
    session.apply_captions_at(&[raw("a", "Jane", "Hello")], "10:00:02 AM");
    session.apply_captions_at(&[raw("b", "John", "Hi")], "10:00:03 AM");

    let stats = session.stats();
    assert!(stats.capturing);
    assert_eq!(stats.meeting_title, "Weekly Sync");
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.appended_total, 2);
    assert_eq!(stats.updated_total, 1);
}
