// Tests for snapshot scanning and caption extraction
//
// Fixtures model the two host-markup generations the selector strategies
// cover, plus the degraded documents the extractor must tolerate.

use caption_scribe::capture::{extract, scan};

fn page(body: &str) -> String {
    format!(
        "<html><head><title>(2) Weekly Sync Microsoft Teams</title></head><body>{body}</body></html>"
    )
}

fn attributed_captions() -> String {
    page(
        r#"
        <div id="call-duration-custom">00:12:03</div>
        <div data-tid="closed-captions-renderer">
          <div data-caption-id="c1">
            <span data-tid="closed-caption-author">  Jane Doe </span>
            <span data-tid="closed-caption-text"> Hello </span>
          </div>
          <div data-caption-id="c2">
            <span data-tid="closed-caption-author">John Smith</span>
            <span data-tid="closed-caption-text">Good morning everyone</span>
          </div>
        </div>
        "#,
    )
}

fn legacy_captions() -> String {
    page(
        r#"
        <div data-tid="closed-captions-renderer">
          <div class="ui-chat__item" data-mid="m1">
            <div class="ui-chat__message__author">John Smith (External)</div>
            <div class="fui-StyledText">Good morning</div>
          </div>
          <div class="ui-chat__item" data-mid="m2">
            <div class="ui-chat__message__author">Jane Doe</div>
            <div class="fui-StyledText">Morning</div>
          </div>
        </div>
        "#,
    )
}

#[test]
fn extracts_captions_from_attributed_markup() {
    let captions = extract(&attributed_captions());

    assert_eq!(captions.len(), 2);
    assert_eq!(captions[0].caption_id, "c1");
    assert_eq!(captions[0].speaker, "Jane Doe", "fields are trimmed");
    assert_eq!(captions[0].text, "Hello");
    assert_eq!(captions[1].caption_id, "c2");
    assert_eq!(captions[1].text, "Good morning everyone");
}

#[test]
fn falls_back_to_legacy_markup() {
    let captions = extract(&legacy_captions());

    assert_eq!(captions.len(), 2);
    assert_eq!(captions[0].caption_id, "m1");
    assert_eq!(captions[0].speaker, "John Smith (External)");
    assert_eq!(captions[1].caption_id, "m2");
}

#[test]
fn missing_container_yields_nothing() {
    let captions = extract(&page("<p>captions are not enabled</p>"));
    assert!(captions.is_empty());
}

#[test]
fn items_without_a_stable_id_are_skipped() {
    let html = page(
        r#"
        <div data-tid="closed-captions-renderer">
          <div class="ui-chat__item">
            <div class="ui-chat__message__author">Ghost</div>
            <div class="fui-StyledText">unattributable</div>
          </div>
          <div class="ui-chat__item" data-mid="m2">
            <div class="ui-chat__message__author">Jane Doe</div>
            <div class="fui-StyledText">kept</div>
          </div>
        </div>
        "#,
    );

    let captions = extract(&html);
    assert_eq!(captions.len(), 1);
    assert_eq!(captions[0].caption_id, "m2");
}

#[test]
fn items_missing_sub_elements_are_skipped() {
    let html = page(
        r#"
        <div data-tid="closed-captions-renderer">
          <div data-caption-id="c1">
            <span data-tid="closed-caption-text">speakerless</span>
          </div>
          <div data-caption-id="c2">
            <span data-tid="closed-caption-author">Jane Doe</span>
          </div>
          <div data-caption-id="c3">
            <span data-tid="closed-caption-author">John Smith</span>
            <span data-tid="closed-caption-text">complete</span>
          </div>
        </div>
        "#,
    );

    let captions = extract(&html);
    assert_eq!(captions.len(), 1);
    assert_eq!(captions[0].caption_id, "c3");
}

#[test]
fn scan_reports_page_probes() {
    let html = page(
        r#"
        <div id="call-duration-custom">00:01</div>
        <div data-tid="closed-captions-renderer"></div>
        <div id="hangup-button"><button aria-label="Leave">Leave</button></div>
        <div data-tid="meeting-details-container">
          <span>Mon, Aug 3</span>
          <span></span>
          <span>10:00 AM</span>
        </div>
        "#,
    );

    let result = scan(&html);

    assert!(result.ready);
    assert!(result.captions_enabled);
    assert!(result.captions.is_empty());
    assert!(result.leave_control.is_some());
    assert_eq!(result.meeting_details.as_deref(), Some("Mon, Aug 3 10:00 AM"));
    assert_eq!(
        result.title.as_deref(),
        Some("(2) Weekly Sync Microsoft Teams")
    );
}

#[test]
fn scan_detects_leave_control_replacement() {
    let first = page(r#"<div id="hangup-button"><button aria-label="Leave">Leave</button></div>"#);
    let second =
        page(r#"<div id="hangup-button"><button aria-label="Hang up">Hang up</button></div>"#);

    let a = scan(&first).leave_control.unwrap();
    let b = scan(&second).leave_control.unwrap();
    assert_ne!(a, b, "a replaced control must fingerprint differently");

    let again = scan(&first).leave_control.unwrap();
    assert_eq!(a, again, "an unchanged control must fingerprint identically");
}

#[test]
fn scan_without_call_markers_is_not_ready() {
    let result = scan(&page("<p>pre-join screen</p>"));

    assert!(!result.ready);
    assert!(!result.captions_enabled);
    assert!(result.leave_control.is_none());
    assert!(result.meeting_details.is_none());
}
