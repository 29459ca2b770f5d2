use super::transcript::RawCaption;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Marker attribute on the live caption region. Absent when captions are
/// disabled or the host markup is unrecognized.
const CAPTION_CONTAINER: &str = "[data-tid='closed-captions-renderer']";

/// Element that only exists while a call is running
const READINESS_MARKER: &str = "#call-duration-custom";

/// Hang-up control; its activation is the last chance to save state
const LEAVE_CONTROL: &str = "div#hangup-button button";

const MEETING_DETAILS: &str = "div[data-tid='meeting-details-container']";

/// One host-markup adaptation: where caption items live and how to read
/// their parts. The host application has changed this markup across
/// releases, so adding a new adaptation is a data change, not a code change.
#[derive(Debug, Clone, Copy)]
pub struct CaptionSelectors {
    /// Strategy name, for diagnostics
    pub name: &'static str,

    /// Selector matching one caption item inside the container
    pub item: &'static str,

    /// Attribute on the item that survives text revisions. Generated DOM
    /// ids are reused as captions scroll out of the live region and must
    /// not be used here.
    pub id_attr: &'static str,

    /// Sub-element selectors for the speaker name, tried in order
    pub speaker: &'static [&'static str],

    /// Sub-element selectors for the caption text, tried in order
    pub text: &'static [&'static str],
}

/// Ordered markup strategies; the first one matching any item wins
pub const SELECTOR_STRATEGIES: &[CaptionSelectors] = &[
    CaptionSelectors {
        name: "attributed",
        item: "[data-caption-id]",
        id_attr: "data-caption-id",
        speaker: &[
            "[data-tid='closed-caption-author']",
            ".ui-chat__message__author",
        ],
        text: &["[data-tid='closed-caption-text']", ".fui-StyledText"],
    },
    CaptionSelectors {
        name: "legacy-chat",
        item: ".ui-chat__item",
        id_attr: "data-mid",
        speaker: &[".ui-chat__message__author"],
        text: &[".fui-StyledText"],
    },
];

/// Everything one snapshot tells us besides the captions themselves
#[derive(Debug, Clone, Default)]
pub struct PageScan {
    /// Readiness marker present (a call is running)
    pub ready: bool,

    /// Caption container present (live captions are enabled)
    pub captions_enabled: bool,

    /// Captions currently visible in the live region
    pub captions: Vec<RawCaption>,

    /// Fingerprint of the leave control, if rendered. Changes when the host
    /// replaces the control, which is how re-arming is detected.
    pub leave_control: Option<String>,

    /// Space-joined meeting details text, if the details container is rendered
    pub meeting_details: Option<String>,

    /// Raw document title
    pub title: Option<String>,
}

/// Extract the currently visible captions from an HTML snapshot.
///
/// Returns empty when the caption container is absent; the caller must
/// treat that as "captions not enabled" and leave any accumulated
/// transcript alone.
pub fn extract(html: &str) -> Vec<RawCaption> {
    let document = Html::parse_document(html);
    extract_from(&document)
}

/// Full snapshot scan: captions plus the page probes the capture loop needs.
/// Parses the document once.
pub fn scan(html: &str) -> PageScan {
    let document = Html::parse_document(html);

    PageScan {
        ready: select_first(&document, READINESS_MARKER).is_some(),
        captions_enabled: select_first(&document, CAPTION_CONTAINER).is_some(),
        captions: extract_from(&document),
        leave_control: select_first(&document, LEAVE_CONTROL).map(|el| fingerprint(&el)),
        meeting_details: select_first(&document, MEETING_DETAILS).map(|el| details_text(&el)),
        title: select_first(&document, "title").map(|el| element_text(&el)),
    }
}

fn extract_from(document: &Html) -> Vec<RawCaption> {
    let Some(container) = select_first(document, CAPTION_CONTAINER) else {
        return Vec::new();
    };

    for strategy in SELECTOR_STRATEGIES {
        if let Some(captions) = extract_with(&container, strategy) {
            return captions;
        }
    }

    Vec::new()
}

/// Try one strategy. Returns None when no items match at all (fall through
/// to the next strategy); items that match but cannot be read safely are
/// skipped within the batch.
fn extract_with(container: &ElementRef, strategy: &CaptionSelectors) -> Option<Vec<RawCaption>> {
    let item_selector = Selector::parse(strategy.item).ok()?;
    let items: Vec<ElementRef> = container.select(&item_selector).collect();
    if items.is_empty() {
        return None;
    }

    let mut captions = Vec::with_capacity(items.len());

    for item in items {
        let Some(caption_id) = item.value().attr(strategy.id_attr) else {
            debug!(strategy = strategy.name, "caption item without id attribute, skipping");
            continue;
        };
        let Some(speaker) = first_text(&item, strategy.speaker) else {
            debug!(strategy = strategy.name, "caption item without speaker element, skipping");
            continue;
        };
        let Some(text) = first_text(&item, strategy.text) else {
            debug!(strategy = strategy.name, "caption item without text element, skipping");
            continue;
        };

        captions.push(RawCaption {
            caption_id: caption_id.trim().to_string(),
            speaker,
            text,
        });
    }

    Some(captions)
}

/// First element matching any of the ordered selectors, as trimmed text
fn first_text(item: &ElementRef, selectors: &[&str]) -> Option<String> {
    for raw in selectors {
        if let Ok(selector) = Selector::parse(raw) {
            if let Some(el) = item.select(&selector).next() {
                return Some(element_text(&el));
            }
        }
    }
    None
}

fn select_first<'a>(document: &'a Html, raw: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(raw).ok()?;
    document.select(&selector).next()
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<Vec<_>>().join(" ").trim().to_string()
}

/// All span texts under the details container, space-joined
fn details_text(container: &ElementRef) -> String {
    let Ok(selector) = Selector::parse("span") else {
        return String::new();
    };
    container
        .select(&selector)
        .map(|span| span.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Identity string for the leave control: its attributes plus rendered text.
/// Object identity does not survive snapshots, so a replaced control is
/// recognized by its serialized shape instead.
fn fingerprint(el: &ElementRef) -> String {
    let mut parts: Vec<String> = el
        .value()
        .attrs()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    parts.sort();
    parts.push(element_text(el));
    parts.join(";")
}
