use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A caption as observed in the live caption region of one page snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCaption {
    /// Stable identifier attribute carried by the caption element.
    /// Survives text revisions, unlike generated DOM ids.
    pub caption_id: String,

    /// Speaker display name
    pub speaker: String,

    /// Caption text (may still be revised by the host while speech finalizes)
    pub text: String,
}

/// One accumulated transcript row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionEntry {
    /// Speaker display name, fixed at first observation
    pub speaker: String,

    /// Latest observed text for this caption
    pub text: String,

    /// Time of day when this caption was first observed
    pub captured_at: String,

    /// Reconciliation key
    pub caption_id: String,
}

/// Counters describing what one reconcile pass did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Captions seen for the first time
    pub appended: usize,

    /// Existing entries whose text was revised
    pub updated: usize,

    /// Existing entries observed again with identical text
    pub unchanged: usize,

    /// Captions dropped for lacking a usable identifier
    pub skipped: usize,
}

impl ReconcileOutcome {
    /// True if the pass changed the transcript at all
    pub fn changed(&self) -> bool {
        self.appended > 0 || self.updated > 0
    }
}

/// Insertion-ordered, deduplicated accumulation of captions for one meeting.
///
/// Identity is the caption id: revised text replaces the matching entry in
/// place, so word-by-word refinements converge to final text without
/// creating duplicate rows. At most one entry exists per caption id.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<CaptionEntry>,
    by_id: HashMap<String, usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-observed order
    pub fn entries(&self) -> &[CaptionEntry] {
        &self.entries
    }

    /// Owned copy of the entries, for persistence and export
    pub fn snapshot(&self) -> Vec<CaptionEntry> {
        self.entries.clone()
    }

    /// Drop all accumulated entries (new meeting detected)
    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_id.clear();
    }

    /// Merge one batch of observed captions into the transcript.
    ///
    /// Applied in batch order: unknown ids append a new entry stamped with
    /// `seen_at`, known ids with revised text update in place (keeping their
    /// position, speaker, and original timestamp), and identical
    /// re-observations are no-ops. Captions without an id are dropped before
    /// lookup. Calling twice with the same batch yields the same transcript
    /// as calling once.
    pub fn reconcile(&mut self, batch: &[RawCaption], seen_at: &str) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();

        for raw in batch {
            if raw.caption_id.is_empty() {
                outcome.skipped += 1;
                continue;
            }

            match self.by_id.get(&raw.caption_id) {
                Some(&index) => {
                    let entry = &mut self.entries[index];
                    if entry.text != raw.text {
                        entry.text = raw.text.clone();
                        outcome.updated += 1;
                    } else {
                        outcome.unchanged += 1;
                    }
                }
                None => {
                    self.by_id.insert(raw.caption_id.clone(), self.entries.len());
                    self.entries.push(CaptionEntry {
                        speaker: raw.speaker.clone(),
                        text: raw.text.clone(),
                        captured_at: seen_at.to_string(),
                        caption_id: raw.caption_id.clone(),
                    });
                    outcome.appended += 1;
                }
            }
        }

        outcome
    }
}
