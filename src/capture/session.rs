use super::stats::{CaptureStats, TranscriptSnapshot};
use super::transcript::{RawCaption, ReconcileOutcome, Transcript};
use chrono::{DateTime, Local, Utc};
use tracing::{debug, info};
use uuid::Uuid;

/// Derive the meeting title from a raw document title: strip the leading
/// running-meeting-count prefix (`(3) Weekly Sync`) and the host
/// application's brand suffix, then trim.
pub fn derive_meeting_title(raw_title: &str, brand_suffix: &str) -> String {
    let title = strip_count_prefix(raw_title.trim());

    // The brand's position in the title varies across host releases
    match title.find(brand_suffix) {
        Some(position) if !brand_suffix.is_empty() => {
            let mut rebuilt = String::with_capacity(title.len());
            rebuilt.push_str(&title[..position]);
            rebuilt.push_str(&title[position + brand_suffix.len()..]);
            rebuilt.trim().to_string()
        }
        _ => title.trim().to_string(),
    }
}

/// Strip a literal `(digits)` prefix plus following whitespace
fn strip_count_prefix(title: &str) -> &str {
    let Some(rest) = title.strip_prefix('(') else {
        return title;
    };
    let Some(close) = rest.find(')') else {
        return title;
    };
    let digits = &rest[..close];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return title;
    }
    rest[close + 1..].trim_start()
}

/// State for one capture session: the transcript being accumulated plus the
/// meeting-boundary and leave-control tracking around it.
///
/// The host page never announces "meeting ended"; a change in the derived
/// meeting title is the sole session boundary.
pub struct CaptureSession {
    /// Instance id, for log correlation
    id: Uuid,

    transcript: Transcript,

    /// Title of the meeting currently being captured
    meeting_title: String,

    /// Local calendar date the session started
    meeting_date: String,

    /// Schedule details text scraped from the meeting pane, if seen
    meeting_details: String,

    /// Set once the readiness probe has confirmed a running call with
    /// captions enabled
    capturing: bool,

    started_at: DateTime<Utc>,

    /// Mirror of the persisted leave-trigger flag
    leave_trigger: bool,

    /// Fingerprint of the leave control currently held, if any
    leave_control: Option<String>,

    /// Whether the export-on-leave trigger is attached to that control
    leave_armed: bool,

    appended_total: usize,
    updated_total: usize,
}

impl CaptureSession {
    pub fn new(leave_trigger: bool) -> Self {
        let id = Uuid::new_v4();
        info!("Creating capture session: {}", id);

        Self {
            id,
            transcript: Transcript::new(),
            meeting_title: String::new(),
            meeting_date: Local::now().format("%-m/%-d/%Y").to_string(),
            meeting_details: String::new(),
            capturing: false,
            started_at: Utc::now(),
            leave_trigger,
            leave_control: None,
            leave_armed: false,
            appended_total: 0,
            updated_total: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn meeting_title(&self) -> &str {
        &self.meeting_title
    }

    pub fn meeting_date(&self) -> &str {
        &self.meeting_date
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Mark the session live once a running call with captions enabled has
    /// been observed
    pub fn begin_capture(&mut self) {
        if !self.capturing {
            self.capturing = true;
            info!(session = %self.id, "Capture started");
        }
    }

    /// Compare a derived meeting title against the current one; a different
    /// title means a new meeting, so the transcript is cleared and replaced.
    /// Returns true when a boundary was crossed.
    pub fn observe_title(&mut self, derived_title: &str) -> bool {
        if derived_title == self.meeting_title {
            return false;
        }

        if !self.transcript.is_empty() {
            info!(
                session = %self.id,
                previous = %self.meeting_title,
                current = %derived_title,
                "New meeting detected, clearing previous transcript"
            );
        }
        self.transcript.clear();
        self.meeting_title = derived_title.to_string();
        true
    }

    pub fn observe_details(&mut self, details: &str) {
        if !details.is_empty() && details != self.meeting_details {
            debug!(session = %self.id, details, "Meeting details updated");
            self.meeting_details = details.to_string();
        }
    }

    /// Track the leave control by fingerprint. A new or replaced control
    /// drops any previous arming and re-arms according to the trigger flag.
    /// Returns true when the control changed.
    pub fn observe_leave_control(&mut self, fingerprint: &str) -> bool {
        if self.leave_control.as_deref() == Some(fingerprint) {
            return false;
        }

        if self.leave_armed {
            debug!(session = %self.id, "Leave control replaced, dropping previous trigger");
        }
        self.leave_control = Some(fingerprint.to_string());
        self.leave_armed = false;
        self.sync_leave_arming();
        true
    }

    /// Live update of the leave-trigger flag; arming and disarming are
    /// idempotent, so toggling repeatedly never double-attaches.
    pub fn set_leave_trigger(&mut self, enabled: bool) {
        self.leave_trigger = enabled;
        self.sync_leave_arming();
    }

    fn sync_leave_arming(&mut self) {
        if self.leave_control.is_none() {
            debug!(session = %self.id, "No leave control detected yet, nothing to update");
            return;
        }

        if self.leave_trigger && !self.leave_armed {
            info!(session = %self.id, "Arming export trigger on leave control");
            self.leave_armed = true;
        } else if !self.leave_trigger && self.leave_armed {
            info!(session = %self.id, "Disarming export trigger on leave control");
            self.leave_armed = false;
        }
    }

    pub fn leave_armed(&self) -> bool {
        self.leave_armed
    }

    /// Reconcile one extracted batch into the transcript, stamped with the
    /// current local time of day
    pub fn apply_captions(&mut self, batch: &[RawCaption]) -> ReconcileOutcome {
        let seen_at = Local::now().format("%-I:%M:%S %p").to_string();
        self.apply_captions_at(batch, &seen_at)
    }

    /// Reconcile with an explicit timestamp
    pub fn apply_captions_at(&mut self, batch: &[RawCaption], seen_at: &str) -> ReconcileOutcome {
        let outcome = self.transcript.reconcile(batch, seen_at);
        self.appended_total += outcome.appended;
        self.updated_total += outcome.updated;

        if outcome.changed() {
            debug!(
                session = %self.id,
                appended = outcome.appended,
                updated = outcome.updated,
                entries = self.transcript.len(),
                "Transcript reconciled"
            );
        }

        outcome
    }

    /// Everything the transcript envelope returns to callers
    pub fn snapshot(&self) -> TranscriptSnapshot {
        TranscriptSnapshot {
            transcript: self.transcript.snapshot(),
            meeting_title: self.meeting_title.clone(),
            meeting_date: self.meeting_date.clone(),
            meeting_details: self.meeting_details.clone(),
        }
    }

    pub fn stats(&self) -> CaptureStats {
        CaptureStats {
            capturing: self.capturing,
            started_at: self.started_at,
            meeting_title: self.meeting_title.clone(),
            entries: self.transcript.len(),
            appended_total: self.appended_total,
            updated_total: self.updated_total,
        }
    }
}
