use super::transcript::CaptionEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about the running capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureStats {
    /// Whether capture is currently active
    pub capturing: bool,

    /// When the session was created
    pub started_at: DateTime<Utc>,

    /// Meeting title currently being captured
    pub meeting_title: String,

    /// Entries accumulated in the active transcript
    pub entries: usize,

    /// Entries appended since the session started, across meeting boundaries
    pub appended_total: usize,

    /// In-place text revisions since the session started
    pub updated_total: usize,
}

/// Everything the transcript envelope hands back to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSnapshot {
    pub transcript: Vec<CaptionEntry>,
    pub meeting_title: String,
    pub meeting_date: String,
    pub meeting_details: String,
}
