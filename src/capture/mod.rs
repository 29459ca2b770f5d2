//! Live caption capture
//!
//! This module provides the capture pipeline for one meeting page:
//! - Snapshot scanning and caption extraction (selector strategies)
//! - Transcript reconciliation (id-keyed, revision-aware accumulation)
//! - Session tracking (title-based meeting boundaries, leave control)
//! - The event-driven capture loop and its persistence triggers

mod config;
mod extract;
mod scheduler;
mod session;
mod stats;
mod transcript;

pub use config::CaptureConfig;
pub use extract::{extract, scan, CaptionSelectors, PageScan, SELECTOR_STRATEGIES};
pub use scheduler::{CaptureEvent, CaptureLoop};
pub use session::{derive_meeting_title, CaptureSession};
pub use stats::{CaptureStats, TranscriptSnapshot};
pub use transcript::{CaptionEntry, RawCaption, ReconcileOutcome, Transcript};
