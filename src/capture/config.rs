use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the capture loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Host-application brand text stripped from document titles
    pub brand_suffix: String,

    /// Seconds between periodic persistence of the active transcript
    pub persist_interval_secs: u64,

    /// Height in pixels of the top screen region that triggers an
    /// opportunistic save when the pointer enters it
    pub pointer_region_px: i32,

    /// Minimum seconds between pointer-triggered saves
    pub pointer_save_interval_secs: u64,

    /// Seconds between readiness probes while waiting for a running call
    pub ready_backoff_secs: u64,

    /// Readiness probes before the hint stops repeating
    pub ready_max_attempts: u32,

    /// Whether activating the leave control exports the transcript
    pub leave_trigger: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            brand_suffix: "Microsoft Teams".to_string(),
            persist_interval_secs: 60,
            pointer_region_px: 50,
            pointer_save_interval_secs: 60,
            ready_backoff_secs: 5,
            ready_max_attempts: 60,
            leave_trigger: false,
        }
    }
}

impl CaptureConfig {
    pub fn persist_interval(&self) -> Duration {
        Duration::from_secs(self.persist_interval_secs)
    }

    pub fn pointer_save_interval(&self) -> Duration {
        Duration::from_secs(self.pointer_save_interval_secs)
    }

    pub fn ready_backoff(&self) -> Duration {
        Duration::from_secs(self.ready_backoff_secs)
    }
}
