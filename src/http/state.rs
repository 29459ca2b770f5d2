use crate::capture::{CaptureEvent, CaptureSession};
use crate::config::ExportConfig;
use crate::store::MeetingStore;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The active capture session (shared with the capture loop)
    pub session: Arc<RwLock<CaptureSession>>,

    /// Saved-meetings collection
    pub store: Arc<RwLock<MeetingStore>>,

    /// Event channel into the capture loop
    pub events: mpsc::Sender<CaptureEvent>,

    /// Export settings used by the download handlers
    pub export: ExportConfig,
}

impl AppState {
    pub fn new(
        session: Arc<RwLock<CaptureSession>>,
        store: Arc<RwLock<MeetingStore>>,
        events: mpsc::Sender<CaptureEvent>,
        export: ExportConfig,
    ) -> Self {
        Self {
            session,
            store,
            events,
            export,
        }
    }
}
