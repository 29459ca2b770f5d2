use super::config::CaptureConfig;
use super::extract;
use super::session::{derive_meeting_title, CaptureSession};
use crate::config::ExportConfig;
use crate::export;
use crate::store::MeetingStore;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, RwLock};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Inputs to the capture loop. Everything the page or its driver observes
/// arrives as one of these, serialized through a single channel, so event
/// handling never overlaps with itself.
#[derive(Debug)]
pub enum CaptureEvent {
    /// The document mutated; the payload is the full HTML snapshot
    Snapshot(String),

    /// The page became hidden and may be torn down
    VisibilityHidden,

    /// Pointer moved to `y` pixels from the top of the viewport
    PointerMoved { y: i32 },

    /// The leave control was activated
    LeaveActivated,

    /// The persisted leave-trigger flag changed
    LeaveTriggerChanged(bool),

    /// Stop the loop after one final persistence pass
    Shutdown,
}

/// The capture loop: owns the triggered-persistence policy and drives
/// extraction and reconciliation from snapshot events.
///
/// Persistence triggers: a fixed interval while capture is active, the page
/// becoming hidden, and the pointer entering the top screen region
/// (rate-limited). Activating the leave control exports the transcript
/// instead, as a last chance before page teardown.
pub struct CaptureLoop {
    session: Arc<RwLock<CaptureSession>>,
    store: Arc<RwLock<MeetingStore>>,
    config: CaptureConfig,
    export: ExportConfig,

    /// Mirror of the session's capturing flag, readable without a lock from
    /// the select guards
    capture_active: bool,

    last_pointer_save: Option<Instant>,
    ready_attempts: u32,
}

impl CaptureLoop {
    pub fn new(
        session: Arc<RwLock<CaptureSession>>,
        store: Arc<RwLock<MeetingStore>>,
        config: CaptureConfig,
        export: ExportConfig,
    ) -> Self {
        Self {
            session,
            store,
            config,
            export,
            capture_active: false,
            last_pointer_save: None,
            ready_attempts: 0,
        }
    }

    /// Run until the channel closes or a `Shutdown` event arrives. Both
    /// endings flush one final persistence pass, and both cancel the
    /// readiness backoff and the persistence interval with the loop.
    pub async fn run(mut self, mut events: mpsc::Receiver<CaptureEvent>) -> Result<()> {
        let mut persist_timer = tokio::time::interval(self.config.persist_interval());
        persist_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut ready_timer = tokio::time::interval(self.config.ready_backoff());
        ready_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("Capture loop started");

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    None | Some(CaptureEvent::Shutdown) => {
                        info!("Capture loop shutting down");
                        self.persist("shutdown").await;
                        break;
                    }
                    Some(event) => self.handle(event, Instant::now()).await,
                },
                _ = persist_timer.tick(), if self.capture_active => {
                    self.persist("interval").await;
                }
                _ = ready_timer.tick(), if self.awaiting_readiness() => {
                    self.readiness_hint();
                }
            }
        }

        Ok(())
    }

    fn awaiting_readiness(&self) -> bool {
        !self.capture_active && self.ready_attempts < self.config.ready_max_attempts
    }

    fn readiness_hint(&mut self) {
        self.ready_attempts += 1;
        info!(
            attempt = self.ready_attempts,
            "Waiting for a running call; enable live captions via More > Language and speech"
        );

        if self.ready_attempts >= self.config.ready_max_attempts {
            warn!(
                "No running call with captions after {} probes; snapshots will still be processed when they arrive",
                self.ready_attempts
            );
        }
    }

    /// Process one event to completion. `now` is injected so the pointer
    /// rate limit is testable without timers.
    pub async fn handle(&mut self, event: CaptureEvent, now: Instant) {
        match event {
            CaptureEvent::Snapshot(html) => self.on_snapshot(&html).await,
            CaptureEvent::VisibilityHidden => {
                debug!("Page hidden, saving captions");
                self.persist("visibility").await;
            }
            CaptureEvent::PointerMoved { y } => {
                if y <= self.config.pointer_region_px && self.pointer_save_due(now) {
                    self.last_pointer_save = Some(now);
                    self.persist("pointer").await;
                }
            }
            CaptureEvent::LeaveActivated => self.on_leave_activated().await,
            CaptureEvent::LeaveTriggerChanged(enabled) => {
                self.session.write().await.set_leave_trigger(enabled);
            }
            // Consumed by the run loop before dispatch
            CaptureEvent::Shutdown => {}
        }
    }

    fn pointer_save_due(&self, now: Instant) -> bool {
        match self.last_pointer_save {
            Some(last) => now.duration_since(last) >= self.config.pointer_save_interval(),
            None => true,
        }
    }

    async fn on_snapshot(&mut self, html: &str) {
        let scan = extract::scan(html);

        let now_active = {
            let mut session = self.session.write().await;

            if !session.is_capturing() && scan.ready && scan.captions_enabled {
                session.begin_capture();
            }

            // Title, details, and leave-control tracking run on every
            // snapshot, whether or not captions have started
            if let Some(raw_title) = &scan.title {
                let derived = derive_meeting_title(raw_title, &self.config.brand_suffix);
                session.observe_title(&derived);
            }

            if let Some(details) = &scan.meeting_details {
                session.observe_details(details);
            }

            if let Some(fingerprint) = &scan.leave_control {
                session.observe_leave_control(fingerprint);
            }

            // Container absent means captions were turned off mid-call; the
            // accumulated transcript stays untouched
            if session.is_capturing() && scan.captions_enabled {
                session.apply_captions(&scan.captions);
            }

            session.is_capturing()
        };

        self.capture_active = now_active;
    }

    async fn on_leave_activated(&self) {
        let snapshot = {
            let session = self.session.read().await;
            if !session.leave_armed() {
                debug!("Leave control activated but the export trigger is not armed");
                return;
            }
            session.snapshot()
        };

        if snapshot.transcript.is_empty() {
            debug!("Leave control activated with nothing captured");
            return;
        }

        info!("Leave control activated, exporting captions");
        let result = export::write_export(
            Path::new(&self.export.output_dir),
            &snapshot.meeting_title,
            &snapshot.meeting_date,
            &snapshot.transcript,
            self.export.name_style,
        );

        if let Err(e) = result {
            warn!("Leave-triggered export failed: {e:#}");
        }
    }

    /// Upsert the current transcript into the meeting store. Skips silently
    /// when nothing has been captured; storage failures are logged, never
    /// propagated.
    async fn persist(&self, reason: &str) {
        let snapshot = self.session.read().await.snapshot();
        if snapshot.transcript.is_empty() {
            debug!(reason, "Nothing to persist yet");
            return;
        }

        let mut store = self.store.write().await;
        match store.upsert(
            &snapshot.meeting_title,
            &snapshot.meeting_date,
            snapshot.transcript,
        ) {
            Ok(outcome) => debug!(reason, ?outcome, "Transcript persisted"),
            Err(e) => warn!(reason, "Failed to persist transcript: {e:#}"),
        }
    }
}
