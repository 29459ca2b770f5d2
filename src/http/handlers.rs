use super::state::AppState;
use crate::capture::{CaptionEntry, CaptureEvent};
use crate::export;
use crate::store::UpsertOutcome;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

/// A signal from the page or its driver, forwarded into the capture loop
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalRequest {
    /// The page became hidden
    VisibilityHidden,

    /// Pointer moved to `y` pixels from the top of the viewport
    PointerMoved { y: i32 },

    /// The leave control was activated
    LeaveClicked,

    /// The persisted leave-trigger flag changed
    LeaveTrigger { enabled: bool },
}

#[derive(Debug, Serialize)]
pub struct SignalResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub success: bool,
}

/// Explicit payload for a download; omitted fields fall back to the active
/// session
#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub transcript: Option<Vec<CaptionEntry>>,
    pub meeting_title: Option<String>,
    pub meeting_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub file: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

const NO_CAPTIONS: &str = "No captions were captured. Please, try again.";
const LOOP_GONE: &str = "Capture is not running. Restart the service and reload the meeting page.";

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /capture/snapshot
/// Deliver one DOM snapshot (HTML text body) to the capture loop
pub async fn post_snapshot(State(state): State<AppState>, body: String) -> impl IntoResponse {
    match state.events.send(CaptureEvent::Snapshot(body)).await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(SignalResponse {
                status: "accepted".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to deliver snapshot to capture loop: {}", e);
            error_response(StatusCode::SERVICE_UNAVAILABLE, LOOP_GONE)
        }
    }
}

/// POST /capture/signal
/// Forward a visibility/pointer/leave signal to the capture loop
pub async fn post_signal(
    State(state): State<AppState>,
    Json(request): Json<SignalRequest>,
) -> impl IntoResponse {
    let event = match request {
        SignalRequest::VisibilityHidden => CaptureEvent::VisibilityHidden,
        SignalRequest::PointerMoved { y } => CaptureEvent::PointerMoved { y },
        SignalRequest::LeaveClicked => CaptureEvent::LeaveActivated,
        SignalRequest::LeaveTrigger { enabled } => CaptureEvent::LeaveTriggerChanged(enabled),
    };

    match state.events.send(event).await {
        Ok(()) => (
            StatusCode::OK,
            Json(SignalResponse {
                status: "delivered".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to deliver signal to capture loop: {}", e);
            error_response(StatusCode::SERVICE_UNAVAILABLE, LOOP_GONE)
        }
    }
}

/// GET /capture/status
/// Statistics for the running capture session
pub async fn get_capture_status(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    (StatusCode::OK, Json(session.stats())).into_response()
}

/// GET /transcript
/// The accumulated transcript plus meeting title, date, and details
pub async fn get_transcript(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;

    if !session.is_capturing() {
        return error_response(StatusCode::CONFLICT, NO_CAPTIONS);
    }

    (StatusCode::OK, Json(session.snapshot())).into_response()
}

/// POST /transcript/store
/// Upsert the current transcript into the saved-meetings collection
pub async fn store_transcript(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.session.read().await.snapshot();

    if snapshot.transcript.is_empty() {
        return error_response(StatusCode::CONFLICT, NO_CAPTIONS);
    }

    let mut store = state.store.write().await;
    match store.upsert(
        &snapshot.meeting_title,
        &snapshot.meeting_date,
        snapshot.transcript,
    ) {
        Ok(outcome) => {
            info!(
                "Meeting data {}",
                match outcome {
                    UpsertOutcome::Created => "saved",
                    UpsertOutcome::Updated => "updated",
                }
            );
            (StatusCode::OK, Json(StoreResponse { success: true })).into_response()
        }
        Err(e) => {
            warn!("Failed to store captions: {:#}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save captions. Check the storage path and try again.",
            )
        }
    }
}

/// POST /transcript/download
/// Export a transcript to a text file: either the provided payload or the
/// active session's transcript
pub async fn download_transcript(
    State(state): State<AppState>,
    body: Option<Json<DownloadRequest>>,
) -> impl IntoResponse {
    let (entries, title, date) = match body {
        Some(Json(DownloadRequest {
            transcript: Some(entries),
            meeting_title,
            meeting_date,
        })) if !entries.is_empty() => {
            let session = state.session.read().await;
            (
                entries,
                meeting_title.unwrap_or_else(|| session.meeting_title().to_string()),
                meeting_date.unwrap_or_else(|| session.meeting_date().to_string()),
            )
        }
        _ => {
            let snapshot = state.session.read().await.snapshot();
            if snapshot.transcript.is_empty() {
                return error_response(StatusCode::CONFLICT, NO_CAPTIONS);
            }
            (
                snapshot.transcript,
                snapshot.meeting_title,
                snapshot.meeting_date,
            )
        }
    };

    write_download(&state, &title, &date, &entries)
}

/// GET /meetings
/// Saved meetings, most recently created first
pub async fn list_meetings(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    (StatusCode::OK, Json(store.records().to_vec())).into_response()
}

/// POST /meetings/:meeting_id/download
/// Export a saved meeting to a text file
pub async fn download_meeting(
    State(state): State<AppState>,
    Path(meeting_id): Path<i64>,
) -> impl IntoResponse {
    let store = state.store.read().await;

    match store.get(meeting_id) {
        Some(record) => write_download(&state, &record.title, &record.date, &record.transcript),
        None => error_response(
            StatusCode::NOT_FOUND,
            &format!("Meeting {} not found", meeting_id),
        ),
    }
}

/// DELETE /meetings/:meeting_id
/// Remove a saved meeting
pub async fn delete_meeting(
    State(state): State<AppState>,
    Path(meeting_id): Path<i64>,
) -> impl IntoResponse {
    let mut store = state.store.write().await;

    match store.delete(meeting_id) {
        Ok(true) => (StatusCode::OK, Json(StoreResponse { success: true })).into_response(),
        Ok(false) => error_response(
            StatusCode::NOT_FOUND,
            &format!("Meeting {} not found", meeting_id),
        ),
        Err(e) => {
            warn!("Failed to delete meeting {}: {:#}", meeting_id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update saved meetings.",
            )
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn write_download(
    state: &AppState,
    title: &str,
    date: &str,
    entries: &[CaptionEntry],
) -> axum::response::Response {
    match export::write_export(
        std::path::Path::new(&state.export.output_dir),
        title,
        date,
        entries,
        state.export.name_style,
    ) {
        Ok(path) => (
            StatusCode::OK,
            Json(DownloadResponse {
                file: path.display().to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            warn!("Export failed: {:#}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to write the export file. Check the export directory.",
            )
        }
    }
}
