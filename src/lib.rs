pub mod capture;
pub mod config;
pub mod export;
pub mod http;
pub mod store;

pub use capture::{
    CaptionEntry, CaptureConfig, CaptureEvent, CaptureLoop, CaptureSession, CaptureStats,
    RawCaption, Transcript, TranscriptSnapshot,
};
pub use config::Config;
pub use export::NameStyle;
pub use http::{create_router, AppState};
pub use store::{MeetingStore, SessionRecord};
