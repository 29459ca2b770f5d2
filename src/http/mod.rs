//! HTTP surface for the capture service
//!
//! The message envelope between the capture loop and its callers: snapshot
//! and signal delivery in, transcript retrieval, storage, and export out.

pub mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
