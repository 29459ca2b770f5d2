use anyhow::{Context, Result};
use caption_scribe::capture::{CaptureLoop, CaptureSession};
use caption_scribe::{AppState, Config, MeetingStore};
use clap::Parser;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "caption-scribe", about = "Capture and persist live meeting captions")]
struct Args {
    /// Configuration file, without extension
    #[arg(long, default_value = "config/caption-scribe")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("caption-scribe v0.1.0");
    info!("Loaded config: {}", cfg.service.name);
    info!(
        "HTTP server will bind to {}:{}",
        cfg.service.http.bind, cfg.service.http.port
    );
    info!("Saved meetings file: {}", cfg.storage.path);
    info!("Export directory: {}", cfg.export.output_dir);

    let store = Arc::new(RwLock::new(MeetingStore::load(
        &cfg.storage.path,
        cfg.storage.capacity,
    )));
    let session = Arc::new(RwLock::new(CaptureSession::new(cfg.capture.leave_trigger)));

    let (events_tx, events_rx) = mpsc::channel(64);

    let capture_loop = CaptureLoop::new(
        Arc::clone(&session),
        Arc::clone(&store),
        cfg.capture.clone(),
        cfg.export.clone(),
    );
    tokio::spawn(async move {
        if let Err(e) = capture_loop.run(events_rx).await {
            error!("Capture loop failed: {:#}", e);
        }
    });

    let state = AppState::new(session, store, events_tx, cfg.export.clone());
    let router = caption_scribe::create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
