//! Bounded persistence of past meeting sessions
//!
//! Sessions are kept in a single JSON file, most-recently-created first,
//! capped at a fixed capacity. The upsert key is (title, date): repeated
//! saves of the same meeting update one record in place instead of
//! appending duplicates.

use crate::capture::CaptionEntry;
use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default bound on stored sessions; the oldest record is evicted beyond it
pub const DEFAULT_CAPACITY: usize = 20;

/// One persisted meeting session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Millisecond timestamp at creation; display identity only, the upsert
    /// key is (title, date)
    pub id: i64,

    pub title: String,
    pub date: String,

    /// Time of day of the first transcript entry
    pub start_time: String,

    /// Time of day of the last transcript entry
    pub end_time: String,

    pub transcript: Vec<CaptionEntry>,

    /// Millisecond timestamp of the last upsert
    pub last_updated: i64,
}

/// Whether an upsert created a record or updated an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// File-backed collection of saved meetings
pub struct MeetingStore {
    path: PathBuf,
    capacity: usize,
    records: Vec<SessionRecord>,
}

impl MeetingStore {
    /// Load the collection from `path`. A missing file starts empty; an
    /// unreadable or unparsable file is logged and also starts empty, so a
    /// damaged store never blocks capture.
    pub fn load(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();

        let records = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<SessionRecord>>(&contents) {
                Ok(records) => {
                    info!("Loaded {} saved meetings from {:?}", records.len(), path);
                    records
                }
                Err(e) => {
                    warn!("Saved meetings file {:?} is unreadable ({}), starting empty", path, e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        Self {
            path,
            capacity,
            records,
        }
    }

    /// Records, most recently created first
    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&SessionRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Insert or update the record for (title, date).
    ///
    /// An existing record keeps its position and id; a new record is
    /// prepended and the collection is trimmed from the back down to
    /// capacity. An empty transcript is a caller error, not a silent no-op.
    pub fn upsert(
        &mut self,
        title: &str,
        date: &str,
        transcript: Vec<CaptionEntry>,
    ) -> Result<UpsertOutcome> {
        if transcript.is_empty() {
            bail!("no captions captured yet");
        }

        let start_time = transcript
            .first()
            .map(|entry| entry.captured_at.clone())
            .unwrap_or_default();
        let end_time = transcript
            .last()
            .map(|entry| entry.captured_at.clone())
            .unwrap_or_default();
        let now = Utc::now().timestamp_millis();

        let existing = self
            .records
            .iter()
            .position(|record| record.title == title && record.date == date);

        let outcome = match existing {
            Some(index) => {
                let record = &mut self.records[index];
                record.start_time = start_time;
                record.end_time = end_time;
                record.transcript = transcript;
                record.last_updated = now;
                UpsertOutcome::Updated
            }
            None => {
                // Ids are creation timestamps; bump on same-millisecond collision
                let mut id = now;
                while self.records.iter().any(|record| record.id == id) {
                    id += 1;
                }

                self.records.insert(
                    0,
                    SessionRecord {
                        id,
                        title: title.to_string(),
                        date: date.to_string(),
                        start_time,
                        end_time,
                        transcript,
                        last_updated: now,
                    },
                );

                while self.records.len() > self.capacity {
                    let evicted = self.records.pop();
                    if let Some(evicted) = evicted {
                        info!(
                            "Evicting oldest saved meeting: {} ({})",
                            evicted.title, evicted.date
                        );
                    }
                }

                UpsertOutcome::Created
            }
        };

        self.save()?;
        Ok(outcome)
    }

    /// Remove a record by id. Returns false when no record matched.
    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);

        if self.records.len() == before {
            return Ok(false);
        }

        self.save()?;
        Ok(true)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create store directory {:?}", parent))?;
            }
        }

        let contents = serde_json::to_string_pretty(&self.records)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write saved meetings to {:?}", self.path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
