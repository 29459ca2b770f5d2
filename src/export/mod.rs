//! Plain-text transcript export
//!
//! Renders a transcript to a flat document, one line per caption, with a
//! configurable speaker-name compaction strategy, and writes it under a
//! filesystem-safe name derived from the meeting title and date.

use crate::capture::CaptionEntry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// How speaker names are rendered in exported transcripts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameStyle {
    /// Trimmed display name, unmodified
    Full,

    /// First whitespace token after dropping parenthesized annotations
    #[default]
    FirstName,

    /// First token plus the initial of the following token
    FirstNameLastInitial,
}

/// Compact a speaker display name according to `style`.
///
/// Hyphenated names are emitted verbatim for every compacting style, since
/// splitting them produces misleading fragments. Parenthesized annotations
/// such as external-participant markers are dropped before token splitting.
pub fn compact_name(name: &str, style: NameStyle) -> String {
    if style == NameStyle::Full || name.contains('-') {
        return name.trim().to_string();
    }

    let stripped = strip_parenthesized(name);
    let mut tokens = stripped.split_whitespace();
    let Some(first) = tokens.next() else {
        return String::new();
    };

    if style == NameStyle::FirstNameLastInitial {
        if let Some(initial) = tokens.next().and_then(|token| token.chars().next()) {
            return format!("{first} {initial}");
        }
    }

    first.to_string()
}

/// Remove parenthesized spans, e.g. `"John Smith (External)"` → `"John Smith "`
fn strip_parenthesized(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;

    for ch in name.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }

    out
}

/// Render a transcript as a flat text document: a meeting-date header, a
/// blank line, then one `[time] name: text` line per entry in stored order.
pub fn render(entries: &[CaptionEntry], meeting_date: &str, style: NameStyle) -> String {
    let body = entries
        .iter()
        .map(|entry| {
            format!(
                "[{}] {}: {}",
                entry.captured_at,
                compact_name(&entry.speaker, style),
                entry.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("Meeting Date: {meeting_date}\n\n{body}")
}

/// Filesystem-safe export name: every non-alphanumeric character in the
/// title becomes `_`, slashes in the date become `-`
pub fn export_file_name(title: &str, date: &str) -> String {
    let title = if title.trim().is_empty() {
        "Meeting"
    } else {
        title
    };

    let sanitized_title: String = title
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();
    let sanitized_date = date.replace('/', "-");

    format!("{sanitized_title}_{sanitized_date}.txt")
}

/// Render and write a transcript under `dir`, returning the written path
pub fn write_export(
    dir: &Path,
    title: &str,
    date: &str,
    entries: &[CaptionEntry],
    style: NameStyle,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {:?}", dir))?;

    let path = dir.join(export_file_name(title, date));
    let document = render(entries, date, style);
    fs::write(&path, document)
        .with_context(|| format!("Failed to write export file {:?}", path))?;

    info!("Exported {} captions to {:?}", entries.len(), path);
    Ok(path)
}
