//! Plan exporters
//!
//! Two independent, pure renderers over a `TransitionPlan`: an M3U
//! interchange export and a human-readable text summary. Neither mutates
//! the plan; aside from the generation timestamp in the text export both
//! are deterministic for the same plan. A small M3U parser is provided for
//! exporter/importer consistency checks.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{Error, Result};
use crate::model::TransitionPlan;

/// Fixed header marker for the M3U interchange format
const M3U_HEADER: &str = "#EXTM3U";

/// Render a plan in the extended M3U playlist format
///
/// One directive pair per item: `#EXTINF:<secs>,<title>` with the resolved
/// play-window length rounded to the nearest second and the display title
/// ("Artist - Title", falling back to the identifier), then the playable
/// path reference.
pub fn to_m3u(plan: &TransitionPlan) -> String {
    let mut lines = Vec::with_capacity(1 + plan.items.len() * 2);
    lines.push(M3U_HEADER.to_string());
    for item in &plan.items {
        let duration = item.window_sec().round() as i64;
        lines.push(format!("#EXTINF:{},{}", duration, item.track.display_title()));
        lines.push(item.track.path.clone());
    }
    lines.join("\n")
}

/// One entry recovered from an M3U rendering
#[derive(Debug, Clone, PartialEq)]
pub struct M3uEntry {
    pub duration_sec: i64,
    pub title: String,
    pub path: String,
}

/// Parse an extended M3U playlist back into entries
///
/// Accepts the subset of the format `to_m3u` emits: header marker, then
/// `#EXTINF` / path line pairs. Order is preserved.
pub fn parse_m3u(text: &str) -> Result<Vec<M3uEntry>> {
    let mut lines = text.lines();
    match lines.next() {
        Some(first) if first.trim() == M3U_HEADER => {}
        _ => return Err(Error::InvalidInput("Missing #EXTM3U header".to_string())),
    }

    let mut entries = Vec::new();
    while let Some(line) = lines.next() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let info = line.strip_prefix("#EXTINF:").ok_or_else(|| {
            Error::InvalidInput(format!("Expected #EXTINF directive, got {:?}", line))
        })?;
        let (duration, title) = info.split_once(',').ok_or_else(|| {
            Error::InvalidInput(format!("Malformed #EXTINF directive: {:?}", line))
        })?;
        let duration_sec = duration.trim().parse().map_err(|_| {
            Error::InvalidInput(format!("Non-numeric #EXTINF duration: {:?}", duration))
        })?;
        let path = lines
            .next()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::InvalidInput(format!("Missing path line for {:?}", title)))?;
        entries.push(M3uEntry {
            duration_sec,
            title: title.to_string(),
            path: path.to_string(),
        });
    }
    Ok(entries)
}

/// Render the human-readable text summary, timestamped with the current time
pub fn to_txt(plan: &TransitionPlan) -> String {
    to_txt_at(plan, Utc::now())
}

/// Render the text summary with an explicit generation timestamp
///
/// Header line with the timestamp, a metadata line with the rounded total
/// duration and the average score (3 decimal places), then one enumerated
/// line per item with title, artist, tempo, and key.
pub fn to_txt_at(plan: &TransitionPlan, generated_at: DateTime<Utc>) -> String {
    let mut lines = Vec::with_capacity(3 + plan.items.len());
    lines.push(format!(
        "# AutoMix Playlist {}",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    lines.push(format!(
        "# total_sec={} avg_score={:.3}",
        plan.total_sec.round() as i64,
        plan.avg_score
    ));
    lines.push(String::new());
    for (index, item) in plan.items.iter().enumerate() {
        let track = &item.track;
        lines.push(format!(
            "{}. {} | {} | bpm={} | key={}",
            index + 1,
            track.title.as_deref().unwrap_or(&track.id),
            track.artist.as_deref().unwrap_or(""),
            track.bpm,
            track.key
        ));
    }
    lines.join("\n")
}
