//! Streaming-history export files.
//!
//! Spotify's privacy export contains `StreamingHistory*.json` files, each an
//! array of `{artistName, trackName, endTime, msPlayed}` records. `endTime` is
//! written in UTC without an offset (`2025-03-08 20:15`), so every entry
//! reports `UTC` as its timezone hint.

use std::{collections::HashSet, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{dates::DateInput, selection::TimestampedEntity};

#[derive(Debug, Error)]
pub enum HistoryFileError {
    #[error("cannot read history file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse history file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub artist_name: String,
    pub track_name: String,
    pub end_time: String,
    #[serde(default)]
    pub ms_played: Option<u64>,
}

impl TimestampedEntity for HistoryEntry {
    fn timestamp(&self) -> DateInput {
        DateInput::Text(self.end_time.clone())
    }

    fn timezone_hint(&self) -> Option<&str> {
        Some("UTC")
    }
}

pub async fn load_history_file(path: &Path) -> Result<Vec<HistoryEntry>, HistoryFileError> {
    let content = async_fs::read_to_string(path).await?;
    Ok(parse_history(&content)?)
}

pub fn parse_history(content: &str) -> Result<Vec<HistoryEntry>, serde_json::Error> {
    serde_json::from_str(content)
}

/// Unique `(artist, track)` pairs in first-seen order.
///
/// Pairs differing only in letter case count as the same track.
pub fn unique_tracks<'a, I>(entries: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = &'a HistoryEntry>,
{
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| {
            seen.insert((
                e.artist_name.to_lowercase(),
                e.track_name.to_lowercase(),
            ))
        })
        .map(|e| (e.artist_name.clone(), e.track_name.clone()))
        .collect()
}
