//! Festival lineups.
//!
//! Lineup documents are JSON objects keyed by an internal artist id, each
//! value holding the performer's display name under `title`:
//!
//! ```json
//! { "1021": { "title": "Bicep", "day": "Friday" }, "1022": { "title": "Aurora" } }
//! ```

use std::collections::HashSet;

use reqwest::Client;
use serde_json::Value;

use crate::{
    types::{SavedTrack, Track},
    warning,
};

/// Downloads a lineup document and returns the sorted artist names.
pub async fn fetch_lineup(url: &str) -> Result<Vec<String>, reqwest::Error> {
    let client = Client::new();
    let document = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<Value>()
        .await?;

    Ok(parse_lineup(&document))
}

/// Extracts the sorted artist names from a lineup document.
///
/// Entries without a string `title` are skipped. Anything other than a JSON
/// object yields an empty lineup.
pub fn parse_lineup(document: &Value) -> Vec<String> {
    let Some(entries) = document.as_object() else {
        warning!("Lineup document is not a JSON object");
        return Vec::new();
    };

    let mut artists: Vec<String> = entries
        .iter()
        .filter_map(|(key, entry)| match entry.get("title").and_then(Value::as_str) {
            Some(title) => Some(title.trim().to_string()),
            None => {
                warning!("Lineup entry {} has no title", key);
                None
            }
        })
        .collect();

    artists.sort();
    artists
}

/// Saved tracks with at least one artist on the lineup, in library order.
///
/// Artist names are compared case-insensitively.
pub fn match_tracks_by_artists(saved: &[SavedTrack], artists: &[String]) -> Vec<Track> {
    let lineup: HashSet<String> = artists.iter().map(|a| a.trim().to_lowercase()).collect();

    saved
        .iter()
        .filter(|item| {
            item.track
                .artists
                .iter()
                .any(|artist| lineup.contains(&artist.name.trim().to_lowercase()))
        })
        .map(|item| item.track.clone())
        .collect()
}
