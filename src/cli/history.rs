use std::{collections::HashSet, path::PathBuf};

use crate::{
    config::Config,
    dates::{CanonicalInstant, DateNormalizer},
    error,
    history::{self, HistoryEntry},
    info,
    selection::{check_bounds, select_in_range_with},
    spotify, success,
    types::Track,
    utils, warning,
};

use super::playlist::add_to_playlist;

pub struct HistoryRequest {
    pub start: String,
    pub end: String,
    pub timezone: Option<String>,
    pub strict_timezone: bool,
    pub file: Option<PathBuf>,
    pub playlist: Option<String>,
    pub dry_run: bool,
}

pub async fn history(config: &Config, request: HistoryRequest) {
    let normalizer = if request.strict_timezone {
        DateNormalizer::strict()
    } else {
        DateNormalizer::lenient()
    };
    let timezone = request.timezone.or_else(|| config.default_timezone.clone());
    let playlist_id = super::playlist_id(config, request.playlist);

    let start = parse_bound(&normalizer, &request.start, timezone.as_deref());
    let end = parse_bound(&normalizer, &request.end, timezone.as_deref());

    if let Err(e) = check_bounds(&start, &end) {
        warning!("{}. Nothing to add.", e);
        return;
    }

    info!("Selecting plays from {} to {}", start, end);

    let token = super::access_token(config).await;

    let tracks = match request.file {
        Some(path) => tracks_from_file(config, &token, &normalizer, path, &start, &end).await,
        None => tracks_from_recently_played(config, &token, &normalizer, &start, &end).await,
    };

    add_to_playlist(config, &token, &playlist_id, &tracks, request.dry_run).await;
}

// Bounds without a timezone are read in system-local time, like the history
// API's own epoch cursors.
fn parse_bound(normalizer: &DateNormalizer, raw: &str, timezone: Option<&str>) -> CanonicalInstant {
    let instant = match normalizer.normalize(raw, timezone) {
        Ok(instant) => instant,
        Err(e) => error!("Invalid date '{}': {}", raw, e),
    };

    match instant {
        CanonicalInstant::Aware(_) => instant,
        CanonicalInstant::Naive(_) => match instant.to_utc() {
            Some(utc) => CanonicalInstant::Aware(utc),
            None => error!("'{}' does not exist in the local timezone", raw),
        },
    }
}

async fn tracks_from_recently_played(
    config: &Config,
    token: &str,
    normalizer: &DateNormalizer,
    start: &CanonicalInstant,
    end: &CanonicalInstant,
) -> Vec<Track> {
    // `after` is exclusive on Spotify's side
    let after_ms = start.epoch_millis().ok().map(|ms| ms - 1);

    let pb = utils::spinner("Fetching recently played tracks...");
    let plays = match spotify::player::recently_played(config, token, after_ms).await {
        Ok(plays) => plays,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to fetch recently played tracks: {}", e);
        }
    };
    pb.finish_and_clear();

    let selected = select_in_range_with(normalizer, plays, start, end);
    success!("Found {} plays in range", selected.len());

    let mut seen = HashSet::new();
    selected
        .into_iter()
        .map(|play| play.track)
        .filter(|track| seen.insert(track.uri.clone()))
        .collect()
}

async fn tracks_from_file(
    config: &Config,
    token: &str,
    normalizer: &DateNormalizer,
    path: PathBuf,
    start: &CanonicalInstant,
    end: &CanonicalInstant,
) -> Vec<Track> {
    let entries: Vec<HistoryEntry> = match history::load_history_file(&path).await {
        Ok(entries) => entries,
        Err(e) => error!("{} ({})", e, path.display()),
    };

    let selected = select_in_range_with(normalizer, &entries, start, end);
    let pairs = history::unique_tracks(selected);
    success!(
        "Found {} distinct tracks in range in {}",
        pairs.len(),
        path.display()
    );

    let pb = utils::spinner("Looking up tracks...");
    let mut tracks = Vec::new();
    for (artist, title) in pairs {
        pb.set_message(format!("Looking up {} - {}", artist, title));
        match spotify::search::search_track(config, token, &artist, &title).await {
            Ok(Some(track)) => tracks.push(track),
            Ok(None) => pb.suspend(|| warning!("No match for {} - {}", artist, title)),
            Err(e) => pb.suspend(|| warning!("Lookup of {} - {} failed: {}", artist, title, e)),
        }
    }
    pb.finish_and_clear();

    tracks
}
