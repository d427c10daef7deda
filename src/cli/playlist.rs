use std::collections::HashMap;

use tabled::Table;

use crate::{
    config::Config,
    error, info,
    selection::normalize_identifier,
    spotify, success,
    types::{Track, TrackTableRow},
    utils,
};

/// Adds the tracks the playlist does not contain yet.
///
/// With `dry_run` the missing tracks are printed instead of added.
pub(super) async fn add_to_playlist(
    config: &Config,
    token: &str,
    playlist_id: &str,
    tracks: &[Track],
    dry_run: bool,
) {
    if tracks.is_empty() {
        info!("No tracks to add.");
        return;
    }

    let candidates: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();

    let pb = utils::spinner("Fetching playlist contents...");
    let missing =
        match spotify::playlist::missing_tracks(config, token, playlist_id, &candidates).await {
            Ok(missing) => missing,
            Err(e) => {
                pb.finish_and_clear();
                error!("Failed to fetch playlist '{}': {}", playlist_id, e);
            }
        };
    pb.finish_and_clear();

    if missing.is_empty() {
        success!(
            "Playlist '{}' already contains all {} tracks.",
            playlist_id,
            candidates.len()
        );
        return;
    }

    if dry_run {
        let by_uri: HashMap<String, &Track> = tracks
            .iter()
            .map(|t| (normalize_identifier(&t.uri), t))
            .collect();
        let table_rows: Vec<TrackTableRow> = missing
            .iter()
            .filter_map(|uri| by_uri.get(uri))
            .map(|track| TrackTableRow::from(*track))
            .collect();

        println!("{}", Table::new(table_rows));
        info!(
            "Dry run: {} tracks would be added to playlist '{}'.",
            missing.len(),
            playlist_id
        );
        return;
    }

    info!(
        "Adding {} tracks to playlist '{}'.",
        missing.len(),
        playlist_id
    );

    match spotify::playlist::add_tracks_in_batches(config, token, playlist_id, &missing).await {
        Ok(added) => success!("Added {} tracks to playlist '{}'.", added, playlist_id),
        Err(e) => error!("Failed to add tracks to playlist: {}", e),
    }
}
