use crate::{config::Config, error, info, lineup, spotify, success, utils, warning};

use super::{lineup::load_lineup, playlist::add_to_playlist};

pub async fn festival(
    config: &Config,
    url: Option<String>,
    playlist: Option<String>,
    dry_run: bool,
) {
    let url = super::lineup_url(url, config.lineup_url.clone());
    let playlist_id = super::playlist_id(config, playlist);

    let artists = load_lineup(&url).await;
    if artists.is_empty() {
        warning!("Lineup is empty, nothing to add.");
        return;
    }

    let token = super::access_token(config).await;

    let pb = utils::spinner("Fetching saved tracks...");
    let saved = match spotify::library::saved_tracks(config, &token).await {
        Ok(saved) => saved,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to fetch saved tracks: {}", e);
        }
    };
    pb.finish_and_clear();
    success!("Fetched {} saved tracks", saved.len());

    let matches = lineup::match_tracks_by_artists(&saved, &artists);
    info!(
        "Found {} saved tracks by {} lineup artists",
        matches.len(),
        artists.len()
    );

    add_to_playlist(config, &token, &playlist_id, &matches, dry_run).await;
}
