use std::collections::HashSet;

use crate::{
    config::Config,
    selection::{
        PLAYLIST_ADD_LIMIT, Page, batch, collect_all_pages, deduplicate_for_insertion,
        normalize_identifier,
    },
    types::{AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, Paging, PlaylistItem},
};

use super::{PageFetchError, get_json, post_json};

pub const PLAYLIST_ITEMS_PAGE_SIZE: u32 = 100;

/// Retrieves one page of a playlist's items.
pub async fn playlist_items_page(
    config: &Config,
    token: &str,
    playlist_id: &str,
    next: Option<String>,
) -> Result<Page<PlaylistItem>, PageFetchError> {
    let api_url = next.unwrap_or_else(|| {
        format!(
            "{uri}/playlists/{id}/tracks?limit={limit}",
            uri = config.api_url,
            id = playlist_id,
            limit = PLAYLIST_ITEMS_PAGE_SIZE
        )
    });

    let paging = get_json::<Paging<PlaylistItem>>(&api_url, token).await?;
    Ok(paging.into())
}

/// Normalized URIs of every track currently in the playlist.
///
/// Items whose track is no longer available (`track: null`) are ignored.
pub async fn track_uris(
    config: &Config,
    token: &str,
    playlist_id: &str,
) -> Result<HashSet<String>, PageFetchError> {
    let items = collect_all_pages(|next| playlist_items_page(config, token, playlist_id, next)).await?;

    Ok(items
        .into_iter()
        .filter_map(|item| item.track)
        .map(|track| normalize_identifier(&track.uri))
        .collect())
}

/// Returns the candidate URIs the playlist does not contain yet, sorted.
pub async fn missing_tracks(
    config: &Config,
    token: &str,
    playlist_id: &str,
    candidates: &[String],
) -> Result<Vec<String>, PageFetchError> {
    let present = track_uris(config, token, playlist_id).await?;
    let candidates: HashSet<String> = candidates.iter().cloned().collect();

    let mut missing: Vec<String> = deduplicate_for_insertion(&candidates, &present)
        .into_iter()
        .collect();
    missing.sort();
    Ok(missing)
}

/// Adds up to 100 tracks to a playlist in a single call.
///
/// # Arguments
///
/// * `playlist_id` - Spotify ID of the target playlist
/// * `uris` - Track URIs (`spotify:track:…`), at most [`PLAYLIST_ADD_LIMIT`]
///
/// # Returns
///
/// The playlist's new snapshot id.
///
/// Prefer [`add_tracks_in_batches`] for lists of arbitrary length.
pub async fn add_tracks(
    config: &Config,
    token: &str,
    playlist_id: &str,
    uris: &[String],
) -> Result<AddTrackToPlaylistResponse, PageFetchError> {
    let api_url = format!(
        "{uri}/playlists/{id}/tracks",
        uri = config.api_url,
        id = playlist_id
    );

    let body = AddTrackToPlaylistRequest {
        uris: uris.to_vec(),
    };

    post_json(&api_url, token, &body).await
}

/// Adds every URI to a playlist, at most 100 per request.
///
/// Requests are sent one after another; the first failure stops the run.
/// Returns the number of URIs added.
pub async fn add_tracks_in_batches(
    config: &Config,
    token: &str,
    playlist_id: &str,
    uris: &[String],
) -> Result<usize, PageFetchError> {
    let mut added = 0;
    for chunk in batch(uris, PLAYLIST_ADD_LIMIT) {
        add_tracks(config, token, playlist_id, chunk).await?;
        added += chunk.len();
    }
    Ok(added)
}
