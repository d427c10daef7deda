use reqwest::Url;

use crate::{
    config::Config,
    types::{SearchResponse, Track},
};

use super::{PageFetchError, get_json};

/// Looks up the best matching catalog track for an artist and title.
///
/// Used to attach URIs to streaming-history entries, which only carry names.
/// Returns `None` when the search has no hits.
pub async fn search_track(
    config: &Config,
    token: &str,
    artist: &str,
    track: &str,
) -> Result<Option<Track>, PageFetchError> {
    let query = format!("track:{} artist:{}", track, artist);
    let api_url = Url::parse_with_params(
        &format!("{}/search", config.api_url),
        &[("q", query.as_str()), ("type", "track"), ("limit", "1")],
    )
    .map_err(|e| PageFetchError::InvalidUrl(e.to_string()))?;

    let response = get_json::<SearchResponse>(api_url.as_str(), token).await?;
    Ok(response.tracks.items.into_iter().next())
}
