use crate::{
    config::Config,
    selection::{Page, collect_all_pages},
    types::{Paging, SavedTrack},
};

use super::{PageFetchError, get_json};

/// Largest page size `/me/tracks` accepts.
pub const SAVED_TRACKS_PAGE_SIZE: u32 = 50;

/// Retrieves one page of the user's saved tracks.
///
/// # Arguments
///
/// * `config` - Runtime configuration providing the API base URL
/// * `token` - Valid access token with the `user-library-read` scope
/// * `next` - `next` URL of the previous page, `None` for the first page
///
/// # Example
///
/// ```rust,ignore
/// let first = saved_tracks_page(&config, &token, None).await?;
/// if let Some(next) = first.next {
///     let second = saved_tracks_page(&config, &token, Some(next)).await?;
/// }
/// ```
pub async fn saved_tracks_page(
    config: &Config,
    token: &str,
    next: Option<String>,
) -> Result<Page<SavedTrack>, PageFetchError> {
    let api_url = next.unwrap_or_else(|| {
        format!(
            "{uri}/me/tracks?limit={limit}",
            uri = config.api_url,
            limit = SAVED_TRACKS_PAGE_SIZE
        )
    });

    let paging = get_json::<Paging<SavedTrack>>(&api_url, token).await?;
    Ok(paging.into())
}

/// Retrieves the complete saved-tracks library in the order Spotify lists it
/// (most recently saved first).
pub async fn saved_tracks(config: &Config, token: &str) -> Result<Vec<SavedTrack>, PageFetchError> {
    collect_all_pages(|next| saved_tracks_page(config, token, next)).await
}
