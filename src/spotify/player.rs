use crate::{
    config::Config,
    selection::{Page, collect_all_pages},
    types::{Paging, PlayHistory},
};

use super::{PageFetchError, get_json};

pub const RECENTLY_PLAYED_PAGE_SIZE: u32 = 50;

/// Retrieves one page of the user's recently played tracks.
///
/// Spotify only keeps the last 50 plays available through this endpoint, so
/// the history command reads older listening data from an export file.
///
/// # Arguments
///
/// * `config` - Runtime configuration providing the API base URL
/// * `token` - Valid access token with the `user-read-recently-played` scope
/// * `after_ms` - Only return plays after this Unix timestamp in milliseconds
/// * `next` - `next` URL of the previous page, `None` for the first page
pub async fn recently_played_page(
    config: &Config,
    token: &str,
    after_ms: Option<i64>,
    next: Option<String>,
) -> Result<Page<PlayHistory>, PageFetchError> {
    let api_url = next.unwrap_or_else(|| {
        let mut url = format!(
            "{uri}/me/player/recently-played?limit={limit}",
            uri = config.api_url,
            limit = RECENTLY_PLAYED_PAGE_SIZE
        );
        if let Some(after) = after_ms {
            url.push_str(&format!("&after={}", after));
        }
        url
    });

    let paging = get_json::<Paging<PlayHistory>>(&api_url, token).await?;
    Ok(paging.into())
}

pub async fn recently_played(
    config: &Config,
    token: &str,
    after_ms: Option<i64>,
) -> Result<Vec<PlayHistory>, PageFetchError> {
    collect_all_pages(|next| recently_played_page(config, token, after_ms, next)).await
}
