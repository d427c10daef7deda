//! # Spotify Integration Module
//!
//! This module is the integration layer between lineupcli and the Spotify Web
//! API. It handles HTTP communication, the OAuth flow, retries and the paging
//! objects every list endpoint returns.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI)
//!          ↓
//! Selection Layer (range filter, pager, dedup, batches)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE)
//!     ├── Library (saved tracks)
//!     ├── Player (recently played)
//!     ├── Playlist (contents, add items)
//!     └── Search (track lookup)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Pagination
//!
//! Every list endpoint exposes a `*_page` function that fetches one page and
//! returns a [`Page`](crate::selection::Page) whose cursor is the `next` URL
//! Spotify hands back. The matching collection function drains it through
//! [`collect_all_pages`](crate::selection::collect_all_pages), so there is one
//! paging loop for the whole crate. Pages are requested sequentially.
//!
//! ## Error Handling
//!
//! All requests go through one helper that:
//! - retries `502 Bad Gateway` after 10 seconds (reads only)
//! - honors `429 Too Many Requests` `Retry-After` delays up to 120 seconds
//! - gives up after [`MAX_ATTEMPTS`] attempts
//!
//! Failures surface as [`PageFetchError`] and are never retried by callers.
//!
//! ## API Coverage
//!
//! - `GET /me/tracks` - Saved tracks
//! - `GET /me/player/recently-played` - Play history
//! - `GET /playlists/{id}/tracks` - Playlist contents
//! - `POST /playlists/{id}/tracks` - Add tracks (max 100 per call)
//! - `GET /search` - Track lookup for history-file entries
//! - `POST /api/token` - Token exchange and refresh

pub mod auth;
pub mod library;
pub mod player;
pub mod playlist;
pub mod search;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::time::sleep;

use crate::warning;

/// Attempts per request, including the first one.
pub const MAX_ATTEMPTS: u32 = 5;

/// Longest `Retry-After` delay the client waits for.
pub const MAX_RETRY_AFTER_SECS: u64 = 120;

const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum PageFetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate limited by Spotify for {0} seconds")]
    RateLimited(u64),
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

pub(crate) async fn get_json<T>(url: &str, token: &str) -> Result<T, PageFetchError>
where
    T: DeserializeOwned,
{
    let client = Client::new();
    let response = send_with_retry(|| client.get(url).bearer_auth(token), true).await?;
    Ok(response.json::<T>().await?)
}

pub(crate) async fn post_json<B, T>(url: &str, token: &str, body: &B) -> Result<T, PageFetchError>
where
    B: Serialize,
    T: DeserializeOwned,
{
    let client = Client::new();
    // a 502 does not tell whether the items were added, so posts are not retried on it
    let response = send_with_retry(|| client.post(url).bearer_auth(token).json(body), false).await?;
    Ok(response.json::<T>().await?)
}

async fn send_with_retry<F>(build: F, retry_bad_gateway: bool) -> Result<Response, PageFetchError>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 1;

    loop {
        let response = build().send().await?;
        let status = response.status();

        if attempt < MAX_ATTEMPTS {
            if status == StatusCode::BAD_GATEWAY && retry_bad_gateway {
                sleep(BAD_GATEWAY_DELAY).await;
                attempt += 1;
                continue; // retry
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = retry_after_secs(&response);
                if retry_after > MAX_RETRY_AFTER_SECS {
                    warning!(
                        "Retry after has reached an abnormal high of {} seconds. Try again later.",
                        retry_after
                    );
                    return Err(PageFetchError::RateLimited(retry_after));
                }
                sleep(Duration::from_secs(retry_after)).await;
                attempt += 1;
                continue; // retry
            }
        }

        return Ok(response.error_for_status()?);
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(1)
}
