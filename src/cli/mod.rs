//! # CLI Module
//!
//! This module provides the command-line interface layer for lineupcli. It
//! implements the user-facing commands and coordinates the Spotify client,
//! the selection helpers and the user feedback.
//!
//! ## Commands
//!
//! - [`auth`] - Runs the Spotify OAuth flow and caches the token
//! - [`lineup`] - Prints the artists of a festival lineup
//! - [`festival`] - Adds liked songs by lineup artists to a playlist
//! - [`history`] - Adds tracks played within a time range to a playlist
//!
//! ## Data Flow
//!
//! ```text
//! lineup JSON ──┐
//!               ├─ match artists ─┐
//! saved tracks ─┘                 │
//!                                 ├─ dedup against playlist ─ batches of 100 ─ POST
//! play history ── range filter ───┘
//! ```
//!
//! Every read path drains its endpoint page by page before anything is
//! written. A playlist mutation is only issued for tracks the playlist does
//! not contain yet, so running a command twice adds nothing the second time.
//!
//! ## Error Handling
//!
//! - Missing configuration, tokens or unreadable inputs end the program with
//!   an `error!` message naming the fix
//! - Single bad records (unparsable dates, tracks without search hits) are
//!   skipped with a warning
//!
//! ## Usage Patterns
//!
//! ```bash
//! lineupcli auth
//! lineupcli lineup --url https://example.com/artists.json
//! lineupcli festival --dry-run
//! lineupcli history --start "2025-03-08 20:00" --end "2025-03-09 03:00" --timezone US/Pacific
//! lineupcli history --file StreamingHistory0.json --start 2025-03-01 --end 2025-03-31
//! ```

mod auth;
mod festival;
mod history;
mod lineup;
mod playlist;

pub use auth::auth;
pub use festival::festival;
pub use history::{HistoryRequest, history};
pub use lineup::lineup;

use crate::{config::Config, error, management::TokenManager};

async fn access_token(config: &Config) -> String {
    let mut token_mgr = match TokenManager::load().await {
        Ok(manager) => manager,
        Err(e) => {
            error!(
                "Failed to load token. Please run lineupcli auth\n Error: {}",
                e
            );
        }
    };

    token_mgr.get_valid_token(config).await
}

fn playlist_id(config: &Config, flag: Option<String>) -> String {
    match flag.or_else(|| config.playlist_id.clone()) {
        Some(id) => id,
        None => error!("No playlist given. Pass --playlist or set SPOTIFY_PLAYLIST_ID."),
    }
}

fn lineup_url(flag: Option<String>, configured: Option<String>) -> String {
    match flag.or(configured) {
        Some(url) => url,
        None => error!("No lineup given. Pass --url or set FESTIVAL_LINEUP_URL."),
    }
}
