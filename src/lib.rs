//! Festival Lineup Playlist CLI Library
//!
//! This library builds Spotify playlists from a festival lineup, the user's
//! saved tracks and the user's listening history. It includes modules for API
//! communication, CLI operations, configuration management, date normalization
//! and the selection helpers shared by every playlist mutation.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints for the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration loaded once per process run
//! - `dates` - Normalization of heterogeneous date values
//! - `history` - Streaming-history export files
//! - `lineup` - Festival lineup documents
//! - `management` - OAuth token caching
//! - `selection` - Range filtering, pagination, deduplication and batching
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use lineupcli::{config, dates};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     config::load_env().await?;
//!     let cfg = config::Config::from_env()?;
//!     let start = dates::normalize("2025-03-08 20:00:00", cfg.default_timezone.as_deref())?;
//!     println!("{}", start);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod dates;
pub mod history;
pub mod lineup;
pub mod management;
pub mod selection;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Prints a status line prefixed with a blue `o`.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a status line prefixed with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line and exits with status 1.
///
/// Reserved for failures the command cannot continue from: missing
/// configuration, no cached token, a read path that failed after retries.
/// Because it never returns it can stand in for a value in a `match` arm:
///
/// ```rust,ignore
/// let token = match TokenManager::load().await {
///     Ok(manager) => manager,
///     Err(e) => error!("Failed to load token: {}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line for problems the run can skip past, such as a
/// history entry with an unreadable date or an unknown timezone.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
