//! # API Module
//!
//! HTTP endpoints served by the short-lived callback server that runs while
//! `lineupcli auth` waits for the user to grant access.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the authorization code from Spotify, exchanges it
//!   together with the PKCE verifier for a token and stores the token in the
//!   shared state polled by the auth flow. Both the shared state and the
//!   [`Config`](crate::config::Config) arrive as axum `Extension`s.
//! - [`health`] - Reports status and version, handy for checking that the
//!   configured `SERVER_ADDRESS` is reachable.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use lineupcli::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/health", get(health))
//!     .route(
//!         "/callback",
//!         get(callback).layer(Extension(state)).layer(Extension(config)),
//!     );
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
