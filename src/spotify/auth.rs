use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error,
    management::TokenManager,
    server::start_api_server,
    success,
    types::{PkceToken, Token, TokenResponse},
    utils, warning,
};

/// Seconds the callback server waits for the user to finish authorization.
const AUTH_TIMEOUT_SECS: u64 = 120;

/// Runs the OAuth 2.0 PKCE authorization flow and caches the resulting token.
///
/// A local callback server is started on `config.server_addr`, the Spotify
/// consent page is opened in the browser and the function waits until the
/// callback handler has exchanged the authorization code for a token. The
/// token is then written to the token cache used by every other command.
///
/// # Arguments
///
/// * `config` - Runtime configuration with client id, redirect URI and scope
/// * `shared_state` - PKCE verifier and resulting token, shared with the
///   callback handler
///
/// # Error Handling
///
/// - Browser launch failures print the URL for manual navigation
/// - Token persistence failures and timeouts terminate the program
///
/// # Example
///
/// ```rust,ignore
/// let shared_state = Arc::new(Mutex::new(None));
/// auth(Arc::new(config), shared_state).await;
/// ```
pub async fn auth(config: Arc<Config>, shared_state: Arc<Mutex<Option<PkceToken>>>) {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let server_state = Arc::clone(&shared_state);
    let server_config = Arc::clone(&config);
    tokio::spawn(async move {
        start_api_server(server_state, server_config).await;
    });

    let auth_url = match authorize_url(&config, &code_challenge) {
        Ok(url) => url,
        Err(e) => error!("Invalid SPOTIFY_API_AUTH_URL '{}': {}", config.auth_url, e),
    };

    *shared_state.lock().await = Some(PkceToken {
        code_verifier,
        token: None,
    });

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Could not open a browser. Open this URL to grant access:\n{}",
            auth_url
        )
    }

    let Some(token) = wait_for_token(shared_state).await else {
        error!(
            "No authorization received within {} seconds.",
            AUTH_TIMEOUT_SECS
        );
    };

    if let Err(e) = TokenManager::new(token).persist().await {
        error!("Failed to save token to cache: {}", e);
    }

    success!("Authentication successful!");
}

/// Consent page URL for the PKCE flow, with every parameter form-encoded.
fn authorize_url(config: &Config, code_challenge: &str) -> Result<Url, String> {
    Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("scope", config.scope.as_str()),
        ],
    )
    .map_err(|e| e.to_string())
}

/// Polls the shared state once per second until the callback handler has
/// stored a token, giving up after [`AUTH_TIMEOUT_SECS`].
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(AUTH_TIMEOUT_SECS);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(pkce_token) = lock.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges a refresh token for a new access token.
///
/// Spotify may rotate the refresh token; when the response omits it the old
/// one is kept. Errors are returned as strings because the token cache only
/// logs them and keeps using the current token.
pub async fn refresh_token(config: &Config, refresh_token: &str) -> Result<Token, String> {
    let client = Client::new();
    let res = client
        .post(&config.token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", config.client_id.as_str()),
        ])
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| e.to_string())?;

    let json = res.json::<TokenResponse>().await.map_err(|e| e.to_string())?;

    // Spotify may omit the refresh token when it does not rotate it
    let fallback = refresh_token.to_string();
    Ok(into_token(json, Some(fallback)))
}

/// Exchanges the authorization code from the OAuth callback for a token.
///
/// `verifier` must be the PKCE code verifier whose challenge was sent with the
/// authorization request. The code is single-use and expires after a few
/// minutes.
pub async fn exchange_code_pkce(
    config: &Config,
    code: &str,
    verifier: &str,
) -> Result<Token, reqwest::Error> {
    let client = Client::new();
    let res = client
        .post(&config.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", config.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json = res.json::<TokenResponse>().await?;
    Ok(into_token(json, None))
}

fn into_token(response: TokenResponse, fallback_refresh: Option<String>) -> Token {
    Token {
        access_token: response.access_token,
        refresh_token: response
            .refresh_token
            .or(fallback_refresh)
            .unwrap_or_default(),
        scope: response.scope,
        expires_in: response.expires_in.unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    }
}
