use chrono::Utc;
use reqwest::Client;

use crate::{
    client::send_json,
    config::SpotifyConfig,
    errors::{Provider, ProviderError},
    types::ClientCredentialsResponse,
};

/// Seconds before expiry at which a token is already treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// An app-level access token from the client-credentials flow.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl AccessToken {
    pub fn new(access_token: String, expires_in: u64, obtained_at: u64) -> Self {
        Self {
            access_token,
            expires_in,
            obtained_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp() as u64)
    }

    /// Expiry check against an explicit unix timestamp.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now + EXPIRY_MARGIN_SECS >= self.obtained_at + self.expires_in
    }
}

/// Performs the client-credentials handshake.
///
/// Posts `grant_type=client_credentials` to the token endpoint with the
/// client id and secret as HTTP basic auth. The resulting token carries no
/// user scope and is only good for catalog endpoints.
///
/// # Errors
///
/// Network failures surface as [`ProviderError::Transport`]; rejected
/// credentials as [`ProviderError::Unauthorized`] or
/// [`ProviderError::Status`] depending on the status Spotify picks.
pub async fn request_token(http: &Client, config: &SpotifyConfig) -> Result<AccessToken, ProviderError> {
    let request = http
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[("grant_type", "client_credentials")]);

    let response: ClientCredentialsResponse = send_json(Provider::Spotify, request).await?;

    Ok(AccessToken::new(
        response.access_token,
        response.expires_in,
        Utc::now().timestamp() as u64,
    ))
}
