//! # Spotify Integration Module
//!
//! Catalog and audio-feature provider. The crawlers only need app-level
//! access, so the client authenticates with the OAuth 2.0 client-credentials
//! flow and never touches user data.
//!
//! ## Operations
//!
//! - [`SpotifyClient::audio_features`] - `GET /audio-features?ids=...`, at
//!   most [`features::MAX_AUDIO_FEATURE_IDS`] ids per call. Ids Spotify has
//!   no data for come back as `null` and are kept as `None` so the result
//!   lines up with the request.
//! - [`SpotifyClient::find_playlist`] - `GET /search?type=playlist`, first
//!   result whose name equals the query exactly.
//! - [`SpotifyClient::playlist_tracks`] - `GET /playlists/{id}/tracks` as a
//!   [`crate::pipeline::paginator::PageSource`] that follows the `next` URLs.
//!
//! ## Token handling
//!
//! The access token is renewed before each request once it is within four
//! minutes of expiry. When Spotify still answers `401`, the pipeline calls
//! [`Reconnect::reconnect`], which performs a fresh handshake with a new
//! HTTP client; the caller then repeats the request once.

pub mod auth;
pub mod features;
pub mod playlists;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    client::{Reconnect, http_client, send_json},
    config::SpotifyConfig,
    errors::{Provider, ProviderError},
};

use auth::AccessToken;

/// Authenticated Spotify Web API client.
///
/// The client owns its configuration and token exclusively.
pub struct SpotifyClient {
    config: SpotifyConfig,
    http: Client,
    token: AccessToken,
}

impl SpotifyClient {
    /// Builds a client and performs the initial handshake.
    pub async fn connect(config: SpotifyConfig) -> Result<Self, ProviderError> {
        let http = http_client();
        let token = auth::request_token(&http, &config).await?;
        Ok(Self {
            config,
            http,
            token,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn bearer(&mut self) -> Result<String, ProviderError> {
        if self.token.is_expired() {
            self.token = auth::request_token(&self.http, &self.config).await?;
        }
        Ok(self.token.access_token.clone())
    }

    async fn get<T: DeserializeOwned>(
        &mut self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let token = self.bearer().await?;
        let request = self.http.get(url).bearer_auth(token).query(query);
        send_json(Provider::Spotify, request).await
    }
}

impl Reconnect for SpotifyClient {
    async fn reconnect(&mut self) -> Result<(), ProviderError> {
        self.http = http_client();
        self.token = auth::request_token(&self.http, &self.config).await?;
        Ok(())
    }
}
