//! # Genius Integration Module
//!
//! Lyric and song metadata provider. Authenticated with a static bearer
//! token from [`GeniusConfig`], so [`Reconnect::reconnect`] only rebuilds the
//! HTTP client.
//!
//! - [`search`] - keyword search, candidate lists for reconciliation and the
//!   artist lookup
//! - [`songs`] - paged artist discography and song details
//! - [`lyrics`] - scraping the lyric text from a song page

pub mod lyrics;
pub mod search;
pub mod songs;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    client::{Reconnect, http_client, send_json},
    config::GeniusConfig,
    errors::{Provider, ProviderError},
    types::GeniusEnvelope,
};

/// Genius API client.
pub struct GeniusClient {
    config: GeniusConfig,
    http: Client,
}

impl GeniusClient {
    pub fn new(config: GeniusConfig) -> Self {
        Self {
            config,
            http: http_client(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    /// GET against the API, unwrapping the `response` envelope.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let request = self
            .http
            .get(self.endpoint(path))
            .bearer_auth(&self.config.token)
            .query(query);

        let envelope: GeniusEnvelope<T> = send_json(Provider::Genius, request).await?;
        Ok(envelope.response)
    }
}

impl Reconnect for GeniusClient {
    async fn reconnect(&mut self) -> Result<(), ProviderError> {
        self.http = http_client();
        Ok(())
    }
}
