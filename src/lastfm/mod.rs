//! # Last.fm Integration Module
//!
//! Tag provider. Every call is `GET {api_url}?method=...&api_key=...&format=json`.
//! Last.fm reports most failures inside a `200 OK` body as
//! `{"error": code, "message": ...}`; [`classify_body`] turns those into
//! provider errors before the payload is decoded.

pub mod tags;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    client::{Reconnect, http_client, send_text},
    config::LastfmConfig,
    errors::{Provider, ProviderError},
    types::LastfmError,
};

/// Error codes for an invalid or suspended API key.
const AUTH_ERROR_CODES: [i64; 2] = [10, 26];

/// Last.fm API client.
pub struct LastfmClient {
    config: LastfmConfig,
    http: Client,
}

impl LastfmClient {
    pub fn new(config: LastfmConfig) -> Self {
        Self {
            config,
            http: http_client(),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let request = self
            .http
            .get(&self.config.api_url)
            .query(&[
                ("method", method),
                ("api_key", self.config.api_key.as_str()),
                ("format", "json"),
            ])
            .query(params);

        let body = send_text(Provider::Lastfm, request).await?;
        classify_body(&body)?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Decode {
            provider: Provider::Lastfm,
            message: e.to_string(),
        })
    }
}

/// Maps an in-body Last.fm error onto [`ProviderError`].
pub fn classify_body(body: &str) -> Result<(), ProviderError> {
    let Ok(error) = serde_json::from_str::<LastfmError>(body) else {
        return Ok(());
    };

    if AUTH_ERROR_CODES.contains(&error.error) {
        return Err(ProviderError::Unauthorized {
            provider: Provider::Lastfm,
            status: reqwest::StatusCode::FORBIDDEN,
        });
    }

    Err(ProviderError::Api {
        provider: Provider::Lastfm,
        code: error.error,
        message: error.message,
    })
}

impl Reconnect for LastfmClient {
    async fn reconnect(&mut self) -> Result<(), ProviderError> {
        self.http = http_client();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payloads_pass_through() {
        assert!(classify_body(r#"{"toptags":{"tag":[]}}"#).is_ok());
    }

    #[test]
    fn invalid_key_is_unauthorized() {
        let err = classify_body(r#"{"error":10,"message":"Invalid API key"}"#).unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn other_codes_are_api_errors() {
        let err = classify_body(r#"{"error":6,"message":"Track not found"}"#).unwrap_err();
        assert!(matches!(err, ProviderError::Api { code: 6, .. }));
    }
}
