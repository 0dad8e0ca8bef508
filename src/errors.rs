use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// The external API a request was sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Spotify,
    Genius,
    Lastfm,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Spotify => "Spotify",
            Provider::Genius => "Genius",
            Provider::Lastfm => "Last.fm",
        };
        f.write_str(name)
    }
}

/// Failure of a single provider call.
///
/// Only [`ProviderError::Unauthorized`] triggers the reconnect-and-retry
/// path. Everything else propagates to the job.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} transport error: {source}")]
    Transport {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} rejected the credentials ({status})")]
    Unauthorized {
        provider: Provider,
        status: StatusCode,
    },

    #[error("{provider} rate limit hit, retry after {retry_after} seconds")]
    RateLimited { provider: Provider, retry_after: u64 },

    #[error("{provider} answered with status {status}")]
    Status {
        provider: Provider,
        status: StatusCode,
    },

    #[error("{provider} API error {code}: {message}")]
    Api {
        provider: Provider,
        code: i64,
        message: String,
    },

    #[error("{provider} returned no results for {what}")]
    Empty { provider: Provider, what: String },

    #[error("{provider} response could not be decoded: {message}")]
    Decode { provider: Provider, message: String },

    #[error("{provider} accepts at most {max} ids per request, got {got}")]
    BatchTooLarge {
        provider: Provider,
        max: usize,
        got: usize,
    },

    #[error("{provider} returned {got} entries for a batch of {expected}")]
    BatchMismatch {
        provider: Provider,
        expected: usize,
        got: usize,
    },
}

impl ProviderError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ProviderError::Unauthorized { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ProviderError::Empty { .. })
    }

    pub fn provider(&self) -> Provider {
        match self {
            ProviderError::Transport { provider, .. }
            | ProviderError::Unauthorized { provider, .. }
            | ProviderError::RateLimited { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::Api { provider, .. }
            | ProviderError::Empty { provider, .. }
            | ProviderError::Decode { provider, .. }
            | ProviderError::BatchTooLarge { provider, .. }
            | ProviderError::BatchMismatch { provider, .. } => *provider,
        }
    }
}

/// Missing or malformed configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    #[error("environment variable {var} has an invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}
