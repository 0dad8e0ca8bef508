//! HTTP plumbing shared by the provider clients.
//!
//! Every provider call goes through [`send_json`] or [`send_text`], which
//! turn reqwest results into [`ProviderError`] values:
//!
//! - `401`/`403` become [`ProviderError::Unauthorized`], the only error the
//!   pipeline answers with a reconnect and a single retry
//! - `429` waits once for `Retry-After` (up to two minutes) and resends
//! - any other non-success status becomes [`ProviderError::Status`]
//! - bodies that do not deserialize become [`ProviderError::Decode`]

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    errors::{Provider, ProviderError},
    warning,
};

/// Longest `Retry-After` the clients are willing to sit out.
pub const MAX_RETRY_AFTER_SECS: u64 = 120;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A client that owns an authenticated session and can rebuild it.
///
/// `reconnect` performs a fresh handshake (or rebuilds the HTTP client for
/// providers with static keys). Callers keep their own position, so a
/// reconnect never loses pagination or batch state.
#[allow(async_fn_in_trait)]
pub trait Reconnect {
    async fn reconnect(&mut self) -> Result<(), ProviderError>;
}

/// Runs `call` once more after a reconnect when it fails authorization.
///
/// For single calls made directly by the jobs; pagination, batched lookup
/// and reconciliation apply the same rule themselves. A second failure, or
/// any other error, is returned as is.
pub async fn with_reconnect<C, T, F>(client: &mut C, mut call: F) -> Result<T, ProviderError>
where
    C: Reconnect,
    F: AsyncFnMut(&mut C) -> Result<T, ProviderError>,
{
    let first = call(&mut *client).await;
    match first {
        Err(e) if e.is_unauthorized() => {
            warning!("{}. Reconnecting and retrying once.", e);
            client.reconnect().await?;
            call(&mut *client).await
        }
        other => other,
    }
}

/// Builds the HTTP client used by all providers.
///
/// No timeout is configured; requests rely on the transport defaults.
pub fn http_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Sends `request` and deserializes the JSON body.
pub async fn send_json<T: DeserializeOwned>(
    provider: Provider,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let body = send_text(provider, request).await?;
    serde_json::from_str(&body).map_err(|e| ProviderError::Decode {
        provider,
        message: e.to_string(),
    })
}

/// Sends `request` and returns the raw body.
pub async fn send_text(provider: Provider, request: RequestBuilder) -> Result<String, ProviderError> {
    let retry = request.try_clone();
    let response = request
        .send()
        .await
        .map_err(|source| ProviderError::Transport { provider, source })?;

    let response = match (check_status(provider, response), retry) {
        (Err(ProviderError::RateLimited { retry_after, .. }), Some(retry))
            if retry_after <= MAX_RETRY_AFTER_SECS =>
        {
            warning!(
                "{} rate limit reached, waiting {} seconds before retrying.",
                provider,
                retry_after
            );
            sleep(Duration::from_secs(retry_after)).await;
            let response = retry
                .send()
                .await
                .map_err(|source| ProviderError::Transport { provider, source })?;
            check_status(provider, response)?
        }
        (result, _) => result?,
    };

    response
        .text()
        .await
        .map_err(|source| ProviderError::Transport { provider, source })
}

/// Maps a response status onto the provider error taxonomy.
pub fn check_status(provider: Provider, response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(ProviderError::Unauthorized { provider, status })
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(0);
            Err(ProviderError::RateLimited {
                provider,
                retry_after,
            })
        }
        _ => Err(ProviderError::Status { provider, status }),
    }
}
