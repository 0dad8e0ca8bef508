use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

use tunecrawl::{
    client::send_text,
    config::SpotifyConfig,
    errors::{Provider, ProviderError},
    pipeline::batch::BatchLookup,
    spotify::{SpotifyClient, features::MAX_AUDIO_FEATURE_IDS},
};

/// Local HTTP server answering each connection with the next canned
/// response and remembering the request lines it saw.
struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    async fn start(responses: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let queue = Arc::new(Mutex::new(VecDeque::from(responses)));

        let seen = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let reply = queue
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| reply(500, &[], ""));
                serve(stream, reply, seen.clone()).await;
            }
        });

        Self { base_url, requests }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve(mut stream: TcpStream, reply: String, seen: Arc<Mutex<Vec<String>>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    seen.lock()
        .unwrap()
        .push(head.lines().next().unwrap_or_default().to_string());
    stream.write_all(reply.as_bytes()).await.unwrap();
    stream.shutdown().await.ok();
}

fn reply(status: u16, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!("HTTP/1.1 {} Stub\r\n", status);
    for (name, value) in headers {
        out.push_str(&format!("{}: {}\r\n", name, value));
    }
    out.push_str(&format!(
        "Content-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    ));
    out
}

fn token_reply() -> String {
    reply(
        200,
        &[],
        r#"{"access_token":"token","token_type":"Bearer","expires_in":3600}"#,
    )
}

async fn spotify_client(server: &StubServer) -> SpotifyClient {
    SpotifyClient::connect(SpotifyConfig {
        client_id: "id".to_string(),
        client_secret: "secret".to_string(),
        api_url: server.url("/v1"),
        token_url: server.url("/api/token"),
    })
    .await
    .unwrap()
}

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("track{}", i)).collect()
}

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_rate_limit_waits_once_and_resends() {
    let server = StubServer::start(vec![
        reply(429, &[("Retry-After", "0")], ""),
        reply(200, &[], r#"{"ok":true}"#),
    ])
    .await;

    let body = send_text(Provider::Spotify, reqwest::Client::new().get(server.url("/items")))
        .await
        .unwrap();

    assert_eq!(body, r#"{"ok":true}"#);
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn test_rate_limit_gives_up_after_one_resend() {
    let server = StubServer::start(vec![
        reply(429, &[("Retry-After", "0")], ""),
        reply(429, &[("Retry-After", "0")], ""),
        reply(200, &[], "{}"),
    ])
    .await;

    let err = send_text(Provider::Genius, reqwest::Client::new().get(server.url("/items")))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::RateLimited { .. }));
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn test_long_retry_after_is_not_waited_for() {
    let server = StubServer::start(vec![
        reply(429, &[("Retry-After", "500")], ""),
        reply(200, &[], "{}"),
    ])
    .await;

    let err = send_text(Provider::Lastfm, reqwest::Client::new().get(server.url("/items")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProviderError::RateLimited {
            retry_after: 500,
            ..
        }
    ));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_unauthorized_is_not_resent() {
    let server = StubServer::start(vec![reply(401, &[], ""), reply(200, &[], "{}")]).await;

    let err = send_text(Provider::Spotify, reqwest::Client::new().get(server.url("/items")))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(server.requests().len(), 1);
}

// ---------------------------------------------------------------------------
// Spotify audio features
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_audio_features_rejects_oversized_batch_without_request() {
    let server = StubServer::start(vec![token_reply()]).await;
    let mut spotify = spotify_client(&server).await;

    let err = spotify
        .audio_features(&ids(MAX_AUDIO_FEATURE_IDS + 1))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProviderError::BatchTooLarge {
            max: 100,
            got: 101,
            ..
        }
    ));
    // Only the token handshake reached the server.
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("POST /api/token"));
}

#[tokio::test]
async fn test_lookup_batch_aligns_records_with_ids() {
    let server = StubServer::start(vec![
        token_reply(),
        reply(
            200,
            &[],
            r#"{"audio_features":[{"danceability":0.5,"id":"track0"},null,{"tempo":98.0,"id":"track2"}]}"#,
        ),
    ])
    .await;
    let mut spotify = spotify_client(&server).await;

    let records = spotify.lookup_batch(&ids(3)).await.unwrap();

    assert_eq!(records.len(), 3);
    let first = records[0].as_ref().unwrap();
    assert_eq!(first.trackid, "track0");
    assert_eq!(first.features.as_ref().unwrap().danceability, Some(0.5));
    assert!(records[1].is_none());
    assert_eq!(records[2].as_ref().unwrap().trackid, "track2");

    let requests = server.requests();
    assert!(requests[1].starts_with("GET /v1/audio-features?ids=track0%2Ctrack1%2Ctrack2"));
}

#[tokio::test]
async fn test_lookup_batch_short_response_is_mismatch() {
    let server = StubServer::start(vec![
        token_reply(),
        reply(200, &[], r#"{"audio_features":[{"id":"track0"}]}"#),
    ])
    .await;
    let mut spotify = spotify_client(&server).await;

    let err = spotify.lookup_batch(&ids(2)).await.unwrap_err();

    assert!(matches!(
        err,
        ProviderError::BatchMismatch {
            expected: 2,
            got: 1,
            ..
        }
    ));
}
