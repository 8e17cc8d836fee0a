//! HTTP access to the station backend.
//!
//! Fetches the two inputs the schedule engine needs from outside:
//! - The schedule document (languages and weekly blocks)
//! - The current broadcast instant from a trusted clock endpoint

use std::fmt;
use std::time::Duration;

use onair_core::{Instant, ScheduleDocument};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Default request timeout for backend calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Backend client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The provided API token was invalid.
    #[error("invalid API token: {reason}")]
    InvalidToken { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Backend returned a non-success status.
    #[error("backend returned {status}: {body}")]
    Api { status: u16, body: String },
    /// Failed to parse or validate the response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Station backend client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_token: Option<String>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::ClientBuild)?;

        Ok(Self {
            http,
            api_token: None,
        })
    }

    /// Sends `token` as a bearer token on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Result<Self, ClientError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ClientError::InvalidToken {
                reason: "API token cannot be empty or whitespace-only",
            });
        }
        self.api_token = Some(token);
        Ok(self)
    }

    /// Fetches the schedule document.
    pub async fn fetch_schedule(&self, url: &str) -> Result<ScheduleDocument, ClientError> {
        let doc: ScheduleDocument = self.get_json(url).await?;
        tracing::debug!(
            url,
            languages = doc.languages.len(),
            blocks = doc.weekly_blocks.len(),
            "fetched schedule document"
        );
        Ok(doc)
    }

    /// Fetches the current broadcast instant.
    ///
    /// The endpoint returns `{"weekday": "Mon", "minuteOfDay": 390}`.
    pub async fn fetch_instant(&self, url: &str) -> Result<Instant, ClientError> {
        let instant: Instant = self.get_json(url).await?;
        tracing::debug!(url, ?instant, "fetched broadcast instant");
        Ok(instant)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let mut request = self.http.get(url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        parse_body(&body)
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|err| ClientError::InvalidResponse(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use onair_core::weekday::parse_weekday;

    const SCHEDULE_BODY: &str = r#"{
        "languages": [{"code": "en", "name": "English", "color": "blue", "targetPercent": 100}],
        "weeklyBlocks": [{"day": "*", "start": "06:00", "end": "07:00", "lang": "en", "title": "Morning"}]
    }"#;

    fn client() -> Client {
        Client::new(DEFAULT_TIMEOUT).unwrap()
    }

    #[test]
    fn client_rejects_whitespace_token() {
        assert!(matches!(
            client().with_token("   "),
            Err(ClientError::InvalidToken { .. })
        ));
    }

    #[test]
    fn client_debug_redacts_token() {
        let client = client().with_token("secret-token").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn parse_body_rejects_invalid_instant() {
        let err = parse_body::<Instant>(r#"{"weekday":"Mon","minuteOfDay":1440}"#).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn fetch_schedule_parses_document() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/schedule")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SCHEDULE_BODY)
            .create_async()
            .await;

        let url = format!("{}/schedule", server.url());
        let doc = client().fetch_schedule(&url).await.unwrap();

        mock.assert_async().await;
        assert_eq!(doc.languages.len(), 1);
        assert_eq!(doc.weekly_blocks[0].title, "Morning");
    }

    #[tokio::test]
    async fn fetch_instant_sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/clock")
            .match_header("authorization", "Bearer station-token")
            .with_status(200)
            .with_body(r#"{"weekday":"Thu","minuteOfDay":1234}"#)
            .create_async()
            .await;

        let url = format!("{}/clock", server.url());
        let instant = client()
            .with_token("station-token")
            .unwrap()
            .fetch_instant(&url)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(instant, Instant::new(parse_weekday("Thu").unwrap(), 1234).unwrap());
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/schedule")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let url = format!("{}/schedule", server.url());
        let err = client().fetch_schedule(&url).await.unwrap_err();
        match err {
            ClientError::Api { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
