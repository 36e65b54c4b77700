//! Outbound HTTP seam shared by all adapters.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::SourceError;

/// Default timeout for source requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Issues a `GET` with query parameters and decodes the JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<serde_json::Value, SourceError>;
}

/// [`Transport`] over a pooled `reqwest` client.
#[derive(Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { http_client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<serde_json::Value, SourceError> {
        let response = self
            .http_client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Unreachable(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    SourceError::Unreachable(format!("connection failed: {e}"))
                } else {
                    SourceError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(SourceError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("failed to decode body: {e}")))
    }
}

/// Join a base URL and a path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_normalises_slashes() {
        assert_eq!(join_url("http://a/", "/search"), "http://a/search");
        assert_eq!(join_url("http://a", "search"), "http://a/search");
    }

    #[tokio::test]
    async fn unreachable_host_is_classified() {
        let transport = HttpTransport::with_timeout(Duration::from_millis(500));
        let err = transport
            .get_json("http://127.0.0.1:9/search", &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SourceError::Unreachable(_) | SourceError::RequestFailed(_)
        ));
    }
}
