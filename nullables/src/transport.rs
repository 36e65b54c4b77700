//! Nullable transport: scripted HTTP responses, recorded requests.

use async_trait::async_trait;
use heirloom_sources::{SourceError, Transport};
use serde_json::Value;
use std::sync::Mutex;

#[derive(Clone, Debug)]
enum Scripted {
    Json(Value),
    Unreachable(String),
    Status(u16),
}

/// A request the transport received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Value of the first parameter named `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A transport that answers from a script instead of the network.
///
/// Responses are matched by URL prefix, first registered wins. Requests to
/// unscripted URLs fail as unreachable.
#[derive(Default)]
pub struct NullTransport {
    script: Mutex<Vec<(String, Scripted)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl NullTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests under `url_prefix` with `body`.
    pub fn respond_json(&self, url_prefix: impl Into<String>, body: Value) -> &Self {
        self.push(url_prefix.into(), Scripted::Json(body))
    }

    /// Fail requests under `url_prefix` as unreachable.
    pub fn respond_unreachable(&self, url_prefix: impl Into<String>, reason: &str) -> &Self {
        self.push(url_prefix.into(), Scripted::Unreachable(reason.to_string()))
    }

    /// Fail requests under `url_prefix` with an HTTP status.
    pub fn respond_status(&self, url_prefix: impl Into<String>, status: u16) -> &Self {
        self.push(url_prefix.into(), Scripted::Status(status))
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn push(&self, prefix: String, scripted: Scripted) -> &Self {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((prefix, scripted));
        self
    }
}

#[async_trait]
impl Transport for NullTransport {
    async fn get_json(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<Value, SourceError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedRequest {
                url: url.to_string(),
                params: params.to_vec(),
            });

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, s)| s.clone());

        match scripted {
            Some(Scripted::Json(body)) => Ok(body),
            Some(Scripted::Unreachable(reason)) => Err(SourceError::Unreachable(reason)),
            Some(Scripted::Status(code)) => {
                Err(SourceError::RequestFailed(format!("HTTP status {code}")))
            }
            None => Err(SourceError::Unreachable(format!(
                "no response scripted for {url}"
            ))),
        }
    }
}
