//! Nullable source: a scripted [`DeathSource`].

use async_trait::async_trait;
use heirloom_sources::DeathSource;
use heirloom_types::{SourceVerdict, VerificationQuery};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A source that returns a fixed verdict and counts how often it is asked.
pub struct NullSource {
    name: String,
    verdict: SourceVerdict,
    delay: Option<Duration>,
    panics: bool,
    calls: AtomicUsize,
}

impl NullSource {
    /// A source that always answers `verdict`, reporting `verdict.source_name`.
    pub fn new(verdict: SourceVerdict) -> Self {
        Self {
            name: verdict.source_name.clone(),
            verdict,
            delay: None,
            panics: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// A source that always fails with `error`.
    pub fn failing(name: &str, error: &str) -> Self {
        Self::new(SourceVerdict::failed(name, error))
    }

    /// Wait `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Panic instead of answering.
    pub fn panicking(name: &str) -> Self {
        let mut source = Self::new(SourceVerdict::not_found(name));
        source.panics = true;
        source
    }

    /// Number of `probe` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeathSource for NullSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn probe(&self, _query: &VerificationQuery) -> SourceVerdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panics {
            panic!("null source {} asked to panic", self.name);
        }
        self.verdict.clone()
    }
}
