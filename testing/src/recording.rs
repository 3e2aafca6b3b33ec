use async_trait::async_trait;
use config::ParameterStoreSettings;
use errors::ParameterStoreError;
use parameter_store::{
    ClientFactory, LocalParameterClient, Parameter, ParameterClient, ParameterPage, PathQuery,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One remote call seen by a [`RecordingClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(String),
    List(String),
}

/// In-memory store that records every call made against it.
pub struct RecordingClient {
    inner: LocalParameterClient,
    calls: Mutex<Vec<Call>>,
    failing_paths: HashSet<String>,
    listing_fails: bool,
    delay: Option<Duration>,
}

impl RecordingClient {
    pub fn new(inner: LocalParameterClient) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            failing_paths: HashSet::new(),
            listing_fails: false,
            delay: None,
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(LocalParameterClient::from_pairs(pairs))
    }

    pub fn empty() -> Self {
        Self::new(LocalParameterClient::new())
    }

    /// Point lookups of `path` fail with a backend error.
    pub fn failing_on(mut self, path: impl Into<String>) -> Self {
        self.failing_paths.insert(path.into());
        self
    }

    /// Every listing fails, which also fails the activation probe.
    pub fn with_listing_failure(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    /// Every call sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Paths of the point lookups, in call order.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::Get(path) => Some(path.clone()),
                Call::List(_) => None,
            })
            .collect()
    }

    /// Paths of the listings, in call order.
    pub fn list_calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::List(path) => Some(path.clone()),
                Call::Get(_) => None,
            })
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ParameterClient for RecordingClient {
    async fn get_parameter(&self, path: &str) -> Result<Option<Parameter>, ParameterStoreError> {
        self.calls.lock().push(Call::Get(path.to_string()));
        self.pause().await;

        if self.failing_paths.contains(path) {
            tracing::debug!(path, "Scripted lookup failure");
            return Err(ParameterStoreError::remote(path, "scripted failure"));
        }
        self.inner.get_parameter(path).await
    }

    async fn get_parameters_by_path(
        &self,
        query: PathQuery,
    ) -> Result<ParameterPage, ParameterStoreError> {
        self.calls.lock().push(Call::List(query.path.clone()));
        self.pause().await;

        if self.listing_fails {
            return Err(ParameterStoreError::remote(query.path, "scripted failure"));
        }
        self.inner.get_parameters_by_path(query).await
    }
}

/// Hands out one shared [`RecordingClient`] and counts how often it did.
pub struct RecordingFactory {
    client: Arc<RecordingClient>,
    creations: AtomicUsize,
}

impl RecordingFactory {
    pub fn new(client: Arc<RecordingClient>) -> Self {
        Self {
            client,
            creations: AtomicUsize::new(0),
        }
    }

    pub fn client(&self) -> &Arc<RecordingClient> {
        &self.client
    }

    pub fn creations(&self) -> usize {
        self.creations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientFactory for RecordingFactory {
    async fn create(
        &self,
        _settings: &ParameterStoreSettings,
    ) -> Result<Arc<dyn ParameterClient>, ParameterStoreError> {
        self.creations.fetch_add(1, Ordering::SeqCst);
        Ok(self.client.clone())
    }
}
