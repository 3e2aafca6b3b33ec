//! Memoizing property source over a [`Resolver`].
//!
//! Every key is resolved at most once per source lifetime. Concurrent first
//! lookups of the same key share one in-flight resolution; a failed
//! resolution leaves the key unresolved so the next caller retries it.

use crate::environment::PropertySource;
use crate::resolver::Resolver;
use crate::telemetry::LookupTelemetry;
use async_trait::async_trait;
use dashmap::DashMap;
use errors::ParameterStoreError;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Outcome of resolving one key. Never changes once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    Resolved(String),
    Absent,
}

impl CacheEntry {
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Absent => None,
        }
    }
}

impl From<Option<String>> for CacheEntry {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Absent, Self::Resolved)
    }
}

/// The parameter store as a configuration source.
pub struct ParameterStorePropertySource {
    name: String,
    resolver: Box<dyn Resolver>,
    entries: DashMap<String, Arc<OnceCell<CacheEntry>>>,
    fail_on_missing: bool,
}

impl ParameterStorePropertySource {
    pub fn new(name: impl Into<String>, resolver: Box<dyn Resolver>) -> Self {
        Self {
            name: name.into(),
            resolver,
            entries: DashMap::new(),
            fail_on_missing: false,
        }
    }

    /// Report keys absent under every root as [`ParameterStoreError::ParameterNotFound`].
    pub fn with_fail_on_missing(mut self, fail_on_missing: bool) -> Self {
        self.fail_on_missing = fail_on_missing;
        self
    }

    /// Resolves `key`, consulting the resolver only on the first call.
    pub async fn lookup(&self, key: &str) -> Result<CacheEntry, ParameterStoreError> {
        let cell = self.entries.entry(key.to_string()).or_default().clone();

        if let Some(entry) = cell.get() {
            LookupTelemetry::record_cache_hit();
            return Ok(entry.clone());
        }

        let mut resolved_here = false;
        let flag = &mut resolved_here;
        let entry = cell
            .get_or_try_init(|| async move {
                *flag = true;
                LookupTelemetry::record_cache_miss();
                self.resolver.resolve(key).await.map(CacheEntry::from)
            })
            .await?;

        // Waited on another caller's resolution.
        if !resolved_here {
            LookupTelemetry::record_cache_hit();
        }

        Ok(entry.clone())
    }

    /// The stored outcome for `key`, without resolving it.
    pub fn cached(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Number of keys with a stored outcome.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|cell| cell.value().initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PropertySource for ParameterStorePropertySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_property(&self, key: &str) -> Result<Option<String>, ParameterStoreError> {
        match self.lookup(key).await? {
            CacheEntry::Resolved(value) => Ok(Some(value)),
            CacheEntry::Absent if self.fail_on_missing => {
                Err(ParameterStoreError::ParameterNotFound {
                    key: key.to_string(),
                })
            }
            CacheEntry::Absent => Ok(None),
        }
    }
}
