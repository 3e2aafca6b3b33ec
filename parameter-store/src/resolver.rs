//! Root-folder fallback resolution.
//!
//! An application key such as `server.port` maps to the remote path
//! `<root>/server/port`. Roots are tried strictly in order and the first
//! root holding a value wins.

use crate::client::ParameterClient;
use crate::telemetry::LookupTelemetry;
use async_trait::async_trait;
use errors::ParameterStoreError;
use std::sync::Arc;

/// Resolves an application key to a value, or `None` when absent.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, key: &str) -> Result<Option<String>, ParameterStoreError>;
}

/// Path form of an application key: every `.` becomes `/`.
pub fn key_to_path(key: &str) -> String {
    key.replace('.', "/")
}

/// Remote path of `key` under `root`.
pub fn to_remote_path(root: &str, key: &str) -> String {
    join_path(root, &key_to_path(key))
}

fn join_path(root: &str, path_form: &str) -> String {
    format!("{root}/{path_form}")
}

/// Lazy per-key resolver: one point lookup per root until the first hit.
pub struct RootFallbackResolver {
    client: Arc<dyn ParameterClient>,
    roots: Vec<String>,
}

impl RootFallbackResolver {
    pub fn new(client: Arc<dyn ParameterClient>, roots: Vec<String>) -> Self {
        Self { client, roots }
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }
}

#[async_trait]
impl Resolver for RootFallbackResolver {
    async fn resolve(&self, key: &str) -> Result<Option<String>, ParameterStoreError> {
        let path_form = key_to_path(key);

        for root in &self.roots {
            let path = join_path(root, &path_form);
            match self.client.get_parameter(&path).await {
                Ok(Some(parameter)) => {
                    LookupTelemetry::record_remote_lookup(true);
                    tracing::debug!(key, path = %path, "Resolved from parameter store");
                    return Ok(Some(parameter.value));
                }
                Ok(None) => LookupTelemetry::record_remote_lookup(false),
                Err(err) => {
                    LookupTelemetry::record_remote_error();
                    tracing::warn!(key, path = %path, error = %err, "Parameter store lookup failed");
                    return Err(err);
                }
            }
        }

        Ok(None)
    }
}
