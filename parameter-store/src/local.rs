//! In-memory parameter store for local development and tests.

use crate::client::{ClientFactory, Parameter, ParameterClient, ParameterKind, ParameterPage, PathQuery};
use async_trait::async_trait;
use config::ParameterStoreSettings;
use errors::ParameterStoreError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Default page size of a listing, matching the remote service limit.
const DEFAULT_PAGE_SIZE: usize = 10;

pub struct LocalParameterClient {
    parameters: BTreeMap<String, Parameter>,
    page_size: usize,
}

impl LocalParameterClient {
    pub fn new() -> Self {
        Self {
            parameters: BTreeMap::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Builds a store of plain `String` parameters from `(path, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |store, (k, v)| {
                store.with_parameter(Parameter::new(k, v, ParameterKind::String))
            })
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.insert(parameter.name.clone(), parameter);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl Default for LocalParameterClient {
    fn default() -> Self {
        Self::new()
    }
}

fn is_under(name: &str, path: &str) -> bool {
    let prefix = path.trim_end_matches('/');
    name.len() > prefix.len() + 1
        && name.starts_with(prefix)
        && name.as_bytes()[prefix.len()] == b'/'
}

#[async_trait]
impl ParameterClient for LocalParameterClient {
    async fn get_parameter(&self, path: &str) -> Result<Option<Parameter>, ParameterStoreError> {
        Ok(self.parameters.get(path).cloned())
    }

    async fn get_parameters_by_path(
        &self,
        query: PathQuery,
    ) -> Result<ParameterPage, ParameterStoreError> {
        let offset = match &query.next_token {
            Some(token) => token.parse::<usize>().map_err(|e| {
                ParameterStoreError::remote(&query.path, format!("invalid next token: {e}"))
            })?,
            None => 0,
        };
        let limit = query
            .max_results
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| *n > 0)
            .unwrap_or(self.page_size)
            .min(self.page_size);

        let matching: Vec<&Parameter> = self
            .parameters
            .values()
            .filter(|p| is_under(&p.name, &query.path))
            .collect();

        let end = offset.saturating_add(limit).min(matching.len());
        let parameters = matching
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|p| (*p).clone())
            .collect();
        let next_token = (end < matching.len()).then(|| end.to_string());

        Ok(ParameterPage {
            parameters,
            next_token,
        })
    }
}

/// Hands out a shared [`LocalParameterClient`].
pub struct LocalClientFactory {
    client: Arc<LocalParameterClient>,
}

impl LocalClientFactory {
    pub fn new(client: LocalParameterClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl ClientFactory for LocalClientFactory {
    async fn create(
        &self,
        _settings: &ParameterStoreSettings,
    ) -> Result<Arc<dyn ParameterClient>, ParameterStoreError> {
        Ok(self.client.clone())
    }
}
