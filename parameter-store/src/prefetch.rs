//! Bulk fetch strategy.
//!
//! Lists every root once, recursively, and serves all keys from memory.
//! Costs one listing per root (plus pagination) instead of one lookup per
//! distinct key; values do not change after loading.

use crate::client::{ParameterClient, PathQuery};
use crate::resolver::Resolver;
use async_trait::async_trait;
use errors::ParameterStoreError;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

pub struct PrefetchResolver {
    values: HashMap<String, String>,
}

impl PrefetchResolver {
    /// Loads every parameter under `roots`.
    ///
    /// When several roots define the same key the earliest root wins.
    pub async fn load(
        client: &dyn ParameterClient,
        roots: &[String],
    ) -> Result<Self, ParameterStoreError> {
        let mut values = HashMap::new();

        for root in roots {
            let list_path = listing_path(root);
            let mut next_token = None;

            loop {
                let page = client
                    .get_parameters_by_path(
                        PathQuery::new(list_path.clone()).with_next_token(next_token.take()),
                    )
                    .await?;

                for parameter in page.parameters {
                    let Some(key) = path_to_key(root, &parameter.name) else {
                        tracing::debug!(root = %root, name = %parameter.name, "Skipping parameter outside root");
                        continue;
                    };
                    if let Entry::Vacant(slot) = values.entry(key) {
                        tracing::info!(
                            property = %slot.key(),
                            name = %parameter.name,
                            value = %parameter.display_value(),
                            "Parameter store loaded"
                        );
                        slot.insert(parameter.value);
                    }
                }

                match page.next_token {
                    Some(token) => next_token = Some(token),
                    None => break,
                }
            }
        }

        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait]
impl Resolver for PrefetchResolver {
    async fn resolve(&self, key: &str) -> Result<Option<String>, ParameterStoreError> {
        Ok(self.values.get(key).cloned())
    }
}

/// Path listed for `root`; the empty root lists the whole store.
pub(crate) fn listing_path(root: &str) -> String {
    if root.is_empty() {
        "/".to_string()
    } else {
        root.to_string()
    }
}

/// Application key of the parameter `name` under `root`, if it is under it.
fn path_to_key(root: &str, name: &str) -> Option<String> {
    let relative = name.strip_prefix(root)?.strip_prefix('/')?;
    if relative.is_empty() {
        return None;
    }
    Some(relative.replace('/', "."))
}
