//! Ordered property sources and active profiles.
//!
//! Sources are consulted front to back and the first one holding a value
//! wins. The parameter store source is inserted at the front so remote
//! values override everything local.

use async_trait::async_trait;
use config::Config;
use errors::ParameterStoreError;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Profile that is active when no profile has been set explicitly.
pub const DEFAULT_PROFILE: &str = "default";

/// Wildcard accepted by every environment.
pub const ANY_PROFILE: &str = "ANY";

/// A named source of configuration properties.
#[async_trait]
pub trait PropertySource: Send + Sync {
    fn name(&self) -> &str;

    async fn get_property(&self, key: &str) -> Result<Option<String>, ParameterStoreError>;
}

/// Local, in-memory properties.
#[derive(Debug, Clone, Default)]
pub struct MapPropertySource {
    name: String,
    properties: HashMap<String, String>,
}

impl MapPropertySource {
    pub fn new(name: impl Into<String>, properties: HashMap<String, String>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    pub fn from_pairs<I, K, V>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(
            name,
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[async_trait]
impl PropertySource for MapPropertySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_property(&self, key: &str) -> Result<Option<String>, ParameterStoreError> {
        Ok(self.properties.get(key).cloned())
    }
}

/// Property sources in precedence order.
#[derive(Default, Clone)]
pub struct PropertySources {
    sources: Vec<Arc<dyn PropertySource>>,
}

impl PropertySources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `source` with the highest precedence.
    pub fn add_first(&mut self, source: Arc<dyn PropertySource>) {
        self.sources.insert(0, source);
    }

    /// Adds `source` with the lowest precedence.
    pub fn add_last(&mut self, source: Arc<dyn PropertySource>) {
        self.sources.push(source);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn PropertySource>> {
        self.sources.iter().find(|s| s.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn PropertySource>> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Active profiles plus the property sources they resolve against.
#[derive(Default, Clone)]
pub struct Environment {
    active_profiles: BTreeSet<String>,
    property_sources: PropertySources,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles<I, S>(profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            active_profiles: profiles.into_iter().map(Into::into).collect(),
            property_sources: PropertySources::new(),
        }
    }

    /// Builds an environment whose active profiles come from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::with_profiles(config.profiles.active.iter().cloned())
    }

    /// Active profiles; `default` when none were set.
    pub fn active_profiles(&self) -> Vec<&str> {
        if self.active_profiles.is_empty() {
            vec![DEFAULT_PROFILE]
        } else {
            self.active_profiles.iter().map(String::as_str).collect()
        }
    }

    /// True when any of `expressions` is accepted.
    ///
    /// `ANY` accepts every environment and `!name` accepts when `name` is
    /// not active. Blank expressions are ignored.
    pub fn accepts_profiles<S: AsRef<str>>(&self, expressions: &[S]) -> bool {
        let active = self.active_profiles();
        expressions.iter().any(|expression| {
            let expression = expression.as_ref().trim();
            if expression == ANY_PROFILE {
                return true;
            }
            match expression.strip_prefix('!') {
                Some(negated) if !negated.is_empty() => !active.contains(&negated),
                Some(_) => false,
                None => !expression.is_empty() && active.contains(&expression),
            }
        })
    }

    pub fn property_sources(&self) -> &PropertySources {
        &self.property_sources
    }

    pub fn property_sources_mut(&mut self) -> &mut PropertySources {
        &mut self.property_sources
    }

    /// First value for `key` across the property sources, in order.
    pub async fn get_property(&self, key: &str) -> Result<Option<String>, ParameterStoreError> {
        for source in self.property_sources.iter() {
            if let Some(value) = source.get_property(key).await? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}
