//! Remote parameter client abstraction.
//!
//! A client answers point lookups by exact path and recursive listings under
//! a path. "Not found" is an expected outcome and is reported as `None`;
//! every other failure is a [`ParameterStoreError::RemoteStore`].

use async_trait::async_trait;
use config::ParameterStoreSettings;
use errors::ParameterStoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Type of a stored parameter, as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    String,
    StringList,
    SecureString,
    Other(String),
}

impl ParameterKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "String",
            Self::StringList => "StringList",
            Self::SecureString => "SecureString",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for ParameterKind {
    fn from(value: &str) -> Self {
        match value {
            "String" => Self::String,
            "StringList" => Self::StringList,
            "SecureString" => Self::SecureString,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parameter as returned by the store, value already decrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: String,
    pub kind: Option<ParameterKind>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: Some(kind),
        }
    }

    /// The value as it may appear in logs.
    ///
    /// Secure strings and parameters whose name suggests a password or a
    /// private key render as `***`; parameters of unknown type as `???`.
    pub fn display_value(&self) -> &str {
        let Some(kind) = &self.kind else {
            return "???";
        };
        let name = self.name.to_ascii_lowercase();
        if kind.as_str().starts_with("Secure") || name.contains("pass") || name.contains("priva")
        {
            "***"
        } else {
            &self.value
        }
    }
}

/// A recursive listing request under `path`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathQuery {
    pub path: String,
    pub max_results: Option<i32>,
    pub next_token: Option<String>,
}

impl PathQuery {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_max_results(mut self, max_results: i32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_next_token(mut self, next_token: Option<String>) -> Self {
        self.next_token = next_token;
        self
    }
}

/// One page of a listing. `next_token` is `None` on the last page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterPage {
    pub parameters: Vec<Parameter>,
    pub next_token: Option<String>,
}

/// Access to the remote parameter store.
///
/// Implementations must be safe to share across tasks; they hold no
/// per-lookup state.
#[async_trait]
pub trait ParameterClient: Send + Sync {
    /// Point lookup by exact path, with decryption.
    async fn get_parameter(&self, path: &str) -> Result<Option<Parameter>, ParameterStoreError>;

    /// Recursive listing under `query.path`, with decryption.
    async fn get_parameters_by_path(
        &self,
        query: PathQuery,
    ) -> Result<ParameterPage, ParameterStoreError>;
}

/// Builds the client used once the integration activates.
///
/// Injected into the activation gate so tests can substitute the store.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn create(
        &self,
        settings: &ParameterStoreSettings,
    ) -> Result<Arc<dyn ParameterClient>, ParameterStoreError>;
}
