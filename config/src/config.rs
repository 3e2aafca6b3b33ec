//! # Configuration Structures
//!
//! This module defines the settings that decide whether, and how, the
//! parameter store is consulted while resolving application configuration.
//!
//! All configuration structures:
//! - Use `serde` for serialization/deserialization
//! - Use `validator` for input validation
//! - Provide defaults that leave the integration disabled

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

/// Main configuration structure.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Aggregates the parameter store activation settings and the set of
/// deployment profiles that are active for this process.
///
/// ## Usage
/// ```rust,no_run
/// use config::Config;
///
/// let config = Config::default();
/// assert!(!config.parameter_store.enabled);
/// ```
///
/// ## Fields
/// - `parameter_store`: Activation and lookup settings
/// - `profiles`: Active deployment profiles
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
pub struct Config {
    /// Parameter store activation and lookup settings
    #[serde(default)]
    #[validate(nested)]
    pub parameter_store: ParameterStoreSettings,

    /// Active deployment profiles
    #[serde(default)]
    #[validate(nested)]
    pub profiles: ProfilesConfig
}

/// How parameters are fetched from the remote store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FetchStrategy {
    /// One point lookup per distinct key, on first use.
    #[default]
    Lazy,
    /// One recursive listing per root at activation, served from memory.
    Prefetch
}

/// Parameter store activation settings.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Controls the activation gate and the lookup behaviour of the parameter
/// store property source.
///
/// ## Fields
/// - `enabled`: Explicit enable flag (default: false)
/// - `enabled_profiles`: Profiles that activate the integration; `ANY`
///   matches every profile, `!name` matches when `name` is inactive
/// - `roots`: Comma-separated root prefixes, highest precedence first
///   (default: "", a single empty-prefix root)
/// - `strict_profiles`: Profiles in which an unreachable store aborts
///   startup (default: ["Prod"])
/// - `fetch_strategy`: `lazy` or `prefetch` (default: lazy)
/// - `fail_on_missing`: Report keys absent under every root as errors
///   (default: false)
/// - `region`: AWS region override (default: SDK provider chain)
/// - `endpoint`: Endpoint URL override (default: none)
/// - `probe_timeout_ms`: Reachability probe bound (default: 5000,
///   range: 1-60000)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ParameterStoreSettings {
    /// Explicit enable flag
    #[serde(default)]
    pub enabled: bool,

    /// Profiles that activate the integration
    #[serde(default)]
    #[validate(custom(function = "validate_profile_names"))]
    pub enabled_profiles: Vec<String>,

    /// Comma-separated root prefixes
    #[serde(default)]
    #[validate(custom(function = "validate_roots"))]
    pub roots: String,

    /// Profiles in which a failed probe is fatal
    #[serde(default = "default_strict_profiles")]
    #[validate(custom(function = "validate_profile_names"))]
    pub strict_profiles: Vec<String>,

    /// Fetch strategy
    #[serde(default)]
    pub fetch_strategy: FetchStrategy,

    /// Report keys absent under every root as errors
    #[serde(default)]
    pub fail_on_missing: bool,

    /// AWS region override
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub region: Option<String>,

    /// Endpoint URL override
    #[serde(default)]
    #[validate(url)]
    pub endpoint: Option<String>,

    /// Reachability probe bound in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    #[validate(range(min = 1, max = 60000))]
    pub probe_timeout_ms: u64
}

fn default_strict_profiles() -> Vec<String> {
    vec!["Prod".to_string()]
}

fn default_probe_timeout_ms() -> u64 {
    5000
}

impl Default for ParameterStoreSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            enabled_profiles: Vec::new(),
            roots: String::new(),
            strict_profiles: default_strict_profiles(),
            fetch_strategy: FetchStrategy::default(),
            fail_on_missing: false,
            region: None,
            endpoint: None,
            probe_timeout_ms: default_probe_timeout_ms()
        }
    }
}

impl ParameterStoreSettings {
    /// Root prefixes in precedence order.
    ///
    /// Segments are trimmed and empty segments dropped. A bare `/` is the
    /// empty-prefix root. When nothing is left a single empty-prefix root
    /// is returned, so keys map to paths directly under `/`.
    pub fn root_prefixes(&self) -> Vec<String> {
        let roots: Vec<String> = split_list(&self.roots)
            .into_iter()
            .map(|root| if root == "/" { String::new() } else { root })
            .collect();
        if roots.is_empty() {
            vec![String::new()]
        } else {
            roots
        }
    }
}

/// Active deployment profiles.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
pub struct ProfilesConfig {
    /// Active profile names; an empty list means only `default` is active
    #[serde(default)]
    #[validate(custom(function = "validate_profile_names"))]
    pub active: Vec<String>
}

/// Splits a comma-separated list, trimming entries and dropping empties.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_roots(value: &str) -> Result<(), validator::ValidationError> {
    for root in split_list(value) {
        if !root.starts_with('/') {
            return Err(validator::ValidationError::new(
                "Root prefixes must start with '/'"
            ));
        }
        if root.len() > 1 && root.ends_with('/') {
            return Err(validator::ValidationError::new(
                "Root prefixes must not end with '/'"
            ));
        }
    }
    Ok(())
}

fn validate_profile_names(value: &[String]) -> Result<(), validator::ValidationError> {
    if value
        .iter()
        .any(|p| p.trim().is_empty() || p.trim_start_matches('!').is_empty())
    {
        return Err(validator::ValidationError::new("Empty profile name"));
    }
    Ok(())
}
