//! # Environment Variable Loader
//!
//! Loads configuration from environment variables following 12-factor app
//! principles.
//!
//! # Naming Convention
//! - `PARAMETER_STORE_*`: Parameter store activation and lookup settings
//! - `APP_PROFILES_ACTIVE`: Active deployment profiles

use crate::config::{Config, FetchStrategy, ParameterStoreSettings, ProfilesConfig, split_list};
use std::env;

/// Load configuration from environment variables.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Loads configuration from environment variables. Environment variables
/// override file values when merged with [`crate::merge_configs`].
///
/// ## Usage
/// ```rust,no_run
/// use config::load_from_env;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = load_from_env()?;
///     println!("Roots: {:?}", config.parameter_store.root_prefixes());
///     Ok(())
/// }
/// ```
///
/// ## Environment Variables
/// - `PARAMETER_STORE_ENABLED`: Enable flag (true/false, default: false)
/// - `PARAMETER_STORE_ENABLED_PROFILES`: Comma-separated activating profiles
/// - `PARAMETER_STORE_ROOTS`: Comma-separated root prefixes (default: "")
/// - `PARAMETER_STORE_STRICT_PROFILES`: Comma-separated profiles in which an
///   unreachable store is fatal (default: "Prod")
/// - `PARAMETER_STORE_FETCH_STRATEGY`: lazy/prefetch (default: lazy)
/// - `PARAMETER_STORE_FAIL_ON_MISSING`: true/false (default: false)
/// - `PARAMETER_STORE_REGION`: AWS region override (optional)
/// - `PARAMETER_STORE_ENDPOINT`: Endpoint URL override (optional)
/// - `PARAMETER_STORE_PROBE_TIMEOUT_MS`: Probe bound (default: 5000)
/// - `APP_PROFILES_ACTIVE`: Comma-separated active profiles
///
/// ## Error Handling
/// Malformed values (e.g. `PARAMETER_STORE_ENABLED=maybe`) are reported
/// instead of silently falling back to the default.
pub fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    Ok(Config {
        parameter_store: load_parameter_store_from_env()?,
        profiles: load_profiles_from_env(),
    })
}

fn load_parameter_store_from_env() -> Result<ParameterStoreSettings, Box<dyn std::error::Error>> {
    let defaults = ParameterStoreSettings::default();

    Ok(ParameterStoreSettings {
        enabled: parse_optional_env("PARAMETER_STORE_ENABLED")?.unwrap_or(defaults.enabled),
        enabled_profiles: env::var("PARAMETER_STORE_ENABLED_PROFILES")
            .map(|v| split_list(&v))
            .unwrap_or_default(),
        roots: env::var("PARAMETER_STORE_ROOTS").unwrap_or_default(),
        strict_profiles: env::var("PARAMETER_STORE_STRICT_PROFILES")
            .map(|v| split_list(&v))
            .unwrap_or(defaults.strict_profiles),
        fetch_strategy: parse_optional_env::<FetchStrategy>("PARAMETER_STORE_FETCH_STRATEGY")?
            .unwrap_or(defaults.fetch_strategy),
        fail_on_missing: parse_optional_env("PARAMETER_STORE_FAIL_ON_MISSING")?
            .unwrap_or(defaults.fail_on_missing),
        region: env::var("PARAMETER_STORE_REGION").ok(),
        endpoint: env::var("PARAMETER_STORE_ENDPOINT").ok(),
        probe_timeout_ms: parse_optional_env("PARAMETER_STORE_PROBE_TIMEOUT_MS")?
            .unwrap_or(defaults.probe_timeout_ms),
    })
}

fn load_profiles_from_env() -> ProfilesConfig {
    ProfilesConfig {
        active: env::var("APP_PROFILES_ACTIVE")
            .map(|v| split_list(&v))
            .unwrap_or_default(),
    }
}

fn parse_env<T>(key: &str) -> Result<T, Box<dyn std::error::Error>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(s) => s
            .trim()
            .parse::<T>()
            .map_err(|e| format!("{key}: {e}").into()),
        Err(e) => Err(Box::new(e) as Box<dyn std::error::Error>),
    }
}

/// Like [`parse_env`], but an unset variable is `Ok(None)`.
fn parse_optional_env<T>(key: &str) -> Result<Option<T>, Box<dyn std::error::Error>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if env::var_os(key).is_none() {
        return Ok(None);
    }
    parse_env(key).map(Some)
}
