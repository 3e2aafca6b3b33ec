//! # Configuration Precedence
//!
//! Merges configuration from multiple sources with precedence rules.
//!
//! # Precedence Order
//! 1. Environment variables (highest priority)
//! 2. Configuration file
//! 3. Default values (lowest priority)

use crate::config::{Config, ParameterStoreSettings, ProfilesConfig};

/// Merge configuration sources with precedence.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Merges configuration following precedence rules:
/// environment variables > config file > defaults.
///
/// ## Usage
/// ```rust,no_run
/// use config::{Config, merge_configs, load_from_file, load_from_env};
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let from_file = load_from_file(Path::new("parameter-store.toml"))?;
///     let from_env = load_from_env()?;
///
///     let _config = merge_configs(Config::default(), from_file, "file", from_env, "env");
///     Ok(())
/// }
/// ```
///
/// ## Merge Rules
/// A field of a higher-precedence source wins only when it differs from its
/// default value, so an unset environment variable never erases a value
/// coming from the file.
pub fn merge_configs(
    defaults: Config,
    file_config: Config,
    file_source_name: &str,
    env_config: Config,
    env_source_name: &str,
) -> Config {
    let config = merge_with_logging(defaults, file_config, file_source_name);
    merge_with_logging(config, env_config, env_source_name)
}

fn merge_with_logging(mut base: Config, override_config: Config, source_name: &str) -> Config {
    let mut changes = Vec::new();

    merge_parameter_store(
        &mut base.parameter_store,
        &override_config.parameter_store,
        &mut changes,
    );
    merge_profiles(&mut base.profiles, &override_config.profiles, &mut changes);

    if !changes.is_empty() {
        tracing::info!("Configuration from {}: {:?}", source_name, changes);
    }

    base
}

fn merge_parameter_store(
    base: &mut ParameterStoreSettings,
    override_config: &ParameterStoreSettings,
    changes: &mut Vec<String>,
) {
    let defaults = ParameterStoreSettings::default();

    if override_config.enabled != defaults.enabled && override_config.enabled != base.enabled {
        changes.push(format!("parameter_store.enabled = {}", override_config.enabled));
        base.enabled = override_config.enabled;
    }
    if !override_config.enabled_profiles.is_empty()
        && override_config.enabled_profiles != base.enabled_profiles
    {
        changes.push(format!(
            "parameter_store.enabled_profiles = {:?}",
            override_config.enabled_profiles
        ));
        base.enabled_profiles
            .clone_from(&override_config.enabled_profiles);
    }
    if !override_config.roots.is_empty() && override_config.roots != base.roots {
        changes.push(format!("parameter_store.roots = {}", override_config.roots));
        base.roots.clone_from(&override_config.roots);
    }
    if override_config.strict_profiles != defaults.strict_profiles
        && override_config.strict_profiles != base.strict_profiles
    {
        changes.push(format!(
            "parameter_store.strict_profiles = {:?}",
            override_config.strict_profiles
        ));
        base.strict_profiles
            .clone_from(&override_config.strict_profiles);
    }
    if override_config.fetch_strategy != defaults.fetch_strategy
        && override_config.fetch_strategy != base.fetch_strategy
    {
        changes.push(format!(
            "parameter_store.fetch_strategy = {}",
            override_config.fetch_strategy
        ));
        base.fetch_strategy = override_config.fetch_strategy;
    }
    if override_config.fail_on_missing && !base.fail_on_missing {
        changes.push("parameter_store.fail_on_missing = true".to_string());
        base.fail_on_missing = true;
    }
    if override_config.region.is_some() && override_config.region != base.region {
        changes.push(format!(
            "parameter_store.region = {}",
            override_config.region.as_deref().unwrap_or_default()
        ));
        base.region.clone_from(&override_config.region);
    }
    if override_config.endpoint.is_some() && override_config.endpoint != base.endpoint {
        changes.push(format!(
            "parameter_store.endpoint = {}",
            override_config.endpoint.as_deref().unwrap_or_default()
        ));
        base.endpoint.clone_from(&override_config.endpoint);
    }
    if override_config.probe_timeout_ms != defaults.probe_timeout_ms
        && override_config.probe_timeout_ms != base.probe_timeout_ms
    {
        changes.push(format!(
            "parameter_store.probe_timeout_ms = {}",
            override_config.probe_timeout_ms
        ));
        base.probe_timeout_ms = override_config.probe_timeout_ms;
    }
}

fn merge_profiles(
    base: &mut ProfilesConfig,
    override_config: &ProfilesConfig,
    changes: &mut Vec<String>,
) {
    if !override_config.active.is_empty() && override_config.active != base.active {
        changes.push(format!("profiles.active = {:?}", override_config.active));
        base.active.clone_from(&override_config.active);
    }
}
