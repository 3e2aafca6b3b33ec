//! # Configuration Validation
//!
//! Provides validation for all configuration structures using the `validator` crate.

use crate::config::Config;
use validator::Validate;

/// Validate configuration structure.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Validates all configuration fields using the `validator` crate before the
/// activation gate acts on them.
///
/// ## Usage
/// ```rust,no_run
/// use config::{Config, validate};
///
/// let config = Config::default();
/// match validate(&config) {
///     Ok(()) => println!("Configuration is valid"),
///     Err(errors) => println!("Validation errors: {:?}", errors),
/// }
/// ```
///
/// ## Validation Rules
/// ### Parameter Store
/// - `roots`: every non-empty segment starts with `/` and has no trailing `/`
/// - `enabled_profiles` / `strict_profiles`: no empty names (a bare `!` counts as empty)
/// - `region`: 1-64 characters when set
/// - `endpoint`: a valid URL when set
/// - `probe_timeout_ms`: 1-60000
///
/// ### Profiles
/// - `active`: no empty names
pub fn validate(config: &Config) -> Result<(), validator::ValidationErrors> {
    config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_valid_roots() {
        let mut config = Config::default();
        config.parameter_store.roots = "/app, /common/shared,/".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_relative_root() {
        let mut config = Config::default();
        config.parameter_store.roots = "/app,common".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_trailing_slash_root() {
        let mut config = Config::default();
        config.parameter_store.roots = "/app/".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_empty_profile_name() {
        let mut config = Config::default();
        config.parameter_store.enabled_profiles = vec!["Dev".to_string(), " ".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_bare_negation_profile() {
        let mut config = Config::default();
        config.parameter_store.strict_profiles = vec!["!".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_empty_active_profile() {
        let mut config = Config::default();
        config.profiles.active = vec![String::new()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_probe_timeout_out_of_range() {
        let mut config = Config::default();
        config.parameter_store.probe_timeout_ms = 0;
        assert!(validate(&config).is_err());

        config.parameter_store.probe_timeout_ms = 60001;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_endpoint() {
        let mut config = Config::default();
        config.parameter_store.endpoint = Some("not a url".to_string());
        assert!(validate(&config).is_err());

        config.parameter_store.endpoint = Some("http://localhost:4566".to_string());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_region() {
        let mut config = Config::default();
        config.parameter_store.region = Some(String::new());
        assert!(validate(&config).is_err());
    }
}
