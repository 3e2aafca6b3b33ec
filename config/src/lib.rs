//! # Configuration System
//!
//! Settings for the parameter store configuration source.
//!
//! This crate provides:
//! - The activation and lookup settings structures
//! - Environment variable loading (12-factor app principles)
//! - Configuration file loading (TOML/YAML)
//! - Configuration precedence (env > file > defaults)
//! - Configuration validation

pub mod config;
pub mod file_loader;
pub mod loader;
pub mod precedence;
pub mod validator;

pub use config::{Config, FetchStrategy, ParameterStoreSettings, ProfilesConfig, split_list};
pub use file_loader::{ConfigFileError, load_from_file, load_from_toml, load_from_yaml};
pub use loader::load_from_env;
pub use precedence::merge_configs;
pub use validator::validate;
pub use ::validator::Validate;
