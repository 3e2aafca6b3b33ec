//! # Parameter Store Configuration Source
//!
//! Resolves configuration keys against a remote hierarchical parameter store
//! and exposes the result as the first-precedence property source of an
//! [`Environment`].
//!
//! - [`client`]: remote client contract, with [`aws`] and [`local`] backends
//! - [`resolver`]: lazy root-fallback resolution
//! - [`prefetch`]: bulk listing resolution
//! - [`cache`]: per-key memoization with single-flight lookups
//! - [`activation`]: the one-time activation gate and reachability probe
//!
//! ```rust,no_run
//! use parameter_store::{ActivationGate, AwsClientFactory, Environment};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = config::load_from_env()?;
//! let mut env = Environment::from_config(&config);
//! let mut gate = ActivationGate::new(Arc::new(AwsClientFactory));
//! gate.activate(&mut env, &config.parameter_store).await?;
//!
//! let port = env.get_property("server.port").await?;
//! # let _ = port;
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod aws;
pub mod cache;
pub mod client;
pub mod environment;
pub mod local;
pub mod prefetch;
pub mod resolver;
pub mod telemetry;

pub use activation::{
    ACTIVATION_PROFILE, Activation, ActivationGate, GateState, PROPERTY_SOURCE_NAME,
};
pub use aws::{AwsClientFactory, AwsParameterClient};
pub use cache::{CacheEntry, ParameterStorePropertySource};
pub use client::{
    ClientFactory, Parameter, ParameterClient, ParameterKind, ParameterPage, PathQuery,
};
pub use environment::{Environment, MapPropertySource, PropertySource, PropertySources};
pub use errors::ParameterStoreError;
pub use local::{LocalClientFactory, LocalParameterClient};
pub use prefetch::PrefetchResolver;
pub use resolver::{Resolver, RootFallbackResolver, key_to_path, to_remote_path};
pub use telemetry::LookupTelemetry;
