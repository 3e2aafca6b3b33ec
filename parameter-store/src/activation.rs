//! # Activation Gate
//!
//! Decides once per gate whether the parameter store joins the
//! configuration chain, and wires it in when it does.
//!
//! The gate activates when any of these holds:
//! - `enabled` is set
//! - the environment accepts the [`ACTIVATION_PROFILE`]
//! - the environment accepts one of `enabled_profiles`
//!
//! On activation the store is probed with a bounded listing under the first
//! root. An unreachable store is fatal in the strict profiles and degrades
//! to local configuration everywhere else.

use crate::cache::ParameterStorePropertySource;
use crate::client::{ClientFactory, ParameterClient, PathQuery};
use crate::environment::Environment;
use crate::prefetch::{PrefetchResolver, listing_path};
use crate::resolver::{Resolver, RootFallbackResolver};
use config::{FetchStrategy, ParameterStoreSettings, Validate};
use errors::ParameterStoreError;
use std::sync::Arc;
use std::time::Duration;

/// Name of the registered property source.
pub const PROPERTY_SOURCE_NAME: &str = "AwsParameterStorePropertySource";

/// Profile that activates the integration on its own.
pub const ACTIVATION_PROFILE: &str = "parameter-store";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Inactive,
    Active,
}

/// What a call to [`ActivationGate::activate`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Neither the flag nor any profile enables the integration.
    Disabled,
    /// The gate had already activated; nothing was done.
    AlreadyActive,
    /// The store could not be reached; local configuration is used.
    Unreachable,
    /// Prefetch found no parameters under any root.
    NothingLoaded,
    Registered {
        source_name: String,
        roots: Vec<String>,
    },
}

pub struct ActivationGate {
    factory: Arc<dyn ClientFactory>,
    state: GateState,
}

impl ActivationGate {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            factory,
            state: GateState::Inactive,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == GateState::Active
    }

    /// Runs the activation check against `env`.
    ///
    /// A disabled check leaves the gate inactive so a later call with other
    /// settings or profiles can still activate it. A fatal probe failure
    /// also leaves it inactive.
    pub async fn activate(
        &mut self,
        env: &mut Environment,
        settings: &ParameterStoreSettings,
    ) -> Result<Activation, ParameterStoreError> {
        if self.is_active() {
            tracing::debug!("Parameter store activation already done");
            return Ok(Activation::AlreadyActive);
        }

        if !is_enabled(env, settings) {
            tracing::debug!(
                profiles = ?env.active_profiles(),
                "Parameter store integration disabled"
            );
            return Ok(Activation::Disabled);
        }

        settings
            .validate()
            .map_err(|e| ParameterStoreError::Configuration {
                message: e.to_string(),
            })?;

        let roots = settings.root_prefixes();
        let strict = env.accepts_profiles(&settings.strict_profiles);

        let source = match self.connect(settings, &roots).await {
            Ok(source) => source,
            Err(err) if strict => {
                tracing::error!(
                    error = %err,
                    profiles = ?env.active_profiles(),
                    "Parameter store unreachable in a strict profile, aborting"
                );
                return Err(err);
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "Parameter store unreachable, continuing with local configuration"
                );
                self.state = GateState::Active;
                return Ok(Activation::Unreachable);
            }
        };

        self.state = GateState::Active;

        let Some(resolver) = source else {
            tracing::warn!(roots = ?roots, "No parameters found under any root");
            return Ok(Activation::NothingLoaded);
        };

        let property_source = ParameterStorePropertySource::new(PROPERTY_SOURCE_NAME, resolver)
            .with_fail_on_missing(settings.fail_on_missing);
        env.property_sources_mut()
            .add_first(Arc::new(property_source));

        tracing::info!(
            source = PROPERTY_SOURCE_NAME,
            roots = ?roots,
            strategy = %settings.fetch_strategy,
            "Parameter store property source registered"
        );

        Ok(Activation::Registered {
            source_name: PROPERTY_SOURCE_NAME.to_string(),
            roots,
        })
    }

    /// Builds the client, probes it and builds the resolver.
    ///
    /// `Ok(None)` means prefetch found nothing to serve.
    async fn connect(
        &self,
        settings: &ParameterStoreSettings,
        roots: &[String],
    ) -> Result<Option<Box<dyn Resolver>>, ParameterStoreError> {
        let first_root = roots.first().map(String::as_str).unwrap_or_default();

        let client = self
            .factory
            .create(settings)
            .await
            .map_err(|e| probe_failure(first_root, e))?;

        probe(client.as_ref(), first_root, settings.probe_timeout_ms).await?;

        match settings.fetch_strategy {
            FetchStrategy::Lazy => Ok(Some(Box::new(RootFallbackResolver::new(
                client,
                roots.to_vec(),
            )))),
            FetchStrategy::Prefetch => {
                let resolver = PrefetchResolver::load(client.as_ref(), roots)
                    .await
                    .map_err(|e| probe_failure(first_root, e))?;
                tracing::info!(count = resolver.len(), "Parameter store prefetch complete");
                Ok((!resolver.is_empty()).then(|| Box::new(resolver) as Box<dyn Resolver>))
            }
        }
    }
}

fn is_enabled(env: &Environment, settings: &ParameterStoreSettings) -> bool {
    settings.enabled
        || env.accepts_profiles(&[ACTIVATION_PROFILE])
        || (!settings.enabled_profiles.is_empty()
            && env.accepts_profiles(&settings.enabled_profiles))
}

/// Lists at most one parameter under `root` within `timeout_ms`.
async fn probe(
    client: &dyn ParameterClient,
    root: &str,
    timeout_ms: u64,
) -> Result<(), ParameterStoreError> {
    let query = PathQuery::new(listing_path(root)).with_max_results(1);

    match tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        client.get_parameters_by_path(query),
    )
    .await
    {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(err)) => Err(probe_failure(root, err)),
        Err(_) => Err(ParameterStoreError::ProbeTimeout {
            root: root.to_string(),
            timeout_ms,
        }),
    }
}

fn probe_failure(root: &str, err: ParameterStoreError) -> ParameterStoreError {
    if err.is_probe_failure() {
        return err;
    }
    ParameterStoreError::ActivationProbe {
        root: root.to_string(),
        source: Box::new(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Parameter, ParameterPage};
    use crate::local::{LocalClientFactory, LocalParameterClient};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A store that fails every call and counts them.
    #[derive(Default)]
    struct DownClient {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ParameterClient for DownClient {
        async fn get_parameter(
            &self,
            path: &str,
        ) -> Result<Option<Parameter>, ParameterStoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ParameterStoreError::remote(path, "connection refused"))
        }

        async fn get_parameters_by_path(
            &self,
            query: PathQuery,
        ) -> Result<ParameterPage, ParameterStoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ParameterStoreError::remote(query.path, "connection refused"))
        }
    }

    struct SharedFactory(Arc<DownClient>);

    #[async_trait]
    impl ClientFactory for SharedFactory {
        async fn create(
            &self,
            _settings: &ParameterStoreSettings,
        ) -> Result<Arc<dyn ParameterClient>, ParameterStoreError> {
            Ok(self.0.clone())
        }
    }

    fn local_gate() -> ActivationGate {
        ActivationGate::new(Arc::new(LocalClientFactory::new(
            LocalParameterClient::from_pairs([("/app/server/port", "8090")]),
        )))
    }

    fn enabled(roots: &str) -> ParameterStoreSettings {
        ParameterStoreSettings {
            enabled: true,
            roots: roots.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_registers_source_first() {
        let mut gate = local_gate();
        let mut env = Environment::new();

        let outcome = gate.activate(&mut env, &enabled("/app")).await.unwrap();

        assert_eq!(
            outcome,
            Activation::Registered {
                source_name: PROPERTY_SOURCE_NAME.to_string(),
                roots: vec!["/app".to_string()],
            }
        );
        assert_eq!(gate.state(), GateState::Active);
        assert_eq!(env.property_sources().names(), vec![PROPERTY_SOURCE_NAME]);
        assert_eq!(
            env.get_property("server.port").await.unwrap().as_deref(),
            Some("8090")
        );
    }

    #[tokio::test]
    async fn test_second_activation_is_a_no_op() {
        let mut gate = local_gate();
        let mut env = Environment::new();
        let settings = enabled("/app");

        gate.activate(&mut env, &settings).await.unwrap();
        let second = gate.activate(&mut env, &settings).await.unwrap();

        assert_eq!(second, Activation::AlreadyActive);
        assert_eq!(env.property_sources().len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_makes_no_calls() {
        let client = Arc::new(DownClient::default());
        let mut gate = ActivationGate::new(Arc::new(SharedFactory(client.clone())));
        let mut env = Environment::with_profiles(["Dev"]);
        let settings = ParameterStoreSettings {
            enabled_profiles: vec!["Staging".to_string()],
            ..Default::default()
        };

        let outcome = gate.activate(&mut env, &settings).await.unwrap();

        assert_eq!(outcome, Activation::Disabled);
        assert_eq!(gate.state(), GateState::Inactive);
        assert!(env.property_sources().is_empty());
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_activation_profile_enables() {
        let mut gate = local_gate();
        let mut env = Environment::with_profiles([ACTIVATION_PROFILE]);
        let settings = ParameterStoreSettings {
            roots: "/app".to_string(),
            ..Default::default()
        };

        let outcome = gate.activate(&mut env, &settings).await.unwrap();
        assert!(matches!(outcome, Activation::Registered { .. }));
    }

    #[tokio::test]
    async fn test_enabled_profiles_with_any_and_negation() {
        let settings = |profiles: &[&str]| ParameterStoreSettings {
            enabled_profiles: profiles.iter().map(|s| (*s).to_string()).collect(),
            roots: "/app".to_string(),
            ..Default::default()
        };

        let mut env = Environment::with_profiles(["Dev"]);
        let outcome = local_gate()
            .activate(&mut env, &settings(&["ANY"]))
            .await
            .unwrap();
        assert!(matches!(outcome, Activation::Registered { .. }));

        let mut env = Environment::with_profiles(["Dev"]);
        let outcome = local_gate()
            .activate(&mut env, &settings(&["!Test"]))
            .await
            .unwrap();
        assert!(matches!(outcome, Activation::Registered { .. }));

        let mut env = Environment::with_profiles(["Test"]);
        let outcome = local_gate()
            .activate(&mut env, &settings(&["!Test"]))
            .await
            .unwrap();
        assert_eq!(outcome, Activation::Disabled);
    }

    #[tokio::test]
    async fn test_unreachable_in_strict_profile_aborts() {
        let client = Arc::new(DownClient::default());
        let mut gate = ActivationGate::new(Arc::new(SharedFactory(client.clone())));
        let mut env = Environment::with_profiles(["Prod"]);

        let err = gate
            .activate(&mut env, &enabled("/app,/common"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ParameterStoreError::ActivationProbe { ref root, .. } if root == "/app"
        ));
        assert_eq!(gate.state(), GateState::Inactive);
        assert!(env.property_sources().is_empty());
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unreachable_elsewhere_degrades() {
        let client = Arc::new(DownClient::default());
        let mut gate = ActivationGate::new(Arc::new(SharedFactory(client.clone())));
        let mut env = Environment::with_profiles(["Dev"]);

        let outcome = gate.activate(&mut env, &enabled("/app")).await.unwrap();

        assert_eq!(outcome, Activation::Unreachable);
        assert_eq!(gate.state(), GateState::Active);
        assert!(env.property_sources().is_empty());

        let again = gate.activate(&mut env, &enabled("/app")).await.unwrap();
        assert_eq!(again, Activation::AlreadyActive);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_settings_are_rejected() {
        let mut gate = local_gate();
        let mut env = Environment::new();

        let err = gate
            .activate(&mut env, &enabled("app,/common"))
            .await
            .unwrap_err();

        assert!(matches!(err, ParameterStoreError::Configuration { .. }));
        assert_eq!(gate.state(), GateState::Inactive);
    }

    #[tokio::test]
    async fn test_prefetch_with_nothing_loaded_registers_nothing() {
        let mut gate = local_gate();
        let mut env = Environment::new();
        let settings = ParameterStoreSettings {
            fetch_strategy: FetchStrategy::Prefetch,
            ..enabled("/other")
        };

        let outcome = gate.activate(&mut env, &settings).await.unwrap();

        assert_eq!(outcome, Activation::NothingLoaded);
        assert!(gate.is_active());
        assert!(env.property_sources().is_empty());
    }

    #[tokio::test]
    async fn test_prefetch_serves_loaded_values() {
        let mut gate = local_gate();
        let mut env = Environment::new();
        let settings = ParameterStoreSettings {
            fetch_strategy: FetchStrategy::Prefetch,
            ..enabled("/app")
        };

        gate.activate(&mut env, &settings).await.unwrap();

        assert_eq!(
            env.get_property("server.port").await.unwrap().as_deref(),
            Some("8090")
        );
    }
}
