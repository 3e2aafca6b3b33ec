//! Settings loaded from files and the environment drive the activation gate.

use config::{Config, FetchStrategy, load_from_env, load_from_file, merge_configs};
use parameter_store::{Activation, ActivationGate, Environment};
use serial_test::serial;
use std::env;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;
use testing::{RecordingClient, RecordingFactory, unique_root};

const VARS: &[&str] = &[
    "PARAMETER_STORE_ENABLED",
    "PARAMETER_STORE_ENABLED_PROFILES",
    "PARAMETER_STORE_ROOTS",
    "PARAMETER_STORE_STRICT_PROFILES",
    "PARAMETER_STORE_FETCH_STRATEGY",
    "PARAMETER_STORE_FAIL_ON_MISSING",
    "PARAMETER_STORE_REGION",
    "PARAMETER_STORE_ENDPOINT",
    "PARAMETER_STORE_PROBE_TIMEOUT_MS",
    "APP_PROFILES_ACTIVE",
];

fn clear_vars() {
    for var in VARS {
        unsafe {
            env::remove_var(var);
        }
    }
}

#[tokio::test]
#[serial]
async fn test_env_profiles_activate_and_order_roots() -> anyhow::Result<()> {
    clear_vars();
    let app = unique_root("app");
    unsafe {
        env::set_var("PARAMETER_STORE_ENABLED_PROFILES", "Dev,Staging");
        env::set_var("PARAMETER_STORE_ROOTS", format!("{app}, /common"));
        env::set_var("APP_PROFILES_ACTIVE", "Dev");
    }

    let config = load_from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    clear_vars();

    let client = Arc::new(RecordingClient::from_pairs([(
        "/common/server/port".to_string(),
        "8090".to_string(),
    )]));
    let mut gate = ActivationGate::new(Arc::new(RecordingFactory::new(client.clone())));
    let mut env = Environment::from_config(&config);

    let outcome = gate.activate(&mut env, &config.parameter_store).await?;
    assert_eq!(
        outcome,
        Activation::Registered {
            source_name: "AwsParameterStorePropertySource".to_string(),
            roots: vec![app.clone(), "/common".to_string()],
        }
    );

    client.clear_calls();
    assert_eq!(env.get_property("server.port").await?.as_deref(), Some("8090"));
    assert_eq!(
        client.get_calls(),
        vec![format!("{app}/server/port"), "/common/server/port".to_string()]
    );
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_env_without_matching_profile_stays_disabled() -> anyhow::Result<()> {
    clear_vars();
    unsafe {
        env::set_var("PARAMETER_STORE_ENABLED_PROFILES", "Staging");
        env::set_var("APP_PROFILES_ACTIVE", "Dev");
    }

    let config = load_from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    clear_vars();

    let factory = Arc::new(RecordingFactory::new(Arc::new(RecordingClient::empty())));
    let mut gate = ActivationGate::new(factory.clone());
    let mut env = Environment::from_config(&config);

    assert_eq!(
        gate.activate(&mut env, &config.parameter_store).await?,
        Activation::Disabled
    );
    assert_eq!(factory.creations(), 0);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_env_overrides_file_settings() -> anyhow::Result<()> {
    clear_vars();
    let dir = tempdir()?;
    let path = dir.path().join("parameter-store.toml");
    fs::write(
        &path,
        r#"
[parameter_store]
enabled = true
roots = "/file-app"
fetch_strategy = "prefetch"

[profiles]
active = ["Dev"]
"#,
    )?;
    unsafe {
        env::set_var("PARAMETER_STORE_ROOTS", "/env-app");
    }

    let file_config = load_from_file(&path)?;
    let env_config = load_from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    clear_vars();
    let config = merge_configs(Config::default(), file_config, "file", env_config, "env");

    assert!(config.parameter_store.enabled);
    assert_eq!(config.parameter_store.roots, "/env-app");
    assert_eq!(config.parameter_store.fetch_strategy, FetchStrategy::Prefetch);

    let client = Arc::new(RecordingClient::from_pairs([
        ("/env-app/db/url", "postgres://env"),
        ("/file-app/db/url", "postgres://file"),
    ]));
    let mut gate = ActivationGate::new(Arc::new(RecordingFactory::new(client.clone())));
    let mut env = Environment::from_config(&config);
    gate.activate(&mut env, &config.parameter_store).await?;

    assert_eq!(
        env.get_property("db.url").await?.as_deref(),
        Some("postgres://env")
    );
    assert_eq!(client.list_calls(), vec!["/env-app", "/env-app"]);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_malformed_env_value_is_reported() {
    clear_vars();
    unsafe {
        env::set_var("PARAMETER_STORE_FETCH_STRATEGY", "eager");
    }

    let result = load_from_env();
    clear_vars();

    assert!(result.is_err());
}
