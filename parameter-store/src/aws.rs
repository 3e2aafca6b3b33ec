//! AWS Systems Manager Parameter Store client.
//!
//! Credentials and region come from the default `aws-config` provider chain
//! unless overridden by the settings. Retries and timeouts are the SDK's own.

use crate::client::{ClientFactory, Parameter, ParameterClient, ParameterKind, ParameterPage, PathQuery};
use async_trait::async_trait;
use config::ParameterStoreSettings;
use errors::ParameterStoreError;
use std::sync::Arc;

pub struct AwsParameterClient {
    client: aws_sdk_ssm::Client,
}

impl AwsParameterClient {
    pub fn new(client: aws_sdk_ssm::Client) -> Self {
        Self { client }
    }

    /// Builds a client from the shared AWS configuration, applying the
    /// region and endpoint overrides from `settings`.
    pub async fn from_settings(settings: &ParameterStoreSettings) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let shared = loader.load().await;

        let mut client_config = aws_sdk_ssm::config::Builder::from(&shared);
        if let Some(endpoint) = &settings.endpoint {
            client_config = client_config.endpoint_url(endpoint);
        }

        Self::new(aws_sdk_ssm::Client::from_conf(client_config.build()))
    }
}

fn convert(parameter: &aws_sdk_ssm::types::Parameter) -> Parameter {
    Parameter {
        name: parameter.name().unwrap_or_default().to_string(),
        value: parameter.value().unwrap_or_default().to_string(),
        kind: parameter
            .r#type()
            .map(|kind| ParameterKind::from(kind.as_str())),
    }
}

#[async_trait]
impl ParameterClient for AwsParameterClient {
    async fn get_parameter(&self, path: &str) -> Result<Option<Parameter>, ParameterStoreError> {
        let result = self
            .client
            .get_parameter()
            .name(path)
            .with_decryption(true)
            .send()
            .await;

        match result {
            Ok(output) => Ok(output.parameter().map(convert)),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_parameter_not_found()) =>
            {
                tracing::debug!(path, "Parameter not found");
                Ok(None)
            }
            Err(err) => Err(ParameterStoreError::remote(path, err)),
        }
    }

    async fn get_parameters_by_path(
        &self,
        query: PathQuery,
    ) -> Result<ParameterPage, ParameterStoreError> {
        let output = self
            .client
            .get_parameters_by_path()
            .path(&query.path)
            .recursive(true)
            .with_decryption(true)
            .set_max_results(query.max_results)
            .set_next_token(query.next_token.clone())
            .send()
            .await
            .map_err(|e| ParameterStoreError::remote(&query.path, e))?;

        Ok(ParameterPage {
            parameters: output.parameters().iter().map(convert).collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }
}

/// Creates [`AwsParameterClient`]s from the activation settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct AwsClientFactory;

#[async_trait]
impl ClientFactory for AwsClientFactory {
    async fn create(
        &self,
        settings: &ParameterStoreSettings,
    ) -> Result<Arc<dyn ParameterClient>, ParameterStoreError> {
        Ok(Arc::new(AwsParameterClient::from_settings(settings).await))
    }
}
