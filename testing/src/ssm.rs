//! HTTP mock of the SSM JSON protocol (`awsJson1_1`).
//!
//! Every operation is a `POST /` whose `x-amz-target` header names the
//! operation. Service errors are 400 responses carrying `__type`.

use aws_sdk_ssm::config::retry::RetryConfig;
use aws_sdk_ssm::config::{BehaviorVersion, Credentials, Region};
use parameter_store::AwsParameterClient;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const GET_PARAMETER: &str = "AmazonSSM.GetParameter";
const GET_PARAMETERS_BY_PATH: &str = "AmazonSSM.GetParametersByPath";

pub struct SsmMock {
    server: MockServer,
}

impl SsmMock {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// A real AWS client pointed at this mock, with static credentials and
    /// retries disabled.
    pub fn client(&self) -> AwsParameterClient {
        let config = aws_sdk_ssm::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "test"))
            .endpoint_url(self.uri())
            .retry_config(RetryConfig::disabled())
            .build();
        AwsParameterClient::new(aws_sdk_ssm::Client::from_conf(config))
    }

    /// `GetParameter` for `name` returns `value`.
    pub async fn mount_parameter(&self, name: &str, value: &str, kind: &str) {
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-amz-target", GET_PARAMETER))
            .and(body_partial_json(json!({ "Name": name })))
            .respond_with(ok(json!({ "Parameter": parameter_json(name, value, kind) })))
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// `GetParameter` for any name not mounted reports `ParameterNotFound`.
    pub async fn mount_not_found(&self) {
        self.mount_get_error(400, "ParameterNotFound").await;
    }

    /// `GetParameter` for any name not mounted fails with `error_type`.
    pub async fn mount_get_error(&self, status: u16, error_type: &str) {
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-amz-target", GET_PARAMETER))
            .respond_with(service_error(status, error_type))
            .mount(&self.server)
            .await;
    }

    /// One page of `GetParametersByPath` under `list_path`.
    ///
    /// `after` is the token the request must carry (`None` for the first
    /// page); `next` is the token handed back.
    pub async fn mount_page(
        &self,
        list_path: &str,
        after: Option<&str>,
        parameters: &[(&str, &str, &str)],
        next: Option<&str>,
    ) {
        let mut body = json!({
            "Parameters": parameters
                .iter()
                .map(|(name, value, kind)| parameter_json(name, value, kind))
                .collect::<Vec<_>>(),
        });
        if let Some(next) = next {
            body["NextToken"] = json!(next);
        }

        let mut expected = json!({ "Path": list_path, "Recursive": true, "WithDecryption": true });
        let priority = match after {
            Some(token) => {
                expected["NextToken"] = json!(token);
                1
            }
            None => 5,
        };

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-amz-target", GET_PARAMETERS_BY_PATH))
            .and(body_partial_json(expected))
            .respond_with(ok(body))
            .with_priority(priority)
            .mount(&self.server)
            .await;
    }

    /// Every `GetParametersByPath` fails with `error_type`.
    pub async fn mount_listing_error(&self, status: u16, error_type: &str) {
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-amz-target", GET_PARAMETERS_BY_PATH))
            .respond_with(service_error(status, error_type))
            .mount(&self.server)
            .await;
    }

    /// The `x-amz-target` of every request received, in order.
    pub async fn targets(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| {
                request
                    .headers
                    .get("x-amz-target")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }

    /// The JSON bodies of every request received, in order.
    pub async fn request_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }
}

fn parameter_json(name: &str, value: &str, kind: &str) -> Value {
    json!({
        "Name": name,
        "Type": kind,
        "Value": value,
        "Version": 1,
        "ARN": format!("arn:aws:ssm:us-east-1:000000000000:parameter{name}"),
    })
}

fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), CONTENT_TYPE)
}

fn service_error(status: u16, error_type: &str) -> ResponseTemplate {
    let body = json!({ "__type": error_type, "message": format!("{error_type} (mock)") });
    ResponseTemplate::new(status).set_body_raw(body.to_string(), CONTENT_TYPE)
}
