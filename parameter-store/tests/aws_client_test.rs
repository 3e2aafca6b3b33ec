//! The AWS client against a local mock of the SSM JSON protocol.

use errors::ParameterStoreError;
use parameter_store::{ParameterClient, ParameterKind, PathQuery};
use testing::SsmMock;

#[tokio::test]
async fn test_get_parameter_returns_decrypted_value() {
    let mock = SsmMock::start().await;
    mock.mount_parameter("/app/db/password", "hunter2", "SecureString")
        .await;

    let parameter = mock
        .client()
        .get_parameter("/app/db/password")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(parameter.name, "/app/db/password");
    assert_eq!(parameter.value, "hunter2");
    assert_eq!(parameter.kind, Some(ParameterKind::SecureString));

    let bodies = mock.request_bodies().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["Name"], "/app/db/password");
    assert_eq!(bodies[0]["WithDecryption"], true);
}

#[tokio::test]
async fn test_parameter_not_found_is_none() {
    let mock = SsmMock::start().await;
    mock.mount_not_found().await;

    let result = mock.client().get_parameter("/app/missing").await.unwrap();

    assert!(result.is_none());
    assert_eq!(mock.targets().await, vec!["AmazonSSM.GetParameter"]);
}

#[tokio::test]
async fn test_other_service_errors_propagate_with_path() {
    let mock = SsmMock::start().await;
    mock.mount_get_error(400, "AccessDeniedException").await;

    let err = mock
        .client()
        .get_parameter("/app/server/port")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ParameterStoreError::RemoteStore { ref path, .. } if path == "/app/server/port"
    ));
}

#[tokio::test]
async fn test_server_errors_are_not_retried() {
    let mock = SsmMock::start().await;
    mock.mount_get_error(500, "InternalServerError").await;

    let result = mock.client().get_parameter("/app/server/port").await;

    assert!(matches!(result, Err(ParameterStoreError::RemoteStore { .. })));
    assert_eq!(mock.targets().await.len(), 1);
}

#[tokio::test]
async fn test_listing_follows_next_token() {
    let mock = SsmMock::start().await;
    mock.mount_page(
        "/app",
        None,
        &[("/app/server/port", "8090", "String")],
        Some("page-2"),
    )
    .await;
    mock.mount_page(
        "/app",
        Some("page-2"),
        &[("/app/server/host", "0.0.0.0", "String")],
        None,
    )
    .await;
    let client = mock.client();

    let first = client
        .get_parameters_by_path(PathQuery::new("/app"))
        .await
        .unwrap();
    assert_eq!(first.parameters.len(), 1);
    assert_eq!(first.next_token.as_deref(), Some("page-2"));

    let second = client
        .get_parameters_by_path(PathQuery::new("/app").with_next_token(first.next_token))
        .await
        .unwrap();
    assert_eq!(second.parameters[0].name, "/app/server/host");
    assert!(second.next_token.is_none());

    let bodies = mock.request_bodies().await;
    assert_eq!(bodies[1]["NextToken"], "page-2");
    assert_eq!(bodies[1]["Recursive"], true);
}

#[tokio::test]
async fn test_listing_sends_max_results() {
    let mock = SsmMock::start().await;
    mock.mount_page("/", None, &[], None).await;

    let page = mock
        .client()
        .get_parameters_by_path(PathQuery::new("/").with_max_results(1))
        .await
        .unwrap();

    assert!(page.parameters.is_empty());
    assert_eq!(mock.request_bodies().await[0]["MaxResults"], 1);
}

#[tokio::test]
async fn test_listing_errors_propagate() {
    let mock = SsmMock::start().await;
    mock.mount_listing_error(400, "AccessDeniedException").await;

    let result = mock
        .client()
        .get_parameters_by_path(PathQuery::new("/app"))
        .await;

    assert!(matches!(
        result,
        Err(ParameterStoreError::RemoteStore { ref path, .. }) if path == "/app"
    ));
}
