//! Deployment PUT against the management plane

use super::*;
use integrations_azure_finetune::client::{ManagementClient, ManagementConfig};
use integrations_azure_finetune::errors::FineTuneError;
use integrations_azure_finetune::services::deployments::DeploymentRequest;
use integrations_azure_finetune::services::fine_tuning::PollConfig;
use std::time::Duration;
use serde_json::json;
use wiremock::matchers::body_json;

const DEPLOYMENT_PATH: &str = "/subscriptions/sub-123/resourceGroups/rg-finetune/providers/Microsoft.CognitiveServices/accounts/contoso-aoai/deployments/ft-deployment";

fn management_client(server: &MockServer, token: &str) -> Result<ManagementClient, FineTuneError> {
    let config = ManagementConfig::new("sub-123", "rg-finetune", "contoso-aoai", token)
        .with_endpoint(Url::parse(&server.uri()).unwrap());
    ManagementClient::new(&config)
}

#[tokio::test]
async fn test_deployment_put_sends_sku_and_model() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("PUT"))
        .and(path(DEPLOYMENT_PATH))
        .and(query_param("api-version", "2023-05-01"))
        .and(header("authorization", "Bearer mgmt-token"))
        .and(body_json(json!({
            "sku": {"name": "standard", "capacity": 1},
            "properties": {
                "model": {
                    "format": "OpenAI",
                    "name": "gpt-35-turbo-0613.ft-integration",
                    "version": "1"
                }
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": DEPLOYMENT_PATH,
            "name": "ft-deployment",
            "properties": {"provisioningState": "Creating"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = management_client(&mock_server, "mgmt-token")
        .unwrap()
        .deployments()
        .create_or_update(DeploymentRequest::new(
            "ft-deployment",
            "gpt-35-turbo-0613.ft-integration",
        ))
        .await
        .unwrap();

    assert_eq!(response.status, 201);
    assert!(response.is_success());
    assert_eq!(response.provisioning_state().as_deref(), Some("Creating"));
}

#[tokio::test]
async fn test_deployment_failure_is_reported_once() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("PUT"))
        .and(path(DEPLOYMENT_PATH))
        .respond_with(error_response(
            503,
            json!({"error": {"code": "ServiceUnavailable", "message": "Try again later."}}),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = management_client(&mock_server, "mgmt-token")
        .unwrap()
        .deployments()
        .create_or_update(DeploymentRequest::new("ft-deployment", "model"))
        .await
        .unwrap();

    assert_eq!(response.status, 503);
    assert!(!response.is_success());
    assert!(response.body.contains("Try again later."));
}

#[tokio::test]
async fn test_management_client_requires_token() {
    let mock_server = setup_mock_server().await;
    let result = management_client(&mock_server, " ");
    assert!(matches!(result, Err(FineTuneError::Configuration(_))));
}

#[tokio::test]
async fn test_deployment_poller_waits_for_succeeded() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path(DEPLOYMENT_PATH))
        .and(query_param("api-version", "2023-05-01"))
        .and(header("authorization", "Bearer mgmt-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "ft-deployment",
            "properties": {"provisioningState": "Creating"}
        })))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(DEPLOYMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "ft-deployment",
            "properties": {"provisioningState": "Succeeded"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = management_client(&mock_server, "mgmt-token")
        .unwrap()
        .deployment_poller(PollConfig::default().with_interval(Duration::from_millis(10)))
        .unwrap()
        .wait_until_ready("ft-deployment")
        .await
        .unwrap();

    assert_eq!(response.provisioning_state().as_deref(), Some("Succeeded"));
}
