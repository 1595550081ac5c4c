//! Integration tests against a WireMock server
//!
//! These exercise the real reqwest transport end to end: URL layout,
//! `api-version` query, auth headers, multipart upload and response parsing.

mod deployments;
mod evaluation;
mod fine_tuning;

use integrations_azure_finetune::client::{AzureOpenAIClient, AzureOpenAIClientBuilder};
use integrations_azure_finetune::resilience::ResilienceOrchestrator;
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-api-key";
pub const API_VERSION: &str = "2024-10-21";

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client for the data plane of `server`, without retries.
pub fn data_plane_client(server: &MockServer) -> Arc<dyn AzureOpenAIClient> {
    AzureOpenAIClientBuilder::new()
        .with_endpoint(Url::parse(&server.uri()).unwrap(), API_KEY)
        .with_resilience(Arc::new(ResilienceOrchestrator::passthrough()))
        .build()
        .expect("Failed to build client")
}

/// Data-plane request carrying the api-key header and api-version query.
pub fn data_plane_mock(http_method: &str, request_path: &str) -> MockBuilder {
    Mock::given(method(http_method))
        .and(path(format!("/openai{}", request_path)))
        .and(query_param("api-version", API_VERSION))
        .and(header("api-key", API_KEY))
}

pub fn success_response(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn error_response(status: u16, error_body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(error_body)
}
