//! Mock HTTP transport for testing

use crate::errors::{FineTuneError, FineTuneResult};
use crate::transport::{HttpTransport, RawResponse};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mock HTTP transport that replays queued responses and records every request
#[derive(Clone)]
pub struct MockHttpTransport {
    inner: Arc<Mutex<MockHttpTransportInner>>,
}

struct MockHttpTransportInner {
    responses: VecDeque<FineTuneResult<serde_json::Value>>,
    file_upload_responses: VecDeque<FineTuneResult<serde_json::Value>>,
    raw_responses: VecDeque<RawResponse>,
    requests: Vec<MockRequest>,
}

#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

impl MockHttpTransport {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockHttpTransportInner {
                responses: VecDeque::new(),
                file_upload_responses: VecDeque::new(),
                raw_responses: VecDeque::new(),
                requests: Vec::new(),
            })),
        }
    }

    /// Queue a successful JSON response
    pub fn with_json_response(self, response: serde_json::Value) -> Self {
        self.inner.lock().unwrap().responses.push_back(Ok(response));
        self
    }

    /// Queue an error response
    pub fn with_error_response(self, error: FineTuneError) -> Self {
        self.inner.lock().unwrap().responses.push_back(Err(error));
        self
    }

    /// Queue a file upload response
    pub fn with_file_upload_response(self, response: FineTuneResult<serde_json::Value>) -> Self {
        self.inner
            .lock()
            .unwrap()
            .file_upload_responses
            .push_back(response);
        self
    }

    /// Queue a raw status/body response
    pub fn with_raw_response(self, status: u16, body: impl Into<String>) -> Self {
        self.inner.lock().unwrap().raw_responses.push_back(RawResponse {
            status,
            body: body.into(),
        });
        self
    }

    pub fn requests(&self) -> Vec<MockRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// Verify that a request was made with the given method and path
    pub fn verify_request(&self, method: Method, path: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .requests
            .iter()
            .any(|r| r.method == method && r.path == path)
    }

    pub fn request_count(&self) -> usize {
        self.inner.lock().unwrap().requests.len()
    }

    fn record(&self, method: Method, path: &str, body: Option<serde_json::Value>, headers: HeaderMap) {
        self.inner.lock().unwrap().requests.push(MockRequest {
            method,
            path: path.to_string(),
            body,
            headers,
        });
    }
}

impl Default for MockHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        headers: HeaderMap,
    ) -> FineTuneResult<serde_json::Value> {
        self.record(method, path, body, headers);

        self.inner
            .lock()
            .unwrap()
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(FineTuneError::internal("No mock response configured")))
    }

    async fn upload_file(
        &self,
        path: &str,
        _file_data: Bytes,
        file_name: &str,
        purpose: &str,
        headers: HeaderMap,
    ) -> FineTuneResult<serde_json::Value> {
        let body = serde_json::json!({ "filename": file_name, "purpose": purpose });
        self.record(Method::POST, path, Some(body), headers);

        self.inner
            .lock()
            .unwrap()
            .file_upload_responses
            .pop_front()
            .unwrap_or_else(|| Err(FineTuneError::internal("No mock file upload response configured")))
    }

    async fn send_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        headers: HeaderMap,
    ) -> FineTuneResult<RawResponse> {
        self.record(method, path, body, headers);

        self.inner
            .lock()
            .unwrap()
            .raw_responses
            .pop_front()
            .ok_or_else(|| FineTuneError::internal("No mock raw response configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_json_response() {
        let mock = MockHttpTransport::new()
            .with_json_response(serde_json::json!({"id": "ftjob-1", "object": "fine_tuning.job"}));
        let transport: Arc<dyn HttpTransport> = Arc::new(mock.clone());

        let response: serde_json::Value = transport
            .request(
                Method::POST,
                "/fine_tuning/jobs",
                Some(&serde_json::json!({"model": "gpt-35-turbo"})),
                HeaderMap::new(),
            )
            .await
            .unwrap();

        assert_eq!(response["id"], "ftjob-1");
        assert!(mock.verify_request(Method::POST, "/fine_tuning/jobs"));
        assert_eq!(mock.requests()[0].body.as_ref().unwrap()["model"], "gpt-35-turbo");
    }

    #[tokio::test]
    async fn test_mock_transport_exhausted_queue() {
        let mock = MockHttpTransport::new();
        let result = mock
            .send_json(Method::GET, "/files", None, HeaderMap::new())
            .await;

        assert!(result.is_err());
        assert_eq!(mock.request_count(), 1);
    }
}
