mod http_transport;
mod multipart;
mod response_parser;

pub use http_transport::ReqwestTransport;
pub use multipart::MultipartBuilder;
pub use response_parser::ResponseParser;

use crate::errors::FineTuneResult;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Status and body of a response that is reported to the caller rather than mapped to an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a JSON request; non-2xx responses are mapped to errors.
    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        headers: HeaderMap,
    ) -> FineTuneResult<serde_json::Value>;

    /// Uploads a file as multipart/form-data with a `purpose` field.
    async fn upload_file(
        &self,
        path: &str,
        file_data: Bytes,
        file_name: &str,
        purpose: &str,
        headers: HeaderMap,
    ) -> FineTuneResult<serde_json::Value>;

    /// Sends a JSON request and returns status and body without interpreting them.
    async fn send_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        headers: HeaderMap,
    ) -> FineTuneResult<RawResponse>;
}

impl dyn HttpTransport {
    /// Typed wrapper over [`HttpTransport::send_json`].
    pub async fn request<T, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&T>,
        headers: HeaderMap,
    ) -> FineTuneResult<R>
    where
        T: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let body = body.map(serde_json::to_value).transpose()?;
        let value = self.send_json(method, path, body, headers).await?;
        ResponseParser::from_value(value)
    }
}
