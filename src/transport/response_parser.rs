use crate::errors::{ErrorMapper, FineTuneError, FineTuneResult};
use crate::transport::RawResponse;
use reqwest::Response;
use serde::de::DeserializeOwned;

pub struct ResponseParser;

impl ResponseParser {
    pub async fn parse_response(response: Response) -> FineTuneResult<serde_json::Value> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ErrorMapper::map_status_with_headers(
                status.as_u16(),
                &headers,
                &body,
            ));
        }

        if body.is_empty() {
            return Ok(serde_json::Value::Null);
        }

        Self::parse_json(&body)
    }

    pub async fn parse_raw(response: Response) -> FineTuneResult<RawResponse> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }

    pub fn parse_json<T: DeserializeOwned>(data: &[u8]) -> FineTuneResult<T> {
        serde_json::from_slice(data).map_err(|e| {
            FineTuneError::Deserialization(format!(
                "Failed to deserialize JSON: {}. Data: {}",
                e,
                String::from_utf8_lossy(data)
            ))
        })
    }

    pub fn from_value<T: DeserializeOwned>(value: serde_json::Value) -> FineTuneResult<T> {
        serde_json::from_value(value)
            .map_err(|e| FineTuneError::Deserialization(format!("Unexpected response shape: {}", e)))
    }
}
