use crate::errors::{
    AuthenticationError, FineTuneError, RateLimitError, ServerError, ValidationError,
};
use serde::{Deserialize, Serialize};

/// Error envelope shared by the Azure OpenAI data plane and the ARM management plane.
#[derive(Debug, Deserialize, Serialize)]
pub struct AzureErrorResponse {
    pub error: AzureErrorDetail,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AzureErrorDetail {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
}

pub struct ErrorMapper;

impl ErrorMapper {
    /// Maps HTTP status code and error response to FineTuneError
    pub fn map_status_code(
        status_code: u16,
        error_response: Option<AzureErrorResponse>,
    ) -> FineTuneError {
        let error_detail = error_response.map(|r| r.error);
        let message = error_detail
            .as_ref()
            .map(|d| d.message.clone())
            .unwrap_or_else(|| format!("HTTP error: {}", status_code));
        let error_code = error_detail.as_ref().and_then(|d| d.code.clone());

        match status_code {
            400 => FineTuneError::Validation(ValidationError::InvalidRequest(message)),
            401 => {
                if message.contains("expired") {
                    FineTuneError::Authentication(AuthenticationError::ExpiredToken(message))
                } else {
                    FineTuneError::Authentication(AuthenticationError::InvalidApiKey(message))
                }
            }
            403 => {
                if message.contains("permission") {
                    FineTuneError::Authentication(AuthenticationError::InsufficientPermissions(
                        message,
                    ))
                } else {
                    FineTuneError::Authentication(AuthenticationError::Unauthorized(message))
                }
            }
            429 => {
                if error_code.as_deref() == Some("insufficient_quota") {
                    FineTuneError::RateLimit(RateLimitError::QuotaExceeded(message))
                } else {
                    FineTuneError::RateLimit(RateLimitError::RateLimitExceeded { message })
                }
            }
            500 => FineTuneError::Server(ServerError::InternalError(message)),
            502 => FineTuneError::Server(ServerError::BadGateway(message)),
            503 => FineTuneError::Server(ServerError::ServiceUnavailable(message)),
            504 => FineTuneError::Server(ServerError::GatewayTimeout(message)),
            _ => FineTuneError::Request {
                status_code,
                message,
                error_code,
            },
        }
    }

    /// Maps a failed response, upgrading rate limits with the retry-after hint
    pub fn map_status_with_headers(
        status_code: u16,
        headers: &http::HeaderMap,
        body: &[u8],
    ) -> FineTuneError {
        let error_response: Option<AzureErrorResponse> = serde_json::from_slice(body).ok();
        let error = Self::map_status_code(status_code, error_response);

        match (error, Self::extract_retry_after(headers)) {
            (FineTuneError::RateLimit(RateLimitError::RateLimitExceeded { message }), Some(secs)) => {
                FineTuneError::RateLimit(RateLimitError::TooManyRequests {
                    message,
                    retry_after_secs: Some(secs),
                })
            }
            (error, _) => error,
        }
    }

    /// Extracts retry-after header value in seconds
    pub fn extract_retry_after(headers: &http::HeaderMap) -> Option<u64> {
        headers
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
    }
}
