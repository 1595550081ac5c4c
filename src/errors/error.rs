use crate::errors::categories::{
    AuthenticationError, ConfigurationError, DatasetError, NetworkError, RateLimitError,
    ServerError, ValidationError,
};
use thiserror::Error;

pub type FineTuneResult<T> = Result<T, FineTuneError>;

#[derive(Error, Debug)]
pub enum FineTuneError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Rate limit error: {0}")]
    RateLimit(#[from] RateLimitError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Request error: {status_code} - {message}")]
    Request {
        status_code: u16,
        message: String,
        error_code: Option<String>,
    },

    #[error("Fine-tuning job {job_id} still '{last_status}' after {waited_secs}s")]
    PollTimeout {
        job_id: String,
        last_status: String,
        waited_secs: u64,
    },

    #[error("Deployment {deployment} still '{last_state}' after {waited_secs}s")]
    DeploymentTimeout {
        deployment: String,
        last_state: String,
        waited_secs: u64,
    },

    #[error("Deployment {deployment} ended in provisioning state '{state}'")]
    DeploymentFailed { deployment: String, state: String },

    #[error("All {rows} inference calls for {model} failed")]
    InferenceFailed { model: String, rows: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Timeout error: operation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl FineTuneError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FineTuneError::RateLimit(_)
                | FineTuneError::Network(_)
                | FineTuneError::Server(_)
                | FineTuneError::Timeout { .. }
        )
    }

    pub fn is_authentication_error(&self) -> bool {
        matches!(self, FineTuneError::Authentication(_))
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            FineTuneError::Request { error_code, .. } => error_code.as_deref(),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            FineTuneError::Request { status_code, .. } => Some(*status_code),
            FineTuneError::Authentication(_) => Some(401),
            FineTuneError::RateLimit(_) => Some(429),
            FineTuneError::Server(ServerError::InternalError(_)) => Some(500),
            FineTuneError::Server(ServerError::BadGateway(_)) => Some(502),
            FineTuneError::Server(ServerError::ServiceUnavailable(_)) => Some(503),
            FineTuneError::Server(ServerError::GatewayTimeout(_)) => Some(504),
            _ => None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        FineTuneError::Unknown(message.into())
    }
}

impl From<reqwest::Error> for FineTuneError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FineTuneError::Network(NetworkError::ConnectionTimeout(err.to_string()))
        } else if err.is_connect() {
            FineTuneError::Network(NetworkError::ConnectionFailed(err.to_string()))
        } else {
            FineTuneError::Network(NetworkError::RequestFailed(err.to_string()))
        }
    }
}

impl From<serde_json::Error> for FineTuneError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            FineTuneError::Deserialization(err.to_string())
        } else {
            FineTuneError::Serialization(err.to_string())
        }
    }
}

impl From<url::ParseError> for FineTuneError {
    fn from(err: url::ParseError) -> Self {
        FineTuneError::Configuration(ConfigurationError::InvalidEndpoint(err.to_string()))
    }
}
