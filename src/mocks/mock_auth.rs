//! Mock authentication manager for testing

use crate::auth::AuthManager;
use crate::errors::{AuthenticationError, FineTuneError, FineTuneResult};
use async_trait::async_trait;
use http::{HeaderMap, HeaderValue};

/// Adds a fixed `api-key` header, or fails with the configured message
#[derive(Clone, Default)]
pub struct MockAuthManager {
    error: Option<String>,
}

impl MockAuthManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

#[async_trait]
impl AuthManager for MockAuthManager {
    async fn apply_auth(&self, headers: &mut HeaderMap) -> FineTuneResult<()> {
        if let Some(message) = &self.error {
            return Err(FineTuneError::Authentication(
                AuthenticationError::InvalidApiKey(message.clone()),
            ));
        }
        headers.insert("api-key", HeaderValue::from_static("test-api-key"));
        Ok(())
    }

    fn validate(&self) -> FineTuneResult<()> {
        match &self.error {
            Some(message) => Err(FineTuneError::Authentication(
                AuthenticationError::InvalidApiKey(message.clone()),
            )),
            None => Ok(()),
        }
    }
}
