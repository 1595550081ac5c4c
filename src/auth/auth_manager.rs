use crate::auth::{ApiKeyProvider, AuthProvider, BearerTokenProvider};
use crate::client::{AzureOpenAIConfig, ManagementConfig};
use crate::errors::{AuthenticationError, FineTuneError, FineTuneResult};
use async_trait::async_trait;
use http::HeaderMap;
use std::sync::Arc;

/// Trait for managing authentication in requests
#[async_trait]
pub trait AuthManager: Send + Sync {
    /// Applies authentication headers to the request
    async fn apply_auth(&self, headers: &mut HeaderMap) -> FineTuneResult<()>;

    /// Validates the authentication configuration
    fn validate(&self) -> FineTuneResult<()>;
}

pub struct AzureAuthManager {
    provider: Arc<dyn AuthProvider>,
}

impl AzureAuthManager {
    /// Key-based auth for the data plane
    pub fn from_config(config: &AzureOpenAIConfig) -> Self {
        Self::with_provider(Arc::new(ApiKeyProvider::new(config.api_key())))
    }

    /// Bearer-token auth for the management plane
    pub fn from_management_config(config: &ManagementConfig) -> Self {
        Self::with_provider(Arc::new(BearerTokenProvider::new(config.token())))
    }

    pub fn with_provider(provider: Arc<dyn AuthProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl AuthManager for AzureAuthManager {
    async fn apply_auth(&self, headers: &mut HeaderMap) -> FineTuneResult<()> {
        self.provider.authenticate(headers).await
    }

    fn validate(&self) -> FineTuneResult<()> {
        if !self.provider.is_valid() {
            return Err(FineTuneError::Authentication(
                AuthenticationError::InvalidApiKey("credential validation failed".to_string()),
            ));
        }
        Ok(())
    }
}
