use crate::auth::{AuthManager, AzureAuthManager};
use crate::client::{AzureOpenAIClient, AzureOpenAIClientImpl, AzureOpenAIConfig};
use crate::errors::{ConfigurationError, FineTuneError, FineTuneResult};
use crate::resilience::ResilienceOrchestrator;
use crate::transport::{HttpTransport, ReqwestTransport};
use std::sync::Arc;
use url::Url;

pub struct AzureOpenAIClientBuilder {
    config: Option<AzureOpenAIConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    auth_manager: Option<Arc<dyn AuthManager>>,
    resilience: Option<Arc<ResilienceOrchestrator>>,
}

impl AzureOpenAIClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            transport: None,
            auth_manager: None,
            resilience: None,
        }
    }

    pub fn with_config(mut self, config: AzureOpenAIConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_endpoint(mut self, endpoint: Url, api_key: impl Into<String>) -> Self {
        self.config = Some(AzureOpenAIConfig::new(endpoint, api_key));
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_auth_manager(mut self, auth_manager: Arc<dyn AuthManager>) -> Self {
        self.auth_manager = Some(auth_manager);
        self
    }

    pub fn with_resilience(mut self, resilience: Arc<ResilienceOrchestrator>) -> Self {
        self.resilience = Some(resilience);
        self
    }

    pub fn build(self) -> FineTuneResult<Arc<dyn AzureOpenAIClient>> {
        let config = self.config.ok_or_else(|| {
            FineTuneError::Configuration(ConfigurationError::MissingConfiguration(
                "endpoint and API key must be provided".to_string(),
            ))
        })?;
        config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::from_config(&config)?),
        };

        let auth_manager = self
            .auth_manager
            .unwrap_or_else(|| Arc::new(AzureAuthManager::from_config(&config)));

        let resilience = self
            .resilience
            .unwrap_or_else(|| Arc::new(ResilienceOrchestrator::from_config(&config)));

        Ok(Arc::new(AzureOpenAIClientImpl::new(
            config,
            transport,
            auth_manager,
            resilience,
        )))
    }
}

impl Default for AzureOpenAIClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
