use crate::auth::AuthManager;
use crate::client::{AzureOpenAIClient, AzureOpenAIConfig};
use crate::resilience::ResilienceOrchestrator;
use crate::services::{
    chat::{ChatCompletionService, ChatCompletionServiceImpl},
    files::{FileService, FileServiceImpl},
    fine_tuning::{FineTuningService, FineTuningServiceImpl},
};
use crate::transport::HttpTransport;
use std::sync::Arc;

pub struct AzureOpenAIClientImpl {
    config: AzureOpenAIConfig,
    files_service: Arc<FileServiceImpl>,
    fine_tuning_service: Arc<FineTuningServiceImpl>,
    chat_service: Arc<ChatCompletionServiceImpl>,
}

impl AzureOpenAIClientImpl {
    pub fn new(
        config: AzureOpenAIConfig,
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
        resilience: Arc<ResilienceOrchestrator>,
    ) -> Self {
        let files_service = Arc::new(FileServiceImpl::new(
            transport.clone(),
            auth_manager.clone(),
            resilience.clone(),
        ));

        let fine_tuning_service = Arc::new(FineTuningServiceImpl::new(
            transport.clone(),
            auth_manager.clone(),
            resilience.clone(),
        ));

        // no circuit breaker: every inference row is attempted
        let chat_service = Arc::new(ChatCompletionServiceImpl::new(
            transport,
            auth_manager,
            Arc::new(resilience.without_circuit_breaker()),
        ));

        Self {
            config,
            files_service,
            fine_tuning_service,
            chat_service,
        }
    }
}

impl AzureOpenAIClient for AzureOpenAIClientImpl {
    fn config(&self) -> &AzureOpenAIConfig {
        &self.config
    }

    fn files(&self) -> Arc<dyn FileService> {
        self.files_service.clone()
    }

    fn fine_tuning(&self) -> Arc<dyn FineTuningService> {
        self.fine_tuning_service.clone()
    }

    fn chat(&self) -> Arc<dyn ChatCompletionService> {
        self.chat_service.clone()
    }
}
