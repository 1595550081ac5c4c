use crate::auth::AuthManager;
use crate::errors::FineTuneResult;
use crate::resilience::ResilienceOrchestrator;
use crate::services::chat::{ChatCompletionRequest, ChatCompletionResponse, ChatRequestValidator};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use http::{HeaderMap, Method};
use std::sync::Arc;
use tracing::debug;

#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    /// Runs a chat completion against the named deployment.
    async fn create(
        &self,
        deployment: &str,
        request: ChatCompletionRequest,
    ) -> FineTuneResult<ChatCompletionResponse>;
}

pub struct ChatCompletionServiceImpl {
    transport: Arc<dyn HttpTransport>,
    auth_manager: Arc<dyn AuthManager>,
    resilience: Arc<ResilienceOrchestrator>,
}

impl ChatCompletionServiceImpl {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
        resilience: Arc<ResilienceOrchestrator>,
    ) -> Self {
        Self {
            transport,
            auth_manager,
            resilience,
        }
    }
}

#[async_trait]
impl ChatCompletionService for ChatCompletionServiceImpl {
    async fn create(
        &self,
        deployment: &str,
        request: ChatCompletionRequest,
    ) -> FineTuneResult<ChatCompletionResponse> {
        ChatRequestValidator::validate(deployment, &request)?;

        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;

        let path = format!("/deployments/{}/chat/completions", deployment);
        let (transport, path, headers, request) =
            (self.transport.as_ref(), path.as_str(), &headers, &request);
        let response: ChatCompletionResponse = self
            .resilience
            .execute(move || transport.request(Method::POST, path, Some(request), headers.clone()))
            .await?;

        if let Some(usage) = &response.usage {
            debug!(
                deployment = %deployment,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion"
            );
        }
        Ok(response)
    }
}
