mod client_impl;
mod config;
mod factory;
mod management;

pub use client_impl::AzureOpenAIClientImpl;
pub use config::{
    AzureOpenAIConfig, ManagementConfig, DEFAULT_API_VERSION, DEFAULT_MANAGEMENT_API_VERSION,
};
pub use factory::AzureOpenAIClientBuilder;
pub use management::ManagementClient;

use crate::errors::FineTuneResult;
use crate::services::{
    chat::ChatCompletionService,
    files::FileService,
    fine_tuning::{FineTuningService, JobPoller, PollConfig},
};
use std::sync::Arc;

/// Data-plane client for one Azure OpenAI resource.
pub trait AzureOpenAIClient: Send + Sync {
    fn config(&self) -> &AzureOpenAIConfig;
    fn files(&self) -> Arc<dyn FileService>;
    fn fine_tuning(&self) -> Arc<dyn FineTuningService>;
    fn chat(&self) -> Arc<dyn ChatCompletionService>;

    /// Poller bound to this client's fine-tuning service.
    fn job_poller(&self, config: PollConfig) -> FineTuneResult<JobPoller> {
        JobPoller::new(self.fine_tuning(), config)
    }
}
