pub mod auth;
pub mod client;
pub mod cost;
pub mod errors;
pub mod evaluation;
pub mod jsonl;
pub mod resilience;
pub mod services;
pub mod transport;

#[cfg(test)]
pub mod mocks;
#[cfg(test)]
pub mod fixtures;

pub use client::{
    AzureOpenAIClient, AzureOpenAIClientBuilder, AzureOpenAIClientImpl, AzureOpenAIConfig,
    ManagementClient, ManagementConfig,
};
pub use errors::{FineTuneError, FineTuneResult};

pub use cost::{CostEstimate, CostEstimator, Encoding, TiktokenCounter, TokenCounter};
pub use evaluation::{
    ComparisonTable, EvaluationConfig, EvaluationPipeline, EvaluationReport, HttpMetricScorer,
    InferenceOutcome, MetricScorer, ModelTarget, TestRecord,
};
pub use services::{
    chat::{ChatCompletionRequest, ChatCompletionResponse, ChatCompletionService, ChatMessage},
    deployments::{DeploymentPoller, DeploymentRequest, DeploymentResponse, DeploymentService},
    files::{FileObject, FilePurpose, FileService, FileUploadRequest},
    fine_tuning::{
        FineTuningJob, FineTuningJobRequest, FineTuningJobStatus, FineTuningService, JobPoller,
        PollConfig, PollReport,
    },
};

pub mod prelude {
    pub use crate::client::{
        AzureOpenAIClient, AzureOpenAIClientBuilder, AzureOpenAIConfig, ManagementClient,
        ManagementConfig,
    };
    pub use crate::cost::{CostEstimator, TiktokenCounter, TokenCounter};
    pub use crate::errors::{FineTuneError, FineTuneResult};
    pub use crate::evaluation::{EvaluationPipeline, HttpMetricScorer, MetricScorer, ModelTarget};
    pub use crate::services::deployments::{DeploymentRequest, DeploymentService};
    pub use crate::services::files::{FilePurpose, FileService};
    pub use crate::services::fine_tuning::{
        FineTuningJobRequest, FineTuningService, JobPoller, PollConfig,
    };
}
