use crate::evaluation::TestRecord;
use crate::services::chat::{ChatCompletionRequest, ChatCompletionService, ChatMessage};
use serde::Serialize;
use tracing::{info, warn};

pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Result of one inference call in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum InferenceOutcome {
    Completed(String),
    Failed(String),
}

impl InferenceOutcome {
    /// Response text; `None` when the call failed.
    pub fn text(&self) -> Option<&str> {
        match self {
            InferenceOutcome::Completed(text) => Some(text),
            InferenceOutcome::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, InferenceOutcome::Failed(_))
    }
}

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
        }
    }
}

/// Sends each record's instruction as a single user message, one request at a time.
///
/// A failed request is recorded as [`InferenceOutcome::Failed`] and the batch
/// moves on to the next record.
pub async fn run_inference(
    chat: &dyn ChatCompletionService,
    deployment: &str,
    records: &[TestRecord],
    config: &InferenceConfig,
) -> Vec<InferenceOutcome> {
    let mut outcomes = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let mut request = ChatCompletionRequest::new(vec![ChatMessage::user(&record.instruction)])
            .with_temperature(config.temperature);
        request.max_tokens = config.max_tokens;

        let outcome = match chat.create(deployment, request).await {
            Ok(response) => match response.first_content() {
                Some(text) => InferenceOutcome::Completed(text.to_string()),
                None => InferenceOutcome::Failed("response contained no content".to_string()),
            },
            Err(e) => InferenceOutcome::Failed(e.to_string()),
        };

        if let InferenceOutcome::Failed(reason) = &outcome {
            warn!(deployment = %deployment, row = index, reason = %reason, "inference failed");
        }
        outcomes.push(outcome);
    }

    let failed = outcomes.iter().filter(|o| o.is_failed()).count();
    info!(deployment = %deployment, rows = outcomes.len(), failed, "inference finished");
    outcomes
}
