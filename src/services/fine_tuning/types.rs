use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FineTuningJobStatus {
    ValidatingFiles,
    Pending,
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    /// Any status this client does not recognise; polled like a running job.
    #[serde(other)]
    Unknown,
}

impl FineTuningJobStatus {
    /// Polling stops once a job reaches one of these.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FineTuningJobStatus::Succeeded
                | FineTuningJobStatus::Failed
                | FineTuningJobStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FineTuningJobStatus::ValidatingFiles => "validating_files",
            FineTuningJobStatus::Pending => "pending",
            FineTuningJobStatus::Queued => "queued",
            FineTuningJobStatus::Running => "running",
            FineTuningJobStatus::Succeeded => "succeeded",
            FineTuningJobStatus::Failed => "failed",
            FineTuningJobStatus::Cancelled => "cancelled",
            FineTuningJobStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FineTuningJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FineTuningJobRequest {
    pub model: String,
    pub training_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperparameters: Option<Hyperparameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl FineTuningJobRequest {
    pub fn new(model: impl Into<String>, training_file: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            training_file: training_file.into(),
            validation_file: None,
            seed: None,
            hyperparameters: None,
            suffix: None,
        }
    }

    pub fn with_validation_file(mut self, file_id: impl Into<String>) -> Self {
        self.validation_file = Some(file_id.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_hyperparameters(mut self, hyperparameters: Hyperparameters) -> Self {
        self.hyperparameters = Some(hyperparameters);
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_epochs: Option<HyperparameterValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<HyperparameterValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_rate_multiplier: Option<HyperparameterValue>,
}

impl Hyperparameters {
    pub fn with_epochs(epochs: u32) -> Self {
        Self {
            n_epochs: Some(HyperparameterValue::Number(f64::from(epochs))),
            ..Default::default()
        }
    }
}

/// Either `"auto"` or a concrete number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HyperparameterValue {
    Auto(String),
    Number(f64),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FineTuningJob {
    pub id: String,
    #[serde(default)]
    pub object: String,
    pub created_at: i64,
    #[serde(default)]
    pub finished_at: Option<i64>,
    pub model: String,
    #[serde(default)]
    pub fine_tuned_model: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    pub status: FineTuningJobStatus,
    #[serde(default)]
    pub hyperparameters: Option<Hyperparameters>,
    pub training_file: String,
    #[serde(default)]
    pub validation_file: Option<String>,
    #[serde(default)]
    pub result_files: Vec<String>,
    #[serde(default)]
    pub trained_tokens: Option<u64>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub estimated_finish: Option<i64>,
    #[serde(default)]
    pub error: Option<FineTuningError>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FineTuningError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FineTuningJobListResponse {
    pub object: String,
    pub data: Vec<FineTuningJob>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FineTuningEvent {
    pub id: String,
    #[serde(default)]
    pub object: String,
    pub created_at: i64,
    pub level: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FineTuningEventListResponse {
    pub object: String,
    pub data: Vec<FineTuningEvent>,
    #[serde(default)]
    pub has_more: bool,
}

/// Pagination for list and events queries.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub after: Option<String>,
}

impl ListParams {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn query_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }
        if let Some(after) = &self.after {
            params.push(format!("after={}", after));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}
