use crate::errors::{ConfigurationError, FineTuneError, FineTuneResult};
use crate::evaluation::Metric;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use url::Url;

pub const DEFAULT_JUDGE_MODEL: &str = "gpt-4";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Where and how the external evaluation service scores rows.
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    pub service_url: Url,
    pub judge_model: String,
    pub embedding_model: String,
    pub metrics: Vec<Metric>,
    pub api_key: Option<Secret<String>>,
    pub timeout: Duration,
}

impl EvaluationConfig {
    pub fn new(service_url: Url) -> Self {
        Self {
            service_url,
            judge_model: DEFAULT_JUDGE_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            metrics: Metric::all().to_vec(),
            api_key: None,
            timeout: Duration::from_secs(600),
        }
    }

    /// Reads EVALUATION_SERVICE_URL plus the optional EVALUATION_JUDGE_MODEL,
    /// EVALUATION_EMBEDDING_MODEL, EVALUATION_METRICS (comma separated) and
    /// EVALUATION_API_KEY.
    pub fn from_env() -> FineTuneResult<Self> {
        let url = std::env::var("EVALUATION_SERVICE_URL").map_err(|_| {
            FineTuneError::Configuration(ConfigurationError::MissingConfiguration(
                "EVALUATION_SERVICE_URL environment variable not found".to_string(),
            ))
        })?;

        let mut config = Self::new(Url::parse(&url)?);
        if let Ok(model) = std::env::var("EVALUATION_JUDGE_MODEL") {
            config.judge_model = model;
        }
        if let Ok(model) = std::env::var("EVALUATION_EMBEDDING_MODEL") {
            config.embedding_model = model;
        }
        if let Ok(metrics) = std::env::var("EVALUATION_METRICS") {
            config.metrics = Metric::parse_list(&metrics)?;
        }
        if let Ok(key) = std::env::var("EVALUATION_API_KEY") {
            config.api_key = Some(Secret::new(key));
        }

        Ok(config)
    }

    pub fn with_judge_model(mut self, model: impl Into<String>) -> Self {
        self.judge_model = model.into();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<Metric>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(key.into()));
        self
    }

    pub fn validate(&self) -> FineTuneResult<()> {
        if self.metrics.is_empty() {
            return Err(FineTuneError::Configuration(
                ConfigurationError::MissingConfiguration("at least one metric".to_string()),
            ));
        }
        if self.judge_model.is_empty() || self.embedding_model.is_empty() {
            return Err(FineTuneError::Configuration(
                ConfigurationError::MissingConfiguration("judge and embedding models".to_string()),
            ));
        }
        if self.timeout.is_zero() {
            return Err(FineTuneError::Configuration(
                ConfigurationError::InvalidTimeout("Timeout must be greater than 0".to_string()),
            ));
        }
        Ok(())
    }

    pub(crate) fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|key| key.expose_secret().as_str())
    }
}
