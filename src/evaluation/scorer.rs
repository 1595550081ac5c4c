use crate::auth::{AuthManager, AzureAuthManager, BearerTokenProvider};
use crate::errors::{ConfigurationError, FineTuneError, FineTuneResult};
use crate::evaluation::{EvaluationConfig, EvaluationRow};
use crate::resilience::{ResilienceConfig, ResilienceOrchestrator};
use crate::transport::{HttpTransport, ReqwestTransport};
use async_trait::async_trait;
use http::{HeaderMap, Method};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// Metric name to score.
pub type MetricScores = BTreeMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Faithfulness,
    AnswerRelevancy,
    AnswerSimilarity,
    AnswerCorrectness,
}

impl Metric {
    pub fn all() -> &'static [Metric] {
        &[
            Metric::Faithfulness,
            Metric::AnswerRelevancy,
            Metric::AnswerSimilarity,
            Metric::AnswerCorrectness,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Faithfulness => "faithfulness",
            Metric::AnswerRelevancy => "answer_relevancy",
            Metric::AnswerSimilarity => "answer_similarity",
            Metric::AnswerCorrectness => "answer_correctness",
        }
    }

    /// Parses a comma separated list such as `faithfulness,answer_similarity`.
    pub fn parse_list(list: &str) -> FineTuneResult<Vec<Metric>> {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = FineTuneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::all()
            .iter()
            .copied()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| {
                FineTuneError::Configuration(ConfigurationError::MissingConfiguration(format!(
                    "unknown metric '{}'",
                    s
                )))
            })
    }
}

/// Scores a model's evaluation rows. The scoring itself happens elsewhere.
#[async_trait]
pub trait MetricScorer: Send + Sync {
    async fn score(&self, model: &str, rows: &[EvaluationRow]) -> FineTuneResult<MetricScores>;
}

#[derive(Debug, Serialize)]
struct EvaluateRequest<'a> {
    model: &'a str,
    metrics: &'a [Metric],
    judge_model: &'a str,
    embedding_model: &'a str,
    rows: &'a [EvaluationRow],
}

#[derive(Debug, Deserialize)]
struct EvaluateResponse {
    scores: MetricScores,
}

/// [`MetricScorer`] that posts rows to an evaluation service at `{base}/evaluate`.
pub struct HttpMetricScorer {
    transport: Arc<dyn HttpTransport>,
    auth_manager: Option<Arc<dyn AuthManager>>,
    resilience: Arc<ResilienceOrchestrator>,
    config: EvaluationConfig,
}

impl HttpMetricScorer {
    pub fn new(config: EvaluationConfig) -> FineTuneResult<Self> {
        config.validate()?;
        let transport = Arc::new(ReqwestTransport::with_base_url(
            config.service_url.as_str(),
            config.timeout,
        )?);
        let auth_manager = config.api_key().map(|key| {
            Arc::new(AzureAuthManager::with_provider(Arc::new(BearerTokenProvider::new(key))))
                as Arc<dyn AuthManager>
        });
        let resilience = Arc::new(ResilienceOrchestrator::new(ResilienceConfig::default()));

        Ok(Self::with_parts(config, transport, auth_manager, resilience))
    }

    pub fn with_parts(
        config: EvaluationConfig,
        transport: Arc<dyn HttpTransport>,
        auth_manager: Option<Arc<dyn AuthManager>>,
        resilience: Arc<ResilienceOrchestrator>,
    ) -> Self {
        Self {
            transport,
            auth_manager,
            resilience,
            config,
        }
    }
}

#[async_trait]
impl MetricScorer for HttpMetricScorer {
    async fn score(&self, model: &str, rows: &[EvaluationRow]) -> FineTuneResult<MetricScores> {
        let mut headers = HeaderMap::new();
        if let Some(auth_manager) = &self.auth_manager {
            auth_manager.apply_auth(&mut headers).await?;
        }

        let body = EvaluateRequest {
            model,
            metrics: &self.config.metrics,
            judge_model: &self.config.judge_model,
            embedding_model: &self.config.embedding_model,
            rows,
        };

        let (transport, headers, body) = (self.transport.as_ref(), &headers, &body);
        let response: EvaluateResponse = self
            .resilience
            .execute(move || transport.request(Method::POST, "/evaluate", Some(body), headers.clone()))
            .await?;

        for metric in &self.config.metrics {
            if !response.scores.contains_key(metric.as_str()) {
                warn!(model = %model, metric = %metric, "evaluation service returned no score");
            }
        }
        for (metric, score) in &response.scores {
            if !(0.0..=1.0).contains(score) {
                warn!(model = %model, metric = %metric, score, "score outside [0, 1]");
            }
        }

        info!(model = %model, rows = rows.len(), metrics = response.scores.len(), "scored model");
        Ok(response.scores)
    }
}
