use crate::errors::{FineTuneError, FineTuneResult};
use crate::evaluation::{
    build_evaluation_rows, run_inference, ComparisonTable, EvaluationRow, InferenceConfig,
    InferenceOutcome, MetricScorer, MetricScores, TestRecord,
};
use crate::services::chat::ChatCompletionService;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// A deployment to evaluate and the label it gets in the comparison table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTarget {
    pub label: String,
    pub deployment: String,
}

impl ModelTarget {
    pub fn new(label: impl Into<String>, deployment: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            deployment: deployment.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelEvaluation {
    pub model: String,
    pub deployment: String,
    pub outcomes: Vec<InferenceOutcome>,
    pub rows: Vec<EvaluationRow>,
    pub scores: MetricScores,
}

impl ModelEvaluation {
    pub fn failed_rows(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub evaluations: Vec<ModelEvaluation>,
    pub table: ComparisonTable,
}

/// Infers, cleans and scores each model in turn, then tabulates the scores.
pub struct EvaluationPipeline {
    chat: Arc<dyn ChatCompletionService>,
    scorer: Arc<dyn MetricScorer>,
    inference: InferenceConfig,
}

impl EvaluationPipeline {
    pub fn new(chat: Arc<dyn ChatCompletionService>, scorer: Arc<dyn MetricScorer>) -> Self {
        Self {
            chat,
            scorer,
            inference: InferenceConfig::default(),
        }
    }

    pub fn with_inference_config(mut self, inference: InferenceConfig) -> Self {
        self.inference = inference;
        self
    }

    /// Fails with [`FineTuneError::InferenceFailed`] instead of scoring when
    /// every inference call for the model failed.
    pub async fn evaluate_model(
        &self,
        target: &ModelTarget,
        records: &[TestRecord],
    ) -> FineTuneResult<ModelEvaluation> {
        info!(model = %target.label, deployment = %target.deployment, rows = records.len(), "evaluating model");

        let outcomes =
            run_inference(self.chat.as_ref(), &target.deployment, records, &self.inference).await;
        if !outcomes.is_empty() && outcomes.iter().all(InferenceOutcome::is_failed) {
            return Err(FineTuneError::InferenceFailed {
                model: target.label.clone(),
                rows: outcomes.len(),
            });
        }
        let rows = build_evaluation_rows(records, &outcomes)?;
        let scores = self.scorer.score(&target.label, &rows).await?;

        Ok(ModelEvaluation {
            model: target.label.clone(),
            deployment: target.deployment.clone(),
            outcomes,
            rows,
            scores,
        })
    }

    /// Models are evaluated sequentially in the given order; the first
    /// scoring failure stops the run.
    pub async fn evaluate_models(
        &self,
        targets: &[ModelTarget],
        records: &[TestRecord],
    ) -> FineTuneResult<EvaluationReport> {
        let mut table = ComparisonTable::new();
        let mut evaluations = Vec::with_capacity(targets.len());

        for target in targets {
            let evaluation = self.evaluate_model(target, records).await?;
            table.add(evaluation.model.clone(), evaluation.scores.clone());
            evaluations.push(evaluation);
        }

        Ok(EvaluationReport { evaluations, table })
    }
}
