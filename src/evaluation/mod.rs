//! RAG evaluation of model deployments.
//!
//! Each model answers every test instruction, the answers and prompts are
//! reduced to final answers and contexts, and an external service scores the
//! resulting rows. Scores of all models end up in one [`ComparisonTable`].

mod config;
mod dataset;
mod extract;
mod inference;
mod pipeline;
mod report;
mod scorer;


pub use config::{EvaluationConfig, DEFAULT_EMBEDDING_MODEL, DEFAULT_JUDGE_MODEL};
pub use dataset::{build_evaluation_rows, load_test_records, EvaluationRow, TestRecord};
pub use extract::{extract_context, extract_final_answer, ANSWER_MARKER};
pub use inference::{run_inference, InferenceConfig, InferenceOutcome, DEFAULT_TEMPERATURE};
pub use pipeline::{EvaluationPipeline, EvaluationReport, ModelEvaluation, ModelTarget};
pub use report::{ComparisonTable, ModelScores};
pub use scorer::{HttpMetricScorer, Metric, MetricScorer, MetricScores};
