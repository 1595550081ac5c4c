use crate::errors::{FineTuneError, FineTuneResult, ValidationError};
use crate::evaluation::{extract_context, extract_final_answer, InferenceOutcome};
use crate::jsonl::read_jsonl;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One held-out test example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    /// Context documents followed by the question on the final line.
    pub instruction: String,
    #[serde(default)]
    pub cot_answer: Option<String>,
    #[serde(default)]
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_context: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

pub fn load_test_records(path: &Path) -> FineTuneResult<Vec<TestRecord>> {
    read_jsonl(path)
}

/// Input row for the metric scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRow {
    pub question: String,
    pub answer: Option<String>,
    pub contexts: Vec<String>,
    pub ground_truth: Option<String>,
}

/// Pairs each record with its inference outcome.
///
/// The answer is the final answer extracted from a completed response and
/// `None` for a failed one; the ground truth is extracted the same way from
/// the record's `cot_answer`.
pub fn build_evaluation_rows(
    records: &[TestRecord],
    outcomes: &[InferenceOutcome],
) -> FineTuneResult<Vec<EvaluationRow>> {
    if records.len() != outcomes.len() {
        return Err(FineTuneError::Validation(ValidationError::InvalidRequest(format!(
            "{} records but {} inference outcomes",
            records.len(),
            outcomes.len()
        ))));
    }

    Ok(records
        .iter()
        .zip(outcomes)
        .map(|(record, outcome)| EvaluationRow {
            question: record.question.clone(),
            answer: extract_final_answer(outcome.text()),
            contexts: vec![extract_context(Some(&record.instruction)).unwrap_or_default()],
            ground_truth: extract_final_answer(record.cot_answer.as_deref()),
        })
        .collect())
}
