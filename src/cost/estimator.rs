use crate::cost::{
    count_dataset_tokens, load_conversations, validate_conversations, DatasetStats, FormatReport,
    TokenCounter, DEFAULT_TOKEN_LIMIT,
};
use crate::errors::{FineTuneError, FineTuneResult, ValidationError};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Price in USD per training token used when none is given.
pub const DEFAULT_PRICE_PER_TOKEN: f64 = 0.000_008;
pub const DEFAULT_EPOCHS: u32 = 3;

/// `total_tokens × price_per_token × epochs`.
pub fn estimate_cost(total_tokens: usize, price_per_token: f64, epochs: u32) -> f64 {
    total_tokens as f64 * price_per_token * f64::from(epochs)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    pub total_tokens: usize,
    pub price_per_token: f64,
    pub epochs: u32,
    pub cost: f64,
}

impl CostEstimate {
    pub fn new(total_tokens: usize, price_per_token: f64, epochs: u32) -> Self {
        Self {
            total_tokens,
            price_per_token,
            epochs,
            cost: estimate_cost(total_tokens, price_per_token, epochs),
        }
    }
}

impl fmt::Display for CostEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tokens x {} epochs x ${} per token = ${:.2}",
            self.total_tokens, self.epochs, self.price_per_token, self.cost
        )
    }
}

/// Everything learned about a training file before it is uploaded.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    pub path: String,
    pub format: FormatReport,
    pub stats: DatasetStats,
    pub estimate: CostEstimate,
}

pub struct CostEstimator {
    counter: Arc<dyn TokenCounter>,
    price_per_token: f64,
    epochs: u32,
    token_limit: usize,
}

impl CostEstimator {
    pub fn new(counter: Arc<dyn TokenCounter>) -> Self {
        Self {
            counter,
            price_per_token: DEFAULT_PRICE_PER_TOKEN,
            epochs: DEFAULT_EPOCHS,
            token_limit: DEFAULT_TOKEN_LIMIT,
        }
    }

    pub fn with_price_per_token(mut self, price_per_token: f64) -> Self {
        self.price_per_token = price_per_token;
        self
    }

    pub fn with_epochs(mut self, epochs: u32) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_token_limit(mut self, token_limit: usize) -> Self {
        self.token_limit = token_limit;
        self
    }

    fn validate(&self) -> FineTuneResult<()> {
        if self.epochs == 0 {
            return Err(FineTuneError::Validation(ValidationError::ValueOutOfRange {
                field: "epochs".to_string(),
                min: "1".to_string(),
                max: "unbounded".to_string(),
                value: "0".to_string(),
            }));
        }
        if !self.price_per_token.is_finite() || self.price_per_token < 0.0 {
            return Err(FineTuneError::Validation(ValidationError::InvalidParameter {
                parameter: "price_per_token".to_string(),
                reason: format!("must be a non-negative number, got {}", self.price_per_token),
            }));
        }
        Ok(())
    }

    pub fn estimate(&self, conversations: &[serde_json::Value]) -> FineTuneResult<CostEstimate> {
        self.validate()?;
        let total_tokens = count_dataset_tokens(self.counter.as_ref(), conversations)?;
        Ok(CostEstimate::new(total_tokens, self.price_per_token, self.epochs))
    }

    /// Loads, checks and prices a JSONL training file.
    pub fn analyze_file(&self, path: &Path) -> FineTuneResult<DatasetReport> {
        self.validate()?;
        let conversations = load_conversations(path)?;

        let format = validate_conversations(&conversations);
        for (kind, count) in &format.errors {
            warn!(path = %path.display(), error = %kind, count, "dataset format problem");
        }

        let stats = DatasetStats::compute(self.counter.as_ref(), &conversations, self.token_limit)?;
        if stats.over_limit > 0 {
            warn!(
                examples = stats.over_limit,
                limit = self.token_limit,
                "examples exceed the token limit and will be truncated"
            );
        }

        let estimate = CostEstimate::new(stats.total_tokens, self.price_per_token, self.epochs);
        info!(
            path = %path.display(),
            examples = stats.examples,
            total_tokens = estimate.total_tokens,
            cost = estimate.cost,
            "estimated training cost"
        );

        Ok(DatasetReport {
            path: path.display().to_string(),
            format,
            stats,
            estimate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    struct CharCounter;

    impl TokenCounter for CharCounter {
        fn count(&self, text: &str) -> usize {
            text.chars().count()
        }
    }

    #[test_case(1_000, 0.000_008, 3 => 0.024 ; "notebook price")]
    #[test_case(0, 0.5, 3 => 0.0 ; "empty dataset")]
    #[test_case(10, 1.0, 1 => 10.0 ; "single epoch")]
    fn test_estimate_cost(tokens: usize, price: f64, epochs: u32) -> f64 {
        (estimate_cost(tokens, price, epochs) * 1e9).round() / 1e9
    }

    #[test]
    fn test_doubling_epochs_doubles_cost() {
        let three = estimate_cost(12_345, 0.000_008, 3);
        let six = estimate_cost(12_345, 0.000_008, 6);
        assert!((six - 2.0 * three).abs() < 1e-12);
    }

    #[test]
    fn test_estimator_rejects_zero_epochs() {
        let estimator = CostEstimator::new(Arc::new(CharCounter)).with_epochs(0);
        assert!(estimator.estimate(&[]).is_err());
    }

    #[test]
    fn test_estimate_conversations() {
        let data = vec![json!({"messages": [{"role": "user", "content": "abc"}]})];
        let estimate = CostEstimator::new(Arc::new(CharCounter))
            .with_price_per_token(0.5)
            .with_epochs(2)
            .estimate(&data)
            .unwrap();

        // 3 + 4 ("user") + 1 + 3 + 3
        assert_eq!(estimate.total_tokens, 14);
        assert_eq!(estimate.cost, 14.0);
    }

    #[test]
    fn test_analyze_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training_set.jsonl");
        std::fs::write(
            &path,
            concat!(
                "{\"messages\": [{\"role\": \"user\", \"content\": \"hi\"}, {\"role\": \"assistant\", \"content\": \"yo\"}]}\n",
                "{\"messages\": [{\"role\": \"user\", \"content\": \"hello\"}]}\n",
            ),
        )
        .unwrap();

        let report = CostEstimator::new(Arc::new(CharCounter))
            .with_token_limit(20)
            .analyze_file(&path)
            .unwrap();

        assert_eq!(report.stats.examples, 2);
        assert_eq!(report.stats.over_limit, 1);
        assert_eq!(report.format.errors.len(), 1);
        assert_eq!(report.estimate.epochs, DEFAULT_EPOCHS);
        assert_eq!(report.estimate.total_tokens, report.stats.total_tokens);
    }

    #[test]
    fn test_display() {
        let estimate = CostEstimate::new(1_000, 0.000_008, 3);
        assert_eq!(
            estimate.to_string(),
            "1000 tokens x 3 epochs x $0.000008 per token = $0.02"
        );
    }
}
