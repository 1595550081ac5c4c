//! Training cost estimation from token counts.

mod dataset;
mod estimator;
mod tokenizer;

pub use dataset::{
    conversation_messages, count_conversation_tokens, count_dataset_tokens, load_conversations,
    validate_conversations, DatasetStats, FormatErrorKind, FormatReport, DEFAULT_TOKEN_LIMIT,
    TOKENS_PER_CONVERSATION, TOKENS_PER_MESSAGE, TOKENS_PER_ROLE,
};
pub use estimator::{
    estimate_cost, CostEstimate, CostEstimator, DatasetReport, DEFAULT_EPOCHS,
    DEFAULT_PRICE_PER_TOKEN,
};
pub use tokenizer::{Encoding, TiktokenCounter, TokenCounter};
