use crate::cost::TokenCounter;
use crate::errors::{DatasetError, FineTuneError, FineTuneResult, ValidationError};
use crate::jsonl::read_jsonl;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Fixed overhead for every message in a conversation.
pub const TOKENS_PER_MESSAGE: usize = 3;
/// Extra token for the `role` field of a message.
pub const TOKENS_PER_ROLE: usize = 1;
/// Priming tokens appended to every conversation.
pub const TOKENS_PER_CONVERSATION: usize = 3;
/// Per-example context limit of the fine-tunable chat models.
pub const DEFAULT_TOKEN_LIMIT: usize = 16_385;

const ALLOWED_ROLES: [&str; 4] = ["system", "user", "assistant", "function"];
const ALLOWED_KEYS: [&str; 5] = ["role", "content", "name", "function_call", "weight"];

/// Loads a conversation dataset, one JSON object per line.
pub fn load_conversations(path: &Path) -> FineTuneResult<Vec<Value>> {
    read_jsonl(path)
}

/// Returns the `messages` array of a conversation record.
pub fn conversation_messages(conversation: &Value, index: usize) -> FineTuneResult<&[Value]> {
    conversation
        .get("messages")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| DatasetError::MissingMessages { index }.into())
}

/// Counts the prompt tokens of one conversation.
///
/// Every field value of every message is tokenized. Strings are counted as
/// they are, `null` counts nothing and any other value (a numeric `weight`, a
/// `function_call` object) is counted as its compact JSON text.
pub fn count_conversation_tokens(
    counter: &dyn TokenCounter,
    messages: &[Value],
) -> FineTuneResult<usize> {
    let mut tokens = 0;
    for message in messages {
        let fields = message.as_object().ok_or_else(|| {
            FineTuneError::Validation(ValidationError::InvalidMessages(
                "each message must be a JSON object".to_string(),
            ))
        })?;

        tokens += TOKENS_PER_MESSAGE;
        for (key, value) in fields {
            tokens += match value {
                Value::String(text) => counter.count(text),
                Value::Null => 0,
                other => counter.count(&other.to_string()),
            };
            if key == "role" {
                tokens += TOKENS_PER_ROLE;
            }
        }
    }
    Ok(tokens + TOKENS_PER_CONVERSATION)
}

/// Sum of [`count_conversation_tokens`] over a dataset.
pub fn count_dataset_tokens(
    counter: &dyn TokenCounter,
    conversations: &[Value],
) -> FineTuneResult<usize> {
    conversations
        .iter()
        .enumerate()
        .map(|(index, conversation)| {
            count_conversation_tokens(counter, conversation_messages(conversation, index)?)
        })
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatErrorKind {
    DataType,
    MissingMessagesList,
    MessageMissingKey,
    MessageUnrecognizedKey,
    UnrecognizedRole,
    MissingContent,
    ExampleMissingAssistantMessage,
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatErrorKind::DataType => "data_type",
            FormatErrorKind::MissingMessagesList => "missing_messages_list",
            FormatErrorKind::MessageMissingKey => "message_missing_key",
            FormatErrorKind::MessageUnrecognizedKey => "message_unrecognized_key",
            FormatErrorKind::UnrecognizedRole => "unrecognized_role",
            FormatErrorKind::MissingContent => "missing_content",
            FormatErrorKind::ExampleMissingAssistantMessage => "example_missing_assistant_message",
        };
        f.write_str(name)
    }
}

/// Counts of format problems found in a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormatReport {
    pub errors: BTreeMap<FormatErrorKind, usize>,
}

impl FormatReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn count(&self, kind: FormatErrorKind) -> usize {
        self.errors.get(&kind).copied().unwrap_or(0)
    }

    fn record(&mut self, kind: FormatErrorKind) {
        *self.errors.entry(kind).or_insert(0) += 1;
    }
}

/// Checks each record against the chat fine-tuning format.
///
/// The report is advisory: nothing here stops an upload.
pub fn validate_conversations(conversations: &[Value]) -> FormatReport {
    let mut report = FormatReport::default();

    for conversation in conversations {
        if !conversation.is_object() {
            report.record(FormatErrorKind::DataType);
            continue;
        }

        let messages = match conversation.get("messages").and_then(Value::as_array) {
            Some(messages) if !messages.is_empty() => messages,
            _ => {
                report.record(FormatErrorKind::MissingMessagesList);
                continue;
            }
        };

        for message in messages {
            let Some(fields) = message.as_object() else {
                report.record(FormatErrorKind::DataType);
                continue;
            };

            if !fields.contains_key("role") || !fields.contains_key("content") {
                report.record(FormatErrorKind::MessageMissingKey);
            }

            if fields.keys().any(|key| !ALLOWED_KEYS.contains(&key.as_str())) {
                report.record(FormatErrorKind::MessageUnrecognizedKey);
            }

            let role = fields.get("role").and_then(Value::as_str);
            if role.map_or(true, |role| !ALLOWED_ROLES.contains(&role)) {
                report.record(FormatErrorKind::UnrecognizedRole);
            }

            let content = fields.get("content");
            let has_function_call = fields.contains_key("function_call");
            if content.map_or(true, |c| !c.is_string()) && !has_function_call {
                report.record(FormatErrorKind::MissingContent);
            }
        }

        let has_assistant = messages
            .iter()
            .any(|m| m.get("role").and_then(Value::as_str) == Some("assistant"));
        if !has_assistant {
            report.record(FormatErrorKind::ExampleMissingAssistantMessage);
        }
    }

    report
}

/// Token distribution of a conversation dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStats {
    pub examples: usize,
    pub total_tokens: usize,
    pub min_tokens: usize,
    pub max_tokens: usize,
    pub mean_tokens: f64,
    pub median_tokens: f64,
    pub token_limit: usize,
    /// Examples longer than `token_limit`; the service truncates them.
    pub over_limit: usize,
    pub assistant_tokens: usize,
    pub missing_system: usize,
    pub missing_user: usize,
}

impl DatasetStats {
    pub fn compute(
        counter: &dyn TokenCounter,
        conversations: &[Value],
        token_limit: usize,
    ) -> FineTuneResult<Self> {
        let mut lengths = Vec::with_capacity(conversations.len());
        let mut assistant_tokens = 0;
        let mut missing_system = 0;
        let mut missing_user = 0;

        for (index, conversation) in conversations.iter().enumerate() {
            let messages = conversation_messages(conversation, index)?;
            lengths.push(count_conversation_tokens(counter, messages)?);

            let has_role = |wanted: &str| {
                messages
                    .iter()
                    .any(|m| m.get("role").and_then(Value::as_str) == Some(wanted))
            };
            if !has_role("system") {
                missing_system += 1;
            }
            if !has_role("user") {
                missing_user += 1;
            }

            assistant_tokens += messages
                .iter()
                .filter(|m| m.get("role").and_then(Value::as_str) == Some("assistant"))
                .filter_map(|m| m.get("content").and_then(Value::as_str))
                .map(|content| counter.count(content))
                .sum::<usize>();
        }

        let total_tokens: usize = lengths.iter().sum();
        let over_limit = lengths.iter().filter(|&&n| n > token_limit).count();

        lengths.sort_unstable();
        let (min_tokens, max_tokens) = match (lengths.first(), lengths.last()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => (0, 0),
        };
        let mean_tokens = if lengths.is_empty() {
            0.0
        } else {
            total_tokens as f64 / lengths.len() as f64
        };

        Ok(Self {
            examples: lengths.len(),
            total_tokens,
            min_tokens,
            max_tokens,
            mean_tokens,
            median_tokens: median(&lengths),
            token_limit,
            over_limit,
            assistant_tokens,
            missing_system,
            missing_user,
        })
    }
}

fn median(sorted: &[usize]) -> f64 {
    match sorted.len() {
        0 => 0.0,
        n if n % 2 == 1 => sorted[n / 2] as f64,
        n => (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0,
    }
}
