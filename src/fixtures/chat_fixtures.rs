//! Chat completion fixtures

use serde_json::json;

/// Sample successful chat completion response
pub fn chat_completion_response() -> serde_json::Value {
    ChatCompletionResponseBuilder::new()
        .with_id("chatcmpl-123")
        .with_content("The document states the treaty was signed in 1648.\n<ANSWER>: 1648")
        .with_tokens(412, 18)
        .build()
}

/// Completion cut off by the token limit
pub fn chat_completion_response_with_length_finish() -> serde_json::Value {
    ChatCompletionResponseBuilder::new()
        .with_id("chatcmpl-124")
        .with_content("The treaty was signed in")
        .with_finish_reason("length")
        .build()
}

/// Completion whose content was withheld by the content filter
pub fn chat_completion_response_with_content_filter() -> serde_json::Value {
    json!({
        "id": "chatcmpl-125",
        "object": "chat.completion",
        "created": 1677652288,
        "model": "gpt-35-turbo",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": null },
            "finish_reason": "content_filter"
        }]
    })
}

/// Builder for custom chat completion responses
pub struct ChatCompletionResponseBuilder {
    id: String,
    model: String,
    content: String,
    finish_reason: String,
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl ChatCompletionResponseBuilder {
    pub fn new() -> Self {
        Self {
            id: "chatcmpl-test".to_string(),
            model: "gpt-35-turbo".to_string(),
            content: "Test response".to_string(),
            finish_reason: "stop".to_string(),
            prompt_tokens: 10,
            completion_tokens: 10,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_finish_reason(mut self, reason: impl Into<String>) -> Self {
        self.finish_reason = reason.into();
        self
    }

    pub fn with_tokens(mut self, prompt: u32, completion: u32) -> Self {
        self.prompt_tokens = prompt;
        self.completion_tokens = completion;
        self
    }

    pub fn build(self) -> serde_json::Value {
        json!({
            "id": self.id,
            "object": "chat.completion",
            "created": 1677652288,
            "model": self.model,
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": self.content
                },
                "finish_reason": self.finish_reason
            }],
            "usage": {
                "prompt_tokens": self.prompt_tokens,
                "completion_tokens": self.completion_tokens,
                "total_tokens": self.prompt_tokens + self.completion_tokens
            }
        })
    }
}

impl Default for ChatCompletionResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
