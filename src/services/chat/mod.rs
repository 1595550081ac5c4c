mod service;
mod types;
mod validation;


pub use service::{ChatCompletionService, ChatCompletionServiceImpl};
pub use types::{
    ChatCompletionChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    ChatMessageRole, FinishReason, Usage,
};
pub use validation::ChatRequestValidator;
