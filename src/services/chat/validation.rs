use crate::errors::{FineTuneError, FineTuneResult, ValidationError};
use crate::services::chat::ChatCompletionRequest;

pub struct ChatRequestValidator;

impl ChatRequestValidator {
    pub fn validate(deployment: &str, request: &ChatCompletionRequest) -> FineTuneResult<()> {
        if deployment.is_empty() {
            return Err(FineTuneError::Validation(
                ValidationError::MissingRequiredField("deployment".to_string()),
            ));
        }

        if request.messages.is_empty() {
            return Err(FineTuneError::Validation(
                ValidationError::MissingRequiredField("messages".to_string()),
            ));
        }

        if let Some(temperature) = request.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(FineTuneError::Validation(ValidationError::ValueOutOfRange {
                    field: "temperature".to_string(),
                    min: "0.0".to_string(),
                    max: "2.0".to_string(),
                    value: temperature.to_string(),
                }));
            }
        }

        if let Some(top_p) = request.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(FineTuneError::Validation(ValidationError::ValueOutOfRange {
                    field: "top_p".to_string(),
                    min: "0.0".to_string(),
                    max: "1.0".to_string(),
                    value: top_p.to_string(),
                }));
            }
        }

        for (field, penalty) in [
            ("presence_penalty", request.presence_penalty),
            ("frequency_penalty", request.frequency_penalty),
        ] {
            if let Some(value) = penalty {
                if !(-2.0..=2.0).contains(&value) {
                    return Err(FineTuneError::Validation(ValidationError::ValueOutOfRange {
                        field: field.to_string(),
                        min: "-2.0".to_string(),
                        max: "2.0".to_string(),
                        value: value.to_string(),
                    }));
                }
            }
        }

        Ok(())
    }
}
