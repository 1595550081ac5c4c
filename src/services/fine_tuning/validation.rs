use crate::errors::{FineTuneError, FineTuneResult, ValidationError};
use crate::services::fine_tuning::{FineTuningJobRequest, HyperparameterValue};

pub struct FineTuningRequestValidator;

impl FineTuningRequestValidator {
    pub fn validate(request: &FineTuningJobRequest) -> FineTuneResult<()> {
        if request.model.is_empty() {
            return Err(FineTuneError::Validation(
                ValidationError::MissingRequiredField("model".to_string()),
            ));
        }

        if request.training_file.is_empty() {
            return Err(FineTuneError::Validation(
                ValidationError::MissingRequiredField("training_file".to_string()),
            ));
        }

        if matches!(request.validation_file.as_deref(), Some("")) {
            return Err(FineTuneError::Validation(ValidationError::InvalidParameter {
                parameter: "validation_file".to_string(),
                reason: "file id cannot be empty".to_string(),
            }));
        }

        if let Some(hyperparameters) = &request.hyperparameters {
            if let Some(HyperparameterValue::Number(epochs)) = hyperparameters.n_epochs {
                if epochs < 1.0 || epochs.fract() != 0.0 {
                    return Err(FineTuneError::Validation(ValidationError::ValueOutOfRange {
                        field: "n_epochs".to_string(),
                        min: "1".to_string(),
                        max: "unbounded".to_string(),
                        value: epochs.to_string(),
                    }));
                }
            }
            if let Some(HyperparameterValue::Auto(value)) = &hyperparameters.n_epochs {
                if value != "auto" {
                    return Err(FineTuneError::Validation(ValidationError::InvalidParameter {
                        parameter: "n_epochs".to_string(),
                        reason: format!("expected a number or \"auto\", got \"{}\"", value),
                    }));
                }
            }
        }

        if let Some(suffix) = &request.suffix {
            if suffix.is_empty() || suffix.len() > 40 {
                return Err(FineTuneError::Validation(ValidationError::InvalidParameter {
                    parameter: "suffix".to_string(),
                    reason: "suffix must be between 1 and 40 characters".to_string(),
                }));
            }
        }

        Ok(())
    }
}
