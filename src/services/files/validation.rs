use crate::errors::{FineTuneError, FineTuneResult, ValidationError};
use crate::services::files::{FilePurpose, FileUploadRequest};

pub struct FileRequestValidator;

impl FileRequestValidator {
    const MAX_FILE_SIZE: u64 = 512 * 1024 * 1024;

    pub fn validate(request: &FileUploadRequest) -> FineTuneResult<()> {
        if request.filename.is_empty() {
            return Err(FineTuneError::Validation(
                ValidationError::MissingRequiredField("filename".to_string()),
            ));
        }

        if request.file.is_empty() {
            return Err(FineTuneError::Validation(ValidationError::InvalidParameter {
                parameter: "file".to_string(),
                reason: "file cannot be empty".to_string(),
            }));
        }

        let file_size = request.file.len() as u64;
        if file_size > Self::MAX_FILE_SIZE {
            return Err(FineTuneError::Validation(ValidationError::ValueOutOfRange {
                field: "file".to_string(),
                min: "1".to_string(),
                max: Self::MAX_FILE_SIZE.to_string(),
                value: file_size.to_string(),
            }));
        }

        if request.purpose == FilePurpose::FineTune && !request.filename.ends_with(".jsonl") {
            return Err(FineTuneError::Validation(ValidationError::InvalidParameter {
                parameter: "filename".to_string(),
                reason: "fine-tuning data must be a .jsonl file".to_string(),
            }));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_validate_valid_request() {
        let request =
            FileUploadRequest::new(Bytes::from("{}\n"), "train.jsonl", FilePurpose::FineTune);
        assert!(FileRequestValidator::validate(&request).is_ok());
    }

    #[test]
    fn test_validate_empty_filename() {
        let request = FileUploadRequest::new(Bytes::from("{}\n"), "", FilePurpose::FineTune);
        assert!(FileRequestValidator::validate(&request).is_err());
    }

    #[test]
    fn test_validate_empty_file() {
        let request = FileUploadRequest::new(Bytes::new(), "train.jsonl", FilePurpose::FineTune);
        assert!(FileRequestValidator::validate(&request).is_err());
    }

    #[test]
    fn test_validate_requires_jsonl_for_training_data() {
        let request = FileUploadRequest::new(Bytes::from("a,b\n"), "train.csv", FilePurpose::FineTune);
        assert!(FileRequestValidator::validate(&request).is_err());
    }
}
