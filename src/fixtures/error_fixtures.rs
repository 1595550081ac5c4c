//! Error response fixtures in the Azure `{"error": {...}}` envelope

use serde_json::json;

pub fn error_401_invalid_api_key() -> serde_json::Value {
    json!({
        "error": {
            "code": "401",
            "message": "Access denied due to invalid subscription key or wrong API endpoint."
        }
    })
}

pub fn error_429_rate_limit() -> serde_json::Value {
    json!({
        "error": {
            "code": "429",
            "message": "Requests to the ChatCompletions_Create Operation have exceeded call rate limit."
        }
    })
}

pub fn error_400_invalid_training_file() -> serde_json::Value {
    json!({
        "error": {
            "code": "invalidPayload",
            "message": "The specified training file is not a valid JSONL file.",
            "param": "training_file"
        }
    })
}

pub fn error_404_deployment_not_found() -> serde_json::Value {
    json!({
        "error": {
            "code": "DeploymentNotFound",
            "message": "The API deployment for this resource does not exist."
        }
    })
}

pub fn error_500_internal_server_error() -> serde_json::Value {
    json!({
        "error": {
            "code": "InternalServerError",
            "message": "The server had an error while processing your request."
        }
    })
}
