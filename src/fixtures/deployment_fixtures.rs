//! Management API deployment fixtures

use serde_json::json;

/// Body returned by the PUT when the deployment is accepted
pub fn deployment_created_response() -> serde_json::Value {
    json!({
        "id": "/subscriptions/sub-123/resourceGroups/rg-finetune/providers/Microsoft.CognitiveServices/accounts/contoso-aoai/deployments/ft-deployment",
        "type": "Microsoft.CognitiveServices/accounts/deployments",
        "name": "ft-deployment",
        "sku": { "name": "standard", "capacity": 1 },
        "properties": {
            "model": {
                "format": "OpenAI",
                "name": "gpt-35-turbo-0613.ft-5fd1918ee65d4cd38a5dcf6835066ed7",
                "version": "1"
            },
            "provisioningState": "Creating"
        }
    })
}

/// Management API rejection in the ARM error envelope
pub fn deployment_quota_error_response() -> serde_json::Value {
    json!({
        "error": {
            "code": "InsufficientQuota",
            "message": "The specified capacity exceeds the available quota."
        }
    })
}

/// Deployment body as returned by a GET in the given provisioning state
pub fn deployment_in_state(state: &str) -> serde_json::Value {
    let mut body = deployment_created_response();
    body["properties"]["provisioningState"] = json!(state);
    body
}
