use crate::transport::RawResponse;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SKU_NAME: &str = "standard";
pub const DEFAULT_SKU_CAPACITY: u32 = 1;
pub const DEFAULT_MODEL_VERSION: &str = "1";

/// A request to create or update a model deployment on an Azure OpenAI account.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentRequest {
    pub deployment_name: String,
    /// Name of the model to serve, e.g. the `fine_tuned_model` of a job.
    pub model: String,
    pub model_version: String,
    pub sku_name: String,
    pub capacity: u32,
}

impl DeploymentRequest {
    pub fn new(deployment_name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            deployment_name: deployment_name.into(),
            model: model.into(),
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            sku_name: DEFAULT_SKU_NAME.to_string(),
            capacity: DEFAULT_SKU_CAPACITY,
        }
    }

    pub fn with_model_version(mut self, version: impl Into<String>) -> Self {
        self.model_version = version.into();
        self
    }

    pub fn with_sku(mut self, name: impl Into<String>, capacity: u32) -> Self {
        self.sku_name = name.into();
        self.capacity = capacity;
        self
    }

    pub fn body(&self) -> DeploymentBody {
        DeploymentBody {
            sku: Sku {
                name: self.sku_name.clone(),
                capacity: self.capacity,
            },
            properties: DeploymentProperties {
                model: DeploymentModel {
                    format: "OpenAI".to_string(),
                    name: self.model.clone(),
                    version: self.model_version.clone(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentBody {
    pub sku: Sku,
    pub properties: DeploymentProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sku {
    pub name: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentProperties {
    pub model: DeploymentModel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentModel {
    pub format: String,
    pub name: String,
    pub version: String,
}

/// Status and body exactly as returned by the management API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentResponse {
    pub status: u16,
    pub body: String,
}

impl DeploymentResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body parsed as JSON, if it is JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// `properties.provisioningState` from the body, when present.
    pub fn provisioning_state(&self) -> Option<String> {
        self.json()?
            .get("properties")?
            .get("provisioningState")?
            .as_str()
            .map(str::to_string)
    }
}

impl From<RawResponse> for DeploymentResponse {
    fn from(raw: RawResponse) -> Self {
        Self {
            status: raw.status,
            body: raw.body,
        }
    }
}
