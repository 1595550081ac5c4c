use crate::auth::AuthManager;
use crate::client::ManagementConfig;
use crate::errors::{FineTuneError, FineTuneResult, ValidationError};
use crate::services::deployments::{DeploymentRequest, DeploymentResponse};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use http::{HeaderMap, Method};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[async_trait]
pub trait DeploymentService: Send + Sync {
    /// Issues a single PUT for the deployment and reports the raw outcome.
    ///
    /// A non-2xx status is returned as a [`DeploymentResponse`], not an error;
    /// errors are reserved for validation, authentication and transport failures.
    async fn create_or_update(&self, request: DeploymentRequest) -> FineTuneResult<DeploymentResponse>;

    /// Reads the deployment's current state. Non-2xx statuses are returned the
    /// same way as for [`DeploymentService::create_or_update`].
    async fn get(&self, deployment_name: &str) -> FineTuneResult<DeploymentResponse>;
}

pub struct DeploymentServiceImpl {
    transport: Arc<dyn HttpTransport>,
    auth_manager: Arc<dyn AuthManager>,
    account_path: String,
}

impl DeploymentServiceImpl {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
        config: &ManagementConfig,
    ) -> Self {
        let account_path = format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.CognitiveServices/accounts/{}",
            config.subscription_id, config.resource_group, config.account_name
        );

        Self {
            transport,
            auth_manager,
            account_path,
        }
    }

    pub fn deployment_path(&self, deployment_name: &str) -> String {
        format!("{}/deployments/{}", self.account_path, deployment_name)
    }
}

fn validate(request: &DeploymentRequest) -> FineTuneResult<()> {
    if request.deployment_name.is_empty() {
        return Err(FineTuneError::Validation(
            ValidationError::MissingRequiredField("deployment_name".to_string()),
        ));
    }
    if request.model.is_empty() {
        return Err(FineTuneError::Validation(
            ValidationError::MissingRequiredField("model".to_string()),
        ));
    }
    if request.capacity == 0 {
        return Err(FineTuneError::Validation(ValidationError::InvalidParameter {
            parameter: "capacity".to_string(),
            reason: "capacity must be at least 1".to_string(),
        }));
    }
    Ok(())
}

#[async_trait]
impl DeploymentService for DeploymentServiceImpl {
    async fn create_or_update(&self, request: DeploymentRequest) -> FineTuneResult<DeploymentResponse> {
        validate(&request)?;

        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;

        let path = self.deployment_path(&request.deployment_name);
        let body = serde_json::to_value(request.body())?;

        let response: DeploymentResponse = self
            .transport
            .send_raw(Method::PUT, &path, Some(body), headers)
            .await?
            .into();

        if response.is_success() {
            info!(
                deployment = %request.deployment_name,
                model = %request.model,
                status = response.status,
                "deployment request accepted"
            );
        } else {
            warn!(
                deployment = %request.deployment_name,
                status = response.status,
                "deployment request rejected"
            );
        }

        Ok(response)
    }

    async fn get(&self, deployment_name: &str) -> FineTuneResult<DeploymentResponse> {
        if deployment_name.is_empty() {
            return Err(FineTuneError::Validation(
                ValidationError::MissingRequiredField("deployment_name".to_string()),
            ));
        }

        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;

        let path = self.deployment_path(deployment_name);
        let response: DeploymentResponse = self
            .transport
            .send_raw(Method::GET, &path, None, headers)
            .await?
            .into();

        debug!(
            deployment = %deployment_name,
            status = response.status,
            state = response.provisioning_state().as_deref().unwrap_or("-"),
            "deployment state"
        );
        Ok(response)
    }
}
