use crate::auth::{AuthManager, AzureAuthManager};
use crate::client::ManagementConfig;
use crate::errors::FineTuneResult;
use crate::services::deployments::{DeploymentPoller, DeploymentService, DeploymentServiceImpl};
use crate::services::fine_tuning::PollConfig;
use crate::transport::{HttpTransport, ReqwestTransport};
use std::sync::Arc;

/// Azure Resource Manager client for the account that hosts the deployments.
pub struct ManagementClient {
    deployments: Arc<DeploymentServiceImpl>,
}

impl ManagementClient {
    pub fn new(config: &ManagementConfig) -> FineTuneResult<Self> {
        config.validate()?;
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::for_management(config)?);
        let auth_manager: Arc<dyn AuthManager> =
            Arc::new(AzureAuthManager::from_management_config(config));
        Ok(Self::with_parts(config, transport, auth_manager))
    }

    pub fn with_parts(
        config: &ManagementConfig,
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
    ) -> Self {
        Self {
            deployments: Arc::new(DeploymentServiceImpl::new(transport, auth_manager, config)),
        }
    }

    pub fn deployments(&self) -> Arc<dyn DeploymentService> {
        self.deployments.clone()
    }

    pub fn deployment_poller(&self, config: PollConfig) -> FineTuneResult<DeploymentPoller> {
        DeploymentPoller::new(self.deployments(), config)
    }
}
