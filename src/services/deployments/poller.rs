use crate::errors::{FineTuneError, FineTuneResult};
use crate::services::deployments::{DeploymentResponse, DeploymentService};
use crate::services::fine_tuning::PollConfig;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info};

const SUCCEEDED: &str = "Succeeded";
const FAILED_STATES: &[&str] = &["Failed", "Canceled"];

/// Polls a deployment until its `provisioningState` settles.
pub struct DeploymentPoller {
    service: Arc<dyn DeploymentService>,
    config: PollConfig,
}

impl DeploymentPoller {
    pub fn new(service: Arc<dyn DeploymentService>, config: PollConfig) -> FineTuneResult<Self> {
        config.validate()?;
        Ok(Self { service, config })
    }

    /// Returns the final GET response once the deployment reports `Succeeded`.
    ///
    /// A 404 counts as not yet visible and keeps polling. Any other non-2xx
    /// status ends the wait with [`FineTuneError::Request`].
    pub async fn wait_until_ready(&self, deployment_name: &str) -> FineTuneResult<DeploymentResponse> {
        let start = Instant::now();
        let mut interval = self.config.interval;
        let mut last_state: Option<String> = None;

        loop {
            let response = self.service.get(deployment_name).await?;

            let state = if response.is_success() {
                response
                    .provisioning_state()
                    .unwrap_or_else(|| "Unknown".to_string())
            } else if response.status == 404 {
                "NotFound".to_string()
            } else {
                return Err(FineTuneError::Request {
                    status_code: response.status,
                    message: response.body,
                    error_code: None,
                });
            };

            if last_state.as_deref() != Some(state.as_str()) {
                info!(
                    deployment = %deployment_name,
                    state = %state,
                    elapsed_secs = start.elapsed().as_secs(),
                    "deployment provisioning state"
                );
                last_state = Some(state.clone());
            }

            if state == SUCCEEDED {
                return Ok(response);
            }
            if FAILED_STATES.contains(&state.as_str()) {
                return Err(FineTuneError::DeploymentFailed {
                    deployment: deployment_name.to_string(),
                    state,
                });
            }

            let elapsed = start.elapsed();
            if elapsed >= self.config.max_wait {
                return Err(FineTuneError::DeploymentTimeout {
                    deployment: deployment_name.to_string(),
                    last_state: state,
                    waited_secs: elapsed.as_secs(),
                });
            }

            let delay = self
                .config
                .jittered(interval)
                .min(self.config.max_wait - elapsed);
            debug!(deployment = %deployment_name, delay_ms = delay.as_millis() as u64, "waiting before next poll");
            tokio::time::sleep(delay).await;
            interval = self.config.next_interval(interval);
        }
    }
}
