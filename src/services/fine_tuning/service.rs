use crate::auth::AuthManager;
use crate::errors::FineTuneResult;
use crate::resilience::ResilienceOrchestrator;
use crate::services::fine_tuning::{
    FineTuningEventListResponse, FineTuningJob, FineTuningJobListResponse, FineTuningJobRequest,
    FineTuningRequestValidator, ListParams,
};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use http::{HeaderMap, Method};
use std::sync::Arc;
use tracing::info;

#[async_trait]
pub trait FineTuningService: Send + Sync {
    async fn create(&self, request: FineTuningJobRequest) -> FineTuneResult<FineTuningJob>;
    async fn list(&self, params: ListParams) -> FineTuneResult<FineTuningJobListResponse>;
    async fn retrieve(&self, job_id: &str) -> FineTuneResult<FineTuningJob>;
    async fn cancel(&self, job_id: &str) -> FineTuneResult<FineTuningJob>;
    async fn events(
        &self,
        job_id: &str,
        params: ListParams,
    ) -> FineTuneResult<FineTuningEventListResponse>;
}

pub struct FineTuningServiceImpl {
    transport: Arc<dyn HttpTransport>,
    auth_manager: Arc<dyn AuthManager>,
    resilience: Arc<ResilienceOrchestrator>,
}

impl FineTuningServiceImpl {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
        resilience: Arc<ResilienceOrchestrator>,
    ) -> Self {
        Self {
            transport,
            auth_manager,
            resilience,
        }
    }

    async fn headers(&self) -> FineTuneResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;
        Ok(headers)
    }
}

#[async_trait]
impl FineTuningService for FineTuningServiceImpl {
    async fn create(&self, request: FineTuningJobRequest) -> FineTuneResult<FineTuningJob> {
        FineTuningRequestValidator::validate(&request)?;
        let headers = self.headers().await?;

        let (transport, headers, request) = (self.transport.as_ref(), &headers, &request);
        let job: FineTuningJob = self
            .resilience
            .execute(move || {
                transport.request(Method::POST, "/fine_tuning/jobs", Some(request), headers.clone())
            })
            .await?;

        info!(job_id = %job.id, model = %job.model, status = %job.status, "created fine-tuning job");
        Ok(job)
    }

    async fn list(&self, params: ListParams) -> FineTuneResult<FineTuningJobListResponse> {
        let headers = self.headers().await?;

        let path = format!("/fine_tuning/jobs{}", params.query_string());
        let (transport, path, headers) = (self.transport.as_ref(), path.as_str(), &headers);
        self.resilience
            .execute(move || {
                transport.request::<(), FineTuningJobListResponse>(Method::GET, path, None, headers.clone())
            })
            .await
    }

    async fn retrieve(&self, job_id: &str) -> FineTuneResult<FineTuningJob> {
        let headers = self.headers().await?;

        let path = format!("/fine_tuning/jobs/{}", job_id);
        let (transport, path, headers) = (self.transport.as_ref(), path.as_str(), &headers);
        self.resilience
            .execute(move || transport.request::<(), FineTuningJob>(Method::GET, path, None, headers.clone()))
            .await
    }

    async fn cancel(&self, job_id: &str) -> FineTuneResult<FineTuningJob> {
        let headers = self.headers().await?;

        let path = format!("/fine_tuning/jobs/{}/cancel", job_id);
        let (transport, path, headers) = (self.transport.as_ref(), path.as_str(), &headers);
        let job: FineTuningJob = self
            .resilience
            .execute(move || transport.request::<(), FineTuningJob>(Method::POST, path, None, headers.clone()))
            .await?;

        info!(job_id = %job.id, status = %job.status, "cancelled fine-tuning job");
        Ok(job)
    }

    async fn events(
        &self,
        job_id: &str,
        params: ListParams,
    ) -> FineTuneResult<FineTuningEventListResponse> {
        let headers = self.headers().await?;

        let path = format!("/fine_tuning/jobs/{}/events{}", job_id, params.query_string());
        let (transport, path, headers) = (self.transport.as_ref(), path.as_str(), &headers);
        self.resilience
            .execute(move || {
                transport.request::<(), FineTuningEventListResponse>(Method::GET, path, None, headers.clone())
            })
            .await
    }
}
