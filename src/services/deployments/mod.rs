mod poller;
mod service;
mod types;


pub use poller::DeploymentPoller;
pub use service::{DeploymentService, DeploymentServiceImpl};
pub use types::{
    DeploymentBody, DeploymentModel, DeploymentProperties, DeploymentRequest, DeploymentResponse,
    Sku, DEFAULT_MODEL_VERSION, DEFAULT_SKU_CAPACITY, DEFAULT_SKU_NAME,
};
