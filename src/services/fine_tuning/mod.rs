mod poller;
mod service;
mod types;
mod validation;


pub use poller::{JobPoller, PollConfig, PollReport};
pub use service::{FineTuningService, FineTuningServiceImpl};
pub use types::{
    FineTuningError, FineTuningEvent, FineTuningEventListResponse, FineTuningJob,
    FineTuningJobListResponse, FineTuningJobRequest, FineTuningJobStatus, HyperparameterValue,
    Hyperparameters, ListParams,
};
pub use validation::FineTuningRequestValidator;
