mod categories;
mod error;
mod mapping;

pub use categories::{
    AuthenticationError, ConfigurationError, DatasetError, NetworkError, RateLimitError,
    ServerError, ValidationError,
};
pub use error::{FineTuneError, FineTuneResult};
pub use mapping::{AzureErrorDetail, AzureErrorResponse, ErrorMapper};
