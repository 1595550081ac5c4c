mod service;
mod types;
mod validation;


pub use service::{FileService, FileServiceImpl};
pub use types::{FileListResponse, FileObject, FilePurpose, FileUploadRequest};
pub use validation::FileRequestValidator;
