use crate::auth::AuthManager;
use crate::errors::{DatasetError, FineTuneResult};
use crate::resilience::ResilienceOrchestrator;
use crate::services::files::{
    FileListResponse, FileObject, FilePurpose, FileRequestValidator, FileUploadRequest,
};
use crate::transport::{HttpTransport, ResponseParser};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[async_trait]
pub trait FileService: Send + Sync {
    async fn upload(&self, request: FileUploadRequest) -> FineTuneResult<FileObject>;
    async fn retrieve(&self, file_id: &str) -> FineTuneResult<FileObject>;
    async fn list(&self) -> FineTuneResult<FileListResponse>;

    /// Reads `path` from disk and uploads it under its file name.
    async fn upload_path(&self, path: &Path, purpose: FilePurpose) -> FineTuneResult<FileObject> {
        let data = tokio::fs::read(path).await.map_err(|e| DatasetError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.upload(FileUploadRequest::new(Bytes::from(data), filename, purpose))
            .await
    }
}

pub struct FileServiceImpl {
    transport: Arc<dyn HttpTransport>,
    auth_manager: Arc<dyn AuthManager>,
    resilience: Arc<ResilienceOrchestrator>,
}

impl FileServiceImpl {
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
}

#[async_trait]
impl FileService for FileServiceImpl {
    async fn upload(&self, request: FileUploadRequest) -> FineTuneResult<FileObject> {
        FileRequestValidator::validate(&request)?;

        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;

        // sent once: a retried multipart POST can leave a duplicate file behind
        let value = self
            .transport
            .upload_file(
                "/files",
                request.file.clone(),
                &request.filename,
                request.purpose.as_str(),
                headers,
            )
            .await?;

        let file: FileObject = ResponseParser::from_value(value)?;
        info!(file_id = %file.id, filename = %file.filename, "uploaded file");
        Ok(file)
    }

    async fn retrieve(&self, file_id: &str) -> FineTuneResult<FileObject> {
        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;

        let path = format!("/files/{}", file_id);
        let (transport, path, headers) = (self.transport.as_ref(), path.as_str(), &headers);
        self.resilience
            .execute(move || transport.request::<(), FileObject>(Method::GET, path, None, headers.clone()))
            .await
    }

    async fn list(&self) -> FineTuneResult<FileListResponse> {
        let mut headers = HeaderMap::new();
        self.auth_manager.apply_auth(&mut headers).await?;

        let (transport, headers) = (self.transport.as_ref(), &headers);
        self.resilience
            .execute(move || {
                transport.request::<(), FileListResponse>(Method::GET, "/files", None, headers.clone())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FileServiceImpl>();
    }
}
