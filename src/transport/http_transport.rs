use crate::client::{AzureOpenAIConfig, ManagementConfig};
use crate::errors::{FineTuneResult, NetworkError, FineTuneError};
use crate::transport::{HttpTransport, MultipartBuilder, RawResponse, ResponseParser};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP transport implementation using reqwest
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
    api_version: Option<String>,
}

impl ReqwestTransport {
    /// Transport for the data plane rooted at `{endpoint}/openai`
    pub fn from_config(config: &AzureOpenAIConfig) -> FineTuneResult<Self> {
        let mut client_builder = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.max_connections)
            .user_agent(&config.user_agent);

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url.as_str()).map_err(|e| {
                FineTuneError::Network(NetworkError::ConnectionFailed(format!(
                    "Invalid proxy: {}",
                    e
                )))
            })?;
            client_builder = client_builder.proxy(proxy);
        }

        Ok(Self {
            client: build_client(client_builder)?,
            base_url: config.base_url()?,
            api_version: Some(config.api_version.clone()),
        })
    }

    /// Transport for Azure Resource Manager
    pub fn for_management(config: &ManagementConfig) -> FineTuneResult<Self> {
        Ok(Self {
            client: build_client(Client::builder().timeout(config.timeout))?,
            base_url: config.endpoint.clone(),
            api_version: Some(config.api_version.clone()),
        })
    }

    /// Plain transport without an api-version parameter
    pub fn with_base_url(base_url: &str, timeout: Duration) -> FineTuneResult<Self> {
        Ok(Self {
            client: build_client(Client::builder().timeout(timeout))?,
            base_url: Url::parse(base_url)?,
            api_version: None,
        })
    }

    /// Builds a full URL from a path, appending `api-version` when configured
    fn build_url(&self, path: &str) -> FineTuneResult<Url> {
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        ))?;

        if let Some(api_version) = &self.api_version {
            url.query_pairs_mut().append_pair("api-version", api_version);
        }

        Ok(url)
    }

    fn prepare(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        headers: HeaderMap,
    ) -> FineTuneResult<reqwest::RequestBuilder> {
        let url = self.build_url(path)?;
        debug!(%method, url = %url, "sending request");

        let mut request = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.json(&body);
        }
        Ok(request)
    }
}

fn build_client(builder: reqwest::ClientBuilder) -> FineTuneResult<Client> {
    builder.build().map_err(|e| {
        FineTuneError::Network(NetworkError::ConnectionFailed(format!(
            "Failed to build HTTP client: {}",
            e
        )))
    })
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        headers: HeaderMap,
    ) -> FineTuneResult<serde_json::Value> {
        let response = self.prepare(method, path, body, headers)?.send().await?;
        ResponseParser::parse_response(response).await
    }

    async fn upload_file(
        &self,
        path: &str,
        file_data: Bytes,
        file_name: &str,
        purpose: &str,
        headers: HeaderMap,
    ) -> FineTuneResult<serde_json::Value> {
        let url = self.build_url(path)?;
        debug!(url = %url, file_name, purpose, bytes = file_data.len(), "uploading file");

        let form = MultipartBuilder::new()
            .add_file("file", file_name, file_data)
            .add_text("purpose", purpose)
            .build();

        let response = self
            .client
            .post(url)
            .headers(headers)
            .multipart(form)
            .send()
            .await?;
        ResponseParser::parse_response(response).await
    }

    async fn send_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        headers: HeaderMap,
    ) -> FineTuneResult<RawResponse> {
        let response = self.prepare(method, path, body, headers)?.send().await?;
        ResponseParser::parse_raw(response).await
    }
}
