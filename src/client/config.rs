use crate::errors::{ConfigurationError, FineTuneError, FineTuneResult};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_VERSION: &str = "2024-10-21";
pub const DEFAULT_MANAGEMENT_API_VERSION: &str = "2023-05-01";

/// Connection settings for the Azure OpenAI data plane (files, jobs, inference).
#[derive(Debug, Clone, Deserialize)]
pub struct AzureOpenAIConfig {
    pub endpoint: Url,

    pub api_key: Secret<String>,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    #[serde(default)]
    pub proxy: Option<Url>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl AzureOpenAIConfig {
    /// Creates a new config for the resource at `endpoint`
    pub fn new(endpoint: Url, api_key: impl Into<String>) -> Self {
        Self {
            endpoint,
            api_key: Secret::new(api_key.into()),
            api_version: default_api_version(),
            timeout: default_timeout(),
            max_retries: default_max_retries(),
            max_connections: default_max_connections(),
            proxy: None,
            user_agent: default_user_agent(),
        }
    }

    /// Creates a new AzureOpenAIConfig from environment variables
    ///
    /// Reads the following environment variables:
    /// - AZURE_OPENAI_ENDPOINT (required)
    /// - AZURE_OPENAI_API_KEY (required)
    /// - AZURE_OPENAI_API_VERSION (optional, defaults to DEFAULT_API_VERSION)
    pub fn from_env() -> FineTuneResult<Self> {
        let endpoint = require_env("AZURE_OPENAI_ENDPOINT")?;
        let endpoint = Url::parse(&endpoint).map_err(|e| {
            FineTuneError::Configuration(ConfigurationError::InvalidEndpoint(format!(
                "Invalid AZURE_OPENAI_ENDPOINT: {}",
                e
            )))
        })?;

        let api_key = std::env::var("AZURE_OPENAI_API_KEY").map_err(|_| {
            FineTuneError::Configuration(ConfigurationError::MissingCredential(
                "AZURE_OPENAI_API_KEY environment variable not found".to_string(),
            ))
        })?;

        let mut config = Self::new(endpoint, api_key);

        if let Ok(api_version) = std::env::var("AZURE_OPENAI_API_VERSION") {
            config.api_version = api_version;
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> FineTuneResult<()> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(FineTuneError::Configuration(
                ConfigurationError::MissingCredential("API key is empty".to_string()),
            ));
        }

        if !matches!(self.endpoint.scheme(), "http" | "https") {
            return Err(FineTuneError::Configuration(
                ConfigurationError::InvalidEndpoint(format!(
                    "unsupported scheme '{}'",
                    self.endpoint.scheme()
                )),
            ));
        }

        if self.api_version.is_empty() {
            return Err(FineTuneError::Configuration(
                ConfigurationError::MissingConfiguration("api_version".to_string()),
            ));
        }

        if self.timeout.is_zero() {
            return Err(FineTuneError::Configuration(
                ConfigurationError::InvalidTimeout("Timeout must be greater than 0".to_string()),
            ));
        }

        Ok(())
    }

    /// Root of the data-plane REST surface: `{endpoint}/openai`
    pub fn base_url(&self) -> FineTuneResult<Url> {
        let root = self.endpoint.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/openai", root))?)
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_proxy(mut self, proxy: Url) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Settings for the Azure Resource Manager endpoint that provisions deployments.
#[derive(Debug, Clone, Deserialize)]
pub struct ManagementConfig {
    pub subscription_id: String,
    pub resource_group: String,
    pub account_name: String,

    pub token: Secret<String>,

    #[serde(default = "default_management_endpoint")]
    pub endpoint: Url,

    #[serde(default = "default_management_api_version")]
    pub api_version: String,

    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

impl ManagementConfig {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        account_name: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            account_name: account_name.into(),
            token: Secret::new(token.into()),
            endpoint: default_management_endpoint(),
            api_version: default_management_api_version(),
            timeout: default_timeout(),
        }
    }

    /// Reads AZURE_SUBSCRIPTION_ID, AZURE_RESOURCE_GROUP, AZURE_OPENAI_ACCOUNT and
    /// AZURE_MANAGEMENT_TOKEN; AZURE_MANAGEMENT_ENDPOINT overrides the public cloud endpoint.
    pub fn from_env() -> FineTuneResult<Self> {
        let token = std::env::var("AZURE_MANAGEMENT_TOKEN").map_err(|_| {
            FineTuneError::Configuration(ConfigurationError::MissingCredential(
                "AZURE_MANAGEMENT_TOKEN environment variable not found".to_string(),
            ))
        })?;

        let mut config = Self::new(
            require_env("AZURE_SUBSCRIPTION_ID")?,
            require_env("AZURE_RESOURCE_GROUP")?,
            require_env("AZURE_OPENAI_ACCOUNT")?,
            token,
        );

        if let Ok(endpoint) = std::env::var("AZURE_MANAGEMENT_ENDPOINT") {
            config.endpoint = Url::parse(&endpoint)?;
        }

        Ok(config)
    }

    pub fn validate(&self) -> FineTuneResult<()> {
        for (name, value) in [
            ("subscription_id", &self.subscription_id),
            ("resource_group", &self.resource_group),
            ("account_name", &self.account_name),
        ] {
            if value.trim().is_empty() {
                return Err(FineTuneError::Configuration(
                    ConfigurationError::MissingConfiguration(name.to_string()),
                ));
            }
        }

        if self.token.expose_secret().trim().is_empty() {
            return Err(FineTuneError::Configuration(
                ConfigurationError::MissingCredential("management token is empty".to_string()),
            ));
        }

        Ok(())
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

fn require_env(name: &str) -> FineTuneResult<String> {
    std::env::var(name).map_err(|_| {
        FineTuneError::Configuration(ConfigurationError::MissingConfiguration(format!(
            "{} environment variable not found",
            name
        )))
    })
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_management_api_version() -> String {
    DEFAULT_MANAGEMENT_API_VERSION.to_string()
}

fn default_management_endpoint() -> Url {
    Url::parse("https://management.azure.com").expect("static management URL is valid")
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_max_retries() -> u32 {
    3
}

fn default_max_connections() -> usize {
    100
}

fn default_user_agent() -> String {
    format!("integrations-azure-finetune/{}", env!("CARGO_PKG_VERSION"))
}
