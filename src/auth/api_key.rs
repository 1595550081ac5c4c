use crate::auth::AuthProvider;
use crate::errors::{AuthenticationError, FineTuneError, FineTuneResult};
use async_trait::async_trait;
use http::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

/// Azure OpenAI data-plane key, sent in the `api-key` header.
pub struct ApiKeyProvider {
    api_key: SecretString,
}

impl ApiKeyProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
        }
    }

    pub fn from_secret(api_key: SecretString) -> Self {
        Self { api_key }
    }
}

#[async_trait]
impl AuthProvider for ApiKeyProvider {
    async fn authenticate(&self, headers: &mut HeaderMap) -> FineTuneResult<()> {
        if !self.is_valid() {
            return Err(FineTuneError::Authentication(
                AuthenticationError::InvalidApiKey("API key is empty".to_string()),
            ));
        }

        let mut value = HeaderValue::from_str(self.api_key.expose_secret()).map_err(|_| {
            FineTuneError::Authentication(AuthenticationError::InvalidApiKey(
                "API key contains characters not allowed in a header".to_string(),
            ))
        })?;
        value.set_sensitive(true);
        headers.insert("api-key", value);

        Ok(())
    }

    fn is_valid(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }
}

/// Azure AD access token for the management plane, sent as `Authorization: Bearer`.
pub struct BearerTokenProvider {
    token: SecretString,
}

impl BearerTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::new(token.into()),
        }
    }
}

#[async_trait]
impl AuthProvider for BearerTokenProvider {
    async fn authenticate(&self, headers: &mut HeaderMap) -> FineTuneResult<()> {
        if !self.is_valid() {
            return Err(FineTuneError::Authentication(
                AuthenticationError::Unauthorized("bearer token is empty".to_string()),
            ));
        }

        let auth_value = format!("Bearer {}", self.token.expose_secret());
        let mut value = HeaderValue::from_str(&auth_value).map_err(|_| {
            FineTuneError::Authentication(AuthenticationError::Unauthorized(
                "Failed to create Authorization header".to_string(),
            ))
        })?;
        value.set_sensitive(true);
        headers.insert(http::header::AUTHORIZATION, value);

        Ok(())
    }

    fn is_valid(&self) -> bool {
        !self.token.expose_secret().trim().is_empty()
    }
}
