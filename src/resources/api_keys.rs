//! API key management.

use http::Method;

use super::models::{ApiKey, CreateApiKey};
use super::validate;
use crate::engine::{RequestEngine, RequestOptions};
use crate::error::Result;
use crate::time::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::transport::HttpClient;

/// API key operations, obtained from [`Client::api_keys`](crate::Client::api_keys).
#[derive(Debug, Clone)]
pub struct ApiKeys<H, S = TokioSleeper, C = SystemClock> {
    engine: RequestEngine<H, S, C>,
}

impl<H, S, C> ApiKeys<H, S, C>
where
    H: HttpClient + 'static,
    S: Sleeper + 'static,
    C: Clock + 'static,
{
    pub(crate) const fn new(engine: RequestEngine<H, S, C>) -> Self {
        Self { engine }
    }

    /// Lists API keys. Only key prefixes are returned.
    ///
    /// # Errors
    ///
    /// Returns any engine error.
    pub async fn list(&self) -> Result<Vec<ApiKey>> {
        self.engine
            .execute(Method::GET, "/api-keys", RequestOptions::new())
            .await
    }

    /// Creates an API key. The full key is only present in this response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) if the name is
    /// empty or longer than 100 characters, and any engine error otherwise.
    pub async fn create(&self, request: &CreateApiKey) -> Result<ApiKey> {
        validate::api_key_name(&request.name)?;
        let body = CreateApiKey {
            name: request.name.trim().to_string(),
        };
        let options = RequestOptions::new().with_json(&body)?;
        self.engine.execute(Method::POST, "/api-keys", options).await
    }

    /// Revokes an API key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) if `id` is not
    /// a UUID, and any engine error otherwise.
    pub async fn delete(&self, id: &str) -> Result<()> {
        validate::id("id", id)?;
        self.engine
            .execute_raw(Method::DELETE, &format!("/api-keys/{id}"), RequestOptions::new())
            .await?;
        Ok(())
    }
}
