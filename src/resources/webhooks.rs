//! Webhook subscription operations.

use http::Method;

use super::models::{CreateWebhook, Webhook, WebhookTestResult};
use super::validate;
use crate::engine::{RequestEngine, RequestOptions};
use crate::error::{Error, Result};
use crate::time::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::transport::HttpClient;

/// Webhook operations, obtained from [`Client::webhooks`](crate::Client::webhooks).
#[derive(Debug, Clone)]
pub struct Webhooks<H, S = TokioSleeper, C = SystemClock> {
    engine: RequestEngine<H, S, C>,
}

impl<H, S, C> Webhooks<H, S, C>
where
    H: HttpClient + 'static,
    S: Sleeper + 'static,
    C: Clock + 'static,
{
    pub(crate) const fn new(engine: RequestEngine<H, S, C>) -> Self {
        Self { engine }
    }

    /// Lists webhook subscriptions.
    ///
    /// # Errors
    ///
    /// Returns any engine error.
    pub async fn list(&self) -> Result<Vec<Webhook>> {
        self.engine
            .execute(Method::GET, "/webhooks", RequestOptions::new())
            .await
    }

    /// Subscribes a URL to webhook events.
    ///
    /// The returned webhook carries the signing secret; it is not returned again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the URL is not https or no event is
    /// given, and any engine error otherwise.
    pub async fn create(&self, request: &CreateWebhook) -> Result<Webhook> {
        validate::webhook_url(&request.url)?;
        if request.events.is_empty() {
            return Err(Error::invalid_field(
                "events",
                "At least one event is required",
            ));
        }

        let body = CreateWebhook {
            url: request.url.trim().to_string(),
            events: request.events.clone(),
        };
        let options = RequestOptions::new().with_json(&body)?;
        self.engine.execute(Method::POST, "/webhooks", options).await
    }

    /// Deletes a webhook subscription.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `id` is not a UUID, and any engine
    /// error otherwise.
    pub async fn delete(&self, id: &str) -> Result<()> {
        validate::id("id", id)?;
        self.engine
            .execute_raw(Method::DELETE, &format!("/webhooks/{id}"), RequestOptions::new())
            .await?;
        Ok(())
    }

    /// Asks the server to send a test delivery to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the URL is not https, and any engine
    /// error otherwise.
    pub async fn test(&self, url: &str) -> Result<WebhookTestResult> {
        validate::webhook_url(url)?;
        let options = RequestOptions::new().with_body(serde_json::json!({ "url": url.trim() }));
        self.engine
            .execute(Method::POST, "/webhooks/test", options)
            .await
    }
}
