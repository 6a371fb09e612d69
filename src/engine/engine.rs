//! The request execution engine.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue, USER_AGENT};
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::envelope;
use super::pending::{PendingRequests, Waiter};
use super::rate_limit::{self, RateLimitState};
use super::request::{Query, RequestOptions};
use crate::config::{ClientConfig, Credentials, defaults};
use crate::error::{Error, Result};
use crate::time::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse, RetryPolicy};

const API_KEY_HEADER: &str = "x-api-key";
const APPLICATION_JSON: &str = "application/json";

/// Turns logical API calls into reliable HTTP exchanges.
///
/// The engine owns the in-flight GET registry and the per-origin rate limit
/// state. Clones share both; separately constructed engines do not.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper used between retries (defaults to [`TokioSleeper`])
/// - `C`: The clock used for rate limit bookkeeping (defaults to [`SystemClock`])
pub struct RequestEngine<H, S = TokioSleeper, C = SystemClock> {
    inner: Arc<Inner<H, S, C>>,
    cancel: Option<CancellationToken>,
}

impl<H, S, C> Clone for RequestEngine<H, S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cancel: self.cancel.clone(),
        }
    }
}

impl<H, S, C> std::fmt::Debug for RequestEngine<H, S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestEngine")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .field("retry", &self.inner.retry)
            .finish_non_exhaustive()
    }
}

struct Inner<H, S, C> {
    http: H,
    sleeper: S,
    clock: C,
    base_url: String,
    auth_header: (HeaderName, HeaderValue),
    user_agent: HeaderValue,
    timeout: Duration,
    retry: RetryPolicy,
    debug: bool,
    pending: PendingRequests,
    rate_limits: RateLimitState,
}

impl<H: HttpClient> RequestEngine<H> {
    /// Creates an engine using real time and tokio sleeps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the configuration is invalid.
    pub fn new(config: &ClientConfig, http: H) -> Result<Self> {
        Self::with_parts(config, http, TokioSleeper, SystemClock)
    }
}

impl<H: HttpClient, S: Sleeper, C: Clock> RequestEngine<H, S, C> {
    /// Creates an engine with explicit sleeper and clock implementations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the configuration is invalid or a
    /// credential cannot be sent as a header value.
    pub fn with_parts(config: &ClientConfig, http: H, sleeper: S, clock: C) -> Result<Self> {
        let credentials = config.validate()?;
        let (auth_name, mut auth_value) = match credentials {
            Credentials::ApiKey(key) => (
                HeaderName::from_static(API_KEY_HEADER),
                header_value("api_key", &key)?,
            ),
            Credentials::Bearer(token) => (
                AUTHORIZATION,
                header_value("bearer_token", &format!("Bearer {token}"))?,
            ),
        };
        auth_value.set_sensitive(true);

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                sleeper,
                clock,
                base_url: config.base_url().to_string(),
                auth_header: (auth_name, auth_value),
                user_agent: header_value("user_agent", config.user_agent())?,
                timeout: config.timeout(),
                retry: RetryPolicy::new().with_max_retries(config.max_retries()),
                debug: config.debug(),
                pending: PendingRequests::default(),
                rate_limits: RateLimitState::new(),
            }),
            cancel: None,
        })
    }

    /// Returns a handle whose calls are cancelled by `token`.
    ///
    /// The handle shares in-flight and rate limit state with `self`. A token
    /// passed in [`RequestOptions`] takes precedence.
    #[must_use]
    pub fn with_cancel_token(&self, token: CancellationToken) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cancel: Some(token),
        }
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Number of GET requests currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.inner.pending.len()
    }

    /// Returns the stored rate limit reset (Unix ms) for the origin of `url`.
    #[must_use]
    pub fn rate_limited_until(&self, url: &Url) -> Option<u64> {
        self.inner
            .rate_limits
            .reset_at(&rate_limit::origin_of(url))
    }
}

impl<H, S, C> RequestEngine<H, S, C>
where
    H: HttpClient + 'static,
    S: Sleeper + 'static,
    C: Clock + 'static,
{
    /// Executes a call and decodes the unwrapped payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns any [`Error`] kind; see [`RequestEngine::execute_raw`].
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let value = self.execute_raw(method, path, options).await?;
        serde_json::from_value(value).map_err(Error::decode)
    }

    /// Executes a call and returns the unwrapped JSON payload.
    ///
    /// The payload is the envelope's `data`, or `{data, meta}` when the
    /// envelope carries metadata. Concurrent identical GETs share one
    /// exchange and observe the same outcome.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the URL cannot be built
    /// - [`Error::RateLimit`] if the origin is cooling down or keeps answering 429
    /// - [`Error::Authentication`] on 401
    /// - [`Error::Api`] on other failures reported by the server
    /// - [`Error::Network`] on transport failures, timeouts and cancellation
    pub async fn execute_raw(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value> {
        let url = self.inner.resolve_url(path, &options.query)?;
        let cancel = options.cancel.clone().or_else(|| self.cancel.clone());

        if method != Method::GET {
            return with_cancel(cancel.as_ref(), self.inner.dispatch(method, url, options))
                .await
                .unwrap_or_else(|| Err(Error::cancelled()));
        }

        let fingerprint = format!("{method} {url}");
        let (call, id, joined) = self.inner.pending.join_or_insert(&fingerprint, |id| {
            let inner = Arc::clone(&self.inner);
            let key = fingerprint.clone();
            async move {
                let outcome = inner.dispatch(method, url, options).await;
                inner.pending.remove(&key, id);
                outcome
            }
            .boxed()
            .shared()
        });
        let waiter = Waiter::new(&self.inner.pending, fingerprint, id);

        if joined && self.inner.debug {
            tracing::debug!(request = %waiter.fingerprint(), "Joining in-flight request");
        }

        // `waiter` releases the entry on every exit, even if this future is dropped.
        with_cancel(cancel.as_ref(), call)
            .await
            .unwrap_or_else(|| Err(Error::cancelled()))
    }
}

/// Runs `fut` unless `cancel` fires first; `None` means cancelled.
async fn with_cancel<F: Future>(cancel: Option<&CancellationToken>, fut: F) -> Option<F::Output> {
    match cancel {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => None,
            output = fut => Some(output),
        },
        None => Some(fut.await),
    }
}

fn header_value(field: &'static str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::invalid_field(field, format!("{field} contains invalid characters")))
}

impl<H: HttpClient, S: Sleeper, C: Clock> Inner<H, S, C> {
    fn resolve_url(&self, path: &str, query: &Query) -> Result<Url> {
        let joined = if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        };
        let mut url = Url::parse(&joined)
            .map_err(|e| Error::validation(format!("Invalid request URL '{joined}': {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }
        Ok(url)
    }

    fn build_request(&self, method: Method, url: Url, options: &RequestOptions) -> Result<HttpRequest> {
        let mut request = HttpRequest::new(method, url)
            .with_header(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))
            .with_header(ACCEPT, HeaderValue::from_static(APPLICATION_JSON))
            .with_header(USER_AGENT, self.user_agent.clone());

        if !options.headers.contains_key(AUTHORIZATION) {
            let (name, value) = &self.auth_header;
            request.headers.insert(name.clone(), value.clone());
        }

        for (name, value) in &options.headers {
            request.headers.insert(name.clone(), value.clone());
        }

        if let Some(body) = &options.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| Error::validation(format!("Request body is not valid JSON: {e}")))?;
            request.body = Some(bytes);
        }

        Ok(request)
    }

    /// Pre-checks the rate limit, then runs the retry loop.
    async fn dispatch(&self, method: Method, url: Url, options: RequestOptions) -> Result<Value> {
        let origin = rate_limit::origin_of(&url);
        if let Err(retry_after) = self.rate_limits.check(&origin, self.clock.now_millis()) {
            tracing::debug!(%origin, retry_after, "Origin is cooling down, request not sent");
            return Err(Error::rate_limited(retry_after));
        }

        let request = self.build_request(method, url, &options)?;
        let timeout = options.timeout.unwrap_or(self.timeout);
        let max_retries = options.retries.unwrap_or(self.retry.max_retries);

        let mut attempt = 0;
        loop {
            let error = match self.attempt(&request, &origin, timeout).await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !error.is_retryable() || attempt >= max_retries {
                return Err(error);
            }

            let delay = error
                .retry_after()
                .map_or_else(|| self.retry.jittered_delay(attempt), Duration::from_secs);
            tracing::debug!(
                method = %request.method,
                url = %request.url,
                attempt = attempt + 1,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "Request failed, retrying"
            );
            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }

    /// Performs one exchange bounded by `timeout`.
    async fn attempt(&self, request: &HttpRequest, origin: &str, timeout: Duration) -> Result<Value> {
        if self.debug {
            tracing::debug!(method = %request.method, url = %request.url, "Sending request");
        }

        let response = match tokio::time::timeout(timeout, self.http.request(request.clone())).await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(Error::Network {
                    message: format!("Request timed out after {}ms", timeout.as_millis()),
                    retryable: true,
                    source: Some(Arc::new(HttpError::Timeout)),
                });
            }
        };

        if self.debug {
            tracing::debug!(
                method = %request.method,
                url = %request.url,
                status = response.status.as_u16(),
                "Received response"
            );
        }

        self.classify(&response, origin)
    }

    /// Maps a response onto a payload or an error.
    fn classify(&self, response: &HttpResponse, origin: &str) -> Result<Value> {
        let status = response.status;

        if status == StatusCode::UNAUTHORIZED {
            let message = serde_json::from_slice::<Value>(&response.body)
                .ok()
                .as_ref()
                .and_then(envelope::error_message)
                .unwrap_or_else(|| "Invalid API key or authentication failed".to_string());
            return Err(Error::authentication(message));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let now = self.clock.now_millis();
            let retry_after =
                rate_limit::retry_after_secs(response, now, defaults::RATE_LIMIT_COOLDOWN_SECS);
            self.rate_limits
                .record(origin, now.saturating_add(retry_after.saturating_mul(1000)));
            tracing::warn!(%origin, retry_after, "Rate limit exceeded");
            return Err(Error::rate_limited(retry_after));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        if !response.is_json() {
            let content_type = response
                .header_str(CONTENT_TYPE)
                .unwrap_or("none")
                .to_string();
            return Err(Error::api(
                format!("Unexpected response content type: {content_type}"),
                status.as_u16(),
                response.body_text().map(|text| Value::String(text.to_string())),
            ));
        }

        let body: Value = serde_json::from_slice(&response.body)
            .map_err(|e| Error::network(format!("Invalid JSON response: {e}")))?;

        if !status.is_success() {
            let message = envelope::error_message(&body)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            return Err(Error::api(message, status.as_u16(), Some(body)));
        }

        envelope::unwrap(status.as_u16(), body)
    }
}
