//! reqwest-backed transport.

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// [`HttpClient`] over a shared `reqwest::Client`.
///
/// Cloning shares the connection pool. No timeout is configured here; the
/// request engine bounds every attempt itself.
///
/// # Example
///
/// ```no_run
/// use stockalert::transport::{ReqwestClient, HttpClient, HttpRequest};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://stockalert.pro/api/public/v1/alerts")?;
/// let response = client.request(HttpRequest::get(url)).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Wraps a default `reqwest::Client`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a preconfigured `reqwest::Client` (proxies, TLS roots, ...).
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = req;

        let mut builder = self.inner.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(to_http_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(to_http_error)?;

        tracing::trace!(%status, bytes = body.len(), "Response received");
        Ok(HttpResponse::new(status, headers, body.to_vec()))
    }
}

fn to_http_error(err: reqwest::Error) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout
    } else if err.is_builder() {
        HttpError::InvalidUrl(err.to_string())
    } else {
        HttpError::Connection(Box::new(err))
    }
}
