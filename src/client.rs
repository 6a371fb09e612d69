//! The public client entry point.

use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::engine::RequestEngine;
use crate::error::Result;
use crate::resources::{Alerts, ApiKeys, Stocks, Users, Watchlist, Webhooks};
use crate::time::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::transport::{HttpClient, ReqwestClient};

/// Client for the StockAlert API.
///
/// Cloning is cheap; clones share the in-flight request registry and the
/// rate limit state. Separately constructed clients share nothing.
///
/// # Example
///
/// ```no_run
/// use stockalert::{Client, ClientConfig};
/// use stockalert::resources::{AlertCondition, CreateAlert};
///
/// # async fn example() -> stockalert::Result<()> {
/// let client = Client::new(ClientConfig::new().with_api_key("sk_your_api_key_here_0000"))?;
///
/// let alert = client
///     .alerts()
///     .create(&CreateAlert::new("AAPL", AlertCondition::PriceAbove).with_threshold(200.0))
///     .await?;
/// println!("{} is {}", alert.id, alert.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client<H = ReqwestClient, S = TokioSleeper, C = SystemClock> {
    engine: RequestEngine<H, S, C>,
}

impl<H, S, C> Clone for Client<H, S, C> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
        }
    }
}

impl Client {
    /// Creates a client using the reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) if the
    /// configuration has no usable credentials, a malformed API key, an
    /// invalid base URL or a zero timeout.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_http_client(config, ReqwestClient::new())
    }
}

impl<H: HttpClient + 'static> Client<H> {
    /// Creates a client with a custom HTTP transport.
    ///
    /// # Errors
    ///
    /// See [`Client::new`].
    pub fn with_http_client(config: ClientConfig, http: H) -> Result<Self> {
        Ok(Self {
            engine: RequestEngine::new(&config, http)?,
        })
    }
}

impl<H, S, C> Client<H, S, C>
where
    H: HttpClient + 'static,
    S: Sleeper + 'static,
    C: Clock + 'static,
{
    /// Wraps an existing engine.
    #[must_use]
    pub const fn from_engine(engine: RequestEngine<H, S, C>) -> Self {
        Self { engine }
    }

    /// Returns a client whose requests are all cancelled by `token`.
    ///
    /// The returned client shares state with `self`.
    #[must_use]
    pub fn with_cancel_token(&self, token: CancellationToken) -> Self {
        Self {
            engine: self.engine.with_cancel_token(token),
        }
    }

    /// The underlying request engine.
    #[must_use]
    pub const fn engine(&self) -> &RequestEngine<H, S, C> {
        &self.engine
    }

    /// Alert operations.
    #[must_use]
    pub fn alerts(&self) -> Alerts<H, S, C> {
        Alerts::new(self.engine.clone())
    }

    /// Webhook subscription operations.
    #[must_use]
    pub fn webhooks(&self) -> Webhooks<H, S, C> {
        Webhooks::new(self.engine.clone())
    }

    /// Watchlist operations.
    #[must_use]
    pub fn watchlist(&self) -> Watchlist<H, S, C> {
        Watchlist::new(self.engine.clone())
    }

    /// Stock lookups.
    #[must_use]
    pub fn stocks(&self) -> Stocks<H, S, C> {
        Stocks::new(self.engine.clone())
    }

    /// API key management.
    #[must_use]
    pub fn api_keys(&self) -> ApiKeys<H, S, C> {
        ApiKeys::new(self.engine.clone())
    }

    /// The authenticated user.
    #[must_use]
    pub fn user(&self) -> Users<H, S, C> {
        Users::new(self.engine.clone())
    }
}
