//! Watchlist operations.

use http::Method;

use super::models::{AddToWatchlist, WatchlistItem};
use super::validate;
use crate::engine::{RequestEngine, RequestOptions};
use crate::error::Result;
use crate::time::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::transport::HttpClient;

/// Watchlist operations, obtained from [`Client::watchlist`](crate::Client::watchlist).
#[derive(Debug, Clone)]
pub struct Watchlist<H, S = TokioSleeper, C = SystemClock> {
    engine: RequestEngine<H, S, C>,
}

impl<H, S, C> Watchlist<H, S, C>
where
    H: HttpClient + 'static,
    S: Sleeper + 'static,
    C: Clock + 'static,
{
    pub(crate) const fn new(engine: RequestEngine<H, S, C>) -> Self {
        Self { engine }
    }

    /// Lists watched symbols.
    ///
    /// # Errors
    ///
    /// Returns any engine error.
    pub async fn list(&self) -> Result<Vec<WatchlistItem>> {
        self.engine
            .execute(Method::GET, "/watchlist", RequestOptions::new())
            .await
    }

    /// Adds a symbol to the watchlist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) for an invalid
    /// symbol, and any engine error otherwise.
    pub async fn add(&self, request: &AddToWatchlist) -> Result<WatchlistItem> {
        let body = AddToWatchlist {
            symbol: validate::symbol(&request.symbol)?,
            notes: request.notes.clone(),
        };
        let options = RequestOptions::new().with_json(&body)?;
        self.engine.execute(Method::POST, "/watchlist", options).await
    }

    /// Removes a symbol from the watchlist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) for an invalid
    /// symbol, and any engine error otherwise.
    pub async fn remove(&self, symbol: &str) -> Result<()> {
        let symbol = validate::symbol(symbol)?;
        self.engine
            .execute_raw(
                Method::DELETE,
                &format!("/watchlist/{symbol}"),
                RequestOptions::new(),
            )
            .await?;
        Ok(())
    }
}
