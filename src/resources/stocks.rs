//! Stock lookups.

use http::Method;

use super::models::Stock;
use super::validate;
use crate::engine::{Query, RequestEngine, RequestOptions};
use crate::error::Result;
use crate::time::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::transport::HttpClient;

/// Stock operations, obtained from [`Client::stocks`](crate::Client::stocks).
#[derive(Debug, Clone)]
pub struct Stocks<H, S = TokioSleeper, C = SystemClock> {
    engine: RequestEngine<H, S, C>,
}

impl<H, S, C> Stocks<H, S, C>
where
    H: HttpClient + 'static,
    S: Sleeper + 'static,
    C: Clock + 'static,
{
    pub(crate) const fn new(engine: RequestEngine<H, S, C>) -> Self {
        Self { engine }
    }

    /// Fetches quote and reference data for a symbol.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) for an invalid
    /// symbol, and any engine error otherwise.
    pub async fn get(&self, symbol: &str) -> Result<Stock> {
        let symbol = validate::symbol(symbol)?;
        self.engine
            .execute(Method::GET, &format!("/stocks/{symbol}"), RequestOptions::new())
            .await
    }

    /// Searches stocks by symbol or company name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) for an empty
    /// query or a limit outside 1..=100, and any engine error otherwise.
    pub async fn search(&self, query: &str, limit: Option<u32>) -> Result<Vec<Stock>> {
        validate::search_query(query)?;
        validate::paging(None, limit)?;

        let query = Query::new().with("q", query.trim()).with_opt("limit", limit);
        self.engine
            .execute(
                Method::GET,
                "/stocks/search",
                RequestOptions::new().with_query(query),
            )
            .await
    }
}
