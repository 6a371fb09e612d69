//! Alert operations.

use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use http::Method;

use super::models::{Alert, AlertStatus, CreateAlert, ListAlertsParams, UpdateAlert};
use super::validate;
use crate::config::defaults;
use crate::engine::{Paginated, Query, RequestEngine, RequestOptions};
use crate::error::{Error, Result};
use crate::time::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::transport::HttpClient;

/// Maximum number of concurrent creates issued by [`Alerts::create_batch`].
pub const BATCH_CONCURRENCY: usize = defaults::BATCH_CONCURRENCY;

/// Alert operations, obtained from [`Client::alerts`](crate::Client::alerts).
#[derive(Debug, Clone)]
pub struct Alerts<H, S = TokioSleeper, C = SystemClock> {
    engine: RequestEngine<H, S, C>,
}

impl<H, S, C> Alerts<H, S, C>
where
    H: HttpClient + 'static,
    S: Sleeper + 'static,
    C: Clock + 'static,
{
    pub(crate) const fn new(engine: RequestEngine<H, S, C>) -> Self {
        Self { engine }
    }

    /// Lists one page of alerts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) for an invalid
    /// page, page size or symbol filter, and any engine error otherwise.
    pub async fn list(&self, params: &ListAlertsParams) -> Result<Paginated<Alert>> {
        let query = list_query(params)?;
        fetch_page(&self.engine, query).await
    }

    /// Streams every alert matching `params`, page by page.
    ///
    /// Pages are fetched lazily starting at `params.page` (default 1). The
    /// stream ends after a short page, or when the pagination metadata says
    /// no page follows. Each call starts an independent cursor; a failed page
    /// yields its error and ends the stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) immediately if
    /// `params` is invalid.
    pub fn iter(
        &self,
        params: &ListAlertsParams,
    ) -> Result<impl Stream<Item = Result<Alert>> + Send + 'static> {
        list_query(params)?;

        let engine = self.engine.clone();
        let params = ListAlertsParams {
            limit: Some(params.limit.unwrap_or(defaults::PAGE_SIZE)),
            ..params.clone()
        };
        let first_page = params.page.unwrap_or(1);

        let pages = stream::try_unfold(Some(first_page), move |page| {
            let engine = engine.clone();
            let params = params.clone();
            async move {
                let Some(page) = page else {
                    return Ok(None);
                };
                let query = list_query(&ListAlertsParams {
                    page: Some(page),
                    ..params.clone()
                })?;
                let result = fetch_page(&engine, query).await?;

                let limit = usize::try_from(params.limit.unwrap_or(defaults::PAGE_SIZE))
                    .unwrap_or(usize::MAX);
                let exhausted = result.data.len() < limit
                    || result.pagination().is_some_and(|p| !p.has_next());
                let next = (!exhausted).then_some(page + 1);

                let items = stream::iter(result.data.into_iter().map(Ok::<Alert, Error>));
                Ok::<_, Error>(Some((items, next)))
            }
        });

        Ok(pages.try_flatten())
    }

    /// Fetches an alert by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) if `id` is not
    /// a UUID, and any engine error otherwise.
    pub async fn get(&self, id: &str) -> Result<Alert> {
        validate::id("id", id)?;
        self.engine
            .execute(Method::GET, &format!("/alerts/{id}"), RequestOptions::new())
            .await
    }

    /// Creates an alert.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) before any
    /// request is sent if the symbol, threshold or parameters are invalid for
    /// the condition.
    pub async fn create(&self, request: &CreateAlert) -> Result<Alert> {
        let request = validate::create_alert(request)?;
        self.send_create(&request).await
    }

    /// Creates several alerts with at most [`BATCH_CONCURRENCY`] requests in flight.
    ///
    /// Every request is validated before anything is sent. Results are
    /// returned in input order; a failed create does not stop the others.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::Validation`](crate::Error::Validation),
    /// annotated with the offending item's index, if any request is invalid.
    pub async fn create_batch(&self, requests: &[CreateAlert]) -> Result<Vec<Result<Alert>>> {
        let validated = requests
            .iter()
            .enumerate()
            .map(|(index, request)| validate::create_alert(request).map_err(|e| e.at_index(index)))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(count = validated.len(), "Creating alerts in batch");

        let results: Vec<Result<Alert>> = stream::iter(validated.iter())
            .map(|request| self.send_create(request))
            .buffered(BATCH_CONCURRENCY)
            .collect()
            .await;
        Ok(results)
    }

    /// Updates an alert.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) if `id` is not a
    /// UUID or the update is empty or invalid, and any engine error otherwise.
    pub async fn update(&self, id: &str, update: &UpdateAlert) -> Result<Alert> {
        validate::id("id", id)?;
        validate::update_alert(update)?;
        let options = RequestOptions::new().with_json(update)?;
        self.engine
            .execute(Method::PUT, &format!("/alerts/{id}"), options)
            .await
    }

    /// Deletes an alert.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) if `id` is not
    /// a UUID, and any engine error otherwise.
    pub async fn delete(&self, id: &str) -> Result<()> {
        validate::id("id", id)?;
        self.engine
            .execute_raw(Method::DELETE, &format!("/alerts/{id}"), RequestOptions::new())
            .await?;
        Ok(())
    }

    /// Pauses an alert.
    ///
    /// # Errors
    ///
    /// See [`Alerts::update`].
    pub async fn pause(&self, id: &str) -> Result<Alert> {
        self.set_status(id, AlertStatus::Paused).await
    }

    /// Re-activates a paused alert.
    ///
    /// # Errors
    ///
    /// See [`Alerts::update`].
    pub async fn activate(&self, id: &str) -> Result<Alert> {
        self.set_status(id, AlertStatus::Active).await
    }

    async fn set_status(&self, id: &str, status: AlertStatus) -> Result<Alert> {
        let update = UpdateAlert {
            status: Some(status),
            ..UpdateAlert::default()
        };
        self.update(id, &update).await
    }

    async fn send_create(&self, request: &CreateAlert) -> Result<Alert> {
        let options = RequestOptions::new().with_json(request)?;
        self.engine.execute(Method::POST, "/alerts", options).await
    }
}

fn list_query(params: &ListAlertsParams) -> Result<Query> {
    validate::paging(params.page, params.limit)?;
    let symbol = params.symbol.as_deref().map(validate::symbol).transpose()?;

    Ok(Query::new()
        .with_opt("page", params.page)
        .with_opt("limit", params.limit)
        .with_opt("status", params.status.map(AlertStatus::as_str))
        .with_opt("condition", params.condition.map(|c| c.as_str()))
        .with_opt("symbol", symbol)
        .with_opt("sortField", params.sort_field.as_deref())
        .with_opt("sortDirection", params.sort_direction.map(|d| d.as_str())))
}

async fn fetch_page<H, S, C>(engine: &RequestEngine<H, S, C>, query: Query) -> Result<Paginated<Alert>>
where
    H: HttpClient + 'static,
    S: Sleeper + 'static,
    C: Clock + 'static,
{
    let value = engine
        .execute_raw(Method::GET, "/alerts", RequestOptions::new().with_query(query))
        .await?;
    Paginated::from_value(value)
}
