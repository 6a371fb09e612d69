//! The authenticated user.

use http::Method;

use super::models::User;
use crate::engine::{RequestEngine, RequestOptions};
use crate::error::Result;
use crate::time::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::transport::HttpClient;

/// User operations, obtained from [`Client::user`](crate::Client::user).
#[derive(Debug, Clone)]
pub struct Users<H, S = TokioSleeper, C = SystemClock> {
    engine: RequestEngine<H, S, C>,
}

impl<H, S, C> Users<H, S, C>
where
    H: HttpClient + 'static,
    S: Sleeper + 'static,
    C: Clock + 'static,
{
    pub(crate) const fn new(engine: RequestEngine<H, S, C>) -> Self {
        Self { engine }
    }

    /// Fetches the profile of the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns any engine error.
    pub async fn profile(&self) -> Result<User> {
        self.engine
            .execute(Method::GET, "/user/profile", RequestOptions::new())
            .await
    }
}
