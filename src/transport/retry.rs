//! Retry policy for API requests.

use std::time::Duration;

/// Configuration for exponential backoff retry behavior.
///
/// Controls how many times a failed request is retried and how long
/// to wait between attempts. The base delay grows exponentially and is
/// capped; a random jitter of up to `jitter` (fraction of the base delay)
/// is added on top.
///
/// # Defaults
///
/// - `max_retries`: 3 (so at most 4 attempts)
/// - `initial_delay`: 1 second
/// - `max_delay`: 10 seconds
/// - `multiplier`: 2.0
/// - `jitter`: 0.3
///
/// # Example
///
/// ```
/// use stockalert::transport::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new()
///     .with_max_retries(5)
///     .with_initial_delay(Duration::from_millis(500));
///
/// assert_eq!(policy.delay_for_retry(1), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    ///
    /// A value of 0 means only the initial attempt is made.
    pub max_retries: u32,

    /// Base delay before the first retry.
    pub initial_delay: Duration,

    /// Cap applied to the base delay before jitter.
    pub max_delay: Duration,

    /// Multiplier applied to the delay after each retry.
    pub multiplier: f64,

    /// Upper bound of the random jitter, as a fraction of the base delay.
    pub jitter: f64,
}

impl RetryPolicy {
    /// Default maximum retries.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Default initial delay (1 second).
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

    /// Default maximum delay (10 seconds).
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);

    /// Default multiplier (2.0).
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;

    /// Default jitter fraction (30%).
    pub const DEFAULT_JITTER: f64 = 0.3;

    /// Creates a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            multiplier: Self::DEFAULT_MULTIPLIER,
            jitter: Self::DEFAULT_JITTER,
        }
    }

    /// Sets the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the base delay before the first retry.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum base delay between retries.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the delay multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `multiplier` is not positive (must be > 0.0).
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        assert!(multiplier > 0.0, "multiplier must be positive");
        self.multiplier = multiplier;
        self
    }

    /// Sets the jitter fraction.
    ///
    /// # Panics
    ///
    /// Panics if `jitter` is negative.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        assert!(jitter >= 0.0, "jitter must not be negative");
        self.jitter = jitter;
        self
    }

    /// Computes the base delay for a given retry number (0-indexed), without jitter.
    ///
    /// Retry 0 is the delay before the second attempt.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        // Safe cast: retry values are small and powi saturates to infinity, which min() caps
        #[allow(clippy::cast_possible_wrap)]
        let multiplier = self.multiplier.powi(retry.min(64) as i32);
        let delay_secs = self.initial_delay.as_secs_f64() * multiplier;
        let capped = delay_secs.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped)
    }

    /// Computes the delay for a retry including random jitter.
    ///
    /// The result lies in `[base, base * (1 + jitter)]`.
    #[must_use]
    pub fn jittered_delay(&self, retry: u32) -> Duration {
        let base = self.delay_for_retry(retry);
        let extra = base.as_secs_f64() * self.jitter * fastrand::f64();
        base + Duration::from_secs_f64(extra)
    }

    /// Returns true if another attempt may follow the given attempt.
    ///
    /// `attempt` is 0 for the initial attempt, 1 for the first retry, etc.
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Total number of attempts this policy allows.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
