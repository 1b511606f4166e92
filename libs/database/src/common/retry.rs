use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff policy for startup connection attempts.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Scale each delay into 50-100% of its nominal value
    pub use_jitter: bool,
}

impl RetryConfig {
    /// Defaults: 3 retries, 100ms initial delay doubling up to 5s, jitter on.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    /// Nominal delay before retry number `retry` (1-based), before jitter.
    pub fn nominal_delay_ms(&self, retry: u32) -> u64 {
        let exponent = retry.saturating_sub(1) as i32;
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        (delay as u64).min(self.max_delay_ms)
    }

    fn delay_for(&self, retry: u32) -> Duration {
        let nominal = self.nominal_delay_ms(retry);
        let delay = if self.use_jitter {
            apply_jitter(nominal)
        } else {
            nominal
        };
        Duration::from_millis(delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Retry an async operation with exponential backoff.
///
/// The last error is returned once `max_retries` retries have failed.
///
/// ```ignore
/// let config = RetryConfig::new().with_max_retries(5);
/// let client = retry_with_backoff(|| connect_from_config(&mongo), config).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut retries = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if retries > 0 {
                    debug!(retries, "Operation succeeded after retrying");
                }
                return Ok(result);
            }
            Err(e) if retries >= config.max_retries => {
                warn!(attempts = retries + 1, "Operation failed, giving up: {}", e);
                return Err(e);
            }
            Err(e) => {
                retries += 1;
                let delay = config.delay_for(retries);
                debug!(
                    "Operation failed (retry {}/{}): {}. Retrying in {:?}",
                    retries, config.max_retries, e, delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Scale `delay` by a pseudo-random factor in [0.5, 1.0).
fn apply_jitter(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let random_factor =
        (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0 + 0.5;

    (delay as f64 * random_factor) as u64
}

/// [`retry_with_backoff`] with the default policy.
pub async fn retry<F, Fut, T, E>(operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_with_backoff(operation, RetryConfig::default()).await
}
