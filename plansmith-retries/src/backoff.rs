//! Backoff policies.

use std::time::Duration;

use crate::BackoffPolicy;

/// Exponential backoff with optional jitter.
///
/// A server-provided `Retry-After` hint overrides the computed delay.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    /// Maximum number of retries.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Jitter factor (0.0 to 1.0).
    pub jitter: f64,
    /// Multiplier applied per retry.
    pub multiplier: f64,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            jitter: 0.1,
            multiplier: 2.0,
        }
    }
}

impl ExponentialBackoff {
    /// Create the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder.
    #[must_use]
    pub fn builder() -> ExponentialBackoffBuilder {
        ExponentialBackoffBuilder::default()
    }

    /// Compute the delay for a given attempt (1-indexed).
    #[must_use]
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32 - 1);
        let jitter = base * self.jitter * rand_jitter();
        let delay = (base + jitter).min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(delay.max(0.0))
    }
}

impl BackoffPolicy for ExponentialBackoff {
    fn next_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Option<Duration> {
        if attempt > self.max_retries {
            return None;
        }
        match retry_after {
            Some(hint) => Some(hint.min(self.max_delay)),
            None => Some(self.calculate_delay(attempt)),
        }
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// Builder for [`ExponentialBackoff`].
#[derive(Debug, Default)]
pub struct ExponentialBackoffBuilder {
    max_retries: Option<u32>,
    initial_delay: Option<Duration>,
    max_delay: Option<Duration>,
    jitter: Option<f64>,
    multiplier: Option<f64>,
}

impl ExponentialBackoffBuilder {
    /// Set max retries.
    #[must_use]
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = Some(n);
        self
    }

    /// Set the initial delay.
    #[must_use]
    pub fn initial_delay(mut self, d: Duration) -> Self {
        self.initial_delay = Some(d);
        self
    }

    /// Set the maximum delay.
    #[must_use]
    pub fn max_delay(mut self, d: Duration) -> Self {
        self.max_delay = Some(d);
        self
    }

    /// Set the jitter factor.
    #[must_use]
    pub fn jitter(mut self, j: f64) -> Self {
        self.jitter = Some(j);
        self
    }

    /// Set the multiplier.
    #[must_use]
    pub fn multiplier(mut self, m: f64) -> Self {
        self.multiplier = Some(m);
        self
    }

    /// Build the policy.
    #[must_use]
    pub fn build(self) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff::default();
        if let Some(v) = self.max_retries {
            backoff.max_retries = v;
        }
        if let Some(v) = self.initial_delay {
            backoff.initial_delay = v;
        }
        if let Some(v) = self.max_delay {
            backoff.max_delay = v;
        }
        if let Some(v) = self.jitter {
            backoff.jitter = v;
        }
        if let Some(v) = self.multiplier {
            backoff.multiplier = v;
        }
        backoff
    }
}

/// Fixed delay between retries.
#[derive(Debug, Clone)]
pub struct FixedDelay {
    /// Delay between retries.
    pub delay: Duration,
    /// Maximum number of retries.
    pub max_retries: u32,
}

impl FixedDelay {
    /// Create a new fixed-delay policy.
    #[must_use]
    pub fn new(delay: Duration, max_retries: u32) -> Self {
        Self { delay, max_retries }
    }
}

impl BackoffPolicy for FixedDelay {
    fn next_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Option<Duration> {
        if attempt > self.max_retries {
            None
        } else {
            Some(retry_after.unwrap_or(self.delay))
        }
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// Random jitter factor in -1.0..1.0.
fn rand_jitter() -> f64 {
    use rand::Rng;
    rand::thread_rng().gen_range(-1.0..1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let backoff = ExponentialBackoff::new();
        assert_eq!(backoff.max_retries, 2);
        assert_eq!(backoff.initial_delay, Duration::from_millis(100));
    }

    #[test]
    fn test_delays_without_jitter() {
        let backoff = ExponentialBackoff::builder()
            .initial_delay(Duration::from_millis(100))
            .multiplier(2.0)
            .jitter(0.0)
            .build();

        assert_eq!(backoff.calculate_delay(1), Duration::from_millis(100));
        assert_eq!(backoff.calculate_delay(2), Duration::from_millis(200));
        assert_eq!(backoff.calculate_delay(3), Duration::from_millis(400));
    }

    #[test]
    fn test_max_delay_cap() {
        let backoff = ExponentialBackoff::builder()
            .initial_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(5))
            .multiplier(10.0)
            .jitter(0.0)
            .build();

        assert!(backoff.calculate_delay(5) <= Duration::from_secs(5));
    }

    #[test]
    fn test_retry_after_hint_wins() {
        let backoff = ExponentialBackoff::builder().jitter(0.0).build();
        let delay = backoff.next_delay(1, Some(Duration::from_secs(3)));
        assert_eq!(delay, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_retries_exhaust() {
        let backoff = ExponentialBackoff::builder().max_retries(2).build();
        assert!(backoff.next_delay(1, None).is_some());
        assert!(backoff.next_delay(2, None).is_some());
        assert!(backoff.next_delay(3, None).is_none());
    }

    #[test]
    fn test_fixed_delay() {
        let policy = FixedDelay::new(Duration::from_secs(1), 3);
        assert_eq!(policy.next_delay(3, None), Some(Duration::from_secs(1)));
        assert_eq!(policy.next_delay(4, None), None);
    }
}
