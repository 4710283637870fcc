//! Reconnection delays.

use std::time::Duration;

/// Capped exponential backoff.
///
/// The delay before reconnection attempt `n` (0-based) is `min(base * 2^n, max_delay)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub max_delay: Duration,
    /// Reconnection attempts allowed after a failure before giving up.
    pub max_attempts: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_attempts: 10,
        }
    }
}

impl BackoffPolicy {
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sequence() {
        let policy = BackoffPolicy::default();
        let delays: Vec<u64> = (0..policy.max_attempts)
            .map(|n| policy.delay(n).as_secs())
            .collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 16, 30, 30, 30, 30, 30]);
    }

    #[test]
    fn test_large_attempts_saturate() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.delay(31), Duration::from_secs(30));
        assert_eq!(policy.delay(32), Duration::from_secs(30));
        assert_eq!(policy.delay(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn test_custom_base() {
        let policy = BackoffPolicy {
            base: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
            max_attempts: 3,
        };
        assert_eq!(policy.delay(0), Duration::from_millis(10));
        assert_eq!(policy.delay(2), Duration::from_millis(40));
        assert_eq!(policy.delay(3), Duration::from_millis(50));
    }
}
