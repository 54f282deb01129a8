use std::time::Duration;
use tokio::time::sleep;
use rand::Rng;

/// Jittered exponential backoff between attempts against an upstream source.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    pub base: Duration,
    pub max_retries: u32,
}

impl Backoff {
    pub fn new(base: Duration, max_retries: u32) -> Self {
        Self { base, max_retries }
    }

    /// No waiting and no retries; handy for tests.
    pub fn none() -> Self {
        Self { base: Duration::ZERO, max_retries: 0 }
    }

    /// Total attempts including the first one.
    pub fn attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay before retry number `retry` (1-based): `base * 2^(retry-1)` plus up to half of `base` of jitter.
    pub fn delay(&self, retry: u32) -> Duration {
        let base_ms = self.base.as_millis() as u64;
        if base_ms == 0 {
            return Duration::ZERO;
        }
        let exp = base_ms.saturating_mul(1u64 << retry.saturating_sub(1).min(16));
        let jitter = {
            let mut rng = rand::thread_rng();
            rng.gen_range(0..=base_ms / 2)
        };
        Duration::from_millis(exp.saturating_add(jitter))
    }

    pub async fn wait(&self, retry: u32) {
        let delay = self.delay(retry);
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}
