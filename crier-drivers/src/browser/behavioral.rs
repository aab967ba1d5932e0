use crier_common::DelayRange;
use rand::rngs::OsRng;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, Default)]
/// Produces human-like delays to reduce automation signals.
///
/// All workflow pacing funnels through here so the bounds stay configurable
/// per step instead of being scattered across platform code.
pub struct BehavioralEngine {}

impl BehavioralEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// Sleep for a random duration between `min` and `max` milliseconds.
    pub async fn random_delay(&self, min: u64, max: u64) {
        if max == 0 {
            return;
        }
        let mut rng = OsRng;
        let ms = rng.gen_range(min..=max.max(min));
        sleep(Duration::from_millis(ms)).await;
    }

    /// Sleep for a random duration drawn from `range`.
    pub async fn pause(&self, range: DelayRange) {
        self.random_delay(range.min_ms, range.max_ms).await;
    }
}
