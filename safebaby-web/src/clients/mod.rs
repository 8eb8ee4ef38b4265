//! External API clients

pub mod off;
pub mod vision;

pub use off::{OpenFoodFactsClient, ProductApiError};
pub use vision::{VisionClient, VisionError};

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// User agent sent to every external collaborator
pub const USER_AGENT: &str = "SafeBaby/0.1.0 (https://github.com/safebaby/safebaby)";

/// Fixed-interval rate limiter shared by the API clients
///
/// Enforces a minimum spacing between requests to the same host.
pub struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with the rate limit
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}
