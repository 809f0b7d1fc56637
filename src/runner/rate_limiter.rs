//! @ai:module:intent Client-side pacing of provider requests
//! @ai:module:layer infrastructure
//! @ai:module:public_api RateLimiter, RateLimiterTrait
//! @ai:module:stateless false

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// @ai:intent Trait for request pacing
pub trait RateLimiterTrait: Send + Sync {
    /// @ai:intent Wait until the next request may be sent
    fn wait(&self) -> impl std::future::Future<Output = ()> + Send;
}

/// @ai:intent Token bucket holding up to one minute of request budget
/// @ai:invariant a limit of 0 requests per minute disables pacing
pub struct RateLimiter {
    bucket: Option<Mutex<Bucket>>,
    per_second: f64,
    capacity: f64,
}

struct Bucket {
    available: f64,
    refilled_at: Instant,
}

impl Bucket {
    fn refill(&mut self, per_second: f64, capacity: f64) {
        let now = Instant::now();
        let earned = now.duration_since(self.refilled_at).as_secs_f64() * per_second;
        self.available = (self.available + earned).min(capacity);
        self.refilled_at = now;
    }
}

impl RateLimiter {
    /// @ai:intent Create a limiter allowing `requests_per_minute` sustained requests
    /// @ai:effects pure
    pub fn new(requests_per_minute: u32) -> Self {
        let capacity = requests_per_minute as f64;
        let bucket = (requests_per_minute > 0).then(|| {
            Mutex::new(Bucket {
                available: capacity,
                refilled_at: Instant::now(),
            })
        });

        Self {
            bucket,
            per_second: capacity / 60.0,
            capacity,
        }
    }

    #[cfg(test)]
    pub fn is_unlimited(&self) -> bool {
        self.bucket.is_none()
    }
}

impl RateLimiterTrait for RateLimiter {
    /// @ai:effects state:write, time
    async fn wait(&self) {
        let Some(bucket) = &self.bucket else {
            return;
        };

        loop {
            let pause = {
                let mut bucket = bucket.lock().await;
                bucket.refill(self.per_second, self.capacity);

                if bucket.available >= 1.0 {
                    bucket.available -= 1.0;
                    return;
                }

                Duration::from_secs_f64((1.0 - bucket.available) / self.per_second)
            };

            tracing::debug!("Rate limit reached, pausing {:?}", pause);
            tokio::time::sleep(pause).await;
        }
    }
}
