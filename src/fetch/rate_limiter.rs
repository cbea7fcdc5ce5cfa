//! Global request spacing derived from a requests-per-minute budget

use std::time::Duration;

use log::debug;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Admits callers no closer together than `60 / requests_per_minute` seconds
///
/// The limiter is shared by every endpoint that uses it. The lock is held
/// while sleeping, so concurrent callers queue up and are admitted one per
/// interval rather than in a burst. Tokio's mutex is FIFO-fair, so waiters
/// are admitted in arrival order.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    /// When the previous caller was admitted; `None` until the first call
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter for `requests_per_minute` (clamped to at least 1)
    pub fn new(requests_per_minute: u32) -> Self {
        Self::with_interval(Duration::from_secs_f64(
            60.0 / f64::from(requests_per_minute.max(1)),
        ))
    }

    /// Creates a limiter with an explicit minimum spacing
    pub fn with_interval(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until the minimum interval has passed since the previous admission,
    /// then records the new admission time
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                let pause = self.min_interval - elapsed;
                debug!("Rate limiting: sleeping {:.3}s", pause.as_secs_f64());
                sleep(pause).await;
            }
        }
        *last = Some(Instant::now());
    }
}
