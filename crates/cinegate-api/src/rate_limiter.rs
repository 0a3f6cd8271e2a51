//! Bursty token-bucket rate limiter.
//!
//! The bucket starts full, so up to `capacity` requests go out immediately.
//! A background task then adds one permit every `1s / capacity`, never
//! filling past `capacity`. Consumed permits are not returned.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::TmdbError;

/// Highest accepted rate. Above it the refill period rounds down to zero.
pub const MAX_REQUESTS_PER_SECOND: u32 = 1_000_000_000;

/// Returned by [`RateLimiter::acquire`] once the limiter has been closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rate limiter is closed")]
pub struct LimiterClosed;

/// Token bucket shared by every request issued through one client.
#[derive(Debug)]
pub struct RateLimiter {
    /// Permit pool.
    permits: Arc<Semaphore>,
    /// Maximum number of permits held at once.
    capacity: usize,
    /// Interval between refills.
    refill_interval: Duration,
    /// Stops the refill task.
    shutdown: CancellationToken,
    /// Refill task handle.
    refill_task: JoinHandle<()>,
}

impl RateLimiter {
    /// Creates a limiter allowing `requests_per_second` requests per second,
    /// pre-loaded with a full second of burst.
    ///
    /// # Errors
    ///
    /// - `requests_per_second` is zero.
    /// - `requests_per_second` is above [`MAX_REQUESTS_PER_SECOND`].
    /// - No Tokio runtime is running on the current thread.
    pub fn new(requests_per_second: u32) -> Result<Self, TmdbError> {
        if requests_per_second == 0 {
            return Err(TmdbError::configuration(
                "requests_per_second must be greater than zero",
            ));
        }
        if requests_per_second > MAX_REQUESTS_PER_SECOND {
            return Err(TmdbError::configuration(format!(
                "requests_per_second must be at most {MAX_REQUESTS_PER_SECOND}"
            )));
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            TmdbError::configuration("a Tokio runtime is required to start the rate limiter")
        })?;

        let capacity = usize::try_from(requests_per_second)
            .map_err(|_| TmdbError::configuration("requests_per_second is too large"))?;
        let refill_interval = Duration::from_secs(1)
            .checked_div(requests_per_second)
            .filter(|period| !period.is_zero())
            .ok_or_else(|| TmdbError::configuration("invalid requests_per_second"))?;
        let permits = Arc::new(Semaphore::new(capacity));
        let shutdown = CancellationToken::new();

        let refill_task = runtime.spawn(refill(
            Arc::clone(&permits),
            capacity,
            refill_interval,
            shutdown.clone(),
        ));

        Ok(Self {
            permits,
            capacity,
            refill_interval,
            shutdown,
            refill_task,
        })
    }

    /// Waits until a permit is available and consumes it.
    ///
    /// There is no timeout; wrap the call in `tokio::time::timeout` for a
    /// bounded wait.
    ///
    /// # Errors
    ///
    /// Returns [`LimiterClosed`] if the limiter is closed before or while
    /// waiting.
    pub async fn acquire(&self) -> Result<(), LimiterClosed> {
        let permit = self.permits.acquire().await.map_err(|_| LimiterClosed)?;
        permit.forget();
        Ok(())
    }

    /// Number of permits currently in the pool.
    #[must_use]
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Maximum number of permits the pool holds.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Interval between two refills.
    #[must_use]
    pub const fn refill_interval(&self) -> Duration {
        self.refill_interval
    }

    /// Stops the refill task and fails all pending and future acquires.
    ///
    /// Calling this more than once has no further effect.
    pub fn close(&self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.shutdown.cancel();
        self.permits.close();
        tracing::debug!(capacity = self.capacity, "rate limiter closed");
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Returns `true` once the refill task has exited.
    #[must_use]
    pub fn is_refill_stopped(&self) -> bool {
        self.refill_task.is_finished()
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        self.close();
    }
}

/// Adds one permit per tick while the pool is below `capacity`.
///
/// This task is the only producer of permits, so a permit observed missing
/// at check time is still missing when it is added back.
#[allow(clippy::arithmetic_side_effects)]
async fn refill(
    permits: Arc<Semaphore>,
    capacity: usize,
    period: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                if permits.available_permits() < capacity {
                    permits.add_permits(1);
                }
            }
        }
    }

    tracing::debug!("rate limiter refill task stopped");
}
