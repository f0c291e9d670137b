//! # Runtime configuration.
//!
//! Provides [`Config`] centralized settings for an [`EventSourcing`](crate::EventSourcing) instance.
//!
//! ## Sentinel values
//! - `grace = 0s` → fire-and-forget shutdown (worker is signalled, not joined)
//! - `bus_capacity = 0` → clamped to 1
//! - `poll_interval = 0s` → clamped to 1ms
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use eventsourcing::Config;
//!
//! let mut cfg = Config::default();
//! cfg.grace = Duration::ZERO;
//! cfg.poll_interval = Duration::from_millis(2);
//!
//! assert_eq!(cfg.shutdown_grace(), None);
//! ```

use std::time::Duration;

/// Configuration for the event sourcing runtime.
///
/// ## Field semantics
/// - `grace`: how long `shutdown()` waits for the dispatch worker to exit (`0s` = do not wait)
/// - `bus_capacity`: notice bus ring buffer size (min 1)
/// - `poll_interval`: how often waiters re-check the outstanding count in addition to
///   being woken by the drain signal
///
/// All fields are public. Prefer the helper accessors over sentinel checks.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time `shutdown()` waits for the dispatch worker to stop.
    ///
    /// In-flight deliveries are never cancelled; only the worker loop is joined.
    pub grace: Duration,

    /// Capacity of the notice bus broadcast channel.
    ///
    /// Receivers lagging more than `bus_capacity` notices observe `Lagged` and skip
    /// older items.
    pub bus_capacity: usize,

    /// Re-check period for waiters.
    ///
    /// Correctness depends on the outstanding count only; the drain signal just
    /// makes the common case fast. A waiter that misses a wake-up still returns
    /// within one `poll_interval`.
    pub poll_interval: Duration,
}

impl Config {
    /// Returns the shutdown grace as an `Option`.
    ///
    /// - `None` → fire-and-forget shutdown
    /// - `Some(d)` → join the worker for at most `d`
    #[inline]
    pub fn shutdown_grace(&self) -> Option<Duration> {
        if self.grace == Duration::ZERO {
            None
        } else {
            Some(self.grace)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns the poll interval clamped to a minimum of 1ms.
    #[inline]
    pub fn poll_interval_clamped(&self) -> Duration {
        self.poll_interval.max(Duration::from_millis(1))
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `grace = 5s`
    /// - `bus_capacity = 1024`
    /// - `poll_interval = 10ms`
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(5),
            bus_capacity: 1024,
            poll_interval: Duration::from_millis(10),
        }
    }
}
