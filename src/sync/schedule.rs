//! Jittered sync schedule.
//!
//! Each instance waits a random delay drawn uniformly from a window so that
//! many installs do not hit the remote source at the same moment.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shortest default wait between syncs (1 hour)
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_secs(60 * 60);

/// Longest default wait between syncs (1 day)
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Delay window for the recurring sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSchedule {
    min_delay: Duration,
    max_delay: Duration,
}

impl Default for SyncSchedule {
    fn default() -> Self {
        Self {
            min_delay: DEFAULT_MIN_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl SyncSchedule {
    /// Create a schedule; reversed bounds are swapped
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        if max_delay < min_delay {
            Self {
                min_delay: max_delay,
                max_delay: min_delay,
            }
        } else {
            Self {
                min_delay,
                max_delay,
            }
        }
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Draw the next delay
    pub fn next_delay(&self) -> Duration {
        self.next_delay_with(&mut rand::thread_rng())
    }

    /// Draw the next delay from a given RNG
    pub fn next_delay_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        Duration::from_millis(rng.gen_range(min..=max))
    }
}
