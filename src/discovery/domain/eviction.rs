//! Eviction thresholds for registry entries.

use super::RegistryEntry;
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Default number of consecutive failed cycles before eviction.
pub const DEFAULT_MAX_FAILURES: u32 = 5;

/// Default time without a healthy cycle before eviction.
pub const DEFAULT_STALE_WINDOW: Duration = Duration::from_secs(3600);

/// Why an entry was removed from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvictionReason {
    /// The entry reached the consecutive failure threshold.
    TooManyFailures,
    /// The entry has not completed a healthy cycle within the stale window.
    Stale,
}

impl EvictionReason {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TooManyFailures => "too_many_failures",
            Self::Stale => "stale",
        }
    }
}

impl fmt::Display for EvictionReason {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Thresholds applied once per cycle after merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionPolicy {
    max_failures: u32,
    stale_window: Duration,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self {
            max_failures: DEFAULT_MAX_FAILURES,
            stale_window: DEFAULT_STALE_WINDOW,
        }
    }
}

impl EvictionPolicy {
    /// Creates a policy. A zero failure threshold is raised to one.
    #[must_use]
    pub fn new(max_failures: u32, stale_window: Duration) -> Self {
        Self {
            max_failures: max_failures.max(1),
            stale_window,
        }
    }

    /// Returns the consecutive failure threshold.
    #[must_use]
    pub const fn max_failures(&self) -> u32 {
        self.max_failures
    }

    /// Returns the stale window.
    #[must_use]
    pub const fn stale_window(&self) -> Duration {
        self.stale_window
    }

    /// Returns why `entry` should be evicted at `now`, if at all.
    ///
    /// The failure threshold takes precedence when both apply.
    #[must_use]
    pub fn eviction_reason(&self, entry: &RegistryEntry, now: DateTime<Utc>) -> Option<EvictionReason> {
        if entry.consecutive_failures() >= self.max_failures {
            return Some(EvictionReason::TooManyFailures);
        }

        // A negative age (clock moved backwards) never counts as stale.
        let age = now.signed_duration_since(entry.last_seen()).to_std().ok()?;
        (age > self.stale_window).then_some(EvictionReason::Stale)
    }
}
