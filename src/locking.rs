//! Deletion-lock policy for audit trails.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;

/// When records of a trail become eligible for deletion.
///
/// A trail is configured once at creation with up to two windows:
///
/// - a **time window**: a record may be deleted only after the window
///   has elapsed since it was added;
/// - a **count window**: a record may be deleted only once at least
///   that many newer records have been appended after it.
///
/// Both configured windows must be satisfied (conjunction). A window
/// that is absent is vacuously satisfied. If *neither* window is
/// configured, deletion is never permitted: the policy fails closed.
///
/// # Examples
///
/// ```
/// use notary_core::{LockingConfig, Timestamp};
///
/// let policy = LockingConfig::new(Some(3_600), None);
/// let added_at = Timestamp::from_secs(0);
///
/// // 3599 seconds in: still locked.
/// assert!(!policy.permits_delete(Timestamp::from_secs(3_599), added_at, 1, 0));
/// // 3600 seconds in: eligible.
/// assert!(policy.permits_delete(Timestamp::from_secs(3_600), added_at, 1, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockingConfig {
    time_window: Option<u64>,
    count_window: Option<u64>,
}

impl LockingConfig {
    /// Creates a policy with the given windows.
    ///
    /// `time_window` is in seconds; `count_window` counts newer records.
    pub const fn new(time_window: Option<u64>, count_window: Option<u64>) -> Self {
        Self {
            time_window,
            count_window,
        }
    }

    /// A policy that never permits deletion.
    pub const fn deny_all() -> Self {
        Self::new(None, None)
    }

    /// Returns the configured time window in seconds, if any.
    pub fn time_window(&self) -> Option<u64> {
        self.time_window
    }

    /// Returns the configured count window, if any.
    pub fn count_window(&self) -> Option<u64> {
        self.count_window
    }

    /// Evaluates whether a record may be deleted right now.
    ///
    /// `record_count` is the trail's total number of appends;
    /// `sequence_number` and `added_at` describe the record under
    /// consideration. The result is monotonic: once a record becomes
    /// deletable it stays deletable as time passes and records are
    /// appended.
    pub fn permits_delete(
        &self,
        now: Timestamp,
        added_at: Timestamp,
        record_count: u64,
        sequence_number: u64,
    ) -> bool {
        if self.time_window.is_none() && self.count_window.is_none() {
            // Fail closed: an unconfigured policy locks every record forever.
            return false;
        }
        if let Some(window) = self.time_window {
            if now.saturating_elapsed_since(added_at) < window {
                return false;
            }
        }
        if let Some(window) = self.count_window {
            if record_count.saturating_sub(sequence_number) < window {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for LockingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.time_window, self.count_window) {
            (None, None) => write!(f, "locked forever"),
            (Some(t), None) => write!(f, "deletable after {}s", t),
            (None, Some(c)) => write!(f, "deletable after {} newer records", c),
            (Some(t), Some(c)) => {
                write!(f, "deletable after {}s and {} newer records", t, c)
            }
        }
    }
}
