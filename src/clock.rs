//! Host-supplied time.
//!
//! The ledger runtime hands every transaction a trusted clock reading.
//! Time never advances inside an operation; a [`Clock`] is a snapshot,
//! not a scheduler.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in time, in whole seconds.
///
/// Arithmetic is saturating: if the host ever hands in a reading earlier
/// than a stored timestamp, the elapsed time is zero rather than a panic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp from seconds since the host's epoch.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Returns the timestamp as seconds since the host's epoch.
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Returns the seconds elapsed since `earlier`, or zero if `earlier`
    /// is in the future.
    ///
    /// # Examples
    ///
    /// ```
    /// use notary_core::Timestamp;
    ///
    /// let early = Timestamp::from_secs(100);
    /// let late = Timestamp::from_secs(160);
    /// assert_eq!(late.saturating_elapsed_since(early), 60);
    /// assert_eq!(early.saturating_elapsed_since(late), 0);
    /// ```
    pub fn saturating_elapsed_since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// The current time as observed by the host for one transaction.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    now: Timestamp,
}

impl Clock {
    /// Creates a clock reading at the given timestamp.
    pub const fn at(now: Timestamp) -> Self {
        Self { now }
    }

    /// Creates a clock reading at the given seconds since epoch.
    pub const fn from_secs(secs: u64) -> Self {
        Self::at(Timestamp::from_secs(secs))
    }

    /// Returns the current timestamp.
    pub fn now(&self) -> Timestamp {
        self.now
    }
}
