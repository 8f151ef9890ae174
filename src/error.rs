use std::fmt;

use crate::permission::PermissionKind;

/// A terminal abort of the enclosing transaction.
///
/// Every failed operation aborts as a whole: all validation happens
/// before the first write, so a returned `Abort` guarantees the object
/// it was invoked on is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abort {
    /// The kind of abort that occurred
    pub kind: AbortKind,
    /// Human-readable message explaining the abort
    pub message: String,
}

impl Abort {
    /// Creates a new abort.
    pub fn new(kind: AbortKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the stable numeric code of this abort, as surfaced to the
    /// host runtime.
    pub fn code(&self) -> u64 {
        self.kind.code()
    }
}

impl fmt::Display for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Abort {}

/// The kind of abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortKind {
    /// Caller lacks admin-level rights, presented a capability for the
    /// wrong object, or is not the object's owner
    NotAuthorized,
    /// Capability's role lacks a required permission kind
    PermissionDenied {
        /// The permission kind that was required
        required: PermissionKind,
    },
    /// A previously valid capability handle was revoked before use
    CapabilityRevoked,
    /// Record deletion attempted before the locking policy's windows
    /// are satisfied
    LockedRecord,
    /// Mutation attempted on a Locked-mode notarization
    LockedNotarization,
    /// Destroy or update attempted before a configured timelock expires
    TimelockActive,
    /// Transfer attempted on a Locked-mode object
    TransferNotAllowed,
    /// Structural chain violation; unreachable through the public
    /// operations and checked defensively
    InvalidChainLink,
}

impl AbortKind {
    /// Returns the stable numeric code for this kind.
    ///
    /// Codes are part of the host-visible contract and never change
    /// meaning between releases.
    pub fn code(&self) -> u64 {
        match self {
            AbortKind::NotAuthorized => 1,
            AbortKind::PermissionDenied { .. } => 2,
            AbortKind::CapabilityRevoked => 3,
            AbortKind::LockedRecord => 4,
            AbortKind::LockedNotarization => 5,
            AbortKind::TimelockActive => 6,
            AbortKind::TransferNotAllowed => 7,
            AbortKind::InvalidChainLink => 8,
        }
    }
}

impl fmt::Display for AbortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortKind::NotAuthorized => write!(f, "NotAuthorized"),
            AbortKind::PermissionDenied { required } => {
                write!(f, "PermissionDenied (requires '{}')", required)
            }
            AbortKind::CapabilityRevoked => write!(f, "CapabilityRevoked"),
            AbortKind::LockedRecord => write!(f, "LockedRecord"),
            AbortKind::LockedNotarization => write!(f, "LockedNotarization"),
            AbortKind::TimelockActive => write!(f, "TimelockActive"),
            AbortKind::TransferNotAllowed => write!(f, "TransferNotAllowed"),
            AbortKind::InvalidChainLink => write!(f, "InvalidChainLink"),
        }
    }
}
