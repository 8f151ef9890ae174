//! Tamper-evidence primitives: audit-trail record chains and notarized
//! state objects.
//!
//! This crate implements the deterministic state-transition core of two
//! ledger object families:
//!
//! - [`AuditTrail`]: an append-only, backward-linked record chain with
//!   role-based write/delete control and time/count-based deletion locks
//! - [`Notarization`]: a versioned state container whose mutability is
//!   fixed at creation as Locked or Dynamic, with an optional timelock
//!
//! The host runtime supplies everything else: transaction ordering,
//! persistence, caller authentication, and the clock. Each operation is
//! one atomic invocation: every check runs before the first write, so a
//! returned [`Abort`] guarantees the object is unchanged, and the host
//! can surface the abort's stable numeric code and revert.
//!
//! # Core Types
//!
//! - [`AuditTrail`]: shared trail object holding the chain, permissions,
//!   and locking policy
//! - [`Record`]: one immutable, chain-linked entry
//! - [`TrailCap`]: unforgeable capability handle proving a role on a trail
//! - [`LockingConfig`]: when records become eligible for deletion
//! - [`Notarization`]: Locked/Dynamic versioned state object
//! - [`TxContext`] / [`Clock`]: the host boundary of caller identity,
//!   deterministic id allocation, and trusted time
//!
//! # Examples
//!
//! ```
//! use notary_core::{
//!     Address, AuditTrail, Clock, LockingConfig, PermissionKind, Role,
//!     TrailMetadata, TxContext,
//! };
//!
//! let mut ctx = TxContext::new(Address::new([1; 32]), 0);
//! let clock = Clock::from_secs(1_000);
//!
//! // Creating a trail mints the root capability.
//! let (mut trail, admin_cap) = AuditTrail::create(
//!     LockingConfig::new(Some(3_600), None),
//!     TrailMetadata::new(Some("deployments"), None::<String>),
//!     &clock,
//!     &mut ctx,
//! );
//!
//! // Delegate append rights to an auditor role.
//! let auditor_cap = trail
//!     .grant(
//!         &admin_cap,
//!         Role::new("auditor"),
//!         &[PermissionKind::Append],
//!         &mut ctx,
//!     )
//!     .unwrap();
//!
//! let first = trail
//!     .append(&auditor_cap, "release v1".to_string(), None, &clock, &mut ctx)
//!     .unwrap();
//! let second = trail
//!     .append(&auditor_cap, "release v2".to_string(), None, &clock, &mut ctx)
//!     .unwrap();
//!
//! assert_eq!(trail.record_count(), 2);
//! assert_eq!(
//!     trail.record(second).unwrap().previous_record_id(),
//!     Some(first)
//! );
//!
//! // Records are locked for an hour; deleting immediately is refused.
//! assert!(trail.delete(&admin_cap, first, &clock).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod capability;
mod clock;
mod context;
mod error;
mod id;
mod locking;
mod notarization;
mod payload;
mod permission;
mod record;
mod trail;

pub use capability::TrailCap;
pub use clock::{Clock, Timestamp};
pub use context::TxContext;
pub use error::{Abort, AbortKind};
pub use id::{Address, ObjectId};
pub use locking::LockingConfig;
pub use notarization::{
    LockMode, Notarization, NotarizationMetadata, NotarizationState, Timelock,
};
pub use payload::Payload;
pub use permission::{PermissionKind, PermissionTable, Role};
pub use record::Record;
pub use trail::{AuditTrail, ChainWalk, TrailMetadata, CREATOR_ROLE};
