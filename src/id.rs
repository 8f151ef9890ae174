//! Object and caller identifiers.
//!
//! Every on-ledger object (trail, record, capability, notarization) is
//! addressed by an [`ObjectId`] allocated from the transaction context.
//! Callers and owners are identified by an [`Address`] supplied by the
//! host runtime alongside each transaction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a ledger object.
///
/// Ids are opaque to callers: they are allocated deterministically by
/// [`TxContext::fresh_id`](crate::TxContext) and are never reused within
/// a context. Two objects compare equal only if they are the same object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Creates an id from a raw value.
    ///
    /// This is `pub(crate)` so ids can only originate from the
    /// transaction context's allocator.
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value of this id.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A 32-byte caller or owner identity.
///
/// Addresses are opaque: the host runtime authenticates the transaction
/// sender and hands the address in; this crate only compares them.
///
/// # Examples
///
/// ```
/// use notary_core::Address;
///
/// let alice = Address::new([1; 32]);
/// let bob = Address::new([2; 32]);
/// assert_ne!(alice, bob);
/// assert!(alice.to_string().starts_with("0x0101"));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Address([u8; 32]);

impl Address {
    /// Creates an address from its raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of this address.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
