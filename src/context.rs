//! Per-transaction execution context.

use crate::id::{Address, ObjectId};

/// Context of a single host transaction.
///
/// The host runtime authenticates the transaction sender and seeds the
/// id allocator before invoking an entry operation. Object ids are
/// allocated from a monotonically increasing counter, so execution is
/// fully deterministic: the same transaction against the same state
/// always produces the same ids.
///
/// One context corresponds to one atomic transaction. Operations that
/// create objects take `&mut TxContext`; read-only checks take `&TxContext`.
///
/// # Examples
///
/// ```
/// use notary_core::{Address, TxContext};
///
/// let ctx = TxContext::new(Address::new([1; 32]), 0);
/// assert_eq!(ctx.sender(), Address::new([1; 32]));
/// ```
#[derive(Debug)]
pub struct TxContext {
    sender: Address,
    next_id: u64,
}

impl TxContext {
    /// Creates a context for a transaction signed by `sender`.
    ///
    /// `first_id` seeds the id allocator; the host guarantees it is
    /// beyond every id allocated by earlier transactions.
    pub fn new(sender: Address, first_id: u64) -> Self {
        Self {
            sender,
            next_id: first_id,
        }
    }

    /// Returns the authenticated sender of this transaction.
    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Allocates a fresh object id.
    ///
    /// Ids increase strictly within a context and are never handed out
    /// twice.
    pub(crate) fn fresh_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_id);
        self.next_id += 1;
        id
    }
}
