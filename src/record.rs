//! Chain-linked audit records.

use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::id::{Address, ObjectId};
use crate::payload::Payload;

/// One immutable entry in a trail's record chain.
///
/// A record is created by a trail's append operation and never mutated
/// afterwards; the only thing that can happen to it is deletion, when
/// the trail's locking policy permits. Each record points backwards at
/// its predecessor, so the chain can be reconstructed by walking
/// `previous_record_id` from the newest record to the first.
///
/// Sequence numbers are fixed historical markers: deleting a record
/// does not renumber the ones after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<D> {
    trail_id: ObjectId,
    stored_data: D,
    record_metadata: Option<String>,
    previous_record_id: Option<ObjectId>,
    sequence_number: u64,
    added_by: Address,
    added_at: Timestamp,
}

impl<D: Payload> Record<D> {
    /// Builds a record. Only a trail's append operation may do this.
    pub(crate) fn new(
        trail_id: ObjectId,
        stored_data: D,
        record_metadata: Option<String>,
        previous_record_id: Option<ObjectId>,
        sequence_number: u64,
        added_by: Address,
        added_at: Timestamp,
    ) -> Self {
        Self {
            trail_id,
            stored_data,
            record_metadata,
            previous_record_id,
            sequence_number,
            added_by,
            added_at,
        }
    }

    /// Returns the id of the trail this record belongs to.
    pub fn trail_id(&self) -> ObjectId {
        self.trail_id
    }

    /// Returns the caller-supplied payload.
    pub fn data(&self) -> &D {
        &self.stored_data
    }

    /// Returns the record's metadata, if any.
    pub fn metadata(&self) -> Option<&str> {
        self.record_metadata.as_deref()
    }

    /// Returns the id of the predecessor record.
    ///
    /// `None` only for the first record of a trail. The predecessor may
    /// have been deleted since; the id is kept regardless.
    pub fn previous_record_id(&self) -> Option<ObjectId> {
        self.previous_record_id
    }

    /// Returns this record's position in the chain, counted from 0.
    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    /// Returns the address that appended this record.
    pub fn added_by(&self) -> Address {
        self.added_by
    }

    /// Returns when this record was appended.
    pub fn added_at(&self) -> Timestamp {
        self.added_at
    }
}
