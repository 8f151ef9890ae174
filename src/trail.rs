//! The shared audit-trail object and its entry operations.
//!
//! An [`AuditTrail`] anchors a backward-linked chain of [`Record`]s, the
//! role permission table that gates writes, the registry of issued
//! capability handles, and the locking policy that gates deletions.
//! Every operation validates before it mutates: a returned [`Abort`]
//! guarantees the trail is unchanged.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::capability::TrailCap;
use crate::clock::{Clock, Timestamp};
use crate::context::TxContext;
use crate::error::{Abort, AbortKind};
use crate::id::{Address, ObjectId};
use crate::locking::LockingConfig;
use crate::payload::Payload;
use crate::permission::{PermissionKind, PermissionTable, Role};
use crate::record::Record;

/// Role installed for the trail creator, holding every permission kind.
pub const CREATOR_ROLE: &str = "creator";

/// Immutable name and description of a trail, set once at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailMetadata {
    name: Option<String>,
    description: Option<String>,
}

impl TrailMetadata {
    /// Creates trail metadata.
    pub fn new(
        name: Option<impl Into<String>>,
        description: Option<impl Into<String>>,
    ) -> Self {
        Self {
            name: name.map(Into::into),
            description: description.map(Into::into),
        }
    }

    /// Returns the trail name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the trail description, if set.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A shared, append-only record chain with role-based access control.
///
/// Records live in an arena keyed by object id; `head` tracks the most
/// recently appended record's id and each record points backwards at its
/// predecessor. `record_count` counts appends and never decreases;
/// deleting a record leaves a gap in the chain and a hole in the arena,
/// nothing else.
///
/// The host runtime serializes operations per object; the `&mut self`
/// receiver on every mutating operation is this crate's rendition of
/// that exclusive access.
///
/// # Examples
///
/// ```
/// use notary_core::{
///     Address, AuditTrail, Clock, LockingConfig, TrailMetadata, TxContext,
/// };
///
/// let mut ctx = TxContext::new(Address::new([1; 32]), 0);
/// let clock = Clock::from_secs(1_000);
///
/// let (mut trail, admin_cap) = AuditTrail::create(
///     LockingConfig::new(Some(3_600), None),
///     TrailMetadata::new(Some("deployments"), None::<String>),
///     &clock,
///     &mut ctx,
/// );
///
/// let first = trail
///     .append(&admin_cap, "release v1".to_string(), None, &clock, &mut ctx)
///     .unwrap();
/// let second = trail
///     .append(&admin_cap, "release v2".to_string(), None, &clock, &mut ctx)
///     .unwrap();
///
/// assert_eq!(trail.record_count(), 2);
/// assert_eq!(
///     trail.record(second).unwrap().previous_record_id(),
///     Some(first)
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditTrail<D> {
    id: ObjectId,
    locking_config: LockingConfig,
    permissions: PermissionTable,
    immutable_metadata: TrailMetadata,
    updatable_metadata: Option<String>,
    issued_capabilities: BTreeSet<ObjectId>,
    creator: Address,
    created_at: Timestamp,
    record_count: u64,
    records: BTreeMap<ObjectId, Record<D>>,
    head: Option<ObjectId>,
}

impl<D: Payload> AuditTrail<D> {
    /// Creates a trail and mints the root capability for it.
    ///
    /// The creator role is installed with the full permission set and
    /// the returned handle acts under it; without this bootstrap no
    /// admin proof could ever exist. `record_count` starts at zero and
    /// `creator`/`created_at` are fixed forever.
    pub fn create(
        locking_config: LockingConfig,
        immutable_metadata: TrailMetadata,
        clock: &Clock,
        ctx: &mut TxContext,
    ) -> (Self, TrailCap) {
        let id = ctx.fresh_id();
        let cap_id = ctx.fresh_id();

        let mut permissions = PermissionTable::new();
        permissions.grant(Role::new(CREATOR_ROLE), PermissionKind::ALL);

        let mut issued_capabilities = BTreeSet::new();
        issued_capabilities.insert(cap_id);

        let trail = Self {
            id,
            locking_config,
            permissions,
            immutable_metadata,
            updatable_metadata: None,
            issued_capabilities,
            creator: ctx.sender(),
            created_at: clock.now(),
            record_count: 0,
            records: BTreeMap::new(),
            head: None,
        };
        let cap = TrailCap::mint(cap_id, id, Role::new(CREATOR_ROLE));

        tracing::debug!(
            trail_id = %id,
            creator = %trail.creator,
            policy = %trail.locking_config,
            "audit trail created"
        );

        (trail, cap)
    }

    // ========================================================================
    // Capability management
    // ========================================================================

    /// Grants `kinds` to `role` and mints a fresh capability handle
    /// acting under that role.
    ///
    /// # Errors
    ///
    /// Aborts with `NotAuthorized` unless `admin` is a valid handle for
    /// this trail whose role holds `manage_capabilities`, or with
    /// `CapabilityRevoked` if `admin` was revoked.
    pub fn grant(
        &mut self,
        admin: &TrailCap,
        role: Role,
        kinds: &[PermissionKind],
        ctx: &mut TxContext,
    ) -> Result<TrailCap, Abort> {
        self.authorize_admin(admin)?;

        let cap_id = ctx.fresh_id();
        self.permissions.grant(role.clone(), kinds.iter().copied());
        self.issued_capabilities.insert(cap_id);

        tracing::debug!(
            trail_id = %self.id,
            capability_id = %cap_id,
            role = %role,
            "capability granted"
        );

        Ok(TrailCap::mint(cap_id, self.id, role))
    }

    /// Revokes the capability handle with id `capability_id`.
    ///
    /// Revocation is permanent: every later operation presenting the
    /// handle aborts with `CapabilityRevoked`. Revocation and use cannot
    /// race: each operation is one atomic invocation, so the host's
    /// serialization totally orders a revoke against any use.
    ///
    /// # Errors
    ///
    /// Aborts with `NotAuthorized`/`CapabilityRevoked` for a bad admin
    /// proof, and with `CapabilityRevoked` if `capability_id` is unknown
    /// or already revoked.
    pub fn revoke(&mut self, admin: &TrailCap, capability_id: ObjectId) -> Result<(), Abort> {
        self.authorize_admin(admin)?;

        if !self.issued_capabilities.remove(&capability_id) {
            return Err(Abort::new(
                AbortKind::CapabilityRevoked,
                format!("capability {} is unknown or already revoked", capability_id),
            ));
        }

        tracing::debug!(
            trail_id = %self.id,
            capability_id = %capability_id,
            "capability revoked"
        );
        Ok(())
    }

    /// Returns whether the handle with id `capability_id` is currently
    /// issued (minted and not revoked).
    pub fn capability_issued(&self, capability_id: ObjectId) -> bool {
        self.issued_capabilities.contains(&capability_id)
    }

    // ========================================================================
    // Record operations
    // ========================================================================

    /// Appends a record carrying `data` and returns its id.
    ///
    /// The new record links back to the current head, takes
    /// `sequence_number = record_count`, and advances both the head and
    /// the count. Append never fails on chain-structure grounds, only on
    /// authorization.
    ///
    /// # Errors
    ///
    /// Aborts with `NotAuthorized`/`CapabilityRevoked` for a bad handle,
    /// `PermissionDenied` if the handle's role lacks `append`, and
    /// `InvalidChainLink` if a fresh id collides with an existing record
    /// (unreachable with a host-seeded context).
    pub fn append(
        &mut self,
        cap: &TrailCap,
        data: D,
        metadata: Option<String>,
        clock: &Clock,
        ctx: &mut TxContext,
    ) -> Result<ObjectId, Abort> {
        self.authorize(cap, PermissionKind::Append)?;

        let record_id = ctx.fresh_id();
        if self.records.contains_key(&record_id) {
            return Err(Abort::new(
                AbortKind::InvalidChainLink,
                format!("fresh id {} collides with an existing record", record_id),
            ));
        }

        let sequence_number = self.record_count;
        let record = Record::new(
            self.id,
            data,
            metadata,
            self.head,
            sequence_number,
            ctx.sender(),
            clock.now(),
        );

        self.records.insert(record_id, record);
        self.head = Some(record_id);
        self.record_count += 1;

        tracing::debug!(
            trail_id = %self.id,
            record_id = %record_id,
            sequence = sequence_number,
            "record appended"
        );

        Ok(record_id)
    }

    /// Deletes the record with id `record_id`, if the locking policy
    /// permits.
    ///
    /// Deletion removes the record from the arena and nothing else:
    /// sequence numbers are not renumbered, `record_count` and `head`
    /// are untouched, and later records keep their now-dangling
    /// `previous_record_id`. Readers of the chain must tolerate gaps.
    ///
    /// # Errors
    ///
    /// Aborts with `NotAuthorized`/`CapabilityRevoked`/`PermissionDenied`
    /// for authorization failures, `InvalidChainLink` if the record does
    /// not exist in this trail, and `LockedRecord` if the policy's
    /// windows have not yet been satisfied. Permission alone never
    /// overrides the policy.
    pub fn delete(
        &mut self,
        cap: &TrailCap,
        record_id: ObjectId,
        clock: &Clock,
    ) -> Result<(), Abort> {
        self.authorize(cap, PermissionKind::Delete)?;

        let record = self.records.get(&record_id).ok_or_else(|| {
            Abort::new(
                AbortKind::InvalidChainLink,
                format!("record {} does not exist in this trail", record_id),
            )
        })?;

        let permitted = self.locking_config.permits_delete(
            clock.now(),
            record.added_at(),
            self.record_count,
            record.sequence_number(),
        );
        if !permitted {
            tracing::warn!(
                trail_id = %self.id,
                record_id = %record_id,
                policy = %self.locking_config,
                "record deletion denied by locking policy"
            );
            return Err(Abort::new(
                AbortKind::LockedRecord,
                format!("record {} is still locked ({})", record_id, self.locking_config),
            ));
        }

        self.records.remove(&record_id);

        tracing::debug!(
            trail_id = %self.id,
            record_id = %record_id,
            "record deleted"
        );
        Ok(())
    }

    /// Replaces the trail's updatable metadata.
    ///
    /// Immutable metadata, the locking policy, and every other field are
    /// never touched by this operation.
    ///
    /// # Errors
    ///
    /// Aborts with `NotAuthorized`/`CapabilityRevoked`/`PermissionDenied`
    /// unless the handle's role holds `update_metadata`.
    pub fn update_metadata(
        &mut self,
        cap: &TrailCap,
        new_value: Option<String>,
    ) -> Result<(), Abort> {
        self.authorize(cap, PermissionKind::UpdateMetadata)?;
        self.updatable_metadata = new_value;
        Ok(())
    }

    // ========================================================================
    // Authorization
    // ========================================================================

    /// Validates a capability handle against this trail for `required`.
    ///
    /// Check order is fixed: wrong trail, then revocation, then the
    /// permission table.
    fn authorize(&self, cap: &TrailCap, required: PermissionKind) -> Result<(), Abort> {
        if cap.trail_id() != self.id {
            return Err(Abort::new(
                AbortKind::NotAuthorized,
                format!("capability {} was issued for trail {}", cap.id(), cap.trail_id()),
            ));
        }
        if !self.issued_capabilities.contains(&cap.id()) {
            return Err(Abort::new(
                AbortKind::CapabilityRevoked,
                format!("capability {} has been revoked", cap.id()),
            ));
        }
        if !self.permissions.allows(cap.role(), required) {
            tracing::warn!(
                trail_id = %self.id,
                capability_id = %cap.id(),
                role = %cap.role(),
                required = %required,
                "operation denied"
            );
            return Err(Abort::new(
                AbortKind::PermissionDenied { required },
                format!("role '{}' lacks the '{}' permission", cap.role(), required),
            ));
        }
        Ok(())
    }

    /// Validates an admin-level proof: a valid handle whose role holds
    /// `manage_capabilities`. A missing kind is `NotAuthorized` here,
    /// not `PermissionDenied`, because managing capabilities is an admin right,
    /// not a granted operation.
    fn authorize_admin(&self, cap: &TrailCap) -> Result<(), Abort> {
        match self.authorize(cap, PermissionKind::ManageCapabilities) {
            Err(abort) if matches!(abort.kind, AbortKind::PermissionDenied { .. }) => {
                Err(Abort::new(AbortKind::NotAuthorized, abort.message))
            }
            other => other,
        }
    }

    // ========================================================================
    // Read accessors
    // ========================================================================

    /// Returns this trail's object id.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns the deletion-lock policy.
    pub fn locking_config(&self) -> &LockingConfig {
        &self.locking_config
    }

    /// Returns the role permission table.
    pub fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }

    /// Returns the immutable metadata set at creation.
    pub fn immutable_metadata(&self) -> &TrailMetadata {
        &self.immutable_metadata
    }

    /// Returns the updatable metadata, if set.
    pub fn updatable_metadata(&self) -> Option<&str> {
        self.updatable_metadata.as_deref()
    }

    /// Returns the address that created the trail.
    pub fn creator(&self) -> Address {
        self.creator
    }

    /// Returns when the trail was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns the total number of appends. Never decreases.
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Returns the id of the most recently appended record.
    ///
    /// The head id is kept even if that record has since been deleted.
    pub fn head(&self) -> Option<ObjectId> {
        self.head
    }

    /// Looks up a surviving record by id.
    pub fn record(&self, record_id: ObjectId) -> Option<&Record<D>> {
        self.records.get(&record_id)
    }

    /// Walks the chain backwards from the newest surviving record.
    ///
    /// The walk follows `previous_record_id` links and ends at the first
    /// record or at a deleted gap; it can never cycle, because sequence
    /// numbers strictly decrease along the links.
    pub fn walk_chain(&self) -> ChainWalk<'_, D> {
        ChainWalk {
            records: &self.records,
            next: self.head,
        }
    }
}

/// Iterator over a trail's chain, newest first. See
/// [`AuditTrail::walk_chain`].
#[derive(Debug)]
pub struct ChainWalk<'a, D> {
    records: &'a BTreeMap<ObjectId, Record<D>>,
    next: Option<ObjectId>,
}

impl<'a, D: Payload> Iterator for ChainWalk<'a, D> {
    type Item = &'a Record<D>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        match self.records.get(&id) {
            Some(record) => {
                self.next = record.previous_record_id();
                Some(record)
            }
            // A deleted record is a gap; the walk stops there.
            None => None,
        }
    }
}
