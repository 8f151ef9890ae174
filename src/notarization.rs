//! Notarized state objects.
//!
//! A [`Notarization`] holds a versioned data payload whose mutability is
//! fixed at creation by its [`LockMode`]: `Locked` objects are permanent
//! except for a timelock-gated destroy, `Dynamic` objects support
//! repeated updates and transfer until destroyed. As everywhere in this
//! crate, every transition validates before it mutates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, Timestamp};
use crate::context::TxContext;
use crate::error::{Abort, AbortKind};
use crate::id::{Address, ObjectId};
use crate::payload::Payload;

/// Mutability classification of a notarization, permanent from creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockMode {
    /// State and ownership are fixed; only a timelock-gated destroy
    /// remains legal
    Locked,
    /// State may be updated repeatedly and the object transferred,
    /// until destroyed
    Dynamic,
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockMode::Locked => write!(f, "locked"),
            LockMode::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// A condition gating updates and destruction, compared against the
/// host-supplied clock and the object's version. Data, not a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timelock {
    /// No timelock
    None,
    /// Active until the host clock reaches the timestamp
    UntilTimestamp(Timestamp),
    /// Active until the object's version reaches the threshold
    UntilVersion(u64),
}

impl Timelock {
    /// Returns whether the timelock is still active at `now` for an
    /// object at `version`.
    ///
    /// `UntilTimestamp(t)` is active while `now < t`; `UntilVersion(n)`
    /// is active while `version < n`. Note a `Locked` object's version
    /// can never grow, so a version timelock on one never expires.
    pub fn is_active(&self, now: Timestamp, version: u64) -> bool {
        match self {
            Timelock::None => false,
            Timelock::UntilTimestamp(until) => now < *until,
            Timelock::UntilVersion(threshold) => version < *threshold,
        }
    }
}

impl fmt::Display for Timelock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timelock::None => write!(f, "none"),
            Timelock::UntilTimestamp(until) => write!(f, "until {}", until),
            Timelock::UntilVersion(threshold) => write!(f, "until version {}", threshold),
        }
    }
}

/// Immutable name and description of a notarization, set once at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotarizationMetadata {
    name: Option<String>,
    description: Option<String>,
}

impl NotarizationMetadata {
    /// Creates notarization metadata.
    pub fn new(
        name: Option<impl Into<String>>,
        description: Option<impl Into<String>>,
    ) -> Self {
        Self {
            name: name.map(Into::into),
            description: description.map(Into::into),
        }
    }

    /// Returns the name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the description, if set.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// The notarized payload together with its optional state metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotarizationState<D> {
    data: D,
    metadata: Option<String>,
}

impl<D: Payload> NotarizationState<D> {
    /// Creates a state from a payload and optional metadata.
    pub fn new(data: D, metadata: Option<impl Into<String>>) -> Self {
        Self {
            data,
            metadata: metadata.map(Into::into),
        }
    }

    /// Returns the payload.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Returns the state metadata, if set.
    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }
}

/// A shared, versioned state container with a permanent lock mode and an
/// optional timelock.
///
/// # Examples
///
/// ```
/// use notary_core::{
///     Address, Clock, LockMode, Notarization, NotarizationMetadata,
///     NotarizationState, Timelock, TxContext,
/// };
///
/// let mut ctx = TxContext::new(Address::new([1; 32]), 0);
/// let clock = Clock::from_secs(100);
///
/// let mut notarization = Notarization::create(
///     NotarizationState::new("document-hash-v1".to_string(), None::<String>),
///     NotarizationMetadata::new(Some("contract"), None::<String>),
///     None,
///     Timelock::None,
///     LockMode::Dynamic,
///     &clock,
///     &mut ctx,
/// );
///
/// let version = notarization
///     .update_state(
///         NotarizationState::new("document-hash-v2".to_string(), None::<String>),
///         &clock,
///         &ctx,
///     )
///     .unwrap();
/// assert_eq!(version, 1);
///
/// let payload = notarization.destroy(&clock, &ctx).unwrap();
/// assert_eq!(payload, "document-hash-v2");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notarization<D> {
    id: ObjectId,
    state: NotarizationState<D>,
    immutable_metadata: NotarizationMetadata,
    updatable_metadata: Option<String>,
    lock_mode: LockMode,
    timelock: Timelock,
    version: u64,
    owner: Address,
    created_at: Timestamp,
}

impl<D: Payload> Notarization<D> {
    /// Creates a notarization in either mode, owned by the transaction
    /// sender, at version 0.
    pub fn create(
        state: NotarizationState<D>,
        immutable_metadata: NotarizationMetadata,
        updatable_metadata: Option<String>,
        timelock: Timelock,
        lock_mode: LockMode,
        clock: &Clock,
        ctx: &mut TxContext,
    ) -> Self {
        let id = ctx.fresh_id();
        let notarization = Self {
            id,
            state,
            immutable_metadata,
            updatable_metadata,
            lock_mode,
            timelock,
            version: 0,
            owner: ctx.sender(),
            created_at: clock.now(),
        };

        tracing::debug!(
            notarization_id = %id,
            owner = %notarization.owner,
            mode = %lock_mode,
            timelock = %timelock,
            "notarization created"
        );

        notarization
    }

    /// Replaces the state payload and increments the version, returning
    /// the new version.
    ///
    /// Immutable metadata is untouched by updates, always.
    ///
    /// # Errors
    ///
    /// Aborts with `NotAuthorized` unless the sender owns the object,
    /// `LockedNotarization` in `Locked` mode, and `TimelockActive` while
    /// an update-blocking timelock has not expired.
    pub fn update_state(
        &mut self,
        new_state: NotarizationState<D>,
        clock: &Clock,
        ctx: &TxContext,
    ) -> Result<u64, Abort> {
        self.ensure_owner(ctx)?;
        if self.lock_mode == LockMode::Locked {
            return Err(Abort::new(
                AbortKind::LockedNotarization,
                format!("notarization {} is locked", self.id),
            ));
        }
        if self.timelock.is_active(clock.now(), self.version) {
            return Err(Abort::new(
                AbortKind::TimelockActive,
                format!("timelock ({}) has not expired", self.timelock),
            ));
        }

        self.state = new_state;
        self.version += 1;

        tracing::debug!(
            notarization_id = %self.id,
            version = self.version,
            "notarization state updated"
        );
        Ok(self.version)
    }

    /// Replaces the updatable metadata.
    ///
    /// Legal in both modes; only the dedicated updatable field is ever
    /// touched, never the immutable metadata or the state payload.
    ///
    /// # Errors
    ///
    /// Aborts with `NotAuthorized` unless the sender owns the object.
    pub fn update_metadata(
        &mut self,
        new_value: Option<String>,
        ctx: &TxContext,
    ) -> Result<(), Abort> {
        self.ensure_owner(ctx)?;
        self.updatable_metadata = new_value;
        Ok(())
    }

    /// Reassigns ownership to `new_owner`.
    ///
    /// # Errors
    ///
    /// Aborts with `NotAuthorized` unless the sender owns the object,
    /// and with `TransferNotAllowed` in `Locked` mode.
    pub fn transfer(&mut self, new_owner: Address, ctx: &TxContext) -> Result<(), Abort> {
        self.ensure_owner(ctx)?;
        if self.lock_mode == LockMode::Locked {
            return Err(Abort::new(
                AbortKind::TransferNotAllowed,
                format!("notarization {} is locked and cannot be transferred", self.id),
            ));
        }

        tracing::debug!(
            notarization_id = %self.id,
            new_owner = %new_owner,
            "notarization transferred"
        );
        self.owner = new_owner;
        Ok(())
    }

    /// Destroys the object and returns its payload.
    ///
    /// `Dynamic` objects may be destroyed at any time by their owner;
    /// `Locked` objects only once their timelock (if any) has expired.
    /// Destruction is terminal: the object is consumed and cannot be
    /// referenced again. On failure the untouched object is handed back
    /// alongside the abort.
    ///
    /// # Errors
    ///
    /// `NotAuthorized` for a non-owner, `TimelockActive` for a `Locked`
    /// object whose timelock has not expired.
    pub fn destroy(self, clock: &Clock, ctx: &TxContext) -> Result<D, (Abort, Self)> {
        if let Err(abort) = self.ensure_owner(ctx) {
            return Err((abort, self));
        }
        if self.lock_mode == LockMode::Locked
            && self.timelock.is_active(clock.now(), self.version)
        {
            let abort = Abort::new(
                AbortKind::TimelockActive,
                format!("timelock ({}) has not expired", self.timelock),
            );
            return Err((abort, self));
        }

        tracing::debug!(
            notarization_id = %self.id,
            mode = %self.lock_mode,
            "notarization destroyed"
        );
        Ok(self.state.data)
    }

    fn ensure_owner(&self, ctx: &TxContext) -> Result<(), Abort> {
        if ctx.sender() != self.owner {
            return Err(Abort::new(
                AbortKind::NotAuthorized,
                format!("sender does not own notarization {}", self.id),
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Read accessors
    // ========================================================================

    /// Returns this notarization's object id.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns the current state.
    pub fn state(&self) -> &NotarizationState<D> {
        &self.state
    }

    /// Returns the immutable metadata set at creation.
    pub fn immutable_metadata(&self) -> &NotarizationMetadata {
        &self.immutable_metadata
    }

    /// Returns the updatable metadata, if set.
    pub fn updatable_metadata(&self) -> Option<&str> {
        self.updatable_metadata.as_deref()
    }

    /// Returns the lock mode fixed at creation.
    pub fn lock_mode(&self) -> LockMode {
        self.lock_mode
    }

    /// Returns the configured timelock.
    pub fn timelock(&self) -> Timelock {
        self.timelock
    }

    /// Returns the number of successful state updates.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the current owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Returns when the object was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
