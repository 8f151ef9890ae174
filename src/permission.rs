//! Roles and the trail permission table.
//!
//! Access control is an explicit mapping from role name to a set of
//! enumerated permission kinds. Holding a kind in the table under a role
//! is the sole proof of the granted right; there is no inheritance and
//! no dynamic dispatch.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A privileged operation class on an audit trail.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PermissionKind {
    /// Append records to the trail
    Append,
    /// Delete records, subject to the trail's locking policy
    Delete,
    /// Replace the trail's updatable metadata
    UpdateMetadata,
    /// Grant and revoke capabilities (admin level)
    ManageCapabilities,
}

impl PermissionKind {
    /// Every permission kind, in canonical order.
    pub const ALL: [PermissionKind; 4] = [
        PermissionKind::Append,
        PermissionKind::Delete,
        PermissionKind::UpdateMetadata,
        PermissionKind::ManageCapabilities,
    ];
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionKind::Append => write!(f, "append"),
            PermissionKind::Delete => write!(f, "delete"),
            PermissionKind::UpdateMetadata => write!(f, "update_metadata"),
            PermissionKind::ManageCapabilities => write!(f, "manage_capabilities"),
        }
    }
}

/// A role name, e.g. `"creator"` or `"auditor"`.
///
/// Roles are plain identifiers; what a role may do is defined entirely
/// by the [`PermissionTable`] of the trail it is used on.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Role(String);

impl Role {
    /// Creates a role from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the role name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mapping from role to the set of permission kinds it holds.
///
/// The table is mutated only through a trail's grant operation;
/// lookups never allocate and never panic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTable {
    entries: BTreeMap<Role, BTreeSet<PermissionKind>>,
}

impl PermissionTable {
    /// Creates an empty table.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds `kinds` to the set held by `role`, creating the role entry
    /// if it does not exist yet. Kinds already present are unaffected.
    pub(crate) fn grant(
        &mut self,
        role: Role,
        kinds: impl IntoIterator<Item = PermissionKind>,
    ) {
        self.entries.entry(role).or_default().extend(kinds);
    }

    /// Returns whether `role` holds `kind`.
    ///
    /// Unknown roles hold nothing.
    pub fn allows(&self, role: &Role, kind: PermissionKind) -> bool {
        self.entries
            .get(role)
            .is_some_and(|kinds| kinds.contains(&kind))
    }

    /// Returns the kinds held by `role`, if the role is known.
    pub fn kinds(&self, role: &Role) -> Option<&BTreeSet<PermissionKind>> {
        self.entries.get(role)
    }

    /// Iterates over the known roles in canonical order.
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.entries.keys()
    }
}
