use std::fmt;

use serde::Serialize;

use crate::id::ObjectId;
use crate::permission::Role;

/// Capability handle proving a caller may act on a trail under a role.
///
/// A `TrailCap` is minted only by a trail's create and grant operations,
/// never constructed by a caller: the private field prevents struct-literal
/// construction outside this crate, and the type deliberately implements
/// `Serialize` but not `Deserialize` (decoding one would mint it).
///
/// The handle is an owned value. Transferring it to another caller is
/// moving it; there is no way to duplicate one. A handle stays usable
/// until the issuing trail revokes its id.
///
/// ```compile_fail
/// # use notary_core::TrailCap;
/// // This does not compile - TrailCap cannot be constructed publicly:
/// let cap = TrailCap { _private: () }; // Error: fields are private
/// ```
#[derive(Debug, Serialize)]
pub struct TrailCap {
    id: ObjectId,
    trail_id: ObjectId,
    role: Role,
    // Private field prevents construction outside the crate
    #[serde(skip)]
    _private: (),
}

impl TrailCap {
    /// Mints a capability handle.
    ///
    /// This is `pub(crate)` so handles can only originate from a trail's
    /// create and grant operations.
    pub(crate) fn mint(id: ObjectId, trail_id: ObjectId, role: Role) -> Self {
        Self {
            id,
            trail_id,
            role,
            _private: (),
        }
    }

    /// Returns the id of this handle, as registered with the trail.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns the id of the trail this handle was issued for.
    pub fn trail_id(&self) -> ObjectId {
        self.trail_id
    }

    /// Returns the role this handle acts under.
    pub fn role(&self) -> &Role {
        &self.role
    }
}

impl fmt::Display for TrailCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrailCap[id={}, trail={}, role={}]",
            self.id, self.trail_id, self.role
        )
    }
}
