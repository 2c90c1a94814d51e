//! Group identity tagging for the consistency checker.
//!
//! The statement algebra is generic over a single concrete group `G:
//! Group + GroupEncoding`, so in the common case every generator a caller
//! allocates already lives in the same group by construction. [`GroupId`]
//! exists for the less common case a statement needs to assert that two
//! generators of the *same Rust type* are nonetheless meant to denote
//! logically distinct groups (e.g. independent generator systems that must
//! never share a secret) — the scenario exercised by the consistency
//! checker in `composition.rs`.

use group::Group;
use std::any::TypeId;

/// Identifies the logical group a [`Generator`] belongs to.
///
/// Two generators of the same concrete type `G` are [`GroupId::Canonical`]
/// by default and therefore compare equal. A generator built with
/// [`Generator::tagged`] instead carries a [`GroupId::Named`] tag, which
/// only compares equal to another generator tagged with the same name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupId {
    Canonical(TypeId),
    Named(&'static str),
}

/// A group element paired with the [`GroupId`] it is asserted to belong to.
#[derive(Clone, Copy, Debug)]
pub struct Generator<G> {
    pub point: G,
    pub group: GroupId,
}

impl<G: Group + 'static> From<G> for Generator<G> {
    fn from(point: G) -> Self {
        Generator {
            point,
            group: GroupId::Canonical(TypeId::of::<G>()),
        }
    }
}

impl<G: Group + 'static> Generator<G> {
    /// Wraps `point` with an explicit, named group tag, overriding the
    /// default canonical tag derived from `G`'s type.
    ///
    /// Two generators tagged with different names are treated as
    /// belonging to different groups by the consistency checker, even if
    /// both are instances of the same concrete `G`.
    pub fn tagged(point: G, group: &'static str) -> Self {
        Generator {
            point,
            group: GroupId::Named(group),
        }
    }
}
