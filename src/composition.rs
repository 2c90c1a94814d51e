//! `And`/`Or` composition of statements, and the consistency checker that
//! every composition runs at construction time.

use group::{Group, GroupEncoding};
use std::collections::HashMap;

use crate::errors::Error;
use crate::group::GroupId;
use crate::statement::{Relation, Statement};

/// Checks that, for every secret name appearing in `names`, all of its
/// occurrences (by position) in `tags` agree on the same [`GroupId`].
///
/// This is the group-coherence invariant: a secret shared across two
/// conjuncts (or an Or-branch and its surrounding context) must be
/// multiplied by generators of a single group in both places.
pub fn check_consistency(names: &[String], tags: &[GroupId]) -> Result<(), Error> {
    debug_assert_eq!(names.len(), tags.len());
    let mut seen: HashMap<&str, GroupId> = HashMap::new();
    for (name, tag) in names.iter().zip(tags) {
        match seen.get(name.as_str()) {
            Some(existing) if existing != tag => {
                return Err(Error::MalformedStatement(format!(
                    "shared secret `{name}` has generators from different groups"
                )))
            }
            _ => {
                seen.insert(name, *tag);
            }
        }
    }
    Ok(())
}

/// All children are satisfied by the same challenge; shared secret names
/// across children denote the same witness value and the same randomizer.
#[derive(Clone, Debug)]
pub struct AndProof<G: Group + GroupEncoding> {
    pub children: Vec<Statement<G>>,
}

impl<G: Group + GroupEncoding> AndProof<G> {
    pub fn new(children: Vec<Statement<G>>) -> Result<Self, Error> {
        let names: Vec<String> = children.iter().flat_map(Relation::secret_names).collect();
        let tags: Vec<GroupId> = children.iter().flat_map(Relation::group_tags).collect();
        check_consistency(&names, &tags)?;
        Ok(Self { children })
    }
}

/// Exactly one child is really proved; the others are simulated. A whole
/// `OrProof` with no real branch at all (every child simulated) is built
/// via [`crate::statement::Statement::get_simulator`] +
/// [`crate::prover::Prover::simulate_proof`], not by marking this struct
/// itself — see `DESIGN.md` §E.
#[derive(Clone, Debug)]
pub struct OrProof<G: Group + GroupEncoding> {
    pub children: Vec<Statement<G>>,
}

impl<G: Group + GroupEncoding> OrProof<G> {
    pub fn new(children: Vec<Statement<G>>) -> Result<Self, Error> {
        let names: Vec<String> = children.iter().flat_map(Relation::secret_names).collect();
        let tags: Vec<GroupId> = children.iter().flat_map(Relation::group_tags).collect();
        check_consistency(&names, &tags)?;
        Ok(Self { children })
    }

    /// Index of the first child for which `secrets` supplies every
    /// witness value it needs — the deterministic tie-break the spec
    /// calls for when more than one child is provable.
    pub(crate) fn real_branch(&self, secrets: &HashMap<String, G::Scalar>) -> Option<usize> {
        self.children
            .iter()
            .position(|child| child.has_witness(secrets))
    }
}
