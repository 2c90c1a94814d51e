//! The statement algebra's top-level tagged sum, and the canonical
//! identity digest used to compare independently built statement trees.

use core::ops::{BitAnd, BitOr};
use group::{Group, GroupEncoding};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::composition::{AndProof, OrProof};
use crate::dlrep::DLRep;
use crate::group::GroupId;
use crate::range_proof::PowerTwoRangeProof;

/// Any node of a statement tree exposes the secret names and group tags
/// its leaves use, so the consistency checker can be run uniformly at
/// every level of composition.
pub trait Relation<G: Group + GroupEncoding> {
    fn secret_names(&self) -> Vec<String>;
    fn group_tags(&self) -> Vec<GroupId>;
    fn has_witness(&self, secrets: &HashMap<String, G::Scalar>) -> bool;
}

/// A proof statement: an atomic discrete-logarithm relation, an `And`/`Or`
/// composition of statements, or an extended (precommitting) statement.
#[derive(Clone, Debug)]
pub enum Statement<G: Group + GroupEncoding> {
    DLRep(DLRep<G>),
    And(AndProof<G>),
    Or(OrProof<G>),
    Range(Box<PowerTwoRangeProof<G>>),
}

impl<G: Group + GroupEncoding> Relation<G> for Statement<G> {
    fn secret_names(&self) -> Vec<String> {
        match self {
            Statement::DLRep(d) => d.secret_names(),
            Statement::And(a) => a.children.iter().flat_map(Relation::secret_names).collect(),
            Statement::Or(o) => o.children.iter().flat_map(Relation::secret_names).collect(),
            Statement::Range(r) => vec![r.value.name().to_string(), r.randomizer.name().to_string()],
        }
    }

    fn group_tags(&self) -> Vec<GroupId> {
        match self {
            Statement::DLRep(d) => d.group_tags(),
            Statement::And(a) => a.children.iter().flat_map(Relation::group_tags).collect(),
            Statement::Or(o) => o.children.iter().flat_map(Relation::group_tags).collect(),
            Statement::Range(r) => vec![r.g.group, r.h.group],
        }
    }

    fn has_witness(&self, secrets: &HashMap<String, G::Scalar>) -> bool {
        match self {
            Statement::DLRep(d) => d.has_witness(secrets),
            Statement::And(a) => a.children.iter().all(|c| c.has_witness(secrets)),
            Statement::Or(o) => o.children.iter().any(|c| c.has_witness(secrets)),
            Statement::Range(r) => {
                (secrets.contains_key(r.value.name()) || r.value.value().is_some())
                    && (secrets.contains_key(r.randomizer.name()) || r.randomizer.value().is_some())
            }
        }
    }
}

impl<G: Group + GroupEncoding> BitAnd for Statement<G> {
    type Output = Statement<G>;

    /// `a & b` — builds (or extends) an [`AndProof`], flattening nested
    /// `And`s so that `a & b & c` and `AndProof::new(vec![a, b, c])`
    /// produce the identical tree (and therefore identical
    /// [`Statement::proof_id`]).
    ///
    /// # Panics
    /// Panics if the combined statement fails the consistency checker —
    /// construction errors are raised eagerly, matching
    /// [`crate::group::Generator`]'s own panic-on-conflict contract.
    fn bitand(self, rhs: Statement<G>) -> Statement<G> {
        let mut children = match self {
            Statement::And(and) => and.children,
            other => vec![other],
        };
        match rhs {
            Statement::And(and) => children.extend(and.children),
            other => children.push(other),
        }
        Statement::And(AndProof::new(children).expect("malformed statement in `&` composition"))
    }
}

impl<G: Group + GroupEncoding> BitOr for Statement<G> {
    type Output = Statement<G>;

    /// `a | b` — builds an [`OrProof`] over `[a, b]`.
    ///
    /// # Panics
    /// Panics if the combined statement fails the consistency checker.
    fn bitor(self, rhs: Statement<G>) -> Statement<G> {
        Statement::Or(OrProof::new(vec![self, rhs]).expect("malformed statement in `|` composition"))
    }
}

impl<G: Group + GroupEncoding + 'static> Statement<G> {
    /// A canonical byte-string digest of the statement tree: node kind,
    /// child order, generator group tag and encoding, secret names, and
    /// constants (the `lhs`/`com` of each leaf). Two statements built via
    /// different syntactic paths but semantically identical produce the
    /// same id.
    pub fn get_proof_id(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_id(&mut buf);
        Sha256::digest(&buf).to_vec()
    }

    fn write_id(&self, buf: &mut Vec<u8>) {
        fn write_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
            buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
            buf.extend_from_slice(bytes);
        }
        fn write_str(buf: &mut Vec<u8>, s: &str) {
            write_bytes(buf, s.as_bytes());
        }
        fn write_tag(buf: &mut Vec<u8>, tag: GroupId) {
            match tag {
                GroupId::Canonical(id) => {
                    buf.push(0);
                    buf.extend_from_slice(&format!("{id:?}").into_bytes());
                }
                GroupId::Named(name) => {
                    buf.push(1);
                    write_str(buf, name);
                }
            }
        }

        match self {
            Statement::DLRep(d) => {
                buf.push(0);
                write_bytes(buf, d.lhs.to_bytes().as_ref());
                buf.extend_from_slice(&(d.secret_names().len() as u32).to_le_bytes());
                for ((name, generator), tag) in d
                    .secret_names()
                    .into_iter()
                    .zip(d.generators())
                    .zip(d.group_tags())
                {
                    write_str(buf, &name);
                    write_bytes(buf, generator.to_bytes().as_ref());
                    write_tag(buf, tag);
                }
            }
            Statement::And(a) => {
                buf.push(1);
                buf.extend_from_slice(&(a.children.len() as u32).to_le_bytes());
                for child in &a.children {
                    child.write_id(buf);
                }
            }
            Statement::Or(o) => {
                buf.push(2);
                buf.extend_from_slice(&(o.children.len() as u32).to_le_bytes());
                for child in &o.children {
                    child.write_id(buf);
                }
            }
            Statement::Range(r) => {
                buf.push(3);
                write_str(buf, r.value.name());
                write_str(buf, r.randomizer.name());
                buf.extend_from_slice(&(r.nr_bits as u32).to_le_bytes());
                write_bytes(buf, r.com.to_bytes().as_ref());
                write_bytes(buf, r.g.point.to_bytes().as_ref());
                write_bytes(buf, r.h.point.to_bytes().as_ref());
            }
        }
    }

    /// Builds a prover bound to this statement and the given witness
    /// values, named by the [`crate::secret::Secret`]s the statement was
    /// built from. Missing a name a leaf actually needs fails lazily, at
    /// `commit`, with [`crate::errors::Error::NoWitness`].
    pub fn get_prover(&self, secrets: HashMap<String, G::Scalar>) -> crate::prover::Prover<G> {
        crate::prover::Prover::new(self.clone(), secrets)
    }

    /// Builds a verifier bound to this statement, with no witness at all.
    pub fn get_verifier(&self) -> crate::verifier::Verifier<G> {
        crate::verifier::Verifier::new(self.clone())
    }

    /// Builds a [`crate::prover::Prover`] that holds no witness and can
    /// only ever call [`crate::prover::Prover::simulate_proof`] — never
    /// `commit`/`compute_response`. Kept as a distinct type from
    /// [`Self::get_verifier`] so a simulator can never be mistaken for (or
    /// silently substituted for) the party that actually checks a proof.
    pub fn get_simulator(&self) -> crate::prover::Prover<G> {
        crate::prover::Prover::new_simulator(self.clone())
    }
}

impl<G: Group + GroupEncoding> From<DLRep<G>> for Statement<G> {
    fn from(d: DLRep<G>) -> Self {
        Statement::DLRep(d)
    }
}

impl<G: Group + GroupEncoding> From<AndProof<G>> for Statement<G> {
    fn from(a: AndProof<G>) -> Self {
        Statement::And(a)
    }
}

impl<G: Group + GroupEncoding> From<OrProof<G>> for Statement<G> {
    fn from(o: OrProof<G>) -> Self {
        Statement::Or(o)
    }
}

impl<G: Group + GroupEncoding> From<PowerTwoRangeProof<G>> for Statement<G> {
    fn from(r: PowerTwoRangeProof<G>) -> Self {
        Statement::Range(Box::new(r))
    }
}
