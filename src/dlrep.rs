//! Atomic discrete-logarithm relations: `lhs = Σ xᵢ · Gᵢ`.

use ff::Field;
use group::{Group, GroupEncoding};
use rand::{CryptoRng, RngCore};
use std::collections::HashMap;

use crate::errors::Error;
use crate::group::GroupId;
use crate::linear_combination::LinearCombination;
use crate::secret::Secret;

/// An atomic statement `PK{(x_1, ..., x_n): lhs = x_1 * G_1 + ... + x_n * G_n}`.
#[derive(Clone, Debug)]
pub struct DLRep<G: Group + GroupEncoding> {
    pub lhs: G,
    pub(crate) terms: Vec<(Secret<G::Scalar>, G, GroupId)>,
    /// Marks this atomic statement as always simulated, regardless of
    /// whether a witness is available — used by [`crate::range_proof`] to
    /// pick the "true" disjunct of each bit proof.
    pub simulated: bool,
}

impl<G: Group + GroupEncoding + 'static> DLRep<G> {
    /// Builds a new atomic relation, validating that every generator
    /// shares a single group (and that `lhs`'s tag, if explicit, agrees).
    pub fn new(lhs: G, expr: impl Into<LinearCombination<G>>) -> Result<Self, Error> {
        let expr = expr.into();
        if expr.terms().is_empty() {
            return Err(Error::MalformedStatement(
                "a DLRep must have at least one term".into(),
            ));
        }
        let reference_group = expr.terms()[0].generator.group;
        for term in expr.terms() {
            if term.generator.group != reference_group {
                return Err(Error::MalformedStatement(format!(
                    "all generators in a DLRep must share one group (secret {})",
                    term.secret.name()
                )));
            }
        }
        let terms = expr
            .0
            .into_iter()
            .map(|t| (t.secret, t.generator.point, t.generator.group))
            .collect();
        Ok(Self {
            lhs,
            terms,
            simulated: false,
        })
    }

    pub fn mark_simulated(&mut self) {
        self.simulated = true;
    }

    /// Secret names in term order (a name may repeat).
    pub fn secret_names(&self) -> Vec<String> {
        self.terms.iter().map(|(s, _, _)| s.name().to_string()).collect()
    }

    /// Generators in term order.
    pub fn generators(&self) -> Vec<G> {
        self.terms.iter().map(|(_, g, _)| *g).collect()
    }

    pub(crate) fn group_tags(&self) -> Vec<GroupId> {
        self.terms.iter().map(|(_, _, tag)| *tag).collect()
    }

    /// A term's witness may come from the `secrets` map supplied to
    /// `get_prover`, or be baked directly into its `Secret` (as happens for
    /// the per-bit randomizers a [`crate::range_proof::PowerTwoRangeProof`]
    /// allocates during precommit). Either source is sufficient.
    fn resolve(&self, secret: &Secret<G::Scalar>, secrets: &HashMap<String, G::Scalar>) -> Option<G::Scalar> {
        secrets.get(secret.name()).copied().or_else(|| secret.value())
    }

    pub(crate) fn has_witness(&self, secrets: &HashMap<String, G::Scalar>) -> bool {
        if self.simulated {
            return false;
        }
        self.terms
            .iter()
            .all(|(s, _, _)| self.resolve(s, secrets).is_some())
    }

    /// Samples a fresh randomizer for every term, keyed by secret name.
    /// If the same name occurs in multiple terms, the last write wins —
    /// intentional, since the group-coherence invariant guarantees all
    /// occurrences of one name share a single domain of randomness.
    pub fn get_randomizers(
        &self,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> HashMap<String, G::Scalar> {
        let mut out = HashMap::new();
        for (secret, _, _) in &self.terms {
            out.insert(secret.name().to_string(), G::Scalar::random(&mut *rng));
        }
        out
    }

    /// Computes `Σ k_i * G_i` for the given per-name randomizers.
    ///
    /// # Errors
    /// Returns [`Error::NoWitness`] if this statement has no witness at
    /// all — a prover with nothing to prove must simulate, not commit.
    pub fn commit(
        &self,
        randomizers: &HashMap<String, G::Scalar>,
        secrets: &HashMap<String, G::Scalar>,
    ) -> Result<G, Error> {
        if !self.has_witness(secrets) {
            return Err(Error::NoWitness);
        }
        let mut acc = G::identity();
        for (secret, generator, _) in &self.terms {
            let k = randomizers
                .get(secret.name())
                .expect("randomizer map must cover every term's secret");
            acc += *generator * k;
        }
        Ok(acc)
    }

    /// Computes `s_i = k_i + c * x_i` for every term.
    ///
    /// # Errors
    /// Returns [`Error::NoWitness`] if any term's secret has no value.
    pub fn compute_response(
        &self,
        randomizers: &HashMap<String, G::Scalar>,
        secrets: &HashMap<String, G::Scalar>,
        challenge: G::Scalar,
    ) -> Result<Vec<G::Scalar>, Error> {
        self.terms
            .iter()
            .map(|(secret, _, _)| {
                let k = randomizers
                    .get(secret.name())
                    .expect("randomizer map must cover every term's secret");
                let x = self.resolve(secret, secrets).ok_or(Error::NoWitness)?;
                Ok(*k + challenge * x)
            })
            .collect()
    }

    /// `Σ s_i * G_i - c * lhs`, used both by the verifier and by simulation.
    pub fn recompute_commitment(&self, challenge: G::Scalar, responses: &[G::Scalar]) -> G {
        let mut acc = G::identity();
        for ((_, generator, _), response) in self.terms.iter().zip(responses) {
            acc += *generator * response;
        }
        acc - self.lhs * challenge
    }

    /// Checks `recompute_commitment(challenge, responses) == commitment`.
    pub fn verify(&self, commitment: G, challenge: G::Scalar, responses: &[G::Scalar]) -> bool {
        self.recompute_commitment(challenge, responses) == commitment
    }

    /// Produces a full transcript `(commitment, challenge, responses)`
    /// without a witness: samples responses (and, if not given, a
    /// challenge) uniformly, then reconstructs a matching commitment.
    pub fn simulate(
        &self,
        challenge: Option<G::Scalar>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> (G, G::Scalar, Vec<G::Scalar>) {
        let challenge = challenge.unwrap_or_else(|| G::Scalar::random(&mut *rng));
        let random_by_name = self.get_randomizers(rng);
        let responses: Vec<G::Scalar> = self
            .terms
            .iter()
            .map(|(secret, _, _)| random_by_name[secret.name()])
            .collect();
        let commitment = self.recompute_commitment(challenge, &responses);
        (commitment, challenge, responses)
    }
}
