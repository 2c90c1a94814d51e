//! The prover side of the interactive protocol: `Fresh -> [Precommitted] ->
//! Committed -> Responded`, plus the standalone simulator used both for
//! `OrProof`'s non-real branches and for callers who want a transcript
//! without ever holding a witness.

use std::collections::HashMap;

use ff::Field;
use group::{Group, GroupEncoding};
use rand::{CryptoRng, RngCore};

use crate::composition::OrProof;
use crate::dlrep::DLRep;
use crate::errors::Error;
use crate::range_proof::{reduce_for_prover, Precommitment};
use crate::statement::Statement;

/// The prover's recursive commitment, shaped like the statement tree it
/// was built from.
#[derive(Clone, Debug)]
pub enum Commitment<G: Group> {
    DLRep(G),
    And(Vec<Commitment<G>>),
    Or(Vec<Commitment<G>>),
}

/// The prover's recursive response, shaped like the statement tree.
#[derive(Clone, Debug)]
pub enum Response<G: Group> {
    DLRep(Vec<G::Scalar>),
    And(Vec<Response<G>>),
    Or {
        challenges: Vec<G::Scalar>,
        responses: Vec<Response<G>>,
    },
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum ProverPhase {
    Fresh,
    Precommitted,
    Committed,
    Responded,
}

/// Per-node bookkeeping kept between `commit` and `compute_response`. Only
/// `Or` nodes carry anything interesting: the index of the really-proved
/// child, and the already-complete (challenge, response) pair every other
/// child got from the simulator at commit time.
enum NodeState<G: Group> {
    Leaf,
    And(Vec<NodeState<G>>),
    Or {
        real_index: usize,
        sub_challenges: Vec<Option<G::Scalar>>,
        fake_responses: Vec<Option<Response<G>>>,
        children_state: Vec<NodeState<G>>,
    },
}

/// Recursively simulates `stmt` for a fixed `challenge`, without touching
/// any witness. Used both as the standalone [`simulate_transcript`] entry
/// point and internally for `OrProof`'s non-real branches.
fn simulate_node<G: Group + GroupEncoding + 'static>(
    stmt: &Statement<G>,
    challenge: G::Scalar,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<(Commitment<G>, Response<G>), Error> {
    match stmt {
        Statement::DLRep(d) => {
            let (commitment, _, responses) = d.simulate(Some(challenge), rng);
            Ok((Commitment::DLRep(commitment), Response::DLRep(responses)))
        }
        Statement::And(a) => {
            let mut commitments = Vec::with_capacity(a.children.len());
            let mut responses = Vec::with_capacity(a.children.len());
            for child in &a.children {
                let (c, r) = simulate_node(child, challenge, rng)?;
                commitments.push(c);
                responses.push(r);
            }
            Ok((Commitment::And(commitments), Response::And(responses)))
        }
        Statement::Or(o) => {
            let n = o.children.len();
            let mut sub_challenges = Vec::with_capacity(n);
            let mut sum = G::Scalar::ZERO;
            for _ in 0..n.saturating_sub(1) {
                let c = G::Scalar::random(&mut *rng);
                sum += c;
                sub_challenges.push(c);
            }
            sub_challenges.push(challenge - sum);

            let mut commitments = Vec::with_capacity(n);
            let mut responses = Vec::with_capacity(n);
            for (child, c_i) in o.children.iter().zip(&sub_challenges) {
                let (commitment, response) = simulate_node(child, *c_i, rng)?;
                commitments.push(commitment);
                responses.push(response);
            }
            Ok((
                Commitment::Or(commitments),
                Response::Or {
                    challenges: sub_challenges,
                    responses,
                },
            ))
        }
        Statement::Range(_) => Err(Error::UsageError(
            "a range statement must be reduced (via precommit) before it can be simulated",
        )),
    }
}

/// Produces a full `(commitment, challenge, response)` transcript for
/// `statement` without requiring a witness. If `challenge` is omitted, one
/// is sampled uniformly — the transcript is then a valid-looking proof for
/// an arbitrary challenge chosen by the simulator itself, which is exactly
/// what makes it useless as evidence of anything but indistinguishability.
pub fn simulate_transcript<G: Group + GroupEncoding + 'static>(
    statement: &Statement<G>,
    challenge: Option<G::Scalar>,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<(Commitment<G>, G::Scalar, Response<G>), Error> {
    let challenge = challenge.unwrap_or_else(|| G::Scalar::random(&mut *rng));
    let (commitment, response) = simulate_node(statement, challenge, rng)?;
    Ok((commitment, challenge, response))
}

fn commit_node<G: Group + GroupEncoding + 'static>(
    stmt: &Statement<G>,
    secrets: &HashMap<String, G::Scalar>,
    randomizers: &mut HashMap<String, G::Scalar>,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<(Commitment<G>, NodeState<G>), Error> {
    match stmt {
        Statement::DLRep(d) => {
            for name in d.secret_names() {
                randomizers
                    .entry(name)
                    .or_insert_with(|| G::Scalar::random(&mut *rng));
            }
            let commitment = d.commit(randomizers, secrets)?;
            Ok((Commitment::DLRep(commitment), NodeState::Leaf))
        }
        Statement::And(a) => {
            let mut commitments = Vec::with_capacity(a.children.len());
            let mut states = Vec::with_capacity(a.children.len());
            for child in &a.children {
                let (c, s) = commit_node(child, secrets, randomizers, rng)?;
                commitments.push(c);
                states.push(s);
            }
            Ok((Commitment::And(commitments), NodeState::And(states)))
        }
        Statement::Or(o) => commit_or(o, secrets, randomizers, rng),
        Statement::Range(_) => Err(Error::UsageError(
            "a range statement must be reduced (via precommit) before it can be committed",
        )),
    }
}

fn commit_or<G: Group + GroupEncoding + 'static>(
    o: &OrProof<G>,
    secrets: &HashMap<String, G::Scalar>,
    randomizers: &mut HashMap<String, G::Scalar>,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<(Commitment<G>, NodeState<G>), Error> {
    let real_index = o.real_branch(secrets).ok_or(Error::NoWitness)?;

    let mut commitments = Vec::with_capacity(o.children.len());
    let mut sub_challenges = Vec::with_capacity(o.children.len());
    let mut fake_responses = Vec::with_capacity(o.children.len());
    let mut children_state = Vec::with_capacity(o.children.len());

    for (i, child) in o.children.iter().enumerate() {
        if i == real_index {
            let (c, s) = commit_node(child, secrets, randomizers, rng)?;
            commitments.push(c);
            sub_challenges.push(None);
            fake_responses.push(None);
            children_state.push(s);
        } else {
            let fake_challenge = G::Scalar::random(&mut *rng);
            let (commitment, response) = simulate_node(child, fake_challenge, rng)?;
            commitments.push(commitment);
            sub_challenges.push(Some(fake_challenge));
            fake_responses.push(Some(response));
            children_state.push(NodeState::Leaf);
        }
    }

    Ok((
        Commitment::Or(commitments),
        NodeState::Or {
            real_index,
            sub_challenges,
            fake_responses,
            children_state,
        },
    ))
}

fn response_node<G: Group + GroupEncoding + 'static>(
    stmt: &Statement<G>,
    state: &mut NodeState<G>,
    secrets: &HashMap<String, G::Scalar>,
    randomizers: &HashMap<String, G::Scalar>,
    local_challenge: G::Scalar,
) -> Result<Response<G>, Error> {
    match (stmt, state) {
        (Statement::DLRep(d), NodeState::Leaf) => Ok(Response::DLRep(d.compute_response(
            randomizers,
            secrets,
            local_challenge,
        )?)),
        (Statement::And(a), NodeState::And(states)) => {
            let responses = a
                .children
                .iter()
                .zip(states.iter_mut())
                .map(|(c, s)| response_node(c, s, secrets, randomizers, local_challenge))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Response::And(responses))
        }
        (
            Statement::Or(o),
            NodeState::Or {
                real_index,
                sub_challenges,
                fake_responses,
                children_state,
            },
        ) => {
            let mut sum_fake = G::Scalar::ZERO;
            for (i, sc) in sub_challenges.iter().enumerate() {
                if i != *real_index {
                    sum_fake += sc.expect("fake branch must carry a pre-chosen sub-challenge");
                }
            }
            let real_challenge = local_challenge - sum_fake;
            let real_response = response_node(
                &o.children[*real_index],
                &mut children_state[*real_index],
                secrets,
                randomizers,
                real_challenge,
            )?;

            let mut challenges = Vec::with_capacity(o.children.len());
            let mut responses = Vec::with_capacity(o.children.len());
            for i in 0..o.children.len() {
                if i == *real_index {
                    challenges.push(real_challenge);
                } else {
                    challenges.push(sub_challenges[i].expect("fake sub-challenge missing"));
                }
            }
            for (i, slot) in fake_responses.iter_mut().enumerate() {
                if i == *real_index {
                    responses.push(real_response.clone());
                } else {
                    responses.push(slot.take().expect("fake response missing"));
                }
            }
            Ok(Response::Or {
                challenges,
                responses,
            })
        }
        _ => Err(Error::UsageError(
            "prover state tree shape does not match the statement",
        )),
    }
}

/// Drives one statement through the interactive protocol on the prover's
/// side. Built from [`crate::statement::Statement::get_prover`].
pub struct Prover<G: Group + GroupEncoding> {
    statement: Statement<G>,
    secrets: HashMap<String, G::Scalar>,
    phase: ProverPhase,
    randomizers: HashMap<String, G::Scalar>,
    state: Option<NodeState<G>>,
}

impl<G: Group + GroupEncoding + 'static> Prover<G> {
    pub(crate) fn new(statement: Statement<G>, secrets: HashMap<String, G::Scalar>) -> Self {
        Self {
            statement,
            secrets,
            phase: ProverPhase::Fresh,
            randomizers: HashMap::new(),
            state: None,
        }
    }

    /// Builds a prover with no witness at all, suitable only for
    /// [`Self::simulate_proof`]. Built from
    /// [`crate::statement::Statement::get_simulator`].
    pub(crate) fn new_simulator(statement: Statement<G>) -> Self {
        Self::new(statement, HashMap::new())
    }

    /// Produces a full `(commitment, challenge, response)` transcript
    /// without ever consulting a witness, bypassing the phase-gated
    /// `precommit`/`commit`/`compute_response` flow entirely — per §4.G,
    /// "a simulating prover bypasses the state machine and emits a full
    /// transcript atomically." Works whether or not this `Prover` was
    /// built via [`crate::statement::Statement::get_simulator`] or one
    /// that also holds a real witness.
    pub fn simulate_proof(
        &self,
        challenge: Option<G::Scalar>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Commitment<G>, G::Scalar, Response<G>), Error> {
        simulate_transcript(&self.statement, challenge, rng)
    }

    /// Reduces every [`crate::range_proof::PowerTwoRangeProof`] /
    /// [`crate::range_proof::RangeProof`] node in the statement tree to its
    /// constructed `And`-of-`Or` form, returning the precommitment to send
    /// to the verifier. A no-op (returning an empty precommitment) if the
    /// statement has no range nodes at all — callers need not special-case
    /// that, but may skip calling this and go straight to `commit`.
    pub fn precommit(
        &mut self,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Precommitment<G>, Error> {
        if self.phase != ProverPhase::Fresh {
            return Err(Error::UsageError(
                "precommit must be called before commit",
            ));
        }
        let mut out = Vec::new();
        reduce_for_prover(&mut self.statement, rng, &mut out)?;
        self.phase = ProverPhase::Precommitted;
        Ok(out)
    }

    /// Samples fresh randomizers, recursively commits, and picks (and
    /// simulates) a real branch for every `OrProof` along the way.
    ///
    /// # Errors
    /// Returns [`Error::NoWitness`] if the whole statement is unprovable —
    /// callers with no witness anywhere should use [`simulate_transcript`]
    /// instead of going through the phase-gated `Prover` at all.
    pub fn commit(&mut self, rng: &mut (impl RngCore + CryptoRng)) -> Result<Commitment<G>, Error> {
        if !matches!(self.phase, ProverPhase::Fresh | ProverPhase::Precommitted) {
            return Err(Error::UsageError("commit called out of order"));
        }
        if !self.statement.has_witness(&self.secrets) {
            return Err(Error::NoWitness);
        }
        let (commitment, state) = commit_node(&self.statement, &self.secrets, &mut self.randomizers, rng)?;
        self.state = Some(state);
        self.phase = ProverPhase::Committed;
        Ok(commitment)
    }

    /// Completes the transcript once the verifier's challenge is known.
    pub fn compute_response(&mut self, challenge: G::Scalar) -> Result<Response<G>, Error> {
        if self.phase != ProverPhase::Committed {
            return Err(Error::UsageError("compute_response called out of order"));
        }
        let mut state = self
            .state
            .take()
            .ok_or(Error::UsageError("missing prover state"))?;
        let response = response_node(
            &self.statement,
            &mut state,
            &self.secrets,
            &self.randomizers,
            challenge,
        )?;
        self.phase = ProverPhase::Responded;
        Ok(response)
    }
}
