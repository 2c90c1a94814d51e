//! The verifier side of the interactive protocol: `Fresh -> [Precommitted]
//! -> Committed -> Responded`.

use ff::Field;
use group::{Group, GroupEncoding};
use rand::{CryptoRng, RngCore};

use crate::errors::Error;
use crate::prover::{Commitment, Response};
use crate::range_proof::{reduce_for_verifier, Precommitment};
use crate::statement::Statement;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum VerifierPhase {
    Fresh,
    Precommitted,
    Committed,
    Responded,
}

fn verify_node<G: Group + GroupEncoding + 'static>(
    stmt: &Statement<G>,
    commitment: &Commitment<G>,
    challenge: G::Scalar,
    response: &Response<G>,
) -> Result<bool, Error> {
    match (stmt, commitment, response) {
        (Statement::DLRep(d), Commitment::DLRep(c), Response::DLRep(r)) => {
            Ok(d.verify(*c, challenge, r))
        }
        (Statement::And(a), Commitment::And(cs), Response::And(rs)) => {
            if a.children.len() != cs.len() || a.children.len() != rs.len() {
                return Err(Error::UsageError("mismatched And arity"));
            }
            for ((child, c), r) in a.children.iter().zip(cs).zip(rs) {
                if !verify_node(child, c, challenge, r)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (
            Statement::Or(o),
            Commitment::Or(cs),
            Response::Or {
                challenges,
                responses,
            },
        ) => {
            if o.children.len() != cs.len()
                || challenges.len() != cs.len()
                || responses.len() != cs.len()
            {
                return Err(Error::UsageError("mismatched Or arity"));
            }
            let sum = challenges
                .iter()
                .fold(G::Scalar::ZERO, |acc, c| acc + c);
            if sum != challenge {
                return Ok(false);
            }
            for (((child, c), sub), r) in o.children.iter().zip(cs).zip(challenges).zip(responses)
            {
                if !verify_node(child, c, *sub, r)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Err(Error::UsageError(
            "commitment/response shape does not match the statement",
        )),
    }
}

/// Drives one statement through the interactive protocol on the
/// verifier's side. Built from [`crate::statement::Statement::get_verifier`].
pub struct Verifier<G: Group + GroupEncoding> {
    statement: Statement<G>,
    phase: VerifierPhase,
    commitment: Option<Commitment<G>>,
    challenge: Option<G::Scalar>,
}

impl<G: Group + GroupEncoding + 'static> Verifier<G> {
    pub(crate) fn new(statement: Statement<G>) -> Self {
        Self {
            statement,
            phase: VerifierPhase::Fresh,
            commitment: None,
            challenge: None,
        }
    }

    /// Mirrors [`crate::prover::Prover::precommit`]: reduces every range
    /// node using the precommitment received from the prover, failing
    /// immediately if one doesn't bind back to its public commitment.
    pub fn process_precommitment(&mut self, precommitment: Precommitment<G>) -> Result<(), Error> {
        if self.phase != VerifierPhase::Fresh {
            return Err(Error::UsageError(
                "process_precommitment called out of order",
            ));
        }
        let mut remaining = precommitment.into_iter();
        reduce_for_verifier(&mut self.statement, &mut remaining)?;
        if remaining.next().is_some() {
            return Err(Error::UsageError(
                "precommitment carries more range entries than the statement has range nodes",
            ));
        }
        self.phase = VerifierPhase::Precommitted;
        Ok(())
    }

    pub fn process_commitment(&mut self, commitment: Commitment<G>) -> Result<(), Error> {
        if !matches!(self.phase, VerifierPhase::Fresh | VerifierPhase::Precommitted) {
            return Err(Error::UsageError("process_commitment called out of order"));
        }
        self.commitment = Some(commitment);
        self.phase = VerifierPhase::Committed;
        Ok(())
    }

    /// Samples the challenge as a uniformly random scalar. Kept as its own
    /// step (rather than folded into `verify`) so a non-interactive
    /// wrapper can substitute a hash-derived value instead of calling this
    /// at all.
    pub fn send_challenge(&mut self, rng: &mut (impl RngCore + CryptoRng)) -> Result<G::Scalar, Error> {
        if self.phase != VerifierPhase::Committed {
            return Err(Error::UsageError("send_challenge called out of order"));
        }
        let challenge = G::Scalar::random(&mut *rng);
        self.challenge = Some(challenge);
        Ok(challenge)
    }

    /// Overrides the sampled challenge with an externally supplied one
    /// (used by the Fiat-Shamir wrapper, and by tests exercising a fixed
    /// challenge).
    pub fn set_challenge(&mut self, challenge: G::Scalar) -> Result<(), Error> {
        if self.phase != VerifierPhase::Committed {
            return Err(Error::UsageError("set_challenge called out of order"));
        }
        self.challenge = Some(challenge);
        Ok(())
    }

    /// Checks `response` against the bound commitment and challenge.
    ///
    /// A failed check is a `false`, never an `Err` — only a phase
    /// violation or a commitment/response shape mismatch is an error, per
    /// [`Error::VerificationFailure`]'s own doc comment.
    pub fn verify(&mut self, response: Response<G>) -> Result<bool, Error> {
        if self.phase != VerifierPhase::Committed {
            return Err(Error::UsageError("verify called out of order"));
        }
        let challenge = self
            .challenge
            .ok_or(Error::UsageError("a challenge must be set before verify"))?;
        let commitment = self
            .commitment
            .as_ref()
            .ok_or(Error::UsageError("missing commitment"))?;
        let ok = verify_node(&self.statement, commitment, challenge, &response)?;
        self.phase = VerifierPhase::Responded;
        Ok(ok)
    }
}
