//! Fiat-Shamir transformation for the interactive protocol: replaces the
//! verifier's random challenge with one derived from a transcript of the
//! domain separator, the statement's identity, and the prover's
//! commitment, collapsing the three-move protocol into a single message.
//!
//! This is a thin wrapper over [`crate::prover::Prover`] /
//! [`crate::verifier::Verifier`], not a separate protocol: everything it
//! does, the interactive core also supports by hand.

use std::collections::HashMap;

use ff::Field;
use group::{Group, GroupEncoding};
use merlin::Transcript;
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::errors::Error;
use crate::prover::{Commitment, Response};
use crate::range_proof::Precommitment;
use crate::statement::Statement;

/// A complete non-interactive proof: everything a verifier needs, with no
/// further messages from the prover.
#[derive(Clone, Debug)]
pub struct NIProof<G: Group + GroupEncoding> {
    pub precommitment: Precommitment<G>,
    pub commitment: Commitment<G>,
    pub challenge: G::Scalar,
    pub response: Response<G>,
}

fn encode_commitment<G: Group + GroupEncoding>(commitment: &Commitment<G>, buf: &mut Vec<u8>) {
    match commitment {
        Commitment::DLRep(p) => buf.extend_from_slice(p.to_bytes().as_ref()),
        Commitment::And(children) | Commitment::Or(children) => {
            for child in children {
                encode_commitment(child, buf);
            }
        }
    }
}

fn encode_precommitment<G: Group + GroupEncoding>(precommitment: &Precommitment<G>, buf: &mut Vec<u8>) {
    for entry in precommitment {
        for point in entry {
            buf.extend_from_slice(point.to_bytes().as_ref());
        }
    }
}

/// Applies the Fiat-Shamir heuristic to one statement, identified by a
/// fixed domain separator (distinguishing e.g. different protocol
/// versions or application contexts using the same statement shape).
pub struct NISigmaProtocol<G: Group + GroupEncoding> {
    statement: Statement<G>,
    domain_separator: Vec<u8>,
}

impl<G: Group + GroupEncoding + 'static> NISigmaProtocol<G> {
    pub fn new(domain_separator: &[u8], statement: Statement<G>) -> Self {
        Self {
            statement,
            domain_separator: domain_separator.to_vec(),
        }
    }

    fn transcript(&self) -> Transcript {
        let mut transcript = Transcript::new(b"sigma-rs fiat-shamir v1");
        transcript.append_message(b"domain-separator", &self.domain_separator);
        transcript.append_message(b"statement", &self.statement.get_proof_id());
        transcript
    }

    /// Folds the precommitment (if any) and the commitment into the
    /// transcript and derives the challenge by expanding the resulting
    /// digest into a `ChaCha20` seed and sampling a uniform scalar from it.
    fn derive_challenge(
        &self,
        precommitment: &Precommitment<G>,
        commitment: &Commitment<G>,
    ) -> G::Scalar {
        let mut transcript = self.transcript();
        let mut precommitment_bytes = Vec::new();
        encode_precommitment(precommitment, &mut precommitment_bytes);
        transcript.append_message(b"precommitment", &precommitment_bytes);

        let mut commitment_bytes = Vec::new();
        encode_commitment(commitment, &mut commitment_bytes);
        transcript.append_message(b"commitment", &commitment_bytes);

        let mut seed = [0u8; 32];
        transcript.challenge_bytes(b"challenge", &mut seed);
        let mut rng = ChaCha20Rng::from_seed(seed);
        G::Scalar::random(&mut rng)
    }

    /// Runs the prover's side of the protocol end to end, deriving the
    /// challenge instead of waiting for one.
    pub fn prove(
        &self,
        secrets: HashMap<String, G::Scalar>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<NIProof<G>, Error> {
        let mut prover = self.statement.get_prover(secrets);
        let precommitment = prover.precommit(rng)?;
        let commitment = prover.commit(rng)?;
        let challenge = self.derive_challenge(&precommitment, &commitment);
        let response = prover.compute_response(challenge)?;
        Ok(NIProof {
            precommitment,
            commitment,
            challenge,
            response,
        })
    }

    /// Runs the verifier's side: recomputes the challenge and rejects if
    /// the proof doesn't carry the one the transcript demands.
    pub fn verify(&self, proof: &NIProof<G>) -> Result<bool, Error> {
        let expected_challenge = self.derive_challenge(&proof.precommitment, &proof.commitment);
        if expected_challenge != proof.challenge {
            return Ok(false);
        }
        let mut verifier = self.statement.get_verifier();
        verifier.process_precommitment(proof.precommitment.clone())?;
        verifier.process_commitment(proof.commitment.clone())?;
        verifier.set_challenge(proof.challenge)?;
        verifier.verify(proof.response.clone())
    }
}
