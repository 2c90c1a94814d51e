//! Error types shared across the statement algebra and the prover/verifier
//! state machines.

use thiserror::Error;

/// Errors raised while building or running a sigma-protocol statement.
///
/// Construction-time errors ([`Error::MalformedStatement`]) are raised
/// eagerly, at the point a statement tree is assembled, so that a
/// malformed statement never reaches the protocol phase. Protocol-time
/// errors ([`Error::NoWitness`], [`Error::OutOfRange`], [`Error::UsageError`])
/// are programming errors distinct from a failed verification, which is
/// surfaced as `Ok(false)` / a `bool`, never as an `Err`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A statement was built with a shared secret whose generators do not
    /// all live in the same group, or a [`crate::dlrep::DLRep`] was given
    /// an empty term list.
    #[error("malformed statement: {0}")]
    MalformedStatement(String),

    /// An honest `commit`/`compute_response` was requested from a prover
    /// that has no witness for (part of) the statement.
    #[error("prover has no witness for this statement; it can only simulate")]
    NoWitness,

    /// A range-proof witness does not fit in the declared number of bits.
    #[error("value uses more than {nr_bits} bits")]
    OutOfRange { nr_bits: usize },

    /// A protocol method was called out of phase order (e.g. `commit`
    /// twice, or `compute_response` before a challenge was bound).
    #[error("usage error: {0}")]
    UsageError(&'static str),

    /// Surfaced only internally by combinators that need a `Result` (e.g.
    /// simulated precommitments that invert a scalar); never returned by
    /// `Verifier::verify`, which reports failure as `false`.
    #[error("verification failed")]
    VerificationFailure,
}
