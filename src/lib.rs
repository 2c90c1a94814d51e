//
// Authors:
// - Nugzari Uzoevi <nougzarm@icloud.com>
// - Michele Orrù <m@orru.net>
// - Lénaïck Gouriou <lg@leanear.io>

#![allow(non_snake_case)]
#![doc(html_logo_url = "https://mmaker.github.io/sigma-rs/")]
//! A toolkit for composing Σ-protocols (zero-knowledge proofs of knowledge
//! of discrete logarithms) out of atomic [`dlrep::DLRep`] statements,
//! combined with `&`/`|` into [`composition::AndProof`]/
//! [`composition::OrProof`] trees, and extended with
//! [`range_proof::PowerTwoRangeProof`]/[`range_proof::RangeProof`] for
//! range statements over Pedersen commitments.
//!
//! The interactive three-move protocol lives in [`prover`]/[`verifier`];
//! [`fiat_shamir`] is an optional non-interactive wrapper over the same
//! core.

#![deny(unused_variables)]
#![deny(unused_mut)]

pub mod composition;
pub mod dlrep;
pub mod errors;
pub mod fiat_shamir;
pub mod group;
pub mod linear_combination;
pub mod prover;
pub mod range_proof;
pub mod secret;
pub mod statement;
pub mod verifier;

pub use composition::{AndProof, OrProof};
pub use dlrep::DLRep;
pub use errors::Error;
pub use fiat_shamir::{NIProof, NISigmaProtocol};
pub use prover::{simulate_transcript, Commitment, Prover, Response};
pub use range_proof::{PowerTwoRangeProof, RangeProof};
pub use secret::Secret;
pub use statement::Statement;
pub use verifier::Verifier;
