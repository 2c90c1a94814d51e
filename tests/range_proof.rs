//! Black-box tests for the extended, precommitting `PowerTwoRangeProof` /
//! `RangeProof` statements over a Pedersen commitment.

use std::collections::HashMap;

use bls12_381::G1Projective;
use group::{ff::Field, Group};
use rand::rngs::OsRng;

use sigma_compose::{Error, PowerTwoRangeProof, RangeProof, Secret, Statement};

type G = G1Projective;
type Scalar = <G as Group>::Scalar;

// S6: v=10, nr_bits=5, com = v*g + r*h — honest precommit/commit/challenge/
// response round-trip accepts.
#[test]
fn s6_power_two_range_proof_accepts() {
    let mut rng = OsRng;
    let g = G::random(&mut rng);
    let h = G::random(&mut rng);
    let v = Scalar::from(10u64);
    let r = Scalar::random(&mut rng);
    let com = g * v + h * r;

    let range = PowerTwoRangeProof::new(
        com,
        g,
        h,
        5,
        Secret::named_with_value("v", v),
        Secret::named_with_value("r", r),
    );

    let mut secrets = HashMap::new();
    secrets.insert(range.value.name().to_string(), v);
    secrets.insert(range.randomizer.name().to_string(), r);

    let statement: Statement<G> = range.into();
    let mut prover = statement.get_prover(secrets);
    let mut verifier = statement.get_verifier();

    let precommitment = prover.precommit(&mut rng).unwrap();
    verifier.process_precommitment(precommitment).unwrap();

    let commitment = prover.commit(&mut rng).unwrap();
    verifier.process_commitment(commitment).unwrap();
    let challenge = verifier.send_challenge(&mut rng).unwrap();

    let response = prover.compute_response(challenge).unwrap();
    assert!(verifier.verify(response).unwrap());
}

// With v=32 and nr_bits=5, precommit itself rejects with OutOfRange.
#[test]
fn s6_value_too_large_is_out_of_range() {
    let mut rng = OsRng;
    let g = G::random(&mut rng);
    let h = G::random(&mut rng);
    let v = Scalar::from(32u64);
    let r = Scalar::random(&mut rng);
    let com = g * v + h * r;

    let mut range = PowerTwoRangeProof::new(
        com,
        g,
        h,
        5,
        Secret::named_with_value("v", v),
        Secret::named_with_value("r", r),
    );

    let err = range.precommit(&mut rng).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { nr_bits: 5 }));
}

// With v=10 but a verifier-side tampered bit-commitment, check_adequate_lhs
// (and therefore process_precommitment) must fail.
#[test]
fn s6_tampered_bit_commitment_is_rejected() {
    let mut rng = OsRng;
    let g = G::random(&mut rng);
    let h = G::random(&mut rng);
    let v = Scalar::from(10u64);
    let r = Scalar::random(&mut rng);
    let com = g * v + h * r;

    let range = PowerTwoRangeProof::new(
        com,
        g,
        h,
        5,
        Secret::named_with_value("v", v),
        Secret::named_with_value("r", r),
    );

    let mut secrets = HashMap::new();
    secrets.insert(range.value.name().to_string(), v);
    secrets.insert(range.randomizer.name().to_string(), r);

    let statement: Statement<G> = range.into();
    let mut prover = statement.get_prover(secrets);
    let mut verifier = statement.get_verifier();

    let mut precommitment = prover.precommit(&mut rng).unwrap();
    precommitment[0][0] += G::random(&mut rng);

    let err = verifier.process_precommitment(precommitment).unwrap_err();
    assert!(matches!(err, Error::VerificationFailure));
}

// The general lower <= value < upper reduction composes two PowerTwoRange
// statements and accepts when the value is in range. The two halves bake
// their own offset-derived Secrets with concrete values at construction
// time (see RangeProof::new), so no external secrets map is needed here.
#[test]
fn general_range_proof_accepts_in_range_value() {
    let mut rng = OsRng;
    let g = G::random(&mut rng);
    let h = G::random(&mut rng);
    let (lower, upper) = (5u64, 20u64);
    let v = Scalar::from(12u64);
    let r = Scalar::random(&mut rng);
    let com = g * v + h * r;

    let value = Secret::named_with_value("v", v);
    let randomizer = Secret::named_with_value("r", r);
    let range = RangeProof::new(com, g, h, lower, upper, value, randomizer);

    let statement = range.into_statement().unwrap();
    let mut prover = statement.get_prover(HashMap::new());
    let mut verifier = statement.get_verifier();

    let precommitment = prover.precommit(&mut rng).unwrap();
    verifier.process_precommitment(precommitment).unwrap();
    let commitment = prover.commit(&mut rng).unwrap();
    verifier.process_commitment(commitment).unwrap();
    let challenge = verifier.send_challenge(&mut rng).unwrap();
    let response = prover.compute_response(challenge).unwrap();
    assert!(verifier.verify(response).unwrap());
}

// Calling commit() on a Range-bearing statement before precommit() is a
// usage error, not NoWitness: the Range node's own Secrets already carry
// concrete values, so has_witness must see through to them and let
// commit() reach the "must be reduced first" guard instead of bailing
// out early on a witness check.
#[test]
fn commit_before_precommit_on_range_is_usage_error() {
    let mut rng = OsRng;
    let g = G::random(&mut rng);
    let h = G::random(&mut rng);
    let v = Scalar::from(10u64);
    let r = Scalar::random(&mut rng);
    let com = g * v + h * r;

    let range = PowerTwoRangeProof::new(
        com,
        g,
        h,
        5,
        Secret::named_with_value("v", v),
        Secret::named_with_value("r", r),
    );

    let statement: Statement<G> = range.into();
    let mut prover = statement.get_prover(HashMap::new());
    let err = prover.commit(&mut rng).unwrap_err();
    assert!(matches!(err, Error::UsageError(_)));
}
