//! Black-box integration tests covering the statement algebra, the
//! prover/verifier state machines, and composition's consistency checker.

use std::collections::HashMap;

use bls12_381::G1Projective;
use group::{ff::Field, Group, GroupEncoding};
use rand::rngs::OsRng;

use sigma_compose::{AndProof, DLRep, OrProof, Secret, Statement};

type G = G1Projective;
type Scalar = <G as Group>::Scalar;

fn run_honest<G: Group + GroupEncoding + 'static>(
    statement: &Statement<G>,
    secrets: HashMap<String, G::Scalar>,
) -> bool {
    let mut rng = OsRng;
    let mut prover = statement.get_prover(secrets);
    let commitment = prover.commit(&mut rng).unwrap();

    let mut verifier = statement.get_verifier();
    verifier.process_commitment(commitment).unwrap();
    let challenge = verifier.send_challenge(&mut rng).unwrap();

    let response = prover.compute_response(challenge).unwrap();
    verifier.verify(response).unwrap()
}

// S1: DLRep(3G + 5H, x*G + y*H) with x=3, y=5 — honest run accepts.
#[test]
fn s1_atomic_dlrep_accepts() {
    let mut rng = OsRng;
    let g = G::random(&mut rng);
    let h = G::random(&mut rng);
    let x = Secret::named_with_value("x", Scalar::from(3u64));
    let y = Secret::named_with_value("y", Scalar::from(5u64));
    let lhs = g * Scalar::from(3u64) + h * Scalar::from(5u64);

    let statement = Statement::DLRep(DLRep::new(lhs, (x.clone() * g) + (y.clone() * h)).unwrap());
    let mut secrets = HashMap::new();
    secrets.insert(x.name().to_string(), x.value().unwrap());
    secrets.insert(y.name().to_string(), y.value().unwrap());

    assert!(run_honest(&statement, secrets));
}

// S2: an And with a secret shared across two conjuncts in one group accepts;
// moving one conjunct's generator to a different logical group fails at
// construction time with MalformedStatement.
#[test]
fn s2_and_with_shared_secret() {
    let mut rng = OsRng;
    let g = G::random(&mut rng);
    let h = G::random(&mut rng);
    let k = G::random(&mut rng);
    let m = G::random(&mut rng);

    let x = Secret::named_with_value("x", Scalar::from(3u64));
    let y = Secret::named_with_value("y", Scalar::from(4u64));
    let z = Secret::named_with_value("z", Scalar::from(7u64));

    let lhs1 = g * x.value().unwrap() + h * y.value().unwrap();
    let left = DLRep::new(lhs1, (x.clone() * g) + (y.clone() * h)).unwrap();

    let lhs2 = k * x.value().unwrap() + m * z.value().unwrap();
    let right = DLRep::new(lhs2, (x.clone() * k) + (z.clone() * m)).unwrap();

    let statement = Statement::And(
        AndProof::new(vec![Statement::DLRep(left), Statement::DLRep(right)]).unwrap(),
    );

    let mut secrets = HashMap::new();
    for s in [&x, &y, &z] {
        secrets.insert(s.name().to_string(), s.value().unwrap());
    }
    assert!(run_honest(&statement, secrets));

    // Now tag `m`'s group differently from `g`/`h`/`k` — the shared secret
    // `x` now spans two different logical groups and construction fails.
    let tagged_m = sigma_compose::group::Generator::tagged(m, "a-different-group");
    let right_tagged = DLRep::new(lhs2, (x.clone() * k) + (z * tagged_m)).unwrap();
    let err = AndProof::new(vec![
        Statement::DLRep(left_copy(g, h, &x, &y)),
        Statement::DLRep(right_tagged),
    ])
    .unwrap_err();
    assert!(matches!(err, sigma_compose::Error::MalformedStatement(_)));
}

fn left_copy(g: G, h: G, x: &Secret<Scalar>, y: &Secret<Scalar>) -> DLRep<G> {
    let lhs = g * x.value().unwrap() + h * y.value().unwrap();
    DLRep::new(lhs, (x.clone() * g) + (y.clone() * h)).unwrap()
}

// S3: Or(DLRep(5G, x*G), DLRep(7G, y*G)) with only x known — accepts,
// sub-challenges sum to the parent challenge.
#[test]
fn s3_or_honest_left() {
    let mut rng = OsRng;
    let g = G::random(&mut rng);
    let x = Secret::named_with_value("x", Scalar::from(5u64));
    let y = Secret::<Scalar>::named("y");

    let left = DLRep::new(g * Scalar::from(5u64), x.clone() * g).unwrap();
    let right = DLRep::new(g * Scalar::from(7u64), y * g).unwrap();
    let statement = Statement::Or(
        OrProof::new(vec![Statement::DLRep(left), Statement::DLRep(right)]).unwrap(),
    );

    let mut secrets = HashMap::new();
    secrets.insert(x.name().to_string(), x.value().unwrap());
    assert!(run_honest(&statement, secrets));
}

// S4: same statement, only the right witness known — accepts.
#[test]
fn s4_or_honest_right() {
    let mut rng = OsRng;
    let g = G::random(&mut rng);
    let x = Secret::<Scalar>::named("x");
    let y = Secret::named_with_value("y", Scalar::from(7u64));

    let left = DLRep::new(g * Scalar::from(5u64), x * g).unwrap();
    let right = DLRep::new(g * Scalar::from(7u64), y.clone() * g).unwrap();
    let statement = Statement::Or(
        OrProof::new(vec![Statement::DLRep(left), Statement::DLRep(right)]).unwrap(),
    );

    let mut secrets = HashMap::new();
    secrets.insert(y.name().to_string(), y.value().unwrap());
    assert!(run_honest(&statement, secrets));
}

// S5: after an honest S1 run, flipping one response scalar makes
// verification fail.
#[test]
fn s5_tampered_response_is_rejected() {
    let mut rng = OsRng;
    let g = G::random(&mut rng);
    let h = G::random(&mut rng);
    let x = Secret::named_with_value("x", Scalar::from(3u64));
    let y = Secret::named_with_value("y", Scalar::from(5u64));
    let lhs = g * Scalar::from(3u64) + h * Scalar::from(5u64);

    let statement = Statement::DLRep(DLRep::new(lhs, (x.clone() * g) + (y.clone() * h)).unwrap());
    let mut secrets = HashMap::new();
    secrets.insert(x.name().to_string(), x.value().unwrap());
    secrets.insert(y.name().to_string(), y.value().unwrap());

    let mut prover = statement.get_prover(secrets);
    let commitment = prover.commit(&mut rng).unwrap();
    let mut verifier = statement.get_verifier();
    verifier.process_commitment(commitment).unwrap();
    let challenge = verifier.send_challenge(&mut rng).unwrap();
    let response = prover.compute_response(challenge).unwrap();

    let tampered = match response {
        sigma_compose::Response::DLRep(mut scalars) => {
            scalars[0] += Scalar::ONE;
            sigma_compose::Response::DLRep(scalars)
        }
        _ => unreachable!(),
    };

    assert!(!verifier.verify(tampered).unwrap());
}

// A statement built as a nested `&`/`|` expression and the same statement
// built directly from AndProof::new/OrProof::new must carry the same
// get_proof_id(), since the two are semantically identical.
#[test]
fn proof_id_is_stable_across_construction_paths() {
    let mut rng = OsRng;
    let g = G::random(&mut rng);
    let h = G::random(&mut rng);
    let k = G::random(&mut rng);
    let x = Secret::<Scalar>::named("x");
    let y = Secret::<Scalar>::named("y");
    let z = Secret::<Scalar>::named("z");

    let a = Statement::DLRep(DLRep::new(g, x.clone() * g).unwrap());
    let b = Statement::DLRep(DLRep::new(h, y.clone() * h).unwrap());
    let c = Statement::DLRep(DLRep::new(k, z.clone() * k).unwrap());

    let via_operator = a.clone() & b.clone() & c.clone();
    let via_constructor = Statement::And(AndProof::new(vec![a, b, c]).unwrap());

    assert_eq!(via_operator.get_proof_id(), via_constructor.get_proof_id());
}

// get_simulator()/simulate_proof() produce a transcript that satisfies the
// verifier's check equations without ever touching a witness.
#[test]
fn simulated_transcript_passes_verification() {
    let mut rng = OsRng;
    let g = G::random(&mut rng);
    let lhs = G::random(&mut rng);
    let statement = Statement::DLRep(DLRep::new(lhs, Secret::<Scalar>::named("x") * g).unwrap());

    let simulator = statement.get_simulator();
    let (commitment, challenge, response) = simulator.simulate_proof(None, &mut rng).unwrap();

    let mut verifier = statement.get_verifier();
    verifier.process_commitment(commitment).unwrap();
    verifier.set_challenge(challenge).unwrap();
    assert!(verifier.verify(response).unwrap());
}

// Range of sub-challenges across an Or must sum to the parent challenge.
#[test]
fn or_subchallenges_sum_to_parent_challenge() {
    let mut rng = OsRng;
    let g = G::random(&mut rng);
    let x = Secret::named_with_value("x", Scalar::from(11u64));
    let y = Secret::<Scalar>::named("y");

    let left = DLRep::new(g * Scalar::from(11u64), x.clone() * g).unwrap();
    let right = DLRep::new(g * Scalar::from(13u64), y * g).unwrap();
    let statement = Statement::Or(
        OrProof::new(vec![Statement::DLRep(left), Statement::DLRep(right)]).unwrap(),
    );

    let mut secrets = HashMap::new();
    secrets.insert(x.name().to_string(), x.value().unwrap());

    let mut prover = statement.get_prover(secrets);
    let commitment = prover.commit(&mut rng).unwrap();
    let mut verifier = statement.get_verifier();
    verifier.process_commitment(commitment).unwrap();
    let challenge = verifier.send_challenge(&mut rng).unwrap();
    let response = prover.compute_response(challenge).unwrap();

    match &response {
        sigma_compose::Response::Or { challenges, .. } => {
            let sum = challenges.iter().fold(Scalar::ZERO, |acc, c| acc + c);
            assert_eq!(sum, challenge);
        }
        _ => unreachable!(),
    }
    assert!(verifier.verify(response).unwrap());
}
