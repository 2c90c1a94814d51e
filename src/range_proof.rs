//! Bit-decomposition range proofs: `0 <= value < 2^nr_bits` over a
//! Pedersen commitment `com = value * g + randomizer * h`.
//!
//! Grounded on the original `zkbuilder.primitives.rangeproof` source
//! (`PowerTwoRangeProof`): see https://www.cypherpunks.ca/~iang/pubs/blacronym-wpes.pdf

use ff::{Field, PrimeField};
use group::{Group, GroupEncoding};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use crate::dlrep::DLRep;
use crate::errors::Error;
use crate::group::Generator;
use crate::secret::Secret;
use crate::statement::Statement;

/// Decomposes `value` into `n` bits, least-significant first.
///
/// # Errors
/// Returns [`Error::OutOfRange`] if `value` needs more than `n` bits.
pub fn decompose_into_n_bits<F: PrimeField>(value: F, n: usize) -> Result<Vec<bool>, Error> {
    let repr = BigUint::from_bytes_le(value.to_repr().as_ref());
    if repr.bits() as usize > n {
        return Err(Error::OutOfRange { nr_bits: n });
    }
    Ok((0..n).map(|i| repr.bit(i as u64)).collect())
}

/// An extended statement proving `0 <= value < 2^nr_bits` given a
/// Pedersen commitment `com = value * g + randomizer * h`.
///
/// Unlike [`crate::dlrep::DLRep`] and its compositions, this statement
/// cannot be turned straight into a [`crate::prover::Prover`]/
/// [`crate::verifier::Verifier`] pair: it first emits a *precommitment*
/// (the per-bit Pedersen commitments) which both sides need before the
/// underlying `AndProof` of bit-disjunctions can be built.
#[derive(Clone, Debug)]
pub struct PowerTwoRangeProof<G: Group + GroupEncoding> {
    pub com: G,
    pub g: Generator<G>,
    pub h: Generator<G>,
    pub nr_bits: usize,
    pub value: Secret<G::Scalar>,
    pub randomizer: Secret<G::Scalar>,
    /// Fresh per-bit randomizers, allocated at construction time and
    /// populated during precommit.
    pub(crate) randomizers: Vec<Secret<G::Scalar>>,
    pub constructed: Option<Statement<G>>,
    pub precommitment: Option<Vec<G>>,
}

impl<G: Group + GroupEncoding + 'static> PowerTwoRangeProof<G> {
    pub fn new(
        com: G,
        g: impl Into<Generator<G>>,
        h: impl Into<Generator<G>>,
        nr_bits: usize,
        value: Secret<G::Scalar>,
        randomizer: Secret<G::Scalar>,
    ) -> Self {
        let randomizers = (0..nr_bits).map(|_| Secret::new()).collect();
        Self {
            com,
            g: g.into(),
            h: h.into(),
            nr_bits,
            value,
            randomizer,
            randomizers,
            constructed: None,
            precommitment: None,
        }
    }

    /// Prover-side precommit: decomposes `value` into bits, commits to
    /// each bit with a fresh randomizer, and reveals the randomizer
    /// needed to bind those bit-commitments back to `com`.
    ///
    /// # Errors
    /// Returns [`Error::NoWitness`] if `value`/`randomizer` are unset, or
    /// [`Error::OutOfRange`] if `value` does not fit in `nr_bits` bits.
    pub fn precommit(
        &mut self,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Vec<G>, Error> {
        let value = self.value.value().ok_or(Error::NoWitness)?;
        let randomizer = self.randomizer.value().ok_or(Error::NoWitness)?;
        let bits = decompose_into_n_bits(value, self.nr_bits)?;

        let mut rho = G::Scalar::ZERO;
        let mut power = G::Scalar::ONE;
        let mut commitments = Vec::with_capacity(self.nr_bits + 1);

        for (bit_secret, bit) in self.randomizers.iter_mut().zip(bits) {
            let r = G::Scalar::random(&mut *rng);
            *bit_secret = Secret::named_with_value(bit_secret.name().to_string(), r);
            let b = if bit { G::Scalar::ONE } else { G::Scalar::ZERO };
            commitments.push(self.g.point * b + self.h.point * r);
            rho += power * r;
            power = power.double();
        }
        rho -= randomizer;
        commitments.push(self.h.point * rho);

        self.precommitment = Some(commitments.clone());
        Ok(commitments)
    }

    /// Builds the `And`-of-`Or`-of-`DLRep` statement that both sides
    /// check once the precommitment is known.
    pub fn build_constructed_proof(&mut self, precommitment: Vec<G>) -> Result<&Statement<G>, Error> {
        let is_prover = self.value.value().is_some() && self.randomizer.value().is_some();
        let bits: Option<Vec<bool>> = if is_prover {
            Some(decompose_into_n_bits(self.value.value().unwrap(), self.nr_bits)?)
        } else {
            None
        };

        let mut bit_proofs = Vec::with_capacity(self.nr_bits);
        for i in 0..self.nr_bits {
            let c_i = precommitment[i];
            let mut p0 = DLRep::new(c_i, self.randomizers[i].clone() * self.h.point)?;
            let mut p1 = DLRep::new(c_i - self.g.point, self.randomizers[i].clone() * self.h.point)?;

            if let Some(bits) = &bits {
                // The left disjunct is real when the bit is 0, the right when it's 1.
                if bits[i] {
                    p0.mark_simulated();
                } else {
                    p1.mark_simulated();
                }
            }

            bit_proofs.push(Statement::Or(crate::composition::OrProof::new(vec![
                Statement::DLRep(p0),
                Statement::DLRep(p1),
            ])?));
        }

        let constructed = Statement::And(crate::composition::AndProof::new(bit_proofs)?);
        self.precommitment = Some(precommitment);
        self.constructed = Some(constructed);
        Ok(self.constructed.as_ref().unwrap())
    }

    /// Verifier-side post-check: `Σ 2^i * C_i == com + ρ * h`. Must hold
    /// before the constructed proof is even run.
    pub fn check_adequate_lhs(&self) -> bool {
        let Some(precommitment) = &self.precommitment else {
            return false;
        };
        let rho = precommitment[self.nr_bits];
        let mut combined = G::identity();
        let mut power = G::Scalar::ONE;
        for c in &precommitment[..self.nr_bits] {
            combined += *c * power;
            power = power.double();
        }
        combined == self.com + rho
    }
}

/// A general range statement `lower <= value < upper`, reduced to two
/// [`PowerTwoRangeProof`]s on `value - lower` and `upper - 1 - value`,
/// each sized to fit the interval, sharing `value` as one [`Secret`]
/// across both (see `DESIGN.md` for how the shared secret and the two
/// offset constants are normalized).
#[derive(Clone, Debug)]
pub struct RangeProof<G: Group + GroupEncoding> {
    pub lower: Box<PowerTwoRangeProof<G>>,
    pub upper: Box<PowerTwoRangeProof<G>>,
}

impl<G: Group + GroupEncoding + 'static> RangeProof<G>
where
    G::Scalar: From<u64>,
{
    /// `nr_bits` for `lower <= value < upper` is `ceil(log2(upper - lower - 1))`,
    /// i.e. the number of bits needed to represent `upper - lower - 1`.
    pub fn nr_bits_for(lower: u64, upper: u64) -> usize {
        assert!(upper > lower, "upper must be strictly greater than lower");
        let span = upper - lower - 1;
        if span == 0 {
            1
        } else {
            64 - span.leading_zeros() as usize
        }
    }

    /// Builds the two power-of-two sub-statements for `lower <= value < upper`.
    ///
    /// `com_lower = com - lower*g` and `com_upper = (upper-1)*g - com` are
    /// both publicly computable from `com`, so no extra linking proof is
    /// needed: `com_lower` commits to `value - lower` under `randomizer`,
    /// and `com_upper` commits to `upper - 1 - value` under `-randomizer`,
    /// purely as a consequence of `com`'s definition.
    pub fn new(
        com: G,
        g: impl Into<Generator<G>>,
        h: impl Into<Generator<G>>,
        lower: u64,
        upper: u64,
        value: Secret<G::Scalar>,
        randomizer: Secret<G::Scalar>,
    ) -> Self {
        let g = g.into();
        let h = h.into();
        let nr_bits = Self::nr_bits_for(lower, upper);
        let lower_scalar = G::Scalar::from(lower);
        let upper_minus_one = G::Scalar::from(upper - 1);

        let com_lower = com - g.point * lower_scalar;
        let com_upper = g.point * upper_minus_one - com;

        let value_lower = Secret::with_optional_value(value.value().map(|v| v - lower_scalar));
        let randomizer_lower = Secret::with_optional_value(randomizer.value());
        let value_upper =
            Secret::with_optional_value(value.value().map(|v| upper_minus_one - v));
        let randomizer_upper = Secret::with_optional_value(randomizer.value().map(|r| -r));

        Self {
            lower: Box::new(PowerTwoRangeProof::new(
                com_lower,
                g,
                h,
                nr_bits,
                value_lower,
                randomizer_lower,
            )),
            upper: Box::new(PowerTwoRangeProof::new(
                com_upper,
                g,
                h,
                nr_bits,
                value_upper,
                randomizer_upper,
            )),
        }
    }

    /// Folds the two halves into one `And` of `Range` nodes — from here on
    /// the generic [`Statement`] precommit/commit/verify machinery handles
    /// `lower` and `upper` exactly like any other pair of range statements.
    pub fn into_statement(self) -> Result<Statement<G>, Error> {
        Ok(Statement::And(crate::composition::AndProof::new(vec![
            Statement::Range(self.lower),
            Statement::Range(self.upper),
        ])?))
    }
}

/// One precommitment entry per [`PowerTwoRangeProof`] node found in a
/// pre-order walk of a statement tree.
pub type Precommitment<G> = Vec<Vec<G>>;

/// Prover-side tree reduction: replaces every `Statement::Range` node with
/// its constructed `And`-of-`Or` statement, sampling a fresh precommitment
/// for each along the way.
///
/// # Errors
/// Propagates [`Error::NoWitness`]/[`Error::OutOfRange`] from the range
/// node's own `precommit`.
pub(crate) fn reduce_for_prover<G: Group + GroupEncoding + 'static>(
    stmt: &mut Statement<G>,
    rng: &mut (impl RngCore + CryptoRng),
    out: &mut Precommitment<G>,
) -> Result<(), Error> {
    match stmt {
        Statement::DLRep(_) => Ok(()),
        Statement::And(a) => {
            for child in &mut a.children {
                reduce_for_prover(child, rng, out)?;
            }
            Ok(())
        }
        Statement::Or(o) => {
            for child in &mut o.children {
                reduce_for_prover(child, rng, out)?;
            }
            Ok(())
        }
        Statement::Range(r) => {
            let precommitment = r.precommit(rng)?;
            let constructed = r.build_constructed_proof(precommitment.clone())?.clone();
            out.push(precommitment);
            *stmt = constructed;
            Ok(())
        }
    }
}

/// Verifier-side tree reduction: replaces every `Statement::Range` node
/// with its constructed statement using a precommitment received from the
/// prover, checking `check_adequate_lhs` along the way.
///
/// # Errors
/// Returns [`Error::VerificationFailure`] if a range node's precommitment
/// doesn't bind back to its public commitment, or [`Error::UsageError`] if
/// the supplied precommitment has the wrong shape.
pub(crate) fn reduce_for_verifier<G: Group + GroupEncoding + 'static>(
    stmt: &mut Statement<G>,
    precommitments: &mut std::vec::IntoIter<Vec<G>>,
) -> Result<(), Error> {
    match stmt {
        Statement::DLRep(_) => Ok(()),
        Statement::And(a) => {
            for child in &mut a.children {
                reduce_for_verifier(child, precommitments)?;
            }
            Ok(())
        }
        Statement::Or(o) => {
            for child in &mut o.children {
                reduce_for_verifier(child, precommitments)?;
            }
            Ok(())
        }
        Statement::Range(r) => {
            let precommitment = precommitments
                .next()
                .ok_or(Error::UsageError("precommitment is missing a range entry"))?;
            let constructed = r.build_constructed_proof(precommitment)?.clone();
            if !r.check_adequate_lhs() {
                return Err(Error::VerificationFailure);
            }
            *stmt = constructed;
            Ok(())
        }
    }
}
