//! Formal sums `Σ secret_i · generator_i`, built with `Secret * Point` and `+`.
//!
//! No algebraic simplification is performed: term order is preserved and
//! observable, mirroring the source's `RightSide` (Python) and the
//! teacher crate's index-based [`crate::group::Generator`] composition in
//! spirit, but keyed by [`Secret`] name rather than an allocator index.

use core::ops::{Add, Mul};
use group::Group;

use crate::group::Generator;
use crate::secret::Secret;

/// A single `secret * generator` term.
#[derive(Clone, Debug)]
pub struct Term<G: Group> {
    pub secret: Secret<G::Scalar>,
    pub generator: Generator<G>,
}

/// An ordered sum of [`Term`]s.
#[derive(Clone, Debug, Default)]
pub struct LinearCombination<G: Group>(pub Vec<Term<G>>);

impl<G: Group> LinearCombination<G> {
    pub fn terms(&self) -> &[Term<G>] {
        &self.0
    }
}

impl<G: Group + 'static> Mul<G> for Secret<G::Scalar> {
    type Output = Term<G>;

    /// `Secret * Point -> Term`, tagging the point with its canonical group.
    fn mul(self, rhs: G) -> Term<G> {
        Term {
            secret: self,
            generator: rhs.into(),
        }
    }
}

impl<G: Group + 'static> Mul<Generator<G>> for Secret<G::Scalar> {
    type Output = Term<G>;

    /// `Secret * Generator -> Term`, preserving an explicit group tag.
    fn mul(self, rhs: Generator<G>) -> Term<G> {
        Term {
            secret: self,
            generator: rhs,
        }
    }
}

impl<G: Group> Add<Term<G>> for Term<G> {
    type Output = LinearCombination<G>;

    fn add(self, rhs: Term<G>) -> LinearCombination<G> {
        LinearCombination(vec![self, rhs])
    }
}

impl<G: Group> Add<Term<G>> for LinearCombination<G> {
    type Output = LinearCombination<G>;

    fn add(mut self, rhs: Term<G>) -> LinearCombination<G> {
        self.0.push(rhs);
        self
    }
}

impl<G: Group> Add<LinearCombination<G>> for LinearCombination<G> {
    type Output = LinearCombination<G>;

    fn add(mut self, rhs: LinearCombination<G>) -> LinearCombination<G> {
        self.0.extend(rhs.0);
        self
    }
}

impl<G: Group> From<Term<G>> for LinearCombination<G> {
    fn from(term: Term<G>) -> Self {
        LinearCombination(vec![term])
    }
}

impl<G: Group> From<Vec<Term<G>>> for LinearCombination<G> {
    fn from(terms: Vec<Term<G>>) -> Self {
        LinearCombination(terms)
    }
}
