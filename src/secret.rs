//! Named witness variables.

use ff::PrimeField;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;

/// A witness slot in a statement.
///
/// Two `Secret`s denote the *same* variable if and only if their `name`s
/// are equal — names are the only thing composition uses to recognize a
/// shared witness across conjuncts. A `Secret` constructed without an
/// explicit name gets a random one, generated the way the original
/// `DLRep.py` generates fallback names for unnamed secrets, so that two
/// default-named secrets never collide by accident.
#[derive(Clone)]
pub struct Secret<F> {
    name: String,
    value: Option<F>,
}

impl<F: PrimeField> Secret<F> {
    /// Creates an unnamed secret with no known value (verifier-side use).
    pub fn new() -> Self {
        Self {
            name: Self::random_name(),
            value: None,
        }
    }

    /// Creates a named secret with no known value.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Creates an unnamed secret bound to `value` (prover-side use).
    pub fn with_value(value: F) -> Self {
        Self {
            name: Self::random_name(),
            value: Some(value),
        }
    }

    /// Creates an unnamed secret, bound to `value` if one is given —
    /// used by derived sub-statements that may or may not be prover-side.
    pub fn with_optional_value(value: Option<F>) -> Self {
        Self {
            name: Self::random_name(),
            value,
        }
    }

    /// Creates a named secret bound to `value`.
    pub fn named_with_value(name: impl Into<String>, value: F) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<F> {
        self.value
    }

    fn random_name() -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(12)
            .map(char::from)
            .collect();
        format!("secret_{suffix}")
    }
}

impl<F: PrimeField> Default for Secret<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for Secret<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("name", &self.name)
            .field("has_value", &self.value.is_some())
            .finish()
    }
}

impl<F> PartialEq for Secret<F> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<F> Eq for Secret<F> {}
