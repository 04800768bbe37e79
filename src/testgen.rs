//! Test case generation.
//!
//! A run's input set is built in three layers, deduplicated with the first occurrence kept:
//!
//! 1. structured cases from the tables in `crossverify_core::inputs` (arities 0 to 3 only),
//! 2. `max_random` uniformly random tuples,
//! 3. caller-supplied custom tuples whose length matches the arity.
//!
//! ## Examples
//! ```rust
//! use crossverify::testgen::CaseGenerator;
//!
//! let cases = CaseGenerator::seeded(7).generate(1, 0, &[]);
//! assert_eq!(cases.len(), 8);
//! assert_eq!(cases[0].args(), &[-1]);
//! ```

use std::collections::HashSet;
use std::fmt;

use crossverify_core::inputs::{
    EDGE_VALUES, MAX_STRUCTURED_ARITY, PAIR_PARTNERS, PAIR_SEEDS, RANDOM_MAX, RANDOM_MIN, TRIPLE_AXIS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// One argument tuple, in call order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestCase(Vec<i64>);

impl TestCase {
    pub fn new(args: Vec<i64>) -> Self {
        Self(args)
    }

    pub fn args(&self) -> &[i64] {
        &self.0
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<i64>> for TestCase {
    fn from(args: Vec<i64>) -> Self {
        Self(args)
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, arg) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}

/// Generator with an owned random source.
pub struct CaseGenerator {
    min: i64,
    max: i64,
    rng: StdRng,
}

impl CaseGenerator {
    /// Seeded when `seed` is given, OS entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            min: RANDOM_MIN,
            max: RANDOM_MAX,
            rng,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    /// Inclusive range of random components. Reversed bounds are swapped.
    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.min = min.min(max);
        self.max = min.max(max);
        self
    }

    /// Build the deduplicated case list for a function of `arity` parameters.
    #[tracing::instrument(skip_all, fields(arity = arity, max_random = max_random, custom = custom.len()))]
    pub fn generate(&mut self, arity: usize, max_random: usize, custom: &[Vec<String>]) -> Vec<TestCase> {
        let mut candidates = structured_cases(arity);
        for _ in 0..max_random {
            let tuple = (0..arity).map(|_| self.rng.gen_range(self.min..=self.max)).collect();
            candidates.push(TestCase(tuple));
        }
        candidates.extend(custom.iter().filter_map(|raw| parse_custom(raw, arity)));

        let mut seen = HashSet::with_capacity(candidates.len());
        candidates.retain(|case| seen.insert(case.clone()));
        tracing::debug!(cases = candidates.len(), "generated test cases");
        candidates
    }
}

/// Generate cases with the default range. `seed` makes the random layer reproducible.
pub fn generate(arity: usize, max_random: usize, custom: &[Vec<String>], seed: Option<u64>) -> Vec<TestCase> {
    CaseGenerator::new(seed).generate(arity, max_random, custom)
}

/// Split a textual custom input such as `"3, 4"` into its tokens.
///
/// The empty string (and whitespace) is the empty tuple.
pub fn parse_custom_input(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(',').map(|token| token.trim().to_string()).collect()
}

fn structured_cases(arity: usize) -> Vec<TestCase> {
    match arity {
        0 => vec![TestCase(Vec::new())],
        1 => EDGE_VALUES.iter().map(|&v| TestCase(vec![v])).collect(),
        2 => PAIR_SEEDS
            .iter()
            .flat_map(|&a| PAIR_PARTNERS.iter().map(move |&b| TestCase(vec![a, b])))
            .collect(),
        3 => {
            let mut cases = Vec::with_capacity(TRIPLE_AXIS.len().pow(3));
            for &a in &TRIPLE_AXIS {
                for &b in &TRIPLE_AXIS {
                    for &c in &TRIPLE_AXIS {
                        cases.push(TestCase(vec![a, b, c]));
                    }
                }
            }
            cases
        }
        n => {
            debug_assert!(n > MAX_STRUCTURED_ARITY);
            Vec::new()
        }
    }
}

fn parse_custom(raw: &[String], arity: usize) -> Option<TestCase> {
    if raw.len() != arity {
        tracing::debug!(?raw, arity, "dropping custom input with wrong length");
        return None;
    }
    let mut args = Vec::with_capacity(raw.len());
    for token in raw {
        match token.trim().parse::<i64>() {
            Ok(value) => args.push(value),
            Err(_) => {
                tracing::debug!(?raw, token = token.as_str(), "dropping custom input that is not an integer tuple");
                return None;
            }
        }
    }
    Some(TestCase(args))
}
