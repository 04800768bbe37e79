//! Integer tables the test-case generator builds its structured cases from.
//!
//! ## Notes
//! - Order matters: structured cases are emitted in table order, which keeps reports readable and makes the
//!   first cases of a run predictable.
//! - Arities of 4 and above get no structured cases; only random tuples cover them.

/// Edge scalars for single-argument functions, emitted in this order.
pub const EDGE_VALUES: [i64; 8] = [-1, 0, 1, 2, 5, 10, 20, 50];

/// First-argument seeds for two-argument functions (the first six edge values).
pub const PAIR_SEEDS: [i64; 6] = [-1, 0, 1, 2, 5, 10];

/// Second-argument partners for two-argument functions.
pub const PAIR_PARTNERS: [i64; 5] = [0, 1, 2, 5, -1];

/// Per-axis values for three-argument functions (full cube).
pub const TRIPLE_AXIS: [i64; 3] = [0, 1, 2];

/// Highest arity that receives structured (non-random) cases.
pub const MAX_STRUCTURED_ARITY: usize = 3;

/// Inclusive lower bound of random components.
pub const RANDOM_MIN: i64 = -100;

/// Inclusive upper bound of random components.
pub const RANDOM_MAX: i64 = 100;

/// Default number of random tuples appended to a run.
pub const DEFAULT_MAX_RANDOM: usize = 8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_seeds_are_edge_prefix() {
        assert_eq!(&PAIR_SEEDS[..], &EDGE_VALUES[..6]);
    }

    #[test]
    fn test_random_range_is_symmetric() {
        assert_eq!(RANDOM_MIN, -RANDOM_MAX);
    }
}
