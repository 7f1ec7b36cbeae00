//! Game constants: socket limits, bench-craft prices, and engine defaults.
//!
//! Colors are indexed in attribute order throughout the crate:
//! - [`RED`] = 0 (strength)
//! - [`GREEN`] = 1 (dexterity)
//! - [`BLUE`] = 2 (intelligence)

/// Number of socket colors that a chromatic orb can roll.
pub const NUM_COLORS: usize = 3;

/// Color indices, matching the attribute order (str, dex, int).
pub const RED: usize = 0;
pub const GREEN: usize = 1;
pub const BLUE: usize = 2;

/// Single-letter color codes used by the compact `2R1G` notation.
pub const COLOR_LETTERS: [char; NUM_COLORS] = ['R', 'G', 'B'];

/// Largest socket count any item base can carry.
pub const MAX_SOCKETS: u8 = 6;

/// Most sockets a single bench craft can force.
pub const MAX_FORCED_SOCKETS: u8 = 3;

/// Chance that a free socket rolls off-color on a dual-attribute item.
pub const DUAL_REQ_OFF_COLOR_CHANCE: f64 = 0.1;

/// Share of the probability mass handed to on-colors by the bias formulas.
pub const ON_COLOR_WEIGHT: f64 = 0.9;

/// Additive smoothing in the single-requirement formula `0.9 (R + 10) / (R + 20)`.
pub const SINGLE_REQ_NUMERATOR_OFFSET: f64 = 10.0;
pub const SINGLE_REQ_DENOMINATOR_OFFSET: f64 = 20.0;

/// Bench prices in chromatic orbs, keyed by the sorted forced-count triple.
///
/// `(0, 0, 0)` is a plain chromatic orb. `(1, 1, 1)` does not exist on the bench.
pub const BENCH_COSTS: [([u8; NUM_COLORS], u32); 6] = [
    ([0, 0, 0], 1),
    ([0, 0, 1], 4),
    ([0, 1, 1], 15),
    ([0, 0, 2], 25),
    ([0, 1, 2], 100),
    ([0, 0, 3], 120),
];

/// Quantiles reported when the caller does not ask for specific ones.
pub const DEFAULT_QUANTILES: [f64; 5] = [0.66, 0.80, 0.90, 0.95, 0.99];

/// Default cumulative mass the materialized distribution must cover.
pub const DEFAULT_COVERAGE: f64 = 0.9999;

/// Default cap on the truncation horizon (one f64 per attempt bucket, ~16 MB).
pub const DEFAULT_MAX_ATTEMPTS: u64 = 2_000_000;

/// Tolerance for probability vectors that should sum to one.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-9;

/// Factorials 0!..6!, enough for multinomial coefficients over one item.
pub const FACTORIALS: [u64; MAX_SOCKETS as usize + 1] = [1, 1, 2, 6, 24, 120, 720];
