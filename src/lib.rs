//! # Chromatic — exact socket recoloring cost distributions
//!
//! Computes how many recoloring attempts (and how much currency) it takes to
//! reach a desired socket coloring, as an **exact distribution** with
//! percentiles, instead of the mean ± standard deviation reported by older
//! calculators. The distribution of attempts is heavily right-skewed, so the
//! mean alone badly understates what an unlucky player spends.
//!
//! ## Pipeline
//!
//! | Step | Module | Description |
//! |------|--------|-------------|
//! | 1 | [`color_bias`] | Per-socket color chances from attribute requirements |
//! | 2 | [`bench`] | Recoloring method: chromatic orb or a bench craft with forced sockets |
//! | 3 | [`outcomes`] | Exact multinomial PMF of one attempt, success chance `p` |
//! | 4 | [`distribution`] | Geometric PMF of attempts until success, truncated at a coverage threshold |
//! | 5 | [`percentiles`] | Percentile table read off the CDF |
//!
//! [`comparison`] runs steps 3–5 for every bench craft in parallel, and
//! [`simulation`] provides a seeded Monte Carlo cross-check.
//!
//! ## Example
//!
//! ```
//! use chromatic::{compute_percentiles, AttemptOutcomeModel, ColorWeights, SocketRequirement};
//!
//! let requirement = SocketRequirement::new(3, "3R".parse().unwrap());
//! let model = AttemptOutcomeModel::chromatic(ColorWeights::uniform());
//! let table = compute_percentiles(&requirement, &model, &[0.5, 0.9]).unwrap();
//!
//! assert_eq!(table.get(0.5).unwrap().attempts, 19);
//! assert!(table.is_monotonic());
//! ```

pub mod bench;
pub mod color_bias;
pub mod comparison;
pub mod config;
pub mod constants;
pub mod distribution;
pub mod error;
pub mod outcomes;
pub mod percentiles;
pub mod simulation;
pub mod types;

pub use bench::BenchCraft;
pub use color_bias::{AttributeRequirements, ColorWeights};
pub use comparison::{cheapest_at, cheapest_on_average, compare_crafts, CraftComparison};
pub use config::EngineConfig;
pub use distribution::{geometric_quantile, CostDistribution};
pub use error::{ChromaticError, Result};
pub use outcomes::{AttemptOutcomeModel, Outcome};
pub use percentiles::{
    compute_percentiles, compute_percentiles_with, PercentileEntry, PercentileTable,
};
pub use simulation::{simulate_attempts, SimulationResult};
pub use types::{SocketColors, SocketRequirement};
