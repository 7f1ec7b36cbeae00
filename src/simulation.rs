//! Monte Carlo cross-check — roll colorings until the target appears.
//!
//! Each run owns a `SmallRng` seeded with `seed + run`, so a batch is
//! reproducible regardless of how rayon schedules it. The sample mean should
//! converge to `1 / p` and empirical quantiles to the exact percentiles from
//! [`crate::distribution`].

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use crate::color_bias::ColorWeights;
use crate::constants::*;
use crate::error::{ChromaticError, Result};
use crate::outcomes::AttemptOutcomeModel;
use crate::percentiles::validate_quantile;
use crate::types::{SocketColors, SocketRequirement};

/// Results of a batch of simulated recoloring sessions.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    /// Attempts used per run, sorted ascending.
    pub attempts: Vec<u64>,
    /// Runs that hit `max_attempts` without success (recorded at the cap).
    pub capped: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: u64,
    pub max: u64,
    pub median: u64,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl SimulationResult {
    /// Empirical quantile: smallest sample with at least `q` of runs at or below it.
    pub fn quantile(&self, q: f64) -> Result<u64> {
        validate_quantile(q)?;
        let n = self.attempts.len();
        let rank = ((q * n as f64).ceil() as usize).clamp(1, n);
        Ok(self.attempts[rank - 1])
    }
}

/// Roll one coloring: forced sockets plus independently colored free sockets.
#[inline]
fn roll_colors(
    forced: &SocketColors,
    free: u8,
    weights: &ColorWeights,
    rng: &mut SmallRng,
) -> SocketColors {
    let w = weights.as_array();
    let mut counts = forced.0;
    for _ in 0..free {
        let u: f64 = rng.random();
        let color = if u < w[RED] {
            RED
        } else if u < w[RED] + w[GREEN] {
            GREEN
        } else {
            BLUE
        };
        counts[color] += 1;
    }
    SocketColors(counts)
}

/// Attempts until success for one run, capped at `max_attempts`.
fn simulate_run(
    requirement: &SocketRequirement,
    model: &AttemptOutcomeModel,
    max_attempts: u64,
    rng: &mut SmallRng,
) -> (u64, bool) {
    let forced = model.craft.forced;
    let free = requirement.sockets - forced.total();
    for attempt in 1..=max_attempts {
        let rolled = roll_colors(&forced, free, &model.weights, rng);
        if rolled.satisfies(&requirement.target) {
            return (attempt, false);
        }
    }
    (max_attempts, true)
}

/// Simulate `num_runs` independent sessions in parallel.
///
/// A requirement that is already met costs zero attempts in every run; one
/// that can never be met is rejected up front rather than spinning to the cap.
pub fn simulate_attempts(
    model: &AttemptOutcomeModel,
    requirement: &SocketRequirement,
    num_runs: usize,
    seed: u64,
    max_attempts: u64,
) -> Result<SimulationResult> {
    if num_runs == 0 || max_attempts == 0 {
        return Err(ChromaticError::InvalidConfig(
            "simulation needs at least one run and one attempt".to_string(),
        ));
    }
    let p = model.success_probability(requirement)?;
    let satisfied = requirement.is_satisfied();
    if !satisfied && p <= 0.0 {
        return Err(ChromaticError::Impossible {
            target: requirement.target.to_string(),
        });
    }

    let start = Instant::now();
    let runs: Vec<(u64, bool)> = (0..num_runs)
        .into_par_iter()
        .map(|i| {
            if satisfied {
                return (0, false);
            }
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            simulate_run(requirement, model, max_attempts, &mut rng)
        })
        .collect();
    let elapsed = start.elapsed();

    let capped = runs.iter().filter(|&&(_, hit_cap)| hit_cap).count();
    let mut attempts: Vec<u64> = runs.into_iter().map(|(a, _)| a).collect();
    attempts.sort_unstable();

    let n = attempts.len() as f64;
    let mean = attempts.iter().map(|&a| a as f64).sum::<f64>() / n;
    let variance = attempts
        .iter()
        .map(|&a| (a as f64 - mean).powi(2))
        .sum::<f64>()
        / n;

    let result = SimulationResult {
        capped,
        mean,
        std_dev: variance.sqrt(),
        min: attempts[0],
        max: attempts[attempts.len() - 1],
        median: attempts[attempts.len() / 2],
        attempts,
        elapsed,
    };

    tracing::info!(
        runs = num_runs,
        seed,
        mean = result.mean,
        median = result.median,
        capped,
        elapsed_ms = elapsed.as_millis() as u64,
        "simulation complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::BenchCraft;

    #[test]
    fn test_simulation_deterministic_for_seed() {
        let model = AttemptOutcomeModel::chromatic(ColorWeights::uniform());
        let req = SocketRequirement::new(3, SocketColors::new(2, 0, 0));
        let a = simulate_attempts(&model, &req, 500, 42, 10_000).unwrap();
        let b = simulate_attempts(&model, &req, 500, 42, 10_000).unwrap();
        assert_eq!(a.attempts, b.attempts);
        assert_eq!(a.capped, 0);
        assert!(a.min >= 1);
    }

    #[test]
    fn test_simulation_already_met() {
        let model = AttemptOutcomeModel::chromatic(ColorWeights::uniform());
        let req = SocketRequirement::new(2, SocketColors::new(1, 0, 0))
            .with_current(SocketColors::new(1, 1, 0));
        let result = simulate_attempts(&model, &req, 10, 0, 100).unwrap();
        assert!(result.attempts.iter().all(|&a| a == 0));
        assert_eq!(result.quantile(0.99).unwrap(), 0);
    }

    #[test]
    fn test_simulation_certain_craft() {
        let craft = BenchCraft::new(SocketColors::new(0, 2, 0)).unwrap();
        let model = AttemptOutcomeModel::new(ColorWeights::uniform(), craft);
        let req = SocketRequirement::new(2, SocketColors::new(0, 2, 0));
        let result = simulate_attempts(&model, &req, 50, 7, 100).unwrap();
        assert_eq!(result.max, 1);
        assert_eq!(result.mean, 1.0);
    }

    #[test]
    fn test_simulation_rejects_impossible() {
        let weights = ColorWeights::new([1.0, 0.0, 0.0]).unwrap();
        let model = AttemptOutcomeModel::chromatic(weights);
        let req = SocketRequirement::new(1, SocketColors::new(0, 1, 0));
        assert!(matches!(
            simulate_attempts(&model, &req, 10, 0, 100),
            Err(ChromaticError::Impossible { .. })
        ));
        assert!(simulate_attempts(&model, &req, 0, 0, 100).is_err());
    }

    #[test]
    fn test_simulation_cap() {
        let weights = ColorWeights::new([0.999, 0.0005, 0.0005]).unwrap();
        let model = AttemptOutcomeModel::chromatic(weights);
        let req = SocketRequirement::new(6, SocketColors::new(0, 0, 6));
        let result = simulate_attempts(&model, &req, 20, 1, 5).unwrap();
        assert_eq!(result.capped, 20);
        assert_eq!(result.max, 5);
    }
}
