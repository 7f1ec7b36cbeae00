//! Exact cost distribution — attempts until the target coloring first appears.
//!
//! Attempts are independent, so with per-attempt success chance `p` the number
//! of attempts `K` is geometric: `P(K = k) = p (1 − p)^(k − 1)` for `k ≥ 1`.
//! Instead of reporting only the mean `1/p` and standard deviation, the PMF is
//! materialized bucket by bucket until its cumulative mass reaches the coverage
//! threshold, and percentiles are read off the CDF.
//!
//! The CDF is kept as its complement `P(K > k)`, evaluated in closed form per
//! bucket. A running sum of PMF terms drifts by a few ulps near `q = 1`.
//!
//! Buckets beyond the horizon are not stored; their mass `(1 − p)^horizon` is
//! reported as [`CostDistribution::residual`]. If the horizon needed for the
//! requested coverage exceeds the configured maximum, construction fails with
//! [`ChromaticError::NonConvergence`] instead of allocating without bound.

use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::{ChromaticError, Result};
use crate::outcomes::AttemptOutcomeModel;
use crate::percentiles::validate_quantile;
use crate::types::SocketRequirement;

/// PMF over the number of attempts needed, plus the parameters it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostDistribution {
    /// `pmf[k]` = probability that the target first appears on attempt `k`.
    pmf: Vec<f64>,
    /// `tail[k]` = probability that more than `k` attempts are needed.
    tail: Vec<f64>,
    /// Per-attempt success chance (1 for point masses).
    success_probability: f64,
    /// Price of one attempt.
    unit_cost: u32,
    /// Mass beyond the last stored bucket.
    residual: f64,
    /// Exact (untruncated) mean attempts.
    mean_attempts: f64,
    /// Exact (untruncated) standard deviation of attempts.
    std_dev_attempts: f64,
}

impl CostDistribution {
    /// Distribution of attempts needed to meet `requirement` using `model`.
    ///
    /// An already-met requirement yields a point mass at zero attempts. A
    /// requirement that no attempt can satisfy is [`ChromaticError::Impossible`].
    pub fn build(
        requirement: &SocketRequirement,
        model: &AttemptOutcomeModel,
        config: &EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        requirement.validate()?;
        model.craft.validate(requirement.sockets)?;

        if requirement.is_satisfied() {
            tracing::debug!(colors = %requirement.target, "requirement already met");
            return Ok(Self::point_mass(0, model.unit_cost()));
        }

        let p = model.success_probability(requirement)?;
        if p <= 0.0 {
            return Err(ChromaticError::Impossible {
                target: requirement.target.to_string(),
            });
        }

        let dist = Self::geometric(p, model.unit_cost(), config)?;
        tracing::debug!(
            colors = %requirement.target,
            craft = %model.craft,
            p,
            horizon = dist.horizon(),
            residual = dist.residual,
            "materialized cost distribution"
        );
        Ok(dist)
    }

    /// All mass on a single, small attempt count (0 or 1 in practice).
    pub(crate) fn point_mass(attempts: u64, unit_cost: u32) -> Self {
        let len = attempts as usize + 1;
        let mut pmf = vec![0.0f64; len];
        pmf[attempts as usize] = 1.0;
        let mut tail = vec![1.0f64; len];
        tail[attempts as usize] = 0.0;
        Self {
            pmf,
            tail,
            success_probability: 1.0,
            unit_cost,
            residual: 0.0,
            mean_attempts: attempts as f64,
            std_dev_attempts: 0.0,
        }
    }

    /// Geometric distribution with success chance `p`, truncated once the
    /// cumulative mass reaches `config.coverage`.
    pub fn geometric(p: f64, unit_cost: u32, config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        if !(p > 0.0 && p <= 1.0) {
            return Err(ChromaticError::InvalidSuccessProbability(p));
        }
        if p >= 1.0 {
            return Ok(Self::point_mass(1, unit_cost));
        }

        // Reject hopeless cases before allocating anything.
        let estimate = geometric_quantile(p, config.coverage);
        if estimate > config.max_attempts {
            return Err(ChromaticError::NonConvergence {
                horizon: estimate,
                max_attempts: config.max_attempts,
                residual: survival(p, config.max_attempts),
            });
        }

        let fail = 1.0 - p;
        let allowed_tail = 1.0 - config.coverage;
        let mut pmf = Vec::with_capacity(estimate as usize + 2);
        let mut tail = Vec::with_capacity(estimate as usize + 2);
        pmf.push(0.0);
        tail.push(1.0);
        let mut surviving = 1.0f64;

        // Same comparison `percentiles` uses, so every quantile up to the
        // coverage is found inside the stored buckets.
        while surviving > allowed_tail {
            let k = pmf.len() as u64;
            if k > config.max_attempts {
                return Err(ChromaticError::NonConvergence {
                    horizon: k,
                    max_attempts: config.max_attempts,
                    residual: surviving,
                });
            }
            pmf.push(surviving * p);
            surviving = survival(p, k);
            tail.push(surviving);
        }

        Ok(Self {
            pmf,
            tail,
            success_probability: p,
            unit_cost,
            residual: surviving,
            mean_attempts: 1.0 / p,
            std_dev_attempts: fail.sqrt() / p,
        })
    }

    /// Stored PMF, indexed by attempt count.
    pub fn pmf(&self) -> &[f64] {
        &self.pmf
    }

    /// Non-zero `(attempts, probability)` pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.pmf
            .iter()
            .enumerate()
            .filter(|(_, &p)| p > 0.0)
            .map(|(k, &p)| (k as u64, p))
    }

    /// `P(K = attempts)`; zero beyond the horizon.
    pub fn probability(&self, attempts: u64) -> f64 {
        self.pmf.get(attempts as usize).copied().unwrap_or(0.0)
    }

    /// `P(K <= attempts)`, capped at the stored mass past the horizon.
    pub fn cdf(&self, attempts: u64) -> f64 {
        let k = (attempts as usize).min(self.tail.len() - 1);
        1.0 - self.tail[k]
    }

    /// Largest attempt count with a stored bucket.
    pub fn horizon(&self) -> u64 {
        (self.pmf.len() - 1) as u64
    }

    /// Sum of the stored buckets.
    pub fn total_mass(&self) -> f64 {
        self.pmf.iter().sum()
    }

    /// Mass beyond the horizon (truncation error).
    pub fn residual(&self) -> f64 {
        self.residual
    }

    pub fn success_probability(&self) -> f64 {
        self.success_probability
    }

    pub fn unit_cost(&self) -> u32 {
        self.unit_cost
    }

    pub fn mean_attempts(&self) -> f64 {
        self.mean_attempts
    }

    pub fn std_dev_attempts(&self) -> f64 {
        self.std_dev_attempts
    }

    /// Expected currency spent.
    pub fn mean_cost(&self) -> f64 {
        self.mean_attempts * self.unit_cost as f64
    }

    pub fn std_dev_cost(&self) -> f64 {
        self.std_dev_attempts * self.unit_cost as f64
    }

    /// Smallest attempt count whose CDF reaches `quantile`.
    pub fn percentile(&self, quantile: f64) -> Result<u64> {
        Ok(self.percentiles(&[quantile])?[0])
    }

    /// Percentiles for every quantile, in the caller's order.
    ///
    /// One ascending pass over the CDF serves all quantiles.
    pub fn percentiles(&self, quantiles: &[f64]) -> Result<Vec<u64>> {
        for &q in quantiles {
            validate_quantile(q)?;
        }

        let mut order: Vec<usize> = (0..quantiles.len()).collect();
        order.sort_by(|&a, &b| quantiles[a].total_cmp(&quantiles[b]));

        let mut out = vec![0u64; quantiles.len()];
        let mut next = 0;

        // `K <= k` reaches `q` once `P(K > k) <= 1 - q`; `1 - q` is exact for
        // q >= 0.5, which keeps extreme quantiles sharp.
        for (attempts, &beyond) in self.tail.iter().enumerate() {
            while next < order.len() && beyond <= 1.0 - quantiles[order[next]] {
                out[order[next]] = attempts as u64;
                next += 1;
            }
            if next == order.len() {
                break;
            }
        }

        if next < order.len() {
            return Err(ChromaticError::QuantileBeyondHorizon {
                quantile: quantiles[order[next]],
                covered: 1.0 - self.residual,
            });
        }
        Ok(out)
    }
}

/// Closed-form geometric inverse CDF: the smallest `k >= 1` with
/// `1 − (1 − p)^k >= quantile`.
///
/// Expects `0 < p <= 1` and `0 < quantile < 1`. A success chance that is not
/// positive (or NaN) never succeeds and maps to `u64::MAX`.
/// Uses `ln_1p` so tiny `p` keeps full precision.
pub fn geometric_quantile(p: f64, quantile: f64) -> u64 {
    if p.is_nan() || p <= 0.0 {
        return u64::MAX;
    }
    if p >= 1.0 {
        return 1;
    }
    let k = ((-quantile).ln_1p() / (-p).ln_1p()).ceil();
    if k >= u64::MAX as f64 {
        u64::MAX
    } else {
        (k as u64).max(1)
    }
}

/// `(1 − p)^k`: chance that the first `k` attempts all fail.
pub fn survival(p: f64, k: u64) -> f64 {
    (k as f64 * (-p).ln_1p()).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_bias::ColorWeights;
    use crate::types::SocketColors;

    fn cfg() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_point_mass_at_zero() {
        let dist = CostDistribution::point_mass(0, 1);
        assert_eq!(dist.pmf(), &[1.0]);
        assert_eq!(dist.percentile(0.99).unwrap(), 0);
        assert_eq!(dist.mean_cost(), 0.0);
        assert_eq!(dist.residual(), 0.0);
    }

    #[test]
    fn test_geometric_mass_and_residual() {
        let dist = CostDistribution::geometric(0.2, 1, &cfg()).unwrap();
        assert_eq!(dist.probability(0), 0.0);
        assert!((dist.probability(1) - 0.2).abs() < 1e-15);
        assert!((dist.probability(2) - 0.16).abs() < 1e-15);

        let total = dist.total_mass();
        assert!(dist.residual() <= 1.0 - cfg().coverage);
        assert!((total + dist.residual() - 1.0).abs() < 1e-12);
        assert_eq!(dist.residual(), survival(0.2, dist.horizon()));
    }

    #[test]
    fn test_cdf_is_closed_form_inside_horizon() {
        let p = 0.15;
        let dist = CostDistribution::geometric(p, 1, &cfg()).unwrap();
        assert_eq!(dist.cdf(0), 0.0);
        for k in [1, 2, 5, 20, dist.horizon()] {
            let exact = 1.0 - (1.0 - p).powi(k as i32);
            assert!((dist.cdf(k) - exact).abs() < 1e-12, "k={k}");
        }
        // Past the horizon only the stored mass is reported.
        assert_eq!(dist.cdf(dist.horizon() + 100), 1.0 - dist.residual());
    }

    #[test]
    fn test_iter_skips_empty_buckets() {
        let dist = CostDistribution::geometric(0.5, 1, &cfg()).unwrap();
        let pairs: Vec<(u64, f64)> = dist.iter().take(3).collect();
        let expected = [(1, 0.5), (2, 0.25), (3, 0.125)];
        for ((k, mass), (want_k, want)) in pairs.into_iter().zip(expected) {
            assert_eq!(k, want_k);
            assert!((mass - want).abs() < 1e-15);
        }
        assert_eq!(dist.iter().count() as u64, dist.horizon());
    }

    #[test]
    fn test_cost_statistics_scale_with_unit_cost() {
        let dist = CostDistribution::geometric(0.25, 15, &cfg()).unwrap();
        assert_eq!(dist.mean_cost(), dist.mean_attempts() * 15.0);
        assert_eq!(dist.std_dev_cost(), dist.std_dev_attempts() * 15.0);
        // sqrt(0.75) / 0.25
        assert!((dist.std_dev_attempts() - 0.75f64.sqrt() / 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_extreme_quantile_matches_closed_form() {
        let p = 1.0 / 27.0;
        let q = 0.9999999999999999;
        let config = EngineConfig::default().with_coverage(q);
        let dist = CostDistribution::geometric(p, 1, &config).unwrap();
        let k = dist.percentile(q).unwrap();
        assert_eq!(k, geometric_quantile(p, q));
        assert_eq!(k, 974);
        assert!(dist.residual() <= 1.0 - q);
        assert!(survival(p, k - 1) > 1.0 - q);
    }

    #[test]
    fn test_certain_success() {
        let dist = CostDistribution::geometric(1.0, 25, &cfg()).unwrap();
        assert_eq!(dist.percentiles(&[0.5, 0.99]).unwrap(), vec![1, 1]);
        assert_eq!(dist.mean_cost(), 25.0);
    }

    #[test]
    fn test_percentiles_match_closed_form() {
        let p = 1.0 / 27.0;
        let dist = CostDistribution::geometric(p, 1, &cfg()).unwrap();
        // ln(0.5) / ln(26/27) = 18.37.
        assert_eq!(dist.percentile(0.5).unwrap(), 19);
        for q in [0.1, 0.66, 0.8, 0.9, 0.95, 0.99] {
            assert_eq!(dist.percentile(q).unwrap(), geometric_quantile(p, q), "q={q}");
        }
    }

    #[test]
    fn test_percentiles_keep_caller_order() {
        let dist = CostDistribution::geometric(0.1, 1, &cfg()).unwrap();
        let ps = dist.percentiles(&[0.9, 0.5, 0.99]).unwrap();
        assert!(ps[1] <= ps[0] && ps[0] <= ps[2]);
    }

    #[test]
    fn test_quantile_beyond_horizon() {
        let config = EngineConfig::default().with_coverage(0.9);
        let dist = CostDistribution::geometric(0.3, 1, &config).unwrap();
        assert!(matches!(
            dist.percentile(0.999),
            Err(ChromaticError::QuantileBeyondHorizon { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_success_probability() {
        for p in [0.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                CostDistribution::geometric(p, 1, &cfg()),
                Err(ChromaticError::InvalidSuccessProbability(_))
            ));
        }
    }

    #[test]
    fn test_non_convergence() {
        let config = EngineConfig::default().with_max_attempts(100);
        let err = CostDistribution::geometric(1e-4, 1, &config).unwrap_err();
        match err {
            ChromaticError::NonConvergence {
                horizon,
                max_attempts,
                residual,
            } => {
                assert!(horizon > 100);
                assert_eq!(max_attempts, 100);
                assert!(residual > 0.98);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_build_impossible() {
        let weights = ColorWeights::new([0.5, 0.5, 0.0]).unwrap();
        let model = AttemptOutcomeModel::chromatic(weights);
        let req = SocketRequirement::new(3, SocketColors::new(0, 0, 1));
        assert!(matches!(
            CostDistribution::build(&req, &model, &cfg()),
            Err(ChromaticError::Impossible { .. })
        ));
    }

    #[test]
    fn test_build_already_met() {
        let model = AttemptOutcomeModel::chromatic(ColorWeights::uniform());
        let req = SocketRequirement::new(4, SocketColors::new(2, 0, 0))
            .with_current(SocketColors::new(2, 1, 1));
        let dist = CostDistribution::build(&req, &model, &cfg()).unwrap();
        assert_eq!(dist.horizon(), 0);
        assert_eq!(dist.percentile(0.95).unwrap(), 0);
    }

    #[test]
    fn test_geometric_quantile_edges() {
        assert_eq!(geometric_quantile(1.0, 0.99), 1);
        assert_eq!(geometric_quantile(0.5, 0.5), 1);
        // 1 - 0.99^229 = 0.8999..., 1 - 0.99^230 = 0.9010...
        assert_eq!(geometric_quantile(0.01, 0.9), 230);
        assert_eq!(geometric_quantile(0.0, 0.5), u64::MAX);
        assert_eq!(geometric_quantile(-0.3, 0.5), u64::MAX);
        assert_eq!(geometric_quantile(f64::NAN, 0.5), u64::MAX);
    }
}
