//! Percentile tables — the answer to "how much should I budget?".
//!
//! A [`PercentileTable`] maps each requested quantile to the fewest attempts
//! (and the matching currency cost) that reach it with at least that
//! probability. The 90% entry reads: with 90% probability the target is hit
//! within this many attempts.

use serde::Serialize;

use crate::config::EngineConfig;
use crate::distribution::CostDistribution;
use crate::error::{ChromaticError, Result};
use crate::outcomes::AttemptOutcomeModel;
use crate::types::SocketRequirement;

/// One row of a percentile table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileEntry {
    pub quantile: f64,
    pub attempts: u64,
    /// `attempts * unit_cost`.
    pub cost: u64,
}

/// Percentiles of a cost distribution, sorted by quantile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileTable {
    pub entries: Vec<PercentileEntry>,
    pub unit_cost: u32,
    pub success_probability: f64,
    pub mean_attempts: f64,
    pub std_dev_attempts: f64,
    /// Mass beyond the materialized horizon.
    pub truncation_error: f64,
}

impl PercentileTable {
    /// Read the requested quantiles off `dist`.
    ///
    /// Quantiles are sorted ascending and exact duplicates collapse.
    pub fn from_distribution(dist: &CostDistribution, quantiles: &[f64]) -> Result<Self> {
        let sorted = sorted_quantiles(quantiles)?;
        let attempts = dist.percentiles(&sorted)?;
        let unit_cost = dist.unit_cost();

        let entries = sorted
            .iter()
            .zip(attempts)
            .map(|(&quantile, attempts)| PercentileEntry {
                quantile,
                attempts,
                cost: attempts.saturating_mul(unit_cost as u64),
            })
            .collect();

        Ok(Self {
            entries,
            unit_cost,
            success_probability: dist.success_probability(),
            mean_attempts: dist.mean_attempts(),
            std_dev_attempts: dist.std_dev_attempts(),
            truncation_error: dist.residual(),
        })
    }

    /// Entry for an exact quantile, if it was requested.
    pub fn get(&self, quantile: f64) -> Option<&PercentileEntry> {
        self.entries.iter().find(|e| e.quantile == quantile)
    }

    /// Currency cost at `quantile`, if it was requested.
    pub fn cost_at(&self, quantile: f64) -> Option<u64> {
        self.get(quantile).map(|e| e.cost)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PercentileEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if costs never decrease as the quantile grows.
    pub fn is_monotonic(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].quantile <= w[1].quantile && w[0].attempts <= w[1].attempts)
    }
}

/// Percentile table for `requirement` under `model`, with default truncation.
pub fn compute_percentiles(
    requirement: &SocketRequirement,
    model: &AttemptOutcomeModel,
    quantiles: &[f64],
) -> Result<PercentileTable> {
    compute_percentiles_with(requirement, model, quantiles, &EngineConfig::default())
}

/// Like [`compute_percentiles`] with explicit truncation settings.
///
/// Coverage is raised to the largest requested quantile so every entry lies
/// inside the materialized support.
pub fn compute_percentiles_with(
    requirement: &SocketRequirement,
    model: &AttemptOutcomeModel,
    quantiles: &[f64],
    config: &EngineConfig,
) -> Result<PercentileTable> {
    let sorted = sorted_quantiles(quantiles)?;
    let coverage = sorted
        .last()
        .map_or(config.coverage, |&q| q.max(config.coverage));
    let config = config.with_coverage(coverage);

    let dist = CostDistribution::build(requirement, model, &config)?;
    PercentileTable::from_distribution(&dist, &sorted)
}

/// Reject quantiles outside the open interval `(0, 1)`.
pub fn validate_quantile(q: f64) -> Result<()> {
    if q > 0.0 && q < 1.0 {
        Ok(())
    } else {
        Err(ChromaticError::InvalidQuantile(q))
    }
}

fn sorted_quantiles(quantiles: &[f64]) -> Result<Vec<f64>> {
    for &q in quantiles {
        validate_quantile(q)?;
    }
    let mut sorted = quantiles.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::BenchCraft;
    use crate::color_bias::ColorWeights;
    use crate::constants::DEFAULT_QUANTILES;
    use crate::types::SocketColors;

    #[test]
    fn test_validate_quantile() {
        assert!(validate_quantile(0.5).is_ok());
        for q in [0.0, 1.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                validate_quantile(q),
                Err(ChromaticError::InvalidQuantile(_))
            ));
        }
    }

    #[test]
    fn test_table_sorted_and_deduped() {
        let model = AttemptOutcomeModel::chromatic(ColorWeights::uniform());
        let req = SocketRequirement::new(3, SocketColors::new(3, 0, 0));
        let table = compute_percentiles(&req, &model, &[0.99, 0.5, 0.9, 0.5]).unwrap();

        let qs: Vec<f64> = table.iter().map(|e| e.quantile).collect();
        assert_eq!(qs, vec![0.5, 0.9, 0.99]);
        assert!(table.is_monotonic());
        assert_eq!(table.get(0.5).unwrap().attempts, 19);
    }

    #[test]
    fn test_cost_scales_with_unit_price() {
        let craft = BenchCraft::new(SocketColors::new(2, 0, 0)).unwrap();
        let model = AttemptOutcomeModel::new(ColorWeights::uniform(), craft);
        let req = SocketRequirement::new(4, SocketColors::new(3, 0, 0));
        let table = compute_percentiles(&req, &model, &DEFAULT_QUANTILES).unwrap();

        assert_eq!(table.unit_cost, 25);
        for e in table.iter() {
            assert_eq!(e.cost, e.attempts * 25);
        }
    }

    #[test]
    fn test_empty_quantiles() {
        let model = AttemptOutcomeModel::chromatic(ColorWeights::uniform());
        let req = SocketRequirement::new(2, SocketColors::new(1, 0, 0));
        let table = compute_percentiles(&req, &model, &[]).unwrap();
        assert!(table.is_empty());
        assert!(table.is_monotonic());
    }

    #[test]
    fn test_coverage_raised_to_largest_quantile() {
        let config = EngineConfig::default().with_coverage(0.5);
        let model = AttemptOutcomeModel::chromatic(ColorWeights::uniform());
        let req = SocketRequirement::new(3, SocketColors::new(0, 3, 0));
        let table = compute_percentiles_with(&req, &model, &[0.999], &config).unwrap();
        assert!(table.truncation_error <= 0.001);
        assert!(table.entries[0].attempts > 100);
    }

    #[test]
    fn test_invalid_quantile_rejected_before_work() {
        let model = AttemptOutcomeModel::chromatic(ColorWeights::uniform());
        let req = SocketRequirement::new(9, SocketColors::NONE);
        assert!(matches!(
            compute_percentiles(&req, &model, &[0.5, 1.0]),
            Err(ChromaticError::InvalidQuantile(_))
        ));
    }
}
