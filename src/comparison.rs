//! Compare every recoloring method for one item and target.
//!
//! Each applicable bench craft (plain chromatic included) is evaluated
//! independently, so the rows are computed in parallel. A craft that can never
//! produce the target stays in the result with `percentiles = None`; only
//! validation and convergence failures abort the comparison.

use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crate::bench::BenchCraft;
use crate::color_bias::ColorWeights;
use crate::config::EngineConfig;
use crate::error::{ChromaticError, Result};
use crate::outcomes::AttemptOutcomeModel;
use crate::percentiles::{compute_percentiles_with, PercentileTable};
use crate::types::SocketRequirement;

/// Result of one recoloring method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CraftComparison {
    pub label: String,
    pub craft: BenchCraft,
    /// Chance that one application produces the target.
    pub success_probability: f64,
    pub unit_cost: u32,
    /// Expected currency spent; infinite when the target is unreachable.
    pub mean_cost: f64,
    pub percentiles: Option<PercentileTable>,
}

/// Evaluate every bench craft that fits on the item, cheapest recipe first.
pub fn compare_crafts(
    requirement: &SocketRequirement,
    weights: &ColorWeights,
    quantiles: &[f64],
    config: &EngineConfig,
) -> Result<Vec<CraftComparison>> {
    requirement.validate()?;
    let start = Instant::now();

    let crafts = BenchCraft::applicable(requirement.sockets);
    let rows: Vec<Result<CraftComparison>> = crafts
        .par_iter()
        .map(|&craft| evaluate_craft(requirement, weights, craft, quantiles, config))
        .collect();
    let rows = rows.into_iter().collect::<Result<Vec<_>>>()?;

    tracing::info!(
        colors = %requirement.target,
        sockets = requirement.sockets,
        options = rows.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "compared recoloring options"
    );
    Ok(rows)
}

fn evaluate_craft(
    requirement: &SocketRequirement,
    weights: &ColorWeights,
    craft: BenchCraft,
    quantiles: &[f64],
    config: &EngineConfig,
) -> Result<CraftComparison> {
    let model = AttemptOutcomeModel::new(*weights, craft);
    let label = craft.to_string();

    match compute_percentiles_with(requirement, &model, quantiles, config) {
        Ok(table) => Ok(CraftComparison {
            label,
            craft,
            success_probability: table.success_probability,
            unit_cost: craft.cost,
            mean_cost: table.mean_attempts * craft.cost as f64,
            percentiles: Some(table),
        }),
        Err(ChromaticError::Impossible { .. }) => {
            tracing::warn!(craft = %label, colors = %requirement.target, "option cannot reach target");
            Ok(CraftComparison {
                label,
                craft,
                success_probability: 0.0,
                unit_cost: craft.cost,
                mean_cost: f64::INFINITY,
                percentiles: None,
            })
        }
        Err(e) => Err(e),
    }
}

/// Option with the lowest currency cost at `quantile`.
///
/// Ties go to the earlier (cheaper per attempt) row. Rows without the quantile
/// are skipped.
pub fn cheapest_at(rows: &[CraftComparison], quantile: f64) -> Option<&CraftComparison> {
    rows.iter()
        .filter_map(|row| {
            let cost = row.percentiles.as_ref()?.cost_at(quantile)?;
            Some((cost, row))
        })
        .min_by_key(|&(cost, _)| cost)
        .map(|(_, row)| row)
}

/// Option with the lowest expected currency cost.
pub fn cheapest_on_average(rows: &[CraftComparison]) -> Option<&CraftComparison> {
    rows.iter()
        .filter(|row| row.mean_cost.is_finite())
        .min_by(|a, b| a.mean_cost.total_cmp(&b.mean_cost))
}
