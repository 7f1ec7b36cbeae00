//! Outcome model for a single recoloring attempt.
//!
//! Forced sockets keep their color; each free socket rolls independently with
//! the item's [`ColorWeights`]. The free sockets therefore follow a multinomial
//! distribution, and with at most six sockets every outcome can be enumerated
//! exactly (at most C(8, 2) = 28 colorings).

use serde::Serialize;

use crate::bench::BenchCraft;
use crate::color_bias::ColorWeights;
use crate::constants::*;
use crate::error::Result;
use crate::types::{SocketColors, SocketRequirement};

/// One possible result of an attempt and its probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outcome {
    /// Full coloring of the item, forced sockets included.
    pub colors: SocketColors,
    pub probability: f64,
}

/// How one attempt recolors an item: color bias plus recoloring method.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AttemptOutcomeModel {
    pub weights: ColorWeights,
    pub craft: BenchCraft,
}

impl AttemptOutcomeModel {
    pub fn new(weights: ColorWeights, craft: BenchCraft) -> Self {
        Self { weights, craft }
    }

    /// Plain chromatic orbs on an item with the given bias.
    pub fn chromatic(weights: ColorWeights) -> Self {
        Self::new(weights, BenchCraft::chromatic())
    }

    /// Price of one attempt.
    pub fn unit_cost(&self) -> u32 {
        self.craft.cost
    }

    /// Exact PMF over the colorings one attempt can produce on `sockets` sockets.
    ///
    /// Zero-probability colorings are kept so the list always covers every
    /// composition of the free sockets.
    pub fn outcomes(&self, sockets: u8) -> Result<Vec<Outcome>> {
        self.craft.validate(sockets)?;
        let free = sockets - self.craft.forced.total();

        let mut out = Vec::new();
        for r in 0..=free {
            for g in 0..=free - r {
                let rolled = SocketColors::new(r, g, free - r - g);
                out.push(Outcome {
                    colors: rolled + self.craft.forced,
                    probability: multinomial_pmf(&rolled, &self.weights),
                });
            }
        }
        Ok(out)
    }

    /// Chance that a single attempt meets the requirement.
    ///
    /// Validates both the requirement and the craft against the item.
    pub fn success_probability(&self, requirement: &SocketRequirement) -> Result<f64> {
        requirement.validate()?;
        let p: f64 = self
            .outcomes(requirement.sockets)?
            .iter()
            .filter(|o| o.colors.satisfies(&requirement.target))
            .map(|o| o.probability)
            .sum();
        Ok(p.clamp(0.0, 1.0))
    }
}

/// Multinomial mass of rolling exactly `counts` on `counts.total()` free sockets.
pub fn multinomial_pmf(counts: &SocketColors, weights: &ColorWeights) -> f64 {
    let n = counts.total() as usize;
    let mut coeff = FACTORIALS[n];
    let mut mass = 1.0f64;
    for c in 0..NUM_COLORS {
        let k = counts.0[c];
        coeff /= FACTORIALS[k as usize];
        mass *= weights.get(c).powi(k as i32);
    }
    coeff as f64 * mass
}
