//! Per-socket color probabilities.
//!
//! Every free socket rolls its color independently. The weights depend on the
//! item's attribute requirements: strength favors red, dexterity green and
//! intelligence blue. Three cases:
//!
//! | Requirements | On-color chance | Off-color chance |
//! |--------------|-----------------|------------------|
//! | none or all three | 1/3 each | — |
//! | one (R) | 0.9 (R + 10) / (R + 20) | (1 − on) / 2 each |
//! | two (R1, R2) | 0.9 R1 / (R1 + R2) and 0.9 R2 / (R1 + R2) | 0.1 |

use serde::Serialize;

use crate::constants::*;
use crate::error::{ChromaticError, Result};

/// Strength, dexterity and intelligence requirements of an item base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AttributeRequirements {
    pub strength: u32,
    pub dexterity: u32,
    pub intelligence: u32,
}

impl AttributeRequirements {
    pub fn new(strength: u32, dexterity: u32, intelligence: u32) -> Self {
        Self {
            strength,
            dexterity,
            intelligence,
        }
    }

    /// Requirements in color order (red, green, blue).
    pub fn as_array(&self) -> [u32; NUM_COLORS] {
        [self.strength, self.dexterity, self.intelligence]
    }

    /// Number of non-zero requirements.
    pub fn count(&self) -> usize {
        self.as_array().iter().filter(|&&r| r > 0).count()
    }
}

/// Probability that one free socket rolls each color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorWeights([f64; NUM_COLORS]);

impl ColorWeights {
    /// Every color equally likely.
    pub fn uniform() -> Self {
        Self([1.0 / NUM_COLORS as f64; NUM_COLORS])
    }

    /// Explicit probabilities in color order. Each must lie in `[0, 1]` and
    /// they must sum to one.
    pub fn new(weights: [f64; NUM_COLORS]) -> Result<Self> {
        for (c, &w) in weights.iter().enumerate() {
            if !w.is_finite() || !(0.0..=1.0).contains(&w) {
                return Err(ChromaticError::InvalidProbability {
                    color: COLOR_LETTERS[c],
                    value: w,
                });
            }
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(ChromaticError::ProbabilitySum { sum });
        }
        Ok(Self(weights))
    }

    /// Weights produced by the attribute bias of an item base.
    pub fn from_attributes(reqs: &AttributeRequirements) -> Self {
        let attrs = reqs.as_array();

        // Color indices ordered by requirement, largest first. Stable sort keeps
        // red before green before blue on ties.
        let mut order: [usize; NUM_COLORS] = [RED, GREEN, BLUE];
        order.sort_by(|&a, &b| attrs[b].cmp(&attrs[a]));
        let hi = attrs[order[0]] as f64;
        let lo = attrs[order[1]] as f64;

        let mut weights = [0.0f64; NUM_COLORS];
        match reqs.count() {
            1 => {
                let on = on_color_chance_single(hi);
                let off = (1.0 - on) / 2.0;
                weights[order[0]] = on;
                weights[order[1]] = off;
                weights[order[2]] = off;
            }
            2 => {
                let on_hi = ON_COLOR_WEIGHT * hi / (hi + lo);
                weights[order[0]] = on_hi;
                weights[order[1]] = ON_COLOR_WEIGHT - on_hi;
                weights[order[2]] = DUAL_REQ_OFF_COLOR_CHANCE;
            }
            _ => return Self::uniform(),
        }
        Self(weights)
    }

    pub fn as_array(&self) -> [f64; NUM_COLORS] {
        self.0
    }

    pub fn get(&self, color: usize) -> f64 {
        self.0[color]
    }
}

impl Default for ColorWeights {
    fn default() -> Self {
        Self::uniform()
    }
}

/// On-color chance for an item with a single attribute requirement `r`.
fn on_color_chance_single(r: f64) -> f64 {
    ON_COLOR_WEIGHT * (r + SINGLE_REQ_NUMERATOR_OFFSET) / (r + SINGLE_REQ_DENOMINATOR_OFFSET)
}
