//! Crafting-bench recoloring options.
//!
//! A bench craft forces some sockets to fixed colors and rerolls the rest,
//! for a fixed price in chromatic orbs. The plain chromatic orb is modelled
//! as the craft that forces nothing and costs one orb, so every recoloring
//! method goes through the same code path.

use std::cmp::Reverse;
use std::fmt;

use serde::Serialize;

use crate::constants::*;
use crate::error::{ChromaticError, Result};
use crate::types::SocketColors;

/// One recoloring method: forced sockets plus the price of one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BenchCraft {
    pub forced: SocketColors,
    /// Price of one attempt, in chromatic orbs unless built with [`BenchCraft::with_cost`].
    pub cost: u32,
}

impl BenchCraft {
    /// A single chromatic orb.
    pub fn chromatic() -> Self {
        Self {
            forced: SocketColors::NONE,
            cost: 1,
        }
    }

    /// Look up the bench recipe that forces exactly `forced`.
    pub fn new(forced: SocketColors) -> Result<Self> {
        bench_cost(&forced)
            .map(|cost| Self { forced, cost })
            .ok_or_else(|| ChromaticError::UnknownCraft(forced.to_string()))
    }

    /// Same forced sockets, priced in another unit (e.g. gold).
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    pub fn is_chromatic(&self) -> bool {
        self.forced.total() == 0
    }

    /// Check that the craft fits on an item with `sockets` sockets.
    pub fn validate(&self, sockets: u8) -> Result<()> {
        let forced = self.forced.total();
        if forced > sockets {
            return Err(ChromaticError::CraftExceedsSockets {
                craft: self.to_string(),
                forced,
                sockets,
            });
        }
        Ok(())
    }

    /// Every recipe on the bench, cheapest first.
    pub fn catalogue() -> Vec<BenchCraft> {
        let max = MAX_FORCED_SOCKETS;
        let mut crafts = Vec::new();
        for r in 0..=max {
            for g in 0..=max - r {
                for b in 0..=max - r - g {
                    if let Ok(craft) = BenchCraft::new(SocketColors::new(r, g, b)) {
                        crafts.push(craft);
                    }
                }
            }
        }
        crafts.sort_by_key(|c| (c.cost, Reverse(c.forced.0)));
        crafts
    }

    /// Recipes that fit on an item with `sockets` sockets.
    pub fn applicable(sockets: u8) -> Vec<BenchCraft> {
        Self::catalogue()
            .into_iter()
            .filter(|c| c.forced.total() <= sockets)
            .collect()
    }
}

impl Default for BenchCraft {
    fn default() -> Self {
        Self::chromatic()
    }
}

impl fmt::Display for BenchCraft {
    /// `chromatic` or `bench 2R1G`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_chromatic() {
            write!(f, "chromatic")
        } else {
            write!(f, "bench {}", self.forced)
        }
    }
}

/// Bench price for a forced-color triple, or `None` if no recipe exists.
pub fn bench_cost(forced: &SocketColors) -> Option<u32> {
    let shape = forced.shape();
    BENCH_COSTS
        .iter()
        .find(|(s, _)| *s == shape)
        .map(|&(_, cost)| cost)
}
