//! Error type shared by every fallible operation in the crate.
//!
//! Variants fall into three groups: input validation, degenerate requirements
//! (the target cannot be rolled at all), and numerical failures of the engine.

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ChromaticError>;

/// Errors that can occur while building or querying a cost distribution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChromaticError {
    #[error("Invalid socket count: {sockets} sockets on an item that holds at most {capacity}")]
    InvalidSocketCount { sockets: u8, capacity: u8 },

    #[error("Target {target} needs {needed} sockets but the item has {sockets}")]
    TargetExceedsSockets {
        target: String,
        needed: u8,
        sockets: u8,
    },

    #[error("Bench craft {craft} forces {forced} sockets but the item has {sockets}")]
    CraftExceedsSockets {
        craft: String,
        forced: u8,
        sockets: u8,
    },

    #[error("No bench craft forces {0}")]
    UnknownCraft(String),

    #[error("Current coloring {current} does not match the item's {sockets} sockets")]
    CurrentMismatch { current: String, sockets: u8 },

    #[error("Invalid probability for {color}: {value}")]
    InvalidProbability { color: char, value: f64 },

    #[error("Success probability {0} is outside (0, 1]")]
    InvalidSuccessProbability(f64),

    #[error("Color probabilities sum to {sum}, expected 1")]
    ProbabilitySum { sum: f64 },

    #[error("Quantile {0} is outside (0, 1)")]
    InvalidQuantile(f64),

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot parse socket colors from {0:?}")]
    ParseColors(String),

    #[error("Target {target} is impossible: success chance per attempt is zero")]
    Impossible { target: String },

    #[error("Quantile {quantile} lies beyond the materialized mass {covered}")]
    QuantileBeyondHorizon { quantile: f64, covered: f64 },

    #[error(
        "Distribution did not converge: horizon {horizon} exceeds {max_attempts} attempts \
         (residual mass {residual:e})"
    )]
    NonConvergence {
        horizon: u64,
        max_attempts: u64,
        residual: f64,
    },
}

impl ChromaticError {
    /// True for errors caused by malformed caller input.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            ChromaticError::Impossible { .. }
                | ChromaticError::NonConvergence { .. }
                | ChromaticError::QuantileBeyondHorizon { .. }
        )
    }
}
