//! Engine configuration and process-wide setup.
//!
//! Consolidates the `CHROMATIC_COVERAGE`, `CHROMATIC_MAX_ATTEMPTS`,
//! `CHROMATIC_LOG` and `RAYON_NUM_THREADS` reads for embedding programs.

use std::sync::Once;

use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::{DEFAULT_COVERAGE, DEFAULT_MAX_ATTEMPTS};
use crate::error::{ChromaticError, Result};

static TRACING_INIT: Once = Once::new();

/// Truncation settings for materializing a cost distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineConfig {
    /// Cumulative probability the materialized PMF must reach.
    pub coverage: f64,
    /// Largest truncation horizon the engine will allocate.
    pub max_attempts: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            coverage: DEFAULT_COVERAGE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl EngineConfig {
    /// Read `CHROMATIC_COVERAGE` and `CHROMATIC_MAX_ATTEMPTS`, falling back to
    /// the defaults for missing or unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let coverage = std::env::var("CHROMATIC_COVERAGE")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.coverage);
        let max_attempts = std::env::var("CHROMATIC_MAX_ATTEMPTS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_attempts);
        Self {
            coverage,
            max_attempts,
        }
    }

    pub fn with_coverage(mut self, coverage: f64) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.coverage > 0.0 && self.coverage < 1.0) {
            return Err(ChromaticError::InvalidConfig(format!(
                "coverage {} must lie in (0, 1)",
                self.coverage
            )));
        }
        if self.max_attempts == 0 {
            return Err(ChromaticError::InvalidConfig(
                "max_attempts must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Install the fmt subscriber, filtered by `CHROMATIC_LOG`.
///
/// Falls back to `chromatic=info`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("CHROMATIC_LOG")
            .unwrap_or_else(|_| EnvFilter::new("chromatic=info"));

        // Another subscriber may already be installed by the host program.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .try_init();
    });
}

/// Read `RAYON_NUM_THREADS` and build the global pool.
///
/// Tolerates an already-initialized pool. Returns the thread count in use.
pub fn init_rayon_threads() -> usize {
    let requested: Option<usize> = std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse().ok());

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = requested {
        builder = builder.num_threads(n);
    }
    if builder.build_global().is_err() {
        tracing::debug!("rayon global pool already initialized");
    }

    let threads = rayon::current_num_threads();
    tracing::info!(threads, "rayon pool ready");
    threads
}
