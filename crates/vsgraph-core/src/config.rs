//! # Engine Configuration
//!
//! Runtime limits for the execution engine. Every field has a default, so an
//! empty `[engine]` table (or none at all) is a valid configuration.

use crate::primitives::{DEFAULT_MAX_PASSES_PER_TICK, DEFAULT_MAX_PROPAGATION_ROUNDS};
use crate::types::GraphError;
use serde::{Deserialize, Serialize};

/// Limits applied to every tick of every instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum `on_input` deliveries within one host tick.
    /// Exceeding it aborts the tick with `GraphError::CycleDetected`.
    pub max_propagation_rounds: usize,
    /// Maximum update/propagate/commit passes within one host tick, which
    /// is also the deepest signal chain a tick can settle.
    pub max_passes_per_tick: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_propagation_rounds: DEFAULT_MAX_PROPAGATION_ROUNDS,
            max_passes_per_tick: DEFAULT_MAX_PASSES_PER_TICK,
        }
    }
}

impl EngineConfig {
    /// Override the propagation round limit.
    #[must_use]
    pub fn with_max_propagation_rounds(mut self, rounds: usize) -> Self {
        self.max_propagation_rounds = rounds;
        self
    }

    /// Override the pass limit.
    #[must_use]
    pub fn with_max_passes_per_tick(mut self, passes: usize) -> Self {
        self.max_passes_per_tick = passes;
        self
    }

    /// Check that every limit is usable.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.max_propagation_rounds == 0 {
            return Err(GraphError::Config(
                "max_propagation_rounds must be at least 1".to_string(),
            ));
        }
        if self.max_passes_per_tick == 0 {
            return Err(GraphError::Config(
                "max_passes_per_tick must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
