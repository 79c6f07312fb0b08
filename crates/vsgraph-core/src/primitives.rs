//! # Engine Primitives
//!
//! Hardcoded runtime constants for the vsgraph engine.
//!
//! These values are compiled into the binary. Hosts may override the
//! propagation limits through [`EngineConfig`](crate::EngineConfig).

/// Default cap on `on_input` deliveries within one host tick.
///
/// - A tick that exceeds this count is reported as `GraphError::CycleDetected`.
/// - Acyclic graphs settle in as many deliveries as they have reachable edges.
pub const DEFAULT_MAX_PROPAGATION_ROUNDS: usize = 10_000;

/// Default cap on update/propagate/commit passes within one host tick.
///
/// Each pass carries a signal cascade one hop, so this bounds the depth of
/// a signal chain that can settle in a single tick.
pub const DEFAULT_MAX_PASSES_PER_TICK: usize = 4_096;

/// Number of float components in the widest vector payload.
pub const MAX_VECTOR_WIDTH: usize = 4;

/// Maximum number of payloads a `Print` node keeps in its history.
///
/// Older entries are discarded first. The delivery count keeps growing.
pub const PRINT_HISTORY_LIMIT: usize = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_positive() {
        assert!(DEFAULT_MAX_PROPAGATION_ROUNDS > 0);
        assert!(DEFAULT_MAX_PASSES_PER_TICK > 0);
        assert!(PRINT_HISTORY_LIMIT > 0);
    }

    #[test]
    fn vector_width_is_four() {
        assert_eq!(MAX_VECTOR_WIDTH, 4);
    }
}
