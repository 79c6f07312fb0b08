//! # Node Behavior Table
//!
//! The dispatch surface mapping each [`NodeKind`] to its three operations.
//!
//! The engine never matches on node kinds itself. It looks the kind up in a
//! [`BehaviorTable`] built once before activation and calls through the
//! [`NodeBehavior`] trait, so adding a kind means adding one table entry.
//!
//! The table is read-only after construction and is shared immutably across
//! every graph instance (and every thread ticking those instances).

use crate::engine::EngineHandle;
use crate::nodes::NodeState;
use crate::types::{NodeHandle, NodeKind};
use crate::value::TriggerValue;
use std::collections::BTreeMap;

// =============================================================================
// NODE BEHAVIOR TRAIT
// =============================================================================

/// The three operations every node kind provides.
///
/// All methods default to doing nothing, so a kind only implements what it
/// reacts to. Implementations must be `Send + Sync` because one table is
/// shared by instances ticked on different threads.
pub trait NodeBehavior: Send + Sync {
    /// Called exactly once per node when its graph instance activates.
    ///
    /// May call `engine.request_continuous_update(node)` to join the active
    /// set before the first tick.
    fn initialize(&self, _node: NodeHandle, _state: &mut NodeState, _engine: &mut EngineHandle<'_>) {
    }

    /// Called once per tick while the node is in the active set.
    fn update(&self, _node: NodeHandle, _state: &mut NodeState, _engine: &mut EngineHandle<'_>) {}

    /// Called once per delivered value addressed to one of this node's inputs.
    ///
    /// Emissions made here re-enter propagation within the same tick.
    fn on_input(
        &self,
        _node: NodeHandle,
        _input: &TriggerValue,
        _state: &mut NodeState,
        _engine: &mut EngineHandle<'_>,
    ) {
    }
}

// =============================================================================
// BEHAVIOR TABLE
// =============================================================================

/// Registry of node behaviors keyed by kind.
///
/// Uses `BTreeMap` so `kinds()` iterates in a stable order.
#[derive(Default)]
pub struct BehaviorTable {
    entries: BTreeMap<NodeKind, Box<dyn NodeBehavior>>,
}

impl std::fmt::Debug for BehaviorTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorTable")
            .field("kinds", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl BehaviorTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table holding every built-in node kind.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::new();
        crate::nodes::register_builtin(&mut table);
        table
    }

    /// Register (or replace) the behavior for a kind.
    pub fn register(&mut self, kind: NodeKind, behavior: impl NodeBehavior + 'static) {
        self.entries.insert(kind, Box::new(behavior));
    }

    /// Get the behavior for a kind.
    #[must_use]
    pub fn get(&self, kind: NodeKind) -> Option<&dyn NodeBehavior> {
        self.entries.get(&kind).map(|b| b.as_ref())
    }

    /// Check if a kind is registered.
    #[must_use]
    pub fn contains(&self, kind: NodeKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Get all registered kinds in deterministic order.
    pub fn kinds(&self) -> impl Iterator<Item = NodeKind> + '_ {
        self.entries.keys().copied()
    }

    /// Get the number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inert;

    impl NodeBehavior for Inert {}

    #[test]
    fn empty_table() {
        let table = BehaviorTable::new();
        assert!(table.is_empty());
        assert!(table.get(NodeKind::Start).is_none());
    }

    #[test]
    fn builtin_covers_every_kind() {
        let table = BehaviorTable::builtin();
        assert_eq!(table.len(), NodeKind::ALL.len());
        for kind in NodeKind::ALL {
            assert!(table.contains(kind), "missing {kind}");
        }
    }

    #[test]
    fn register_replaces_entry() {
        let mut table = BehaviorTable::new();
        table.register(NodeKind::Relay, Inert);
        table.register(NodeKind::Relay, Inert);
        assert_eq!(table.len(), 1);
        assert_eq!(table.kinds().collect::<Vec<_>>(), vec![NodeKind::Relay]);
    }
}
