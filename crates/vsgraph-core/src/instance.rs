//! # Graph Instance
//!
//! One activated graph asset: its immutable topology, node-local states and
//! the execution engine that schedules them.
//!
//! An instance is created only by a successful `activate`. A malformed asset
//! or an unknown node kind never yields a half-built instance.

use crate::asset::GraphAsset;
use crate::behavior::BehaviorTable;
use crate::config::EngineConfig;
use crate::engine::{ExecutionEngine, NodeStates, TickReport};
use crate::nodes::NodeState;
use crate::topology::GraphTopology;
use crate::types::{GraphError, NodeHandle, SocketHandle};
use crate::value::Payload;
use std::sync::Arc;

/// A running graph.
///
/// Owns everything it touches during a tick except the behavior table,
/// which is shared read-only between instances.
#[derive(Debug)]
pub struct GraphInstance {
    name: String,
    topology: GraphTopology,
    states: NodeStates,
    engine: ExecutionEngine,
    table: Arc<BehaviorTable>,
}

impl GraphInstance {
    /// Build the topology, then run `initialize` on every node.
    ///
    /// # Errors
    /// - `GraphError::Config` if a limit in `config` is zero
    /// - `GraphError::UnknownNodeKind` if a node's kind has no behavior
    /// - `GraphError::MalformedGraph` if the topology fails validation
    pub fn activate(
        asset: &GraphAsset,
        table: Arc<BehaviorTable>,
        config: EngineConfig,
    ) -> Result<Self, GraphError> {
        config.validate()?;

        if let Some(node) = asset.nodes.iter().find(|n| !table.contains(n.kind)) {
            return Err(GraphError::UnknownNodeKind(node.kind));
        }

        let topology = GraphTopology::build(&asset.nodes, &asset.edges)?;
        let mut states: NodeStates = asset
            .nodes
            .iter()
            .map(|n| (n.id, n.state.clone()))
            .collect();

        let mut engine = ExecutionEngine::new(config);
        engine.initialize(&topology, &table, &mut states);

        tracing::debug!(
            graph = %asset.name,
            nodes = topology.node_count(),
            edges = topology.edge_count(),
            active = engine.active_nodes().len(),
            "graph activated"
        );

        Ok(Self {
            name: asset.name.clone(),
            topology,
            states,
            engine,
            table,
        })
    }

    /// Run one host tick.
    ///
    /// # Errors
    /// Returns `GraphError::CycleDetected` if propagation does not settle.
    pub fn tick(&mut self) -> Result<TickReport, GraphError> {
        self.engine
            .tick(&self.topology, &self.table, &mut self.states)
    }

    /// Queue an external signal or value for delivery on the next tick.
    ///
    /// # Errors
    /// See [`ExecutionEngine::inject`].
    pub fn inject(&mut self, socket: SocketHandle, payload: Payload) -> Result<(), GraphError> {
        self.engine.inject(&self.topology, socket, payload)
    }

    /// Drop queued events and uncommitted active-set requests after an
    /// interrupted tick.
    pub fn discard_in_flight(&mut self) {
        tracing::warn!(graph = %self.name, "discarding in-flight work");
        self.engine.discard_in_flight();
    }

    /// Get the asset name this instance was activated from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the immutable topology.
    #[must_use]
    pub fn topology(&self) -> &GraphTopology {
        &self.topology
    }

    /// Get a node's local state.
    #[must_use]
    pub fn node_state(&self, node: NodeHandle) -> Option<&NodeState> {
        self.states.get(&node)
    }

    /// Iterate over every node's local state in handle order.
    pub fn node_states(&self) -> impl Iterator<Item = (NodeHandle, &NodeState)> + '_ {
        self.states.iter().map(|(id, state)| (*id, state))
    }

    /// Check if a node is in the active set.
    #[must_use]
    pub fn is_active(&self, node: NodeHandle) -> bool {
        self.engine.is_active(node)
    }

    /// Get the active set in update order.
    #[must_use]
    pub fn active_nodes(&self) -> &[NodeHandle] {
        self.engine.active_nodes()
    }

    /// Get the number of injected or leftover deliveries waiting for a tick.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.engine.pending_events()
    }

    /// Check if no node is active and no event is pending.
    #[must_use]
    pub fn is_quiescent(&self) -> bool {
        self.engine.is_quiescent()
    }
}

// =============================================================================
// TESTS
// =============================================================================
