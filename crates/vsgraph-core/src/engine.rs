//! # Execution Engine
//!
//! The per-tick scheduler for one graph instance.
//!
//! ## Tick Algorithm
//!
//! Each pass of a tick runs three phases in fixed order:
//!
//! 1. **Update**: every node in the active set (snapshot taken at pass
//!    start) gets one `update` call. Emissions are fanned out into the
//!    signal queue or the data queue.
//! 2. **Propagate**: the data queue is drained completely, then exactly one
//!    signal is delivered, then data is drained again, and so on until the
//!    data queue is empty and every signal queued at pass start has been
//!    delivered. No signal is observed while data is still pending.
//! 3. **Commit**: pending active-set additions (deduplicated) and removals
//!    (swap-remove) are applied.
//!
//! Signals emitted during a pass wait for the next pass, so each pass moves
//! a signal cascade one hop further. The first pass runs when the active set
//! or either queue is non-empty. Further passes run only while signals are
//! still pending and skip the update phase, so a node is updated at most
//! once per host tick. Because the signal queue is FIFO, splitting it into
//! passes never changes delivery order.
//!
//! ## Determinism
//!
//! Queues are FIFO, the active set is only mutated at commit, and the
//! topology is immutable, so the same inputs always produce the same
//! delivery order.

use crate::behavior::BehaviorTable;
use crate::config::EngineConfig;
use crate::nodes::NodeState;
use crate::topology::GraphTopology;
use crate::types::{GraphError, NodeHandle, SocketDirection, SocketHandle, SocketType};
use crate::value::{Payload, TriggerValue, convert};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Node-local state of every node in an instance.
pub type NodeStates = BTreeMap<NodeHandle, NodeState>;

// =============================================================================
// TICK REPORT
// =============================================================================

/// What one call to `tick` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Update/propagate/commit passes executed. A signal cascade takes one
    /// pass per hop.
    pub passes: usize,
    /// `update` calls made.
    pub updates: usize,
    /// `on_input` calls made.
    pub deliveries: usize,
    /// Events dropped because of type or direction faults.
    pub dropped: usize,
    /// Whether the instance ended the tick with no active node and no pending event.
    pub quiescent: bool,
}

// =============================================================================
// QUEUES
// =============================================================================

/// The two propagation queues. Signals and data never share a queue.
#[derive(Debug, Default)]
struct EventQueues {
    signals: VecDeque<TriggerValue>,
    data: VecDeque<TriggerValue>,
}

impl EventQueues {
    fn push(&mut self, value: TriggerValue) {
        if value.payload.is_signal() {
            self.signals.push_back(value);
        } else {
            self.data.push_back(value);
        }
    }

    /// Next delivery of the current pass: all data first, then one of the
    /// `signals_left` signals that were queued when the pass began.
    fn pop(&mut self, signals_left: &mut usize) -> Option<TriggerValue> {
        if let Some(data) = self.data.pop_front() {
            return Some(data);
        }
        if *signals_left == 0 {
            return None;
        }
        *signals_left -= 1;
        self.signals.pop_front()
    }

    fn len(&self) -> usize {
        self.signals.len() + self.data.len()
    }

    fn is_empty(&self) -> bool {
        self.signals.is_empty() && self.data.is_empty()
    }

    fn clear(&mut self) {
        self.signals.clear();
        self.data.clear();
    }
}

/// Active-set changes requested during a pass, applied at commit.
#[derive(Debug, Default)]
struct PendingUpdates {
    to_add: Vec<NodeHandle>,
    to_remove: Vec<NodeHandle>,
}

// =============================================================================
// ENGINE HANDLE
// =============================================================================

/// The only view of the engine a node behavior gets.
///
/// Exposes emission and active-set requests. Queues and topology stay
/// private to the engine.
pub struct EngineHandle<'a> {
    topology: &'a GraphTopology,
    queues: &'a mut EventQueues,
    pending: &'a mut PendingUpdates,
    dropped: &'a mut usize,
}

impl EngineHandle<'_> {
    /// Fire a signal on an output socket.
    ///
    /// Produces one delivery per outgoing edge. Emitting on a socket that is
    /// not a signal output is dropped and logged.
    pub fn emit_signal(&mut self, socket: SocketHandle) {
        match self.output_type(socket) {
            Some(SocketType::Signal) => {}
            Some(other) => {
                self.reject(socket, other, SocketType::Signal);
                return;
            }
            None => return,
        }
        for target in self.topology.fanout(socket) {
            self.queues
                .signals
                .push_back(TriggerValue::signal(target.node, target.socket));
        }
    }

    /// Send a payload out of a data output socket.
    ///
    /// The payload first takes the output socket's declared type, then is
    /// converted to each target socket's type. Payloads that cannot flow
    /// from this socket, or into a given target, are dropped and logged.
    pub fn emit_data(&mut self, socket: SocketHandle, payload: Payload) {
        let Some(declared) = self.output_type(socket) else {
            return;
        };
        let found = payload.socket_type();
        let produced = match declared {
            SocketType::Signal => None,
            _ => convert(&payload, declared),
        };
        let Some(payload) = produced else {
            self.reject(socket, declared, found);
            return;
        };
        for target in self.topology.fanout(socket) {
            match convert(&payload, target.socket_type) {
                Some(converted) => self.queues.data.push_back(TriggerValue::new(
                    target.node,
                    target.socket,
                    converted,
                )),
                None => self.reject(target.socket, target.socket_type, declared),
            }
        }
    }

    /// Ask for `node` to receive `update` every tick, starting next tick.
    pub fn request_continuous_update(&mut self, node: NodeHandle) {
        if self.topology.node_kind(node).is_none() {
            tracing::warn!(node = node.0, "continuous update requested for unknown node");
            return;
        }
        self.pending.to_remove.retain(|n| *n != node);
        if !self.pending.to_add.contains(&node) {
            self.pending.to_add.push(node);
        }
    }

    /// Ask for `node` to stop receiving `update`, effective at commit.
    pub fn cancel_continuous_update(&mut self, node: NodeHandle) {
        self.pending.to_add.retain(|n| *n != node);
        if !self.pending.to_remove.contains(&node) {
            self.pending.to_remove.push(node);
        }
    }

    /// Declared type of an output socket, or `None` (logged) if it is not one.
    fn output_type(&mut self, socket: SocketHandle) -> Option<SocketType> {
        match self.topology.socket(socket) {
            Some(info) if info.direction == SocketDirection::Output => Some(info.socket_type),
            Some(_) => {
                tracing::warn!(socket = socket.0, "emission on an input socket dropped");
                *self.dropped += 1;
                None
            }
            None => {
                tracing::warn!(socket = socket.0, "emission on an unknown socket dropped");
                *self.dropped += 1;
                None
            }
        }
    }

    fn reject(&mut self, socket: SocketHandle, expected: SocketType, found: SocketType) {
        let err = GraphError::TypeMismatchOnDelivery {
            socket,
            expected,
            found,
        };
        tracing::warn!(error = %err, "emission dropped");
        *self.dropped += 1;
    }
}

// =============================================================================
// EXECUTION ENGINE
// =============================================================================

/// Scheduler state for one graph instance.
///
/// Borrows the topology, behavior table and node states for the duration of
/// a call and retains none of them between ticks.
#[derive(Debug, Default)]
pub struct ExecutionEngine {
    config: EngineConfig,
    /// Nodes updated each tick, in insertion order (swap-remove on leave).
    active_now: Vec<NodeHandle>,
    pending: PendingUpdates,
    queues: EventQueues,
}

impl ExecutionEngine {
    /// Create an engine with the given limits.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Get the engine limits.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run `initialize` once for every node, then commit the active set.
    ///
    /// Nodes are initialized in handle order. Anything emitted here is
    /// delivered during the first tick.
    pub fn initialize(
        &mut self,
        topology: &GraphTopology,
        table: &BehaviorTable,
        states: &mut NodeStates,
    ) {
        let mut dropped = 0;
        for (node, kind) in topology.nodes() {
            let (Some(behavior), Some(state)) = (table.get(kind), states.get_mut(&node)) else {
                continue;
            };
            let mut handle = EngineHandle {
                topology,
                queues: &mut self.queues,
                pending: &mut self.pending,
                dropped: &mut dropped,
            };
            behavior.initialize(node, state, &mut handle);
        }
        self.commit();

        tracing::debug!(
            active = self.active_now.len(),
            pending = self.queues.len(),
            dropped,
            "engine initialized"
        );
    }

    /// Run one host tick: passes of update, propagate and commit until quiescent.
    ///
    /// # Errors
    /// Returns `GraphError::CycleDetected` when the tick exceeds
    /// `max_propagation_rounds` deliveries or `max_passes_per_tick` passes.
    /// Both queues are cleared and the active set is still committed, so the
    /// instance remains usable.
    pub fn tick(
        &mut self,
        topology: &GraphTopology,
        table: &BehaviorTable,
        states: &mut NodeStates,
    ) -> Result<TickReport, GraphError> {
        let mut report = TickReport::default();
        let mut first_pass = true;
        let mut rounds = 0usize;

        while self.needs_processing(first_pass) {
            if report.passes >= self.config.max_passes_per_tick {
                return Err(self.abort(GraphError::CycleDetected { rounds }));
            }
            report.passes += 1;

            if first_pass {
                self.update_phase(topology, table, states, &mut report);
            }
            let propagated =
                self.propagate(topology, table, states, &mut rounds, &mut report);
            self.commit();
            if let Err(err) = propagated {
                return Err(self.abort(err));
            }

            first_pass = false;
        }

        report.quiescent = self.is_quiescent();
        tracing::debug!(
            passes = report.passes,
            updates = report.updates,
            deliveries = report.deliveries,
            dropped = report.dropped,
            active = self.active_now.len(),
            "tick complete"
        );
        Ok(report)
    }

    /// Seed a queue from outside the graph, ahead of the next tick.
    ///
    /// The payload is converted to the target socket's type. Signals go to
    /// the signal queue, everything else to the data queue.
    ///
    /// # Errors
    /// - `GraphError::SocketNotFound` if the socket is unknown
    /// - `GraphError::InvalidInjection` if it is not an input or the payload
    ///   has no conversion to its type
    pub fn inject(
        &mut self,
        topology: &GraphTopology,
        target_socket: SocketHandle,
        payload: Payload,
    ) -> Result<(), GraphError> {
        let info = topology
            .socket(target_socket)
            .ok_or(GraphError::SocketNotFound(target_socket))?;
        if info.direction != SocketDirection::Input {
            return Err(GraphError::InvalidInjection(format!(
                "socket {:?} is not an input",
                target_socket
            )));
        }
        let converted = convert(&payload, info.socket_type).ok_or_else(|| {
            GraphError::InvalidInjection(format!(
                "{} payload cannot feed {} socket {:?}",
                payload.socket_type(),
                info.socket_type,
                target_socket
            ))
        })?;

        self.queues
            .push(TriggerValue::new(info.node, target_socket, converted));
        Ok(())
    }

    /// Get the active set in update order.
    #[must_use]
    pub fn active_nodes(&self) -> &[NodeHandle] {
        &self.active_now
    }

    /// Check if a node is in the active set.
    #[must_use]
    pub fn is_active(&self, node: NodeHandle) -> bool {
        self.active_now.contains(&node)
    }

    /// Get the number of queued deliveries.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.queues.len()
    }

    /// Check if no node is active and no event is pending.
    #[must_use]
    pub fn is_quiescent(&self) -> bool {
        self.active_now.is_empty() && self.queues.is_empty()
    }

    fn needs_processing(&self, first_pass: bool) -> bool {
        if first_pass {
            !self.active_now.is_empty() || !self.queues.is_empty()
        } else {
            !self.queues.is_empty()
        }
    }

    fn update_phase(
        &mut self,
        topology: &GraphTopology,
        table: &BehaviorTable,
        states: &mut NodeStates,
        report: &mut TickReport,
    ) {
        let snapshot = self.active_now.clone();
        for node in snapshot {
            let Some(kind) = topology.node_kind(node) else {
                continue;
            };
            let (Some(behavior), Some(state)) = (table.get(kind), states.get_mut(&node)) else {
                continue;
            };
            let mut handle = EngineHandle {
                topology,
                queues: &mut self.queues,
                pending: &mut self.pending,
                dropped: &mut report.dropped,
            };
            behavior.update(node, state, &mut handle);
            report.updates += 1;
        }
    }

    /// Deliver one pass worth of events. `rounds` counts pops across the
    /// whole tick.
    fn propagate(
        &mut self,
        topology: &GraphTopology,
        table: &BehaviorTable,
        states: &mut NodeStates,
        rounds: &mut usize,
        report: &mut TickReport,
    ) -> Result<(), GraphError> {
        let limit = self.config.max_propagation_rounds;
        let mut signals_left = self.queues.signals.len();

        while let Some(next) = self.queues.pop(&mut signals_left) {
            *rounds += 1;
            if *rounds > limit {
                return Err(GraphError::CycleDetected { rounds: limit });
            }
            self.deliver(next, topology, table, states, report);
        }
        Ok(())
    }

    fn deliver(
        &mut self,
        value: TriggerValue,
        topology: &GraphTopology,
        table: &BehaviorTable,
        states: &mut NodeStates,
        report: &mut TickReport,
    ) {
        let expected = topology
            .socket(value.target_socket)
            .filter(|info| info.node == value.target_node)
            .map(|info| info.socket_type);
        if expected != Some(value.value_type()) {
            let err = GraphError::TypeMismatchOnDelivery {
                socket: value.target_socket,
                expected: expected.unwrap_or_default(),
                found: value.value_type(),
            };
            tracing::warn!(node = value.target_node.0, error = %err, "event dropped");
            report.dropped += 1;
            return;
        }

        let Some(kind) = topology.node_kind(value.target_node) else {
            return;
        };
        let (Some(behavior), Some(state)) =
            (table.get(kind), states.get_mut(&value.target_node))
        else {
            return;
        };

        tracing::trace!(
            node = value.target_node.0,
            socket = value.target_socket.0,
            value = %value.payload,
            "deliver"
        );
        let mut handle = EngineHandle {
            topology,
            queues: &mut self.queues,
            pending: &mut self.pending,
            dropped: &mut report.dropped,
        };
        behavior.on_input(value.target_node, &value, state, &mut handle);
        report.deliveries += 1;
    }

    /// Apply pending additions (deduplicated) then removals (swap-remove).
    fn commit(&mut self) {
        for node in self.pending.to_add.drain(..) {
            if !self.active_now.contains(&node) {
                self.active_now.push(node);
            }
        }
        for node in self.pending.to_remove.drain(..) {
            if let Some(index) = self.active_now.iter().position(|n| *n == node) {
                self.active_now.swap_remove(index);
            }
        }
    }

    /// Drop queued events and uncommitted active-set requests.
    ///
    /// For a tick that was interrupted part-way. The active set and node
    /// states are left as they were at the last commit.
    pub fn discard_in_flight(&mut self) {
        tracing::warn!(
            discarded = self.queues.len(),
            pending_add = self.pending.to_add.len(),
            pending_remove = self.pending.to_remove.len(),
            "in-flight work discarded"
        );
        self.queues.clear();
        self.pending.to_add.clear();
        self.pending.to_remove.clear();
    }

    fn abort(&mut self, err: GraphError) -> GraphError {
        tracing::warn!(error = %err, discarded = self.queues.len(), "tick aborted");
        self.queues.clear();
        err
    }
}

// =============================================================================
// TESTS
// =============================================================================
