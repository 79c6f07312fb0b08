//! # Graph Topology
//!
//! The immutable per-instance index of nodes, sockets and edges.
//!
//! Built once when a graph instance activates and never mutated afterwards,
//! so it can be borrowed freely by the engine during a tick. All lookup maps
//! use `BTreeMap` for deterministic ordering. Fan-out lists keep edge
//! declaration order.

use crate::asset::{EdgeDesc, NodeDesc};
use crate::types::{
    EdgeHandle, GraphError, NodeHandle, NodeKind, SocketDirection, SocketHandle, SocketType,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// INDEX ENTRIES
// =============================================================================

/// Everything the engine needs to know about one socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketInfo {
    /// The owning node.
    pub node: NodeHandle,
    /// Pin name.
    pub name: String,
    /// Input or output.
    pub direction: SocketDirection,
    /// Declared payload type.
    pub socket_type: SocketType,
}

/// A validated edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Handle of the edge.
    pub id: EdgeHandle,
    /// Output socket.
    pub from: SocketHandle,
    /// Input socket.
    pub to: SocketHandle,
}

/// One entry of an output socket's fan-out list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanoutTarget {
    /// The edge carrying the event.
    pub edge: EdgeHandle,
    /// The receiving input socket.
    pub socket: SocketHandle,
    /// The node owning `socket`.
    pub node: NodeHandle,
    /// The receiving socket's declared type.
    pub socket_type: SocketType,
}

// =============================================================================
// TOPOLOGY
// =============================================================================

/// Immutable snapshot of one graph instance's structure.
#[derive(Debug, Clone, Default)]
pub struct GraphTopology {
    /// Node kinds: NodeHandle -> NodeKind
    nodes: BTreeMap<NodeHandle, NodeKind>,

    /// Socket index: SocketHandle -> owner, direction, type
    sockets: BTreeMap<SocketHandle, SocketInfo>,

    /// Edges in declaration order.
    edges: Vec<Edge>,

    /// Fan-out index: output socket -> every input it feeds
    fanout: BTreeMap<SocketHandle, Vec<FanoutTarget>>,
}

impl GraphTopology {
    /// Build and validate a topology from node and edge declarations.
    ///
    /// # Errors
    /// Returns `GraphError::MalformedGraph` if:
    /// - a node, socket or edge handle is declared twice
    /// - a node's state variant disagrees with its kind
    /// - a node's state refers to a socket the node does not own
    /// - a socket named by node state has the wrong direction or type
    /// - an edge references an unknown socket
    /// - an edge does not run from an output to an input
    /// - an edge connects types with no defined conversion
    pub fn build(nodes: &[NodeDesc], edges: &[EdgeDesc]) -> Result<Self, GraphError> {
        let mut topology = Self::default();

        for node in nodes {
            if topology.nodes.insert(node.id, node.kind).is_some() {
                return Err(GraphError::MalformedGraph(format!(
                    "node {:?} declared twice",
                    node.id
                )));
            }
            if node.state.kind() != node.kind {
                return Err(GraphError::MalformedGraph(format!(
                    "node {:?} is {} but carries {} state",
                    node.id,
                    node.kind,
                    node.state.kind()
                )));
            }

            for socket in &node.sockets {
                let info = SocketInfo {
                    node: node.id,
                    name: socket.name.clone(),
                    direction: socket.direction,
                    socket_type: socket.socket_type,
                };
                if let Some(previous) = topology.sockets.insert(socket.id, info) {
                    return Err(GraphError::MalformedGraph(format!(
                        "socket {:?} owned by both {:?} and {:?}",
                        socket.id, previous.node, node.id
                    )));
                }
            }
        }

        // Node state may only point at the node's own sockets, each declared
        // with the direction and type its role needs.
        for node in nodes {
            for role in node.state.socket_roles() {
                let info = topology
                    .sockets
                    .get(&role.socket)
                    .filter(|info| info.node == node.id)
                    .ok_or_else(|| {
                        GraphError::MalformedGraph(format!(
                            "node {:?} refers to socket {:?} it does not own",
                            node.id, role.socket
                        ))
                    })?;
                if info.direction != role.direction || !role.rule.allows(info.socket_type) {
                    return Err(GraphError::MalformedGraph(format!(
                        "node {:?} uses socket {:?} as {:?} {:?} but it is declared {:?} {}",
                        node.id,
                        role.socket,
                        role.direction,
                        role.rule,
                        info.direction,
                        info.socket_type
                    )));
                }
            }
        }

        let mut seen_edges = BTreeSet::new();
        for edge in edges {
            if !seen_edges.insert(edge.id) {
                return Err(GraphError::MalformedGraph(format!(
                    "edge {:?} declared twice",
                    edge.id
                )));
            }
            let target = topology.validate_edge(edge)?;
            topology.edges.push(Edge {
                id: edge.id,
                from: edge.from,
                to: edge.to,
            });
            topology.fanout.entry(edge.from).or_default().push(target);
        }

        Ok(topology)
    }

    /// Check one edge against the socket index and resolve its target.
    fn validate_edge(&self, edge: &EdgeDesc) -> Result<FanoutTarget, GraphError> {
        let source = self.sockets.get(&edge.from).ok_or_else(|| {
            GraphError::MalformedGraph(format!(
                "edge {:?} starts at unknown socket {:?}",
                edge.id, edge.from
            ))
        })?;
        let target = self.sockets.get(&edge.to).ok_or_else(|| {
            GraphError::MalformedGraph(format!(
                "edge {:?} ends at unknown socket {:?}",
                edge.id, edge.to
            ))
        })?;

        if source.direction != SocketDirection::Output {
            return Err(GraphError::MalformedGraph(format!(
                "edge {:?} starts at input socket {:?}",
                edge.id, edge.from
            )));
        }
        if target.direction != SocketDirection::Input {
            return Err(GraphError::MalformedGraph(format!(
                "edge {:?} ends at output socket {:?}",
                edge.id, edge.to
            )));
        }
        if !source.socket_type.converts_to(target.socket_type) {
            return Err(GraphError::MalformedGraph(format!(
                "edge {:?} connects {} to {} with no conversion",
                edge.id, source.socket_type, target.socket_type
            )));
        }

        Ok(FanoutTarget {
            edge: edge.id,
            socket: edge.to,
            node: target.node,
            socket_type: target.socket_type,
        })
    }

    /// Get every input fed by an output socket.
    ///
    /// Order follows edge declaration order. Unknown or unconnected sockets
    /// yield an empty slice.
    #[must_use]
    pub fn fanout(&self, output: SocketHandle) -> &[FanoutTarget] {
        self.fanout.get(&output).map_or(&[][..], Vec::as_slice)
    }

    /// Get the kind of a node.
    #[must_use]
    pub fn node_kind(&self, node: NodeHandle) -> Option<NodeKind> {
        self.nodes.get(&node).copied()
    }

    /// Get the index entry of a socket.
    #[must_use]
    pub fn socket(&self, socket: SocketHandle) -> Option<&SocketInfo> {
        self.sockets.get(&socket)
    }

    /// Get all nodes and their kinds in deterministic order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeHandle, NodeKind)> + '_ {
        self.nodes.iter().map(|(id, kind)| (*id, *kind))
    }

    /// Get all sockets in deterministic order.
    pub fn sockets(&self) -> impl Iterator<Item = (SocketHandle, &SocketInfo)> + '_ {
        self.sockets.iter().map(|(id, info)| (*id, info))
    }

    /// Get all edges in declaration order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get the total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of sockets.
    #[must_use]
    pub fn socket_count(&self) -> usize {
        self.sockets.len()
    }

    /// Get the total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

// =============================================================================
// TOPOLOGY METRICS
// =============================================================================

/// Summary figures for a built topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyMetrics {
    /// Total number of nodes.
    pub node_count: usize,
    /// Total number of sockets.
    pub socket_count: usize,
    /// Total number of edges.
    pub edge_count: usize,
    /// Edges carrying signals.
    pub signal_edges: usize,
    /// Edges carrying data.
    pub data_edges: usize,
    /// Edges whose endpoints have different types.
    pub converting_edges: usize,
    /// Largest number of edges leaving a single output.
    pub max_fanout: usize,
    /// Node count per kind.
    pub kinds: BTreeMap<NodeKind, usize>,
}

impl TopologyMetrics {
    /// Compute metrics from a topology.
    #[must_use]
    pub fn from_topology(topology: &GraphTopology) -> Self {
        let mut signal_edges = 0;
        let mut converting_edges = 0;
        for edge in topology.edges() {
            let from = topology.socket(edge.from).map(|s| s.socket_type);
            let to = topology.socket(edge.to).map(|s| s.socket_type);
            if from == Some(SocketType::Signal) {
                signal_edges += 1;
            }
            if from != to {
                converting_edges += 1;
            }
        }

        let mut kinds = BTreeMap::new();
        for (_, kind) in topology.nodes() {
            *kinds.entry(kind).or_insert(0) += 1;
        }

        Self {
            node_count: topology.node_count(),
            socket_count: topology.socket_count(),
            edge_count: topology.edge_count(),
            signal_edges,
            data_edges: topology.edge_count().saturating_sub(signal_edges),
            converting_edges,
            max_fanout: topology.fanout.values().map(Vec::len).max().unwrap_or(0),
            kinds,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
