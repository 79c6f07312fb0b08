//! # Graph Assets
//!
//! The finalized node and edge lists a host hands to `activate`.
//!
//! Assets come from the host's conversion layer and are assumed to be
//! type-checked already. The engine only re-validates structural integrity
//! when it builds the [`GraphTopology`](crate::GraphTopology).

use crate::nodes::NodeState;
use crate::types::{EdgeHandle, NodeHandle, NodeKind, SocketDirection, SocketHandle, SocketType};
use serde::{Deserialize, Serialize};

/// Declaration of one socket on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketDesc {
    /// Handle of the socket.
    pub id: SocketHandle,
    /// Pin name, used for logging and inspection only.
    #[serde(default)]
    pub name: String,
    /// Input or output.
    pub direction: SocketDirection,
    /// Payload type, fixed for the lifetime of the graph.
    #[serde(rename = "type")]
    pub socket_type: SocketType,
}

impl SocketDesc {
    /// Declare an input socket.
    #[must_use]
    pub fn input(id: SocketHandle, name: impl Into<String>, socket_type: SocketType) -> Self {
        Self {
            id,
            name: name.into(),
            direction: SocketDirection::Input,
            socket_type,
        }
    }

    /// Declare an output socket.
    #[must_use]
    pub fn output(id: SocketHandle, name: impl Into<String>, socket_type: SocketType) -> Self {
        Self {
            id,
            name: name.into(),
            direction: SocketDirection::Output,
            socket_type,
        }
    }
}

/// Declaration of one node: its kind, its sockets and its initial local state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDesc {
    /// Handle of the node.
    pub id: NodeHandle,
    /// Behavior-table entry this node dispatches to.
    pub kind: NodeKind,
    /// Sockets owned by this node.
    #[serde(default)]
    pub sockets: Vec<SocketDesc>,
    /// Initial node-local state. Its variant must match `kind`.
    pub state: NodeState,
}

impl NodeDesc {
    /// Create a node declaration whose kind is taken from its state.
    #[must_use]
    pub fn new(id: NodeHandle, state: NodeState) -> Self {
        Self {
            id,
            kind: state.kind(),
            sockets: Vec::new(),
            state,
        }
    }

    /// Add a socket declaration.
    #[must_use]
    pub fn with_socket(mut self, socket: SocketDesc) -> Self {
        self.sockets.push(socket);
        self
    }
}

/// Declaration of a directed edge from an output socket to an input socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDesc {
    /// Handle of the edge.
    pub id: EdgeHandle,
    /// Producing output socket.
    pub from: SocketHandle,
    /// Consuming input socket.
    pub to: SocketHandle,
}

impl EdgeDesc {
    /// Create a new edge declaration.
    #[must_use]
    pub const fn new(id: EdgeHandle, from: SocketHandle, to: SocketHandle) -> Self {
        Self { id, from, to }
    }
}

/// A complete graph asset: everything `activate` needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphAsset {
    /// Human-readable name, used in logs.
    #[serde(default)]
    pub name: String,
    /// Node declarations.
    #[serde(default)]
    pub nodes: Vec<NodeDesc>,
    /// Edge declarations.
    #[serde(default)]
    pub edges: Vec<EdgeDesc>,
}

impl GraphAsset {
    /// Create an empty asset.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a node declaration.
    #[must_use]
    pub fn with_node(mut self, node: NodeDesc) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add an edge declaration.
    #[must_use]
    pub fn with_edge(mut self, id: u64, from: SocketHandle, to: SocketHandle) -> Self {
        self.edges.push(EdgeDesc::new(EdgeHandle(id), from, to));
        self
    }
}
