//! # Core Type Definitions
//!
//! This module contains the identifiers and enumerations shared by every
//! layer of the engine:
//! - Handles (`NodeHandle`, `SocketHandle`, `EdgeHandle`, `InstanceId`)
//! - Socket typing (`SocketType`, `SocketDirection`)
//! - Node kinds (`NodeKind`)
//! - Error types (`GraphError`)
//!
//! ## Determinism Guarantees
//!
//! All handle types implement `Ord` so they can key `BTreeMap`/`BTreeSet`
//! and produce the same iteration order on every run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// HANDLES
// =============================================================================

/// Opaque identifier of one node instance inside one graph instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeHandle(pub u64);

/// Opaque identifier of one input or output pin.
/// Every socket belongs to exactly one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SocketHandle(pub u64);

/// Identifier of a directed connection from one output socket to one input socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeHandle(pub u64);

/// Identifier handed out by the `GraphManager` for an activated graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub u64);

// =============================================================================
// SOCKET TYPING
// =============================================================================

/// The closed set of payload types a socket can carry.
///
/// `Signal` sockets never carry data, only a control impulse.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum SocketType {
    /// Placeholder for sockets the asset source left untyped.
    #[default]
    Undefined,
    /// Payload-less control impulse.
    Signal,
    /// 32-bit signed integer.
    Int,
    /// 32-bit float.
    Float,
    /// Two-component float vector.
    Vector2,
    /// Three-component float vector.
    Vector3,
    /// Four-component float vector.
    Vector4,
    /// Reference to a host entity.
    EntityRef,
    /// UTF-8 string.
    String,
}

impl SocketType {
    /// Number of float components for numeric types.
    ///
    /// Scalars count as one component. Returns `None` for non-numeric types.
    #[must_use]
    pub const fn width(self) -> Option<usize> {
        match self {
            Self::Int | Self::Float => Some(1),
            Self::Vector2 => Some(2),
            Self::Vector3 => Some(3),
            Self::Vector4 => Some(4),
            Self::Undefined | Self::Signal | Self::EntityRef | Self::String => None,
        }
    }

    /// Check if this type belongs to the convertible numeric family.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        self.width().is_some()
    }

    /// Check if a value of this type may flow into a socket of `target` type.
    ///
    /// Same types always connect. Different types connect only when both
    /// are numeric (`Int`, `Float`, `Vector2..4`).
    #[must_use]
    pub const fn converts_to(self, target: SocketType) -> bool {
        if self as u8 == target as u8 {
            return !matches!(self, Self::Undefined);
        }
        self.is_numeric() && target.is_numeric()
    }
}

impl std::fmt::Display for SocketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Whether a socket receives or produces events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SocketDirection {
    /// Receives events through `on_input`.
    Input,
    /// Produces events through `emit_signal` / `emit_data`.
    Output,
}

// =============================================================================
// NODE KINDS
// =============================================================================

/// Closed enumeration of node behaviors compiled into this build.
///
/// A node's kind never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Fires its output signal on the first tick after activation.
    Start,
    /// Delays a signal by a number of ticks.
    Wait,
    /// Records and logs every value it receives.
    Print,
    /// Emits a stored value when signalled.
    Constant,
    /// Sums two float inputs.
    Add,
    /// Forwards every input signal to its output.
    Relay,
}

impl NodeKind {
    /// Every built-in kind, in declaration order.
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Start,
        NodeKind::Wait,
        NodeKind::Print,
        NodeKind::Constant,
        NodeKind::Add,
        NodeKind::Relay,
    ];

    /// Get the kind name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Start => "Start",
            NodeKind::Wait => "Wait",
            NodeKind::Print => "Print",
            NodeKind::Constant => "Constant",
            NodeKind::Add => "Add",
            NodeKind::Relay => "Relay",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while building or running a graph.
///
/// - No silent failures
/// - Use `Result<T, GraphError>` for fallible operations
/// - The engine never panics; one bad event never aborts a tick
#[derive(Debug, Error)]
pub enum GraphError {
    /// The node/edge lists are structurally invalid.
    #[error("Malformed graph: {0}")]
    MalformedGraph(String),

    /// A node uses a kind that has no entry in the behavior table.
    #[error("Unknown node kind: {0}")]
    UnknownNodeKind(NodeKind),

    /// A value's tag disagrees with the socket it is delivered to.
    #[error("Type mismatch on {socket:?}: expected {expected}, found {found}")]
    TypeMismatchOnDelivery {
        /// The receiving socket.
        socket: SocketHandle,
        /// The socket's declared type.
        expected: SocketType,
        /// The type carried by the value.
        found: SocketType,
    },

    /// Propagation did not settle within the configured round limit.
    #[error("Cycle detected: propagation exceeded {rounds} rounds")]
    CycleDetected {
        /// The limit that was exceeded.
        rounds: usize,
    },

    /// The requested graph instance does not exist.
    #[error("Instance not found: {0:?}")]
    InstanceNotFound(InstanceId),

    /// The requested socket does not exist in the topology.
    #[error("Socket not found: {0:?}")]
    SocketNotFound(SocketHandle),

    /// An external injection targeted a socket that cannot accept it.
    #[error("Invalid injection: {0}")]
    InvalidInjection(String),

    /// A configuration file could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred in the host layer.
    #[error("I/O error: {0}")]
    Io(String),

    /// A node behavior panicked while its instance was ticked on a worker thread.
    #[error("Worker ticking {0:?} panicked")]
    WorkerPanicked(InstanceId),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_types_convert_among_themselves() {
        let numeric = [
            SocketType::Int,
            SocketType::Float,
            SocketType::Vector2,
            SocketType::Vector3,
            SocketType::Vector4,
        ];
        for from in numeric {
            for to in numeric {
                assert!(from.converts_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn opaque_types_only_match_themselves() {
        assert!(SocketType::Signal.converts_to(SocketType::Signal));
        assert!(SocketType::String.converts_to(SocketType::String));
        assert!(SocketType::EntityRef.converts_to(SocketType::EntityRef));

        assert!(!SocketType::Signal.converts_to(SocketType::Int));
        assert!(!SocketType::Float.converts_to(SocketType::String));
        assert!(!SocketType::EntityRef.converts_to(SocketType::Vector3));
    }

    #[test]
    fn undefined_never_connects() {
        assert!(!SocketType::Undefined.converts_to(SocketType::Undefined));
        assert!(!SocketType::Undefined.converts_to(SocketType::Int));
    }

    #[test]
    fn widths() {
        assert_eq!(SocketType::Int.width(), Some(1));
        assert_eq!(SocketType::Vector3.width(), Some(3));
        assert_eq!(SocketType::Signal.width(), None);
    }

    #[test]
    fn kind_names_are_unique() {
        let mut names: Vec<_> = NodeKind::ALL.iter().map(NodeKind::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), NodeKind::ALL.len());
    }
}
