//! # vsgraph-core
//!
//! The tick-driven execution engine for vsgraph visual-scripting graphs.
//!
//! A graph is a set of typed nodes whose sockets are joined by directed
//! edges. Edges carry either control impulses (signals) or typed data. Once
//! per host tick the engine updates every continuously-active node, then
//! propagates the resulting events until the graph is quiescent.
//!
//! ## Layering
//!
//! - `value`: payloads and the numeric/vector conversion rules
//! - `topology`: validated, immutable node/socket/edge index with fan-out
//! - `behavior`: the `NodeKind -> NodeBehavior` dispatch table
//! - `nodes`: the built-in node kinds
//! - `engine`: the per-tick scheduler
//! - `instance` / `manager`: activation and the host-facing tick loop
//!
//! ## Architectural Constraints
//!
//! - Synchronous: no async, no network, no file I/O
//! - Deterministic: FIFO queues, ordered maps, batched active-set commits
//! - Closed: node kinds are a fixed set compiled into the binary
//! - Instance-local: instances share only the read-only behavior table

// =============================================================================
// MODULES
// =============================================================================

pub mod asset;
pub mod behavior;
pub mod config;
pub mod engine;
pub mod instance;
pub mod manager;
pub mod nodes;
pub mod primitives;
pub mod topology;
pub mod types;
pub mod value;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    EdgeHandle, GraphError, InstanceId, NodeHandle, NodeKind, SocketDirection, SocketHandle,
    SocketType,
};
pub use value::{EntityRef, Payload, TriggerValue, Vector2, Vector3, Vector4, convert};

// =============================================================================
// RE-EXPORTS: Graph Description
// =============================================================================

pub use asset::{EdgeDesc, GraphAsset, NodeDesc, SocketDesc};
pub use nodes::NodeState;
pub use topology::{GraphTopology, TopologyMetrics};

// =============================================================================
// RE-EXPORTS: Execution
// =============================================================================

pub use behavior::{BehaviorTable, NodeBehavior};
pub use config::EngineConfig;
pub use engine::{EngineHandle, ExecutionEngine, NodeStates, TickReport};
pub use instance::GraphInstance;
pub use manager::{GraphManager, TickResults};
