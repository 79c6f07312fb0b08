//! `Start`: fires its output signal once, on the first tick after activation.

use crate::asset::{NodeDesc, SocketDesc};
use crate::behavior::NodeBehavior;
use crate::engine::EngineHandle;
use crate::nodes::NodeState;
use crate::types::{NodeHandle, SocketHandle, SocketType};
use serde::{Deserialize, Serialize};

/// Local state of a `Start` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartState {
    /// Signal output fired on the first update.
    pub output: SocketHandle,
}

/// Behavior of the `Start` kind.
pub struct StartBehavior;

impl NodeBehavior for StartBehavior {
    fn initialize(&self, node: NodeHandle, _state: &mut NodeState, engine: &mut EngineHandle<'_>) {
        engine.request_continuous_update(node);
    }

    fn update(&self, node: NodeHandle, state: &mut NodeState, engine: &mut EngineHandle<'_>) {
        if let NodeState::Start(s) = state {
            engine.emit_signal(s.output);
        }
        engine.cancel_continuous_update(node);
    }
}

/// Declare a `Start` node with a single signal output.
#[must_use]
pub fn desc(id: NodeHandle, output: SocketHandle) -> NodeDesc {
    NodeDesc::new(id, NodeState::Start(StartState { output }))
        .with_socket(SocketDesc::output(output, "out", SocketType::Signal))
}
