//! `Relay`: forwards every input signal to its output signal.

use crate::asset::{NodeDesc, SocketDesc};
use crate::behavior::NodeBehavior;
use crate::engine::EngineHandle;
use crate::nodes::NodeState;
use crate::types::{NodeHandle, SocketHandle, SocketType};
use crate::value::TriggerValue;
use serde::{Deserialize, Serialize};

/// Local state of a `Relay` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayState {
    /// Signal input.
    pub input: SocketHandle,
    /// Signal output.
    pub output: SocketHandle,
}

/// Behavior of the `Relay` kind.
pub struct RelayBehavior;

impl NodeBehavior for RelayBehavior {
    fn on_input(
        &self,
        _node: NodeHandle,
        input: &TriggerValue,
        state: &mut NodeState,
        engine: &mut EngineHandle<'_>,
    ) {
        if let NodeState::Relay(s) = state
            && input.target_socket == s.input
        {
            engine.emit_signal(s.output);
        }
    }
}

/// Declare a `Relay` node.
#[must_use]
pub fn desc(id: NodeHandle, input: SocketHandle, output: SocketHandle) -> NodeDesc {
    NodeDesc::new(id, NodeState::Relay(RelayState { input, output }))
        .with_socket(SocketDesc::input(input, "in", SocketType::Signal))
        .with_socket(SocketDesc::output(output, "out", SocketType::Signal))
}
