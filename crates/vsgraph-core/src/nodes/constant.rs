//! `Constant`: emits a stored payload when signalled, then fires `then`.

use crate::asset::{NodeDesc, SocketDesc};
use crate::behavior::NodeBehavior;
use crate::engine::EngineHandle;
use crate::nodes::NodeState;
use crate::types::{NodeHandle, SocketHandle, SocketType};
use crate::value::{Payload, TriggerValue};
use serde::{Deserialize, Serialize};

/// Local state of a `Constant` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantState {
    /// Signal input requesting the value.
    pub trigger: SocketHandle,
    /// Data output carrying `value`.
    pub output: SocketHandle,
    /// Optional signal output fired after the value.
    #[serde(default)]
    pub then: Option<SocketHandle>,
    /// The stored payload.
    pub value: Payload,
}

/// Behavior of the `Constant` kind.
pub struct ConstantBehavior;

impl NodeBehavior for ConstantBehavior {
    fn on_input(
        &self,
        _node: NodeHandle,
        input: &TriggerValue,
        state: &mut NodeState,
        engine: &mut EngineHandle<'_>,
    ) {
        let NodeState::Constant(s) = state else {
            return;
        };
        if input.target_socket != s.trigger {
            return;
        }
        engine.emit_data(s.output, s.value.clone());
        if let Some(then) = s.then {
            engine.emit_signal(then);
        }
    }
}

/// Declare a `Constant` node emitting `value` on `output` when `trigger` fires.
#[must_use]
pub fn desc(
    id: NodeHandle,
    trigger: SocketHandle,
    output: SocketHandle,
    then: Option<SocketHandle>,
    value: Payload,
) -> NodeDesc {
    let output_type = value.socket_type();
    let state = ConstantState {
        trigger,
        output,
        then,
        value,
    };
    let mut node = NodeDesc::new(id, NodeState::Constant(state))
        .with_socket(SocketDesc::input(trigger, "trigger", SocketType::Signal))
        .with_socket(SocketDesc::output(output, "value", output_type));
    if let Some(then) = then {
        node = node.with_socket(SocketDesc::output(then, "then", SocketType::Signal));
    }
    node
}
