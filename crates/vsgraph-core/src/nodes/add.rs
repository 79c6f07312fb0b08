//! `Add`: float sum of two data inputs, re-emitted on every delivery.

use crate::asset::{NodeDesc, SocketDesc};
use crate::behavior::NodeBehavior;
use crate::engine::EngineHandle;
use crate::nodes::NodeState;
use crate::types::{NodeHandle, SocketHandle, SocketType};
use crate::value::{Payload, TriggerValue};
use serde::{Deserialize, Serialize};

/// Local state of an `Add` node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AddState {
    /// Float input for the left operand.
    pub lhs_input: SocketHandle,
    /// Float input for the right operand.
    pub rhs_input: SocketHandle,
    /// Float output carrying the sum.
    pub output: SocketHandle,
    /// Last value received on `lhs_input`.
    #[serde(default)]
    pub lhs: f32,
    /// Last value received on `rhs_input`.
    #[serde(default)]
    pub rhs: f32,
}

impl AddState {
    /// Current sum of the cached operands.
    #[must_use]
    pub fn sum(&self) -> f32 {
        self.lhs + self.rhs
    }
}

/// Behavior of the `Add` kind.
pub struct AddBehavior;

impl NodeBehavior for AddBehavior {
    fn on_input(
        &self,
        _node: NodeHandle,
        input: &TriggerValue,
        state: &mut NodeState,
        engine: &mut EngineHandle<'_>,
    ) {
        let NodeState::Add(s) = state else {
            return;
        };
        let Some(value) = input.payload.as_f32() else {
            return;
        };
        if input.target_socket == s.lhs_input {
            s.lhs = value;
        } else if input.target_socket == s.rhs_input {
            s.rhs = value;
        } else {
            return;
        }
        engine.emit_data(s.output, Payload::Float(s.sum()));
    }
}

/// Declare an `Add` node with two float inputs and one float output.
#[must_use]
pub fn desc(
    id: NodeHandle,
    lhs_input: SocketHandle,
    rhs_input: SocketHandle,
    output: SocketHandle,
) -> NodeDesc {
    let state = AddState {
        lhs_input,
        rhs_input,
        output,
        lhs: 0.0,
        rhs: 0.0,
    };
    NodeDesc::new(id, NodeState::Add(state))
        .with_socket(SocketDesc::input(lhs_input, "a", SocketType::Float))
        .with_socket(SocketDesc::input(rhs_input, "b", SocketType::Float))
        .with_socket(SocketDesc::output(output, "sum", SocketType::Float))
}
