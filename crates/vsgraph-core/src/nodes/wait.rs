//! `Wait`: delays a signal by a fixed number of ticks.
//!
//! The countdown starts when the input signal arrives. The node then joins
//! the active set, decrements once per update, and fires its output on the
//! update that reaches zero. A signal arriving while armed restarts the
//! countdown.

use crate::asset::{NodeDesc, SocketDesc};
use crate::behavior::NodeBehavior;
use crate::engine::EngineHandle;
use crate::nodes::NodeState;
use crate::types::{NodeHandle, SocketHandle, SocketType};
use crate::value::TriggerValue;
use serde::{Deserialize, Serialize};

/// Local state of a `Wait` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitState {
    /// Signal input arming the countdown.
    pub input: SocketHandle,
    /// Signal output fired when the countdown ends.
    pub output: SocketHandle,
    /// Number of updates between arming and firing. Zero behaves like one.
    pub ticks: u32,
    /// Updates left before firing, `None` while idle.
    #[serde(default)]
    pub remaining: Option<u32>,
}

impl WaitState {
    /// Check if a countdown is in progress.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }
}

/// Behavior of the `Wait` kind.
pub struct WaitBehavior;

impl NodeBehavior for WaitBehavior {
    fn update(&self, node: NodeHandle, state: &mut NodeState, engine: &mut EngineHandle<'_>) {
        let NodeState::Wait(s) = state else {
            return;
        };
        match s.remaining {
            Some(left) if left > 1 => s.remaining = Some(left - 1),
            Some(_) => {
                s.remaining = None;
                engine.emit_signal(s.output);
                engine.cancel_continuous_update(node);
            }
            None => engine.cancel_continuous_update(node),
        }
    }

    fn on_input(
        &self,
        node: NodeHandle,
        input: &TriggerValue,
        state: &mut NodeState,
        engine: &mut EngineHandle<'_>,
    ) {
        let NodeState::Wait(s) = state else {
            return;
        };
        if input.target_socket != s.input {
            return;
        }
        s.remaining = Some(s.ticks.max(1));
        engine.request_continuous_update(node);
    }
}

/// Declare a `Wait` node delaying `input` by `ticks` ticks.
#[must_use]
pub fn desc(id: NodeHandle, input: SocketHandle, output: SocketHandle, ticks: u32) -> NodeDesc {
    let state = WaitState {
        input,
        output,
        ticks,
        remaining: None,
    };
    NodeDesc::new(id, NodeState::Wait(state))
        .with_socket(SocketDesc::input(input, "in", SocketType::Signal))
        .with_socket(SocketDesc::output(output, "out", SocketType::Signal))
}
