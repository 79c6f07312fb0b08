//! `Print`: records and logs every value delivered to its input.

use crate::asset::{NodeDesc, SocketDesc};
use crate::behavior::NodeBehavior;
use crate::engine::EngineHandle;
use crate::nodes::NodeState;
use crate::primitives::PRINT_HISTORY_LIMIT;
use crate::types::{NodeHandle, SocketHandle, SocketType};
use crate::value::{Payload, TriggerValue};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Local state of a `Print` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintState {
    /// Input socket, of any type.
    pub input: SocketHandle,
    /// Ignore every delivery after the first.
    #[serde(default)]
    pub once: bool,
    /// Number of deliveries recorded.
    #[serde(default)]
    pub count: u64,
    /// Most recent payloads, oldest first, capped at `PRINT_HISTORY_LIMIT`.
    #[serde(default)]
    pub history: VecDeque<Payload>,
}

impl PrintState {
    /// Get the most recent payload.
    #[must_use]
    pub fn last(&self) -> Option<&Payload> {
        self.history.back()
    }
}

/// Behavior of the `Print` kind.
pub struct PrintBehavior;

impl NodeBehavior for PrintBehavior {
    fn on_input(
        &self,
        node: NodeHandle,
        input: &TriggerValue,
        state: &mut NodeState,
        _engine: &mut EngineHandle<'_>,
    ) {
        let NodeState::Print(s) = state else {
            return;
        };
        if s.once && s.count > 0 {
            return;
        }
        s.count = s.count.saturating_add(1);
        if s.history.len() >= PRINT_HISTORY_LIMIT {
            s.history.pop_front();
        }
        s.history.push_back(input.payload.clone());
        tracing::info!(node = node.0, value = %input.payload, "print");
    }
}

/// Declare a `Print` node whose input accepts `input_type`.
#[must_use]
pub fn desc(id: NodeHandle, input: SocketHandle, input_type: SocketType, once: bool) -> NodeDesc {
    let state = PrintState {
        input,
        once,
        count: 0,
        history: VecDeque::new(),
    };
    NodeDesc::new(id, NodeState::Print(state))
        .with_socket(SocketDesc::input(input, "in", input_type))
}
