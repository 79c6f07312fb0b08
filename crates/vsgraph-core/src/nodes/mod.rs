//! # Built-in Node Kinds
//!
//! One submodule per [`NodeKind`]. Each provides:
//! - a state struct (the node-local data carried in [`NodeState`])
//! - a behavior implementing [`NodeBehavior`](crate::NodeBehavior)
//! - a `desc` constructor producing a ready-to-use [`NodeDesc`](crate::NodeDesc)

pub mod add;
pub mod constant;
pub mod print;
pub mod relay;
pub mod start;
pub mod wait;

use crate::behavior::BehaviorTable;
use crate::types::{NodeKind, SocketDirection, SocketHandle, SocketType};
use serde::{Deserialize, Serialize};

pub use add::AddState;
pub use constant::ConstantState;
pub use print::PrintState;
pub use relay::RelayState;
pub use start::StartState;
pub use wait::WaitState;

/// Type constraint a node places on a socket its state refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketRule {
    /// Carries signals only.
    Signal,
    /// Any defined type, signals included.
    Any,
    /// Any numeric type.
    Numeric,
    /// Accepts data of the given type, directly or through conversion.
    From(SocketType),
}

impl SocketRule {
    /// Check a declared socket type against this rule.
    #[must_use]
    pub fn allows(self, declared: SocketType) -> bool {
        match self {
            Self::Signal => declared == SocketType::Signal,
            Self::Any => declared != SocketType::Undefined,
            Self::Numeric => declared.is_numeric(),
            Self::From(source) => source != SocketType::Signal && source.converts_to(declared),
        }
    }
}

/// One socket a node's state refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketRole {
    /// The referenced socket.
    pub socket: SocketHandle,
    /// Direction the socket must have.
    pub direction: SocketDirection,
    /// Types the socket may declare.
    pub rule: SocketRule,
}

impl SocketRole {
    fn new(socket: SocketHandle, direction: SocketDirection, rule: SocketRule) -> Self {
        Self {
            socket,
            direction,
            rule,
        }
    }
}

/// Node-local state, one variant per node kind.
///
/// The engine hands each node a mutable reference to its own state on every
/// call. State is never shared between nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeState {
    /// State of a `Start` node.
    Start(StartState),
    /// State of a `Wait` node.
    Wait(WaitState),
    /// State of a `Print` node.
    Print(PrintState),
    /// State of a `Constant` node.
    Constant(ConstantState),
    /// State of an `Add` node.
    Add(AddState),
    /// State of a `Relay` node.
    Relay(RelayState),
}

impl NodeState {
    /// Get the node kind this state belongs to.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeState::Start(_) => NodeKind::Start,
            NodeState::Wait(_) => NodeKind::Wait,
            NodeState::Print(_) => NodeKind::Print,
            NodeState::Constant(_) => NodeKind::Constant,
            NodeState::Add(_) => NodeKind::Add,
            NodeState::Relay(_) => NodeKind::Relay,
        }
    }

    /// Sockets this state refers to, with the role each must play.
    ///
    /// Every socket must belong to the node and match its role.
    #[must_use]
    pub fn socket_roles(&self) -> Vec<SocketRole> {
        use SocketDirection::{Input, Output};
        match self {
            NodeState::Start(s) => vec![SocketRole::new(s.output, Output, SocketRule::Signal)],
            NodeState::Wait(s) => vec![
                SocketRole::new(s.input, Input, SocketRule::Signal),
                SocketRole::new(s.output, Output, SocketRule::Signal),
            ],
            NodeState::Print(s) => vec![SocketRole::new(s.input, Input, SocketRule::Any)],
            NodeState::Constant(s) => {
                let mut roles = vec![
                    SocketRole::new(s.trigger, Input, SocketRule::Signal),
                    SocketRole::new(s.output, Output, SocketRule::From(s.value.socket_type())),
                ];
                roles.extend(
                    s.then
                        .map(|then| SocketRole::new(then, Output, SocketRule::Signal)),
                );
                roles
            }
            NodeState::Add(s) => vec![
                SocketRole::new(s.lhs_input, Input, SocketRule::Numeric),
                SocketRole::new(s.rhs_input, Input, SocketRule::Numeric),
                SocketRole::new(s.output, Output, SocketRule::From(SocketType::Float)),
            ],
            NodeState::Relay(s) => vec![
                SocketRole::new(s.input, Input, SocketRule::Signal),
                SocketRole::new(s.output, Output, SocketRule::Signal),
            ],
        }
    }

    /// Get as Print state.
    #[must_use]
    pub fn as_print(&self) -> Option<&PrintState> {
        match self {
            NodeState::Print(s) => Some(s),
            _ => None,
        }
    }

    /// Get as Wait state.
    #[must_use]
    pub fn as_wait(&self) -> Option<&WaitState> {
        match self {
            NodeState::Wait(s) => Some(s),
            _ => None,
        }
    }

    /// Get as Add state.
    #[must_use]
    pub fn as_add(&self) -> Option<&AddState> {
        match self {
            NodeState::Add(s) => Some(s),
            _ => None,
        }
    }
}

/// Register every built-in node kind into `table`.
pub fn register_builtin(table: &mut BehaviorTable) {
    table.register(NodeKind::Start, start::StartBehavior);
    table.register(NodeKind::Wait, wait::WaitBehavior);
    table.register(NodeKind::Print, print::PrintBehavior);
    table.register(NodeKind::Constant, constant::ConstantBehavior);
    table.register(NodeKind::Add, add::AddBehavior);
    table.register(NodeKind::Relay, relay::RelayBehavior);
}
