//! # Value Model
//!
//! Typed payloads moved across sockets, and the conversion rules between
//! numeric socket types.
//!
//! ## Conversion Rules
//!
//! Conversion is defined only among `Int`, `Float`, `Vector2`, `Vector3`
//! and `Vector4`. `Signal`, `EntityRef` and `String` never convert.
//!
//! | From        | To          | Result                                   |
//! |-------------|-------------|------------------------------------------|
//! | scalar      | scalar      | numeric cast (float to int truncates)    |
//! | scalar      | vectorN     | scalar in `x`, other components zero     |
//! | vectorN     | scalar      | `x` component                            |
//! | vectorN     | vectorM < N | first M components                       |
//! | vectorN     | vectorM > N | existing components, rest padded with 0  |
//!
//! Truncation and padding are silent. Float to int uses Rust `as` casts:
//! truncation toward zero, NaN becomes 0 and out-of-range values saturate.

use crate::primitives::MAX_VECTOR_WIDTH;
use crate::types::{NodeHandle, SocketHandle, SocketType};
use serde::{Deserialize, Serialize};

// =============================================================================
// VECTOR & REFERENCE TYPES
// =============================================================================

/// Two-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    /// First component.
    pub x: f32,
    /// Second component.
    pub y: f32,
}

/// Three-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    /// First component.
    pub x: f32,
    /// Second component.
    pub y: f32,
    /// Third component.
    pub z: f32,
}

/// Four-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector4 {
    /// First component.
    pub x: f32,
    /// Second component.
    pub y: f32,
    /// Third component.
    pub z: f32,
    /// Fourth component.
    pub w: f32,
}

impl Vector2 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Vector3 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Vector4 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

/// Reference to an entity owned by the host engine.
///
/// The engine never dereferences it; it is carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRef(pub u64);

// =============================================================================
// PAYLOAD
// =============================================================================

/// A value of exactly one `SocketType`.
///
/// The variant is the type tag, so tag and contents can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Payload {
    /// Control impulse with no data.
    Signal,
    /// Integer payload.
    Int(i32),
    /// Float payload.
    Float(f32),
    /// Two-component vector payload.
    Vector2(Vector2),
    /// Three-component vector payload.
    Vector3(Vector3),
    /// Four-component vector payload.
    Vector4(Vector4),
    /// Host entity reference payload.
    EntityRef(EntityRef),
    /// String payload.
    String(String),
}

impl Payload {
    /// Get the socket type this payload belongs to.
    #[must_use]
    pub fn socket_type(&self) -> SocketType {
        match self {
            Payload::Signal => SocketType::Signal,
            Payload::Int(_) => SocketType::Int,
            Payload::Float(_) => SocketType::Float,
            Payload::Vector2(_) => SocketType::Vector2,
            Payload::Vector3(_) => SocketType::Vector3,
            Payload::Vector4(_) => SocketType::Vector4,
            Payload::EntityRef(_) => SocketType::EntityRef,
            Payload::String(_) => SocketType::String,
        }
    }

    /// Check if this payload is a control impulse.
    #[must_use]
    pub fn is_signal(&self) -> bool {
        matches!(self, Payload::Signal)
    }

    /// Get as float if this is a scalar (`Int` is widened).
    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Payload::Float(v) => Some(*v),
            Payload::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// Convert to the payload a socket of `target` type expects.
    ///
    /// Returns `None` when no conversion exists (see module docs).
    #[must_use]
    pub fn convert_to(&self, target: SocketType) -> Option<Payload> {
        convert(self, target)
    }

    /// Numeric components padded to the maximum vector width.
    fn components(&self) -> Option<[f32; MAX_VECTOR_WIDTH]> {
        match *self {
            Payload::Int(v) => Some([v as f32, 0.0, 0.0, 0.0]),
            Payload::Float(v) => Some([v, 0.0, 0.0, 0.0]),
            Payload::Vector2(v) => Some([v.x, v.y, 0.0, 0.0]),
            Payload::Vector3(v) => Some([v.x, v.y, v.z, 0.0]),
            Payload::Vector4(v) => Some([v.x, v.y, v.z, v.w]),
            _ => None,
        }
    }
}

impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Signal => f.write_str("signal"),
            Payload::Int(v) => write!(f, "{v}"),
            Payload::Float(v) => write!(f, "{v}"),
            Payload::Vector2(v) => write!(f, "({}, {})", v.x, v.y),
            Payload::Vector3(v) => write!(f, "({}, {}, {})", v.x, v.y, v.z),
            Payload::Vector4(v) => write!(f, "({}, {}, {}, {})", v.x, v.y, v.z, v.w),
            Payload::EntityRef(e) => write!(f, "entity#{}", e.0),
            Payload::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i32> for Payload {
    fn from(v: i32) -> Self {
        Payload::Int(v)
    }
}

impl From<f32> for Payload {
    fn from(v: f32) -> Self {
        Payload::Float(v)
    }
}

impl From<Vector2> for Payload {
    fn from(v: Vector2) -> Self {
        Payload::Vector2(v)
    }
}

impl From<Vector3> for Payload {
    fn from(v: Vector3) -> Self {
        Payload::Vector3(v)
    }
}

impl From<Vector4> for Payload {
    fn from(v: Vector4) -> Self {
        Payload::Vector4(v)
    }
}

impl From<EntityRef> for Payload {
    fn from(v: EntityRef) -> Self {
        Payload::EntityRef(v)
    }
}

impl From<String> for Payload {
    fn from(v: String) -> Self {
        Payload::String(v)
    }
}

impl From<&str> for Payload {
    fn from(v: &str) -> Self {
        Payload::String(v.to_string())
    }
}

// =============================================================================
// CONVERSION
// =============================================================================

/// Map a payload in the producing socket's type to the consuming socket's type.
///
/// Same-typed payloads pass through unchanged (including `Signal`,
/// `EntityRef` and `String`). Numeric payloads follow the table in the module
/// docs. Every other pairing returns `None`.
#[must_use]
pub fn convert(payload: &Payload, target: SocketType) -> Option<Payload> {
    let source = payload.socket_type();
    if source == target {
        return Some(payload.clone());
    }
    if !source.converts_to(target) {
        return None;
    }

    // Components past the source width are already zero, so narrowing and
    // padding both fall out of reading the first `target` components.
    let [x, y, z, w] = payload.components()?;
    match target {
        SocketType::Int => Some(Payload::Int(x as i32)),
        SocketType::Float => Some(Payload::Float(x)),
        SocketType::Vector2 => Some(Payload::Vector2(Vector2::new(x, y))),
        SocketType::Vector3 => Some(Payload::Vector3(Vector3::new(x, y, z))),
        SocketType::Vector4 => Some(Payload::Vector4(Vector4::new(x, y, z, w))),
        SocketType::Undefined
        | SocketType::Signal
        | SocketType::EntityRef
        | SocketType::String => None,
    }
}

// =============================================================================
// TRIGGER VALUE
// =============================================================================

/// One pending delivery: a payload addressed to an input socket.
///
/// Created during propagation and consumed within the same tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerValue {
    /// The receiving input socket.
    pub target_socket: SocketHandle,
    /// The node owning `target_socket`.
    pub target_node: NodeHandle,
    /// The delivered payload, already converted to the socket's type.
    pub payload: Payload,
}

impl TriggerValue {
    /// Create a new trigger value.
    #[must_use]
    pub fn new(target_node: NodeHandle, target_socket: SocketHandle, payload: Payload) -> Self {
        Self {
            target_socket,
            target_node,
            payload,
        }
    }

    /// Create a payload-less signal delivery.
    #[must_use]
    pub fn signal(target_node: NodeHandle, target_socket: SocketHandle) -> Self {
        Self::new(target_node, target_socket, Payload::Signal)
    }

    /// Get the type tag of the carried payload.
    #[must_use]
    pub fn value_type(&self) -> SocketType {
        self.payload.socket_type()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_to_int_truncates_toward_zero() {
        assert_eq!(
            convert(&Payload::Float(3.7), SocketType::Int),
            Some(Payload::Int(3))
        );
        assert_eq!(
            convert(&Payload::Float(-3.7), SocketType::Int),
            Some(Payload::Int(-3))
        );
    }

    #[test]
    fn float_to_int_saturates_and_maps_nan_to_zero() {
        assert_eq!(
            convert(&Payload::Float(f32::NAN), SocketType::Int),
            Some(Payload::Int(0))
        );
        assert_eq!(
            convert(&Payload::Float(1e20), SocketType::Int),
            Some(Payload::Int(i32::MAX))
        );
    }

    #[test]
    fn scalar_widens_into_first_component() {
        assert_eq!(
            convert(&Payload::Float(3.7), SocketType::Vector2),
            Some(Payload::Vector2(Vector2::new(3.7, 0.0)))
        );
        assert_eq!(
            convert(&Payload::Int(5), SocketType::Vector4),
            Some(Payload::Vector4(Vector4::new(5.0, 0.0, 0.0, 0.0)))
        );
    }

    #[test]
    fn vector_narrows_to_first_component() {
        let v = Payload::Vector3(Vector3::new(1.5, 2.0, 3.0));
        assert_eq!(convert(&v, SocketType::Float), Some(Payload::Float(1.5)));
        assert_eq!(convert(&v, SocketType::Int), Some(Payload::Int(1)));
    }

    #[test]
    fn vector_drops_trailing_components() {
        let v = Payload::Vector4(Vector4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(
            convert(&v, SocketType::Vector2),
            Some(Payload::Vector2(Vector2::new(1.0, 2.0)))
        );
        assert_eq!(
            convert(&v, SocketType::Vector3),
            Some(Payload::Vector3(Vector3::new(1.0, 2.0, 3.0)))
        );
    }

    #[test]
    fn vector_pads_missing_components() {
        let v = Payload::Vector2(Vector2::new(1.0, 2.0));
        assert_eq!(
            convert(&v, SocketType::Vector4),
            Some(Payload::Vector4(Vector4::new(1.0, 2.0, 0.0, 0.0)))
        );
    }

    #[test]
    fn int_identity_is_exact() {
        let big = Payload::Int(16_777_217);
        assert_eq!(convert(&big, SocketType::Int), Some(big.clone()));
    }

    #[test]
    fn opaque_types_pass_through_only_to_themselves() {
        let s = Payload::from("hello");
        assert_eq!(convert(&s, SocketType::String), Some(s.clone()));
        assert_eq!(convert(&s, SocketType::Int), None);

        let e = Payload::EntityRef(EntityRef(9));
        assert_eq!(convert(&e, SocketType::EntityRef), Some(e.clone()));
        assert_eq!(convert(&e, SocketType::Float), None);

        assert_eq!(
            convert(&Payload::Signal, SocketType::Signal),
            Some(Payload::Signal)
        );
        assert_eq!(convert(&Payload::Signal, SocketType::Int), None);
        assert_eq!(convert(&Payload::Int(1), SocketType::Signal), None);
    }

    #[test]
    fn trigger_value_reports_payload_type() {
        let tv = TriggerValue::new(NodeHandle(1), SocketHandle(2), Payload::Float(1.0));
        assert_eq!(tv.value_type(), SocketType::Float);
        assert_eq!(
            TriggerValue::signal(NodeHandle(1), SocketHandle(2)).value_type(),
            SocketType::Signal
        );
    }

    #[test]
    fn payload_display() {
        assert_eq!(Payload::Vector2(Vector2::new(3.5, 0.0)).to_string(), "(3.5, 0)");
        assert_eq!(Payload::Signal.to_string(), "signal");
    }
}
