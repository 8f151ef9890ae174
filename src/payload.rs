//! Caller-supplied payload data.

use std::fmt;

/// Marker for types that can be stored as record or notarization payloads.
///
/// A payload is plain structured data: cloneable, comparable by value,
/// and freely droppable. Resource handles (file descriptors, locks,
/// capability handles) must not be embedded in a payload; the blanket
/// implementation covers every plain-data type automatically.
pub trait Payload: Clone + PartialEq + fmt::Debug {}

impl<T: Clone + PartialEq + fmt::Debug> Payload for T {}
