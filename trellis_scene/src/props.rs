// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node property stores.
//!
//! Every node owns a [`Props`] map. A composite node's map doubles as the
//! shared blackboard of its direct children: hooks reach it through
//! [`NodeCx::parent_prop`](crate::NodeCx::parent_prop) and
//! [`NodeCx::set_parent_prop`](crate::NodeCx::set_parent_prop), and values
//! listed as shared keys are copied down to children that lack them.

use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use core::any::Any;
use core::fmt;

use kurbo::{Point, Rect};

use crate::pointer::PointerHandle;

/// Well-known property keys.
pub mod keys {
    /// The scene's pointer, propagated to every node that lacks one.
    pub const POINTER: &str = "pointer";
    /// Rendering position published by the pointer into the scene's store.
    pub const POINTER_POSITION: &str = "pointer_position";
    /// The string drawn by a text node.
    pub const TEXT: &str = "text";
}

/// A value held in a [`Props`] store.
#[derive(Clone)]
pub enum PropValue {
    /// A flag.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    Text(String),
    /// A position.
    Point(Point),
    /// A region.
    Rect(Rect),
    /// A shared pointer reference.
    Pointer(PointerHandle),
    /// Anything else.
    Any(Rc<dyn Any>),
}

impl PropValue {
    /// Wrap an arbitrary value.
    pub fn any<T: Any>(value: T) -> Self {
        Self::Any(Rc::new(value))
    }

    /// The flag, if this is a [`PropValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The number, if this is a [`PropValue::Number`].
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string, if this is a [`PropValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The position, if this is a [`PropValue::Point`].
    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::Point(p) => Some(*p),
            _ => None,
        }
    }

    /// The region, if this is a [`PropValue::Rect`].
    pub fn as_rect(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(*r),
            _ => None,
        }
    }

    /// The pointer, if this is a [`PropValue::Pointer`].
    pub fn as_pointer(&self) -> Option<&PointerHandle> {
        match self {
            Self::Pointer(p) => Some(p),
            _ => None,
        }
    }

    /// Downcast a [`PropValue::Any`] to `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Any(v) => v.downcast_ref(),
            _ => None,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Point(p) => f.debug_tuple("Point").field(p).finish(),
            Self::Rect(r) => f.debug_tuple("Rect").field(r).finish(),
            Self::Pointer(p) => f.debug_tuple("Pointer").field(&Rc::as_ptr(p)).finish(),
            Self::Any(_) => f.write_str("Any(..)"),
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Point> for PropValue {
    fn from(value: Point) -> Self {
        Self::Point(value)
    }
}

impl From<Rect> for PropValue {
    fn from(value: Rect) -> Self {
        Self::Rect(value)
    }
}

impl From<PointerHandle> for PropValue {
    fn from(value: PointerHandle) -> Self {
        Self::Pointer(value)
    }
}

/// String-keyed property store owned by a single node.
///
/// Writes are unvalidated and the last write wins.
#[derive(Clone, Debug, Default)]
pub struct Props {
    map: BTreeMap<Cow<'static, str>, PropValue>,
}

impl Props {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `key`, or `None` if nothing was stored.
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.map.get(key)
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<Cow<'static, str>>, value: impl Into<PropValue>) {
        self.map.insert(key.into(), value.into());
    }

    /// Remove and return the value under `key`.
    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.map.remove(key)
    }

    /// Returns true if a value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.map.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// The pointer stored under [`keys::POINTER`], if any.
    pub fn pointer(&self) -> Option<&PointerHandle> {
        self.get(keys::POINTER).and_then(PropValue::as_pointer)
    }

    /// Copy each of `shared` from `source` unless this store already has a value.
    pub(crate) fn inherit(&mut self, source: &Self, shared: &[Cow<'static, str>]) {
        for key in shared {
            if self.contains(key) {
                continue;
            }
            if let Some(value) = source.get(key) {
                self.map.insert(key.clone(), value.clone());
            }
        }
    }
}
