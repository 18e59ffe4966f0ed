//! The generic component interface shared by every tree node

use crate::error::{QueryError, Result};
use crate::property::{Properties, Value};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Allocate a fresh identity
    pub fn next() -> Self {
        ComponentId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Anything that can sit in a component tree and be queried.
///
/// Game pieces implement this directly; [`Component`](crate::tree::Component)
/// is the leaf implementation and [`Zone`](crate::tree::Zone) the composite.
pub trait Entity: fmt::Debug {
    fn id(&self) -> ComponentId;

    /// Every property, in key order, regardless of visibility
    fn properties(&self) -> &Properties;

    fn properties_mut(&mut self) -> &mut Properties;

    /// Hidden entities answer every property read with `Value::Null`
    fn is_visible(&self) -> bool {
        true
    }

    /// Ordered children, or `None` for a leaf
    fn children(&self) -> Option<&[Box<dyn Entity>]> {
        None
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Box<dyn Entity>>> {
        None
    }

    fn is_leaf(&self) -> bool {
        self.children().is_none()
    }

    /// Read a property.
    ///
    /// Returns `Value::Null` when hidden and fails with
    /// [`QueryError::PropertyMissing`] when visible but absent.
    fn get(&self, name: &str) -> Result<Value> {
        if !self.is_visible() {
            return Ok(Value::Null);
        }
        self.properties()
            .get(name)
            .cloned()
            .ok_or_else(|| QueryError::PropertyMissing(name.to_string()))
    }

    /// Read a property and pass it through `cast`; hidden entities still
    /// return `Value::Null` without calling `cast`
    fn get_with(&self, name: &str, cast: &dyn Fn(Value) -> Value) -> Result<Value> {
        if !self.is_visible() {
            return Ok(Value::Null);
        }
        self.get(name).map(cast)
    }

    /// Store a property, returning the previous value
    fn set_property(&mut self, name: &str, value: Value) -> Option<Value> {
        self.properties_mut().insert(name.to_string(), value)
    }
}
