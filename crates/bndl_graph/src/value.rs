// SPDX-License-Identifier: MIT OR Apache-2.0
//! Values carried by socket defaults, properties and instance overrides.

use serde::{Deserialize, Serialize};

/// Category of an external resource (datablock) reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Material
    Material,
    /// Scene object
    Object,
    /// Object collection
    Collection,
    /// Image
    Image,
    /// Mesh data
    Mesh,
    /// Curve data
    Curve,
    /// Any category the encoder has no sentinel for
    Other(String),
}

/// Reference to an external resource by its stable name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Resource category
    pub kind: ResourceKind,
    /// Resource name as shown by the host
    pub name: String,
}

impl ResourceRef {
    /// Create a new resource reference
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// A typed value read from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Fixed-size numeric tuple (vector, color, euler...)
    Tuple(Vec<f64>),
    /// String
    String(String),
    /// External resource reference
    Resource(ResourceRef),
    /// A host value of a shape the snapshot cannot express, by type name
    Unsupported(String),
}

impl Value {
    /// Numeric components of this value, if it has any.
    ///
    /// Scalars yield a single component, booleans count as `0`/`1`.
    pub fn numeric_components(&self) -> Option<Vec<f64>> {
        match self {
            Self::Bool(b) => Some(vec![if *b { 1.0 } else { 0.0 }]),
            Self::Int(i) => Some(vec![*i as f64]),
            Self::Float(f) => Some(vec![*f]),
            Self::Tuple(items) => Some(items.clone()),
            Self::String(_) | Self::Resource(_) | Self::Unsupported(_) => None,
        }
    }

    /// Whether this is a plain number (integer or float)
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl<const N: usize> From<[f64; N]> for Value {
    fn from(value: [f64; N]) -> Self {
        Self::Tuple(value.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_components() {
        assert_eq!(Value::Float(2.5).numeric_components(), Some(vec![2.5]));
        assert_eq!(Value::Int(3).numeric_components(), Some(vec![3.0]));
        assert_eq!(Value::Bool(true).numeric_components(), Some(vec![1.0]));
        assert_eq!(
            Value::from([1.0, 0.0, 0.0]).numeric_components(),
            Some(vec![1.0, 0.0, 0.0])
        );
        assert_eq!(Value::from("x").numeric_components(), None);
    }
}
