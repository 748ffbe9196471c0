// SPDX-License-Identifier: MIT OR Apache-2.0
//! Boundary port declarations of a graph scope.

use crate::socket::SocketDirection;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// A declared boundary port.
///
/// Identity is by position in the declared order; several items may share
/// one name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceItem {
    /// Display name, possibly blank
    pub name: String,
    /// Stable host identifier, when exposed
    #[serde(default)]
    pub identifier: Option<String>,
    /// Port direction as seen from outside the scope
    pub direction: SocketDirection,
    /// Default value
    #[serde(default)]
    pub default_value: Option<Value>,
    /// Tooltip text
    #[serde(default)]
    pub description: Option<String>,
    /// Exact socket type identifier
    #[serde(default)]
    pub socket_type: Option<String>,
    /// Structure tag (field, single value...)
    #[serde(default)]
    pub structure_type: Option<String>,
    /// Value subtype (distance, angle...)
    #[serde(default)]
    pub subtype: Option<String>,
    /// Lower bound
    #[serde(default)]
    pub min_value: Option<f64>,
    /// Upper bound
    #[serde(default)]
    pub max_value: Option<f64>,
    /// Hide the value widget
    #[serde(default)]
    pub hide_value: Option<bool>,
    /// Hide from instance panels
    #[serde(default)]
    pub hide_in_modifier: Option<bool>,
    /// Attribute bound as the default
    #[serde(default)]
    pub default_attribute: Option<String>,
}

impl InterfaceItem {
    /// Create a new item with no metadata
    pub fn new(name: impl Into<String>, direction: SocketDirection) -> Self {
        Self {
            name: name.into(),
            identifier: None,
            direction,
            default_value: None,
            description: None,
            socket_type: None,
            structure_type: None,
            subtype: None,
            min_value: None,
            max_value: None,
            hide_value: None,
            hide_in_modifier: None,
            default_attribute: None,
        }
    }

    /// Create a new input port
    pub fn input(name: impl Into<String>) -> Self {
        Self::new(name, SocketDirection::Input)
    }

    /// Create a new output port
    pub fn output(name: impl Into<String>) -> Self {
        Self::new(name, SocketDirection::Output)
    }

    /// Set the default value
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set the stable identifier
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Set the socket type
    pub fn with_socket_type(mut self, socket_type: impl Into<String>) -> Self {
        self.socket_type = Some(socket_type.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set numeric bounds
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_value = Some(min);
        self.max_value = Some(max);
        self
    }
}
