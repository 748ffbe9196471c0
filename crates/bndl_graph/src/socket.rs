// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket definitions for node inputs/outputs.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity handle of a socket.
///
/// Assigned once when the snapshot is built. Socket positions are always
/// derived from this handle, never from incidental list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketId(pub Uuid);

impl SocketId {
    /// Create a new random socket ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SocketId {
    fn default() -> Self {
        Self::new()
    }
}

/// Socket direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketDirection {
    /// Input socket
    Input,
    /// Output socket
    Output,
}

impl SocketDirection {
    /// Placeholder label used for sockets with a blank name
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }

    /// The opposite direction
    pub fn flipped(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

/// A socket on a node
#[derive(Debug, Clone)]
pub struct Socket {
    /// Identity handle
    pub id: SocketId,
    /// Socket name, possibly blank
    pub name: String,
    /// Socket direction
    pub direction: SocketDirection,
    /// Semantic category as reported by the host (`GEOMETRY`, `FLOAT`, ...)
    pub category: String,
    /// Default value, used only while unlinked
    pub default_value: Option<Value>,
}

impl Socket {
    /// Create a new socket
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        direction: SocketDirection,
    ) -> Self {
        Self {
            id: SocketId::new(),
            name: name.into(),
            direction,
            category: category.into(),
            default_value: None,
        }
    }

    /// Create a new input socket
    pub fn input(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self::new(name, category, SocketDirection::Input)
    }

    /// Create a new output socket
    pub fn output(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self::new(name, category, SocketDirection::Output)
    }

    /// Set the default value
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}
