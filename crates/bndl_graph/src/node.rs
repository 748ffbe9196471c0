// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph snapshot.

use crate::graph::GraphId;
use crate::socket::Socket;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Category of a paired zone construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    /// Stateful simulation step
    Simulation,
    /// Repeat loop
    Repeat,
}

impl ZoneKind {
    /// All zone kinds, in pairing emission order
    pub fn all() -> &'static [ZoneKind] {
        &[ZoneKind::Simulation, ZoneKind::Repeat]
    }
}

/// Structural role of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NodeKind {
    /// Regular node
    #[default]
    Ordinary,
    /// Pass-through node with one input and one output
    Reroute,
    /// Purely visual grouping frame
    Frame,
    /// Boundary node mirroring the scope's input ports
    GroupInput,
    /// Boundary node mirroring the scope's output ports
    GroupOutput,
    /// Subgraph instantiation; the reference may be null
    Group(Option<GraphId>),
    /// Begin half of a paired zone
    ZoneInput(ZoneKind),
    /// End half of a paired zone
    ZoneOutput(ZoneKind),
}

impl NodeKind {
    /// Whether nodes of this kind are skipped by enumeration
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Reroute | Self::Frame)
    }
}

/// Value of a node-level property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Enumerated property, by UI label; `None` when the label is unavailable
    Enum(Option<String>),
    /// Any other typed value
    Value(Value),
}

/// A node-level property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// UI name of the property
    pub name: String,
    /// Current value
    pub value: PropertyValue,
}

/// A node's variable-length item list (e.g. index switch cases)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicItems {
    /// Field holding the item count (`Cases`)
    pub field: String,
    /// Prefix of the sockets each item creates (`Case`)
    pub socket_prefix: String,
    /// Item names, blank when unnamed
    pub names: Vec<String>,
}

/// A node instance in the graph
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Raw host type identifier
    pub type_id: String,
    /// Host display label for the type, if any
    pub type_label: Option<String>,
    /// Structural role
    pub kind: NodeKind,
    /// User label
    pub label: Option<String>,
    /// Operation or data-type label shown on the node
    pub variant: Option<String>,
    /// Position in the editor, when known
    pub location: Option<[f32; 2]>,
    /// Input sockets
    pub inputs: Vec<Socket>,
    /// Output sockets
    pub outputs: Vec<Socket>,
    /// Node-level properties
    pub properties: Vec<Property>,
    /// Variable-length item list
    pub items: Option<DynamicItems>,
}

impl Node {
    /// Create a new ordinary node of the given host type
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            type_id: type_id.into(),
            type_label: None,
            kind: NodeKind::Ordinary,
            label: None,
            variant: None,
            location: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            properties: Vec::new(),
            items: None,
        }
    }

    /// Create a reroute node with its single input and output
    pub fn reroute() -> Self {
        Self::new("NodeReroute")
            .with_kind(NodeKind::Reroute)
            .with_input(Socket::input("Input", "ANY"))
            .with_output(Socket::output("Output", "ANY"))
    }

    /// Set the structural role
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the host type label
    pub fn with_type_label(mut self, label: impl Into<String>) -> Self {
        self.type_label = Some(label.into());
        self
    }

    /// Set the user label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the variant label
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.location = Some([x, y]);
        self
    }

    /// Append an input socket
    pub fn with_input(mut self, socket: Socket) -> Self {
        self.inputs.push(socket);
        self
    }

    /// Append an output socket
    pub fn with_output(mut self, socket: Socket) -> Self {
        self.outputs.push(socket);
        self
    }

    /// Append a property
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.push(Property {
            name: name.into(),
            value,
        });
        self
    }

    /// Set the dynamic item list
    pub fn with_items(mut self, items: DynamicItems) -> Self {
        self.items = Some(items);
        self
    }

    /// Get an input socket by index
    pub fn input(&self, index: usize) -> Option<&Socket> {
        self.inputs.get(index)
    }

    /// Get an output socket by index
    pub fn output(&self, index: usize) -> Option<&Socket> {
        self.outputs.get(index)
    }

    /// The referenced subgraph of a group instance
    pub fn subgraph(&self) -> Option<GraphId> {
        match self.kind {
            NodeKind::Group(graph) => graph,
            _ => None,
        }
    }

    /// Whether this node is a pass-through reroute
    pub fn is_reroute(&self) -> bool {
        self.kind == NodeKind::Reroute
    }
}
