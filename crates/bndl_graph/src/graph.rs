// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph scope containing nodes, links and interface items.

use crate::interface::InterfaceItem;
use crate::link::Link;
use crate::node::{Node, NodeId};
use crate::socket::{SocketDirection, SocketId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a graph scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphId(pub Uuid);

impl GraphId {
    /// Create a new random graph ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a socket lives, derived from its identity handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketLocation {
    /// Owning node
    pub node: NodeId,
    /// Socket direction
    pub direction: SocketDirection,
    /// Position within the node's socket list of that direction
    pub index: usize,
}

/// A node graph scope (top level or named subgraph)
#[derive(Debug, Clone)]
pub struct Graph {
    /// Graph identity
    pub id: GraphId,
    /// Graph name
    pub name: String,
    /// Declared boundary ports, in order
    interface: Vec<InterfaceItem>,
    /// Nodes in declaration order
    nodes: IndexMap<NodeId, Node>,
    /// Links between sockets
    links: Vec<Link>,
    /// Socket identity index
    sockets: HashMap<SocketId, SocketLocation>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GraphId::new(),
            name: name.into(),
            interface: Vec::new(),
            nodes: IndexMap::new(),
            links: Vec::new(),
            sockets: HashMap::new(),
        }
    }

    /// Declare a boundary port
    pub fn add_interface_item(&mut self, item: InterfaceItem) {
        self.interface.push(item);
    }

    /// Boundary ports of one direction, with their position among them
    pub fn interface_items(
        &self,
        direction: SocketDirection,
    ) -> impl Iterator<Item = (usize, &InterfaceItem)> {
        self.interface
            .iter()
            .filter(move |item| item.direction == direction)
            .enumerate()
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        for (index, socket) in node.inputs.iter().enumerate() {
            self.sockets.insert(socket.id, SocketLocation {
                node: id,
                direction: SocketDirection::Input,
                index,
            });
        }
        for (index, socket) in node.outputs.iter().enumerate() {
            self.sockets.insert(socket.id, SocketLocation {
                node: id,
                direction: SocketDirection::Output,
                index,
            });
        }
        self.nodes.insert(id, node);
        id
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get all nodes in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Locate a socket by its identity handle
    pub fn locate(&self, socket_id: SocketId) -> Option<SocketLocation> {
        self.sockets.get(&socket_id).copied()
    }

    /// Get the node owning a socket
    pub fn socket_owner(&self, socket_id: SocketId) -> Option<&Node> {
        self.locate(socket_id).and_then(|loc| self.node(loc.node))
    }

    /// Link an output socket to an input socket
    pub fn connect(&mut self, from: SocketId, to: SocketId) -> Result<(), LinkError> {
        let source = self.locate(from).ok_or(LinkError::SocketNotFound(from))?;
        let target = self.locate(to).ok_or(LinkError::SocketNotFound(to))?;

        if source.direction != SocketDirection::Output
            || target.direction != SocketDirection::Input
        {
            return Err(LinkError::WrongDirection);
        }

        if source.node == target.node {
            return Err(LinkError::SelfLoop);
        }

        self.links.push(Link {
            from_node: source.node,
            from_socket: from,
            to_node: target.node,
            to_socket: to,
        });
        Ok(())
    }

    /// Get all links in insertion order
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    /// Get links leaving a specific socket
    pub fn links_from(&self, socket_id: SocketId) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |l| l.from_socket == socket_id)
    }

    /// Get links entering a specific socket
    pub fn links_to(&self, socket_id: SocketId) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |l| l.to_socket == socket_id)
    }

    /// Whether an input socket is fed by a link
    pub fn has_incoming(&self, socket_id: SocketId) -> bool {
        self.links_to(socket_id).next().is_some()
    }

    /// Get the number of links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when creating a link
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Socket not found in this graph
    #[error("Socket not found: {0:?}")]
    SocketNotFound(SocketId),

    /// Link must run from an output to an input
    #[error("Links must run from an output socket to an input socket")]
    WrongDirection,

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,
}
