// SPDX-License-Identifier: MIT OR Apache-2.0
//! Directed links between sockets.

use crate::node::NodeId;
use crate::socket::SocketId;

/// A link from an output socket to an input socket.
///
/// Owning nodes are resolved from the socket handles when the link is made,
/// so walks never have to search the node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Producing node
    pub from_node: NodeId,
    /// Producing output socket
    pub from_socket: SocketId,
    /// Consuming node
    pub to_node: NodeId,
    /// Consuming input socket
    pub to_socket: SocketId,
}
