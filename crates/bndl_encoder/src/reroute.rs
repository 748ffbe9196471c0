// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reroute chain collapsing.
//!
//! Walks are iterative and bounded. A walk that runs out of links or steps
//! stops on the last socket it reached; if that socket still belongs to a
//! pass-through node there is no effective endpoint.

use bndl_graph::{Graph, NodeKind, SocketId};
use std::collections::HashSet;

/// A link between two effective (non pass-through) sockets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectiveLink {
    /// Producing output socket
    pub from: SocketId,
    /// Consuming input socket
    pub to: SocketId,
}

/// Resolves links through chains of reroute nodes
pub struct RerouteCollapser<'g> {
    graph: &'g Graph,
    max_steps: usize,
}

impl<'g> RerouteCollapser<'g> {
    /// Create a collapser for one scope
    pub fn new(graph: &'g Graph, max_steps: usize) -> Self {
        Self { graph, max_steps }
    }

    fn owned_by_reroute(&self, socket: SocketId) -> bool {
        self.graph
            .socket_owner(socket)
            .is_some_and(|node| node.is_reroute())
    }

    /// Walk backward from an output socket to its real producer
    pub fn resolve_source(&self, socket: SocketId) -> SocketId {
        let mut current = socket;
        let mut steps = 0;
        while steps < self.max_steps && self.owned_by_reroute(current) {
            let next = self
                .graph
                .socket_owner(current)
                .and_then(|node| node.input(0))
                .and_then(|input| self.graph.links_to(input.id).next());
            match next {
                Some(link) => current = link.from_socket,
                None => break,
            }
            steps += 1;
        }
        current
    }

    /// Walk forward from an input socket to its first real consumer
    pub fn resolve_dest(&self, socket: SocketId) -> SocketId {
        let mut current = socket;
        let mut steps = 0;
        while steps < self.max_steps && self.owned_by_reroute(current) {
            let next = self
                .graph
                .socket_owner(current)
                .and_then(|node| node.output(0))
                .and_then(|output| self.graph.links_from(output.id).next());
            match next {
                Some(link) => current = link.to_socket,
                None => break,
            }
            steps += 1;
        }
        current
    }

    /// Whether the socket belongs to a node that may appear in a link statement
    pub fn is_effective(&self, socket: SocketId) -> bool {
        self.graph
            .socket_owner(socket)
            .is_some_and(|node| !matches!(node.kind, NodeKind::Reroute | NodeKind::Frame))
    }

    /// Every link of the scope collapsed to effective endpoints.
    ///
    /// Edges are deduplicated by socket identity and keep first-seen order.
    pub fn collapsed_links(&self) -> Vec<EffectiveLink> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for link in self.graph.links() {
            let edge = EffectiveLink {
                from: self.resolve_source(link.from_socket),
                to: self.resolve_dest(link.to_socket),
            };
            if !self.is_effective(edge.from) || !self.is_effective(edge.to) {
                continue;
            }
            if seen.insert(edge) {
                edges.push(edge);
            }
        }
        edges
    }
}
