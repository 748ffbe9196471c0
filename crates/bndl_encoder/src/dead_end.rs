// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dead-end boundary port detection.
//!
//! A boundary port is dead-end when no real (non pass-through) node consumes
//! or produces it once reroutes are looked through. Missing nodes, missing
//! reroute sockets and exhausted step budgets all count as dead-end.

use bndl_graph::{Graph, SocketId};
use std::collections::HashSet;

/// Whether an output socket of the boundary-input node reaches no consumer.
///
/// Searches every path forward through reroutes.
pub fn is_dead_end_output(graph: &Graph, socket: SocketId, max_steps: usize) -> bool {
    let mut frontier = vec![socket];
    let mut seen = HashSet::new();
    let mut steps = 0;

    while let Some(current) = frontier.pop() {
        if steps >= max_steps {
            return true;
        }
        steps += 1;
        if !seen.insert(current) {
            continue;
        }
        for link in graph.links_from(current) {
            let Some(node) = graph.node(link.to_node) else {
                continue;
            };
            if !node.is_reroute() {
                return false;
            }
            if let Some(output) = node.output(0) {
                frontier.push(output.id);
            }
        }
    }
    true
}

/// Whether an input socket of the boundary-output node has no producer.
///
/// Walks backward through reroutes.
pub fn is_dead_end_input(graph: &Graph, socket: SocketId, max_steps: usize) -> bool {
    let mut current = socket;
    for _ in 0..max_steps {
        let Some(link) = graph.links_to(current).next() else {
            return true;
        };
        let Some(node) = graph.node(link.from_node) else {
            return true;
        };
        if !node.is_reroute() {
            return false;
        }
        match node.input(0) {
            Some(input) => current = input.id,
            None => return true,
        }
    }
    true
}
