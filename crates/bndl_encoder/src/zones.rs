// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pairing of zone begin/end nodes by horizontal position.

use crate::enumerate::Enumeration;
use bndl_graph::{Graph, Node, NodeId, NodeKind, ZoneKind};

/// A matched begin/end pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonePair {
    /// Zone category
    pub kind: ZoneKind,
    /// Begin node
    pub begin: NodeId,
    /// End node
    pub end: NodeId,
}

fn x_of(node: &Node) -> f32 {
    node.location.map_or(0.0, |[x, _]| x)
}

/// Pair the i-th begin with the i-th end of each zone kind, ordered by x.
///
/// Unequal counts truncate to the shorter list.
pub fn pair_zones(graph: &Graph, enumeration: &Enumeration) -> Vec<ZonePair> {
    let mut pairs = Vec::new();
    for &kind in ZoneKind::all() {
        let mut begins: Vec<&Node> = Vec::new();
        let mut ends: Vec<&Node> = Vec::new();
        for node in graph.nodes().filter(|n| enumeration.contains(n.id)) {
            match node.kind {
                NodeKind::ZoneInput(k) if k == kind => begins.push(node),
                NodeKind::ZoneOutput(k) if k == kind => ends.push(node),
                _ => {}
            }
        }
        begins.sort_by(|a, b| x_of(a).total_cmp(&x_of(b)));
        ends.sort_by(|a, b| x_of(a).total_cmp(&x_of(b)));

        if begins.len() != ends.len() {
            tracing::debug!(
                "Unbalanced {kind:?} zones: {} begin, {} end",
                begins.len(),
                ends.len()
            );
        }
        pairs.extend(begins.iter().zip(ends.iter()).map(|(begin, end)| ZonePair {
            kind,
            begin: begin.id,
            end: end.id,
        }));
    }
    pairs
}
