// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canonical per-type node numbering.

use crate::config::EncoderConfig;
use bndl_graph::{Graph, Node, NodeId};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// Canonical reference to a node within its scope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeRef {
    /// Type tag
    pub tag: String,
    /// 1-based sequence number among nodes of the same tag
    pub seq: usize,
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {} #{} ]", self.tag, self.seq)
    }
}

/// Readable type tag for a node
pub fn type_tag(node: &Node, config: &EncoderConfig) -> String {
    if let Some(alias) = config.type_aliases.get(&node.type_id) {
        return alias.clone();
    }
    if let Some(label) = node.type_label.as_deref().map(str::trim) {
        if !label.is_empty() {
            return label.to_string();
        }
    }
    config
        .type_prefixes
        .iter()
        .fold(node.type_id.clone(), |tag, prefix| tag.replace(prefix.as_str(), ""))
}

/// Node references of one scope, in node-list order
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    refs: IndexMap<NodeId, NodeRef>,
}

impl Enumeration {
    /// Number every node of the scope except reroutes and frames
    pub fn new(graph: &Graph, config: &EncoderConfig) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut refs = IndexMap::new();
        for node in graph.nodes().filter(|n| !n.kind.is_structural()) {
            let tag = type_tag(node, config);
            let count = counts.entry(tag.clone()).or_insert(0);
            *count += 1;
            refs.insert(node.id, NodeRef { tag, seq: *count });
        }
        Self { refs }
    }

    /// Reference of a node, `None` for skipped or foreign nodes
    pub fn get(&self, node_id: NodeId) -> Option<&NodeRef> {
        self.refs.get(&node_id)
    }

    /// Whether the node was numbered
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.refs.contains_key(&node_id)
    }

    /// All references in node-list order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeRef)> {
        self.refs.iter().map(|(id, r)| (*id, r))
    }

    /// Number of enumerated nodes
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Whether no node was numbered
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}
