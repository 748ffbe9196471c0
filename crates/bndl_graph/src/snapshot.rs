// SPDX-License-Identifier: MIT OR Apache-2.0
//! Serializable host snapshots.
//!
//! A snapshot describes graphs with human-writable keys instead of identity
//! handles. Building it assigns [`SocketId`](crate::socket::SocketId)s once
//! and resolves subgraph references by name. Links that cannot be made are
//! skipped with a warning; the rest of the graph still loads.
//!
//! ```ron
//! (
//!     graphs: [(
//!         name: "Main",
//!         nodes: [
//!             (
//!                 key: "value",
//!                 type_id: "ShaderNodeValue",
//!                 outputs: [(name: "Value", category: "VALUE")],
//!             ),
//!             (
//!                 key: "out",
//!                 type_id: "NodeGroupOutput",
//!                 kind: GroupOutput,
//!                 inputs: [(name: "Value")],
//!             ),
//!         ],
//!         links: [(from: ("value", 0), to: ("out", 0))],
//!     )],
//!     root: Some("Main"),
//! )
//! ```

use crate::graph::{Graph, GraphId, LinkError};
use crate::interface::InterfaceItem;
use crate::library::{Library, Modifier, Subject};
use crate::node::{DynamicItems, Node, NodeKind, Property, ZoneKind};
use crate::socket::{Socket, SocketDirection, SocketId};
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Structural role of a node, with subgraphs referenced by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NodeKindSpec {
    /// Regular node
    #[default]
    Ordinary,
    /// Pass-through node
    Reroute,
    /// Visual frame
    Frame,
    /// Boundary-input node
    GroupInput,
    /// Boundary-output node
    GroupOutput,
    /// Subgraph instance, by graph name
    Group(Option<String>),
    /// Zone begin
    ZoneInput(ZoneKind),
    /// Zone end
    ZoneOutput(ZoneKind),
}

/// A socket entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocketSpec {
    /// Socket name
    #[serde(default)]
    pub name: String,
    /// Semantic category
    #[serde(default)]
    pub category: String,
    /// Default value
    #[serde(default)]
    pub default: Option<Value>,
}

/// A node entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Key used by links, unique within the graph
    pub key: String,
    /// Raw host type identifier
    pub type_id: String,
    /// Host display label for the type
    #[serde(default)]
    pub type_label: Option<String>,
    /// Structural role
    #[serde(default)]
    pub kind: NodeKindSpec,
    /// User label
    #[serde(default)]
    pub label: Option<String>,
    /// Operation/data-type label
    #[serde(default)]
    pub variant: Option<String>,
    /// Editor position
    #[serde(default)]
    pub location: Option<[f32; 2]>,
    /// Input sockets
    #[serde(default)]
    pub inputs: Vec<SocketSpec>,
    /// Output sockets
    #[serde(default)]
    pub outputs: Vec<SocketSpec>,
    /// Node-level properties
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Variable-length item list
    #[serde(default)]
    pub items: Option<DynamicItems>,
}

/// A link entry, each end given as `(node key, socket index)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSpec {
    /// Output end
    pub from: (String, usize),
    /// Input end
    pub to: (String, usize),
}

/// A graph entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSpec {
    /// Graph name, unique within the snapshot
    pub name: String,
    /// Boundary ports
    #[serde(default)]
    pub interface: Vec<InterfaceItem>,
    /// Nodes in declaration order
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    /// Links
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

/// A modifier entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierSpec {
    /// Modifier name
    #[serde(default)]
    pub name: String,
    /// Applied graph, by name
    #[serde(default)]
    pub graph: Option<String>,
    /// Instance values by host key
    #[serde(default)]
    pub values: IndexMap<String, Value>,
}

/// The exported host object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectSpec {
    /// Subject name
    pub name: String,
    /// Modifier stack
    #[serde(default)]
    pub modifiers: Vec<ModifierSpec>,
}

/// Snapshot file root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// All graphs
    pub graphs: Vec<GraphSpec>,
    /// Root graph when no subject is given
    #[serde(default)]
    pub root: Option<String>,
    /// Exported subject
    #[serde(default)]
    pub subject: Option<SubjectSpec>,
}

/// A built snapshot
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    /// All graphs
    pub library: Library,
    /// Explicit root graph
    pub root: Option<GraphId>,
    /// Exported subject
    pub subject: Option<Subject>,
}

impl Snapshot {
    /// Parse a RON snapshot
    pub fn from_ron(text: &str) -> Result<Self, SnapshotError> {
        Ok(ron::from_str(text)?)
    }

    /// Parse a JSON snapshot
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a snapshot file; `.json` files are JSON, everything else RON
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_ron(&text)
        }
    }

    /// Build the immutable graph library
    pub fn build(&self) -> Result<LoadedSnapshot, SnapshotError> {
        let mut ids: HashMap<&str, GraphId> = HashMap::new();
        for spec in &self.graphs {
            if ids.insert(spec.name.as_str(), GraphId::new()).is_some() {
                return Err(SnapshotError::DuplicateGraph(spec.name.clone()));
            }
        }
        let resolve = |name: &str| {
            ids.get(name)
                .copied()
                .ok_or_else(|| SnapshotError::UnknownGraph(name.to_string()))
        };

        let mut library = Library::new();
        for spec in &self.graphs {
            let graph = build_graph(spec, resolve(&spec.name)?, &resolve)?;
            tracing::debug!(
                "Built graph '{}' ({} nodes, {} links)",
                graph.name,
                graph.node_count(),
                graph.link_count()
            );
            library.insert(graph);
        }

        let root = self.root.as_deref().map(&resolve).transpose()?;

        let subject = match &self.subject {
            Some(spec) => {
                let mut subject = Subject::new(spec.name.clone());
                for m in &spec.modifiers {
                    let graph = m.graph.as_deref().map(&resolve).transpose()?;
                    let mut modifier = Modifier::new(m.name.clone(), graph);
                    modifier.values = m.values.clone();
                    subject.modifiers.push(modifier);
                }
                Some(subject)
            }
            None => None,
        };

        Ok(LoadedSnapshot {
            library,
            root,
            subject,
        })
    }
}

fn build_graph(
    spec: &GraphSpec,
    id: GraphId,
    resolve: &dyn Fn(&str) -> Result<GraphId, SnapshotError>,
) -> Result<Graph, SnapshotError> {
    let mut graph = Graph::new(spec.name.clone());
    graph.id = id;
    for item in &spec.interface {
        graph.add_interface_item(item.clone());
    }

    // Socket handles by node key: (inputs, outputs)
    let mut handles: HashMap<&str, (Vec<SocketId>, Vec<SocketId>)> = HashMap::new();
    for node_spec in &spec.nodes {
        let kind = match &node_spec.kind {
            NodeKindSpec::Ordinary => NodeKind::Ordinary,
            NodeKindSpec::Reroute => NodeKind::Reroute,
            NodeKindSpec::Frame => NodeKind::Frame,
            NodeKindSpec::GroupInput => NodeKind::GroupInput,
            NodeKindSpec::GroupOutput => NodeKind::GroupOutput,
            NodeKindSpec::Group(name) => NodeKind::Group(name.as_deref().map(resolve).transpose()?),
            NodeKindSpec::ZoneInput(zone) => NodeKind::ZoneInput(*zone),
            NodeKindSpec::ZoneOutput(zone) => NodeKind::ZoneOutput(*zone),
        };

        let mut node = Node::new(node_spec.type_id.clone()).with_kind(kind);
        node.type_label = node_spec.type_label.clone();
        node.label = node_spec.label.clone();
        node.variant = node_spec.variant.clone();
        node.location = node_spec.location;
        node.properties = node_spec.properties.clone();
        node.items = node_spec.items.clone();
        node.inputs = build_sockets(&node_spec.inputs, SocketDirection::Input);
        node.outputs = build_sockets(&node_spec.outputs, SocketDirection::Output);

        let entry = (
            node.inputs.iter().map(|s| s.id).collect(),
            node.outputs.iter().map(|s| s.id).collect(),
        );
        if handles.insert(node_spec.key.as_str(), entry).is_some() {
            return Err(SnapshotError::DuplicateNodeKey {
                graph: spec.name.clone(),
                key: node_spec.key.clone(),
            });
        }
        graph.add_node(node);
    }

    let lookup = |(key, index): &(String, usize), direction: SocketDirection| {
        let (inputs, outputs) =
            handles
                .get(key.as_str())
                .ok_or_else(|| SnapshotError::UnknownNodeKey {
                    graph: spec.name.clone(),
                    key: key.clone(),
                })?;
        let list = match direction {
            SocketDirection::Input => inputs,
            SocketDirection::Output => outputs,
        };
        list.get(*index).copied().ok_or_else(|| SnapshotError::SocketOutOfRange {
            graph: spec.name.clone(),
            key: key.clone(),
            index: *index,
        })
    };

    for link in &spec.links {
        let connected = lookup(&link.from, SocketDirection::Output)
            .and_then(|from| Ok((from, lookup(&link.to, SocketDirection::Input)?)))
            .and_then(|(from, to)| graph.connect(from, to).map_err(SnapshotError::from));
        if let Err(reason) = connected {
            tracing::warn!(
                "Skipping link {:?} -> {:?} in graph '{}': {reason}",
                link.from,
                link.to,
                spec.name
            );
        }
    }

    Ok(graph)
}

fn build_sockets(specs: &[SocketSpec], direction: SocketDirection) -> Vec<Socket> {
    specs
        .iter()
        .map(|s| {
            let mut socket = Socket::new(s.name.clone(), s.category.clone(), direction);
            socket.default_value = s.default.clone();
            socket
        })
        .collect()
}

/// Error while reading or building a snapshot
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The file could not be read
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Invalid RON
    #[error("Invalid RON snapshot: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// Invalid JSON
    #[error("Invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Two graphs share a name
    #[error("Duplicate graph name: {0}")]
    DuplicateGraph(String),

    /// A graph name is referenced but not defined
    #[error("Unknown graph: {0}")]
    UnknownGraph(String),

    /// Two nodes of one graph share a key
    #[error("Duplicate node key '{key}' in graph '{graph}'")]
    DuplicateNodeKey {
        /// Graph name
        graph: String,
        /// Node key
        key: String,
    },

    /// A link references an undefined node key
    #[error("Unknown node key '{key}' in graph '{graph}'")]
    UnknownNodeKey {
        /// Graph name
        graph: String,
        /// Node key
        key: String,
    },

    /// A link references a socket index past the end
    #[error("Node '{key}' in graph '{graph}' has no socket {index}")]
    SocketOutOfRange {
        /// Graph name
        graph: String,
        /// Node key
        key: String,
        /// Socket index
        index: usize,
    },

    /// The link itself is invalid
    #[error(transparent)]
    Link(#[from] LinkError),
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"(
        graphs: [
            (
                name: "Main",
                interface: [(name: "Size", direction: Input, default_value: Some(Float(1.0)))],
                nodes: [
                    (
                        key: "in",
                        type_id: "NodeGroupInput",
                        kind: GroupInput,
                        outputs: [(name: "Size", category: "VALUE")],
                    ),
                    (key: "inner", type_id: "GeometryNodeGroup", kind: Group(Some("Inner"))),
                    (
                        key: "math",
                        type_id: "ShaderNodeMath",
                        inputs: [(name: "Value"), (name: "Value")],
                        outputs: [(name: "Value")],
                    ),
                ],
                links: [(from: ("in", 0), to: ("math", 1))],
            ),
            (name: "Inner"),
        ],
        root: Some("Main"),
        subject: Some((
            name: "Cube",
            modifiers: [(
                name: "GeometryNodes",
                graph: Some("Main"),
                values: {"Input_1": Float(2.0)},
            )],
        )),
    )"#;

    #[test]
    fn test_build_ron_snapshot() {
        let loaded = Snapshot::from_ron(SNAPSHOT).unwrap().build().unwrap();
        assert_eq!(loaded.library.len(), 2);

        let root = loaded.library.get(loaded.root.unwrap()).unwrap();
        assert_eq!(root.name, "Main");
        assert_eq!(root.node_count(), 3);
        assert_eq!(root.link_count(), 1);

        let inner = loaded.library.find_by_name("Inner").unwrap();
        let group = root.nodes().nth(1).unwrap();
        assert_eq!(group.subgraph(), Some(inner.id));

        let subject = loaded.subject.unwrap();
        let modifier = subject.graph_modifier().unwrap();
        assert_eq!(modifier.graph, Some(root.id));
        assert_eq!(modifier.value("Input_1"), Some(&Value::Float(2.0)));
    }

    #[test]
    fn test_json_snapshot() {
        let json = r#"{"graphs": [{
            "name": "Main",
            "nodes": [{"key": "a", "type_id": "NodeFrame", "kind": "Frame"}]
        }]}"#;
        let loaded = Snapshot::from_json(json).unwrap().build().unwrap();
        assert!(loaded.root.is_none());
        assert_eq!(loaded.library.find_by_name("Main").unwrap().node_count(), 1);
    }

    #[test]
    fn test_unknown_node_key_skips_link() {
        let text = r#"(graphs: [(
            name: "Main",
            nodes: [(key: "a", type_id: "A", outputs: [(name: "x")])],
            links: [(from: ("a", 0), to: ("b", 0))],
        )])"#;
        let loaded = Snapshot::from_ron(text).unwrap().build().unwrap();
        let main = loaded.library.find_by_name("Main").unwrap();
        assert_eq!(main.node_count(), 1);
        assert_eq!(main.link_count(), 0);
    }

    #[test]
    fn test_bad_link_keeps_the_others() {
        let text = r#"(graphs: [(
            name: "Main",
            nodes: [
                (key: "a", type_id: "A", inputs: [(name: "in")], outputs: [(name: "out")]),
                (key: "b", type_id: "B", inputs: [(name: "in")], outputs: [(name: "out")]),
                (key: "c", type_id: "C", inputs: [(name: "in")]),
            ],
            links: [
                (from: ("a", 0), to: ("b", 0)),
                (from: ("a", 0), to: ("a", 0)),
                (from: ("b", 0), to: ("c", 0)),
            ],
        )])"#;
        let loaded = Snapshot::from_ron(text).unwrap().build().unwrap();
        let main = loaded.library.find_by_name("Main").unwrap();
        assert_eq!(main.link_count(), 2);

        let b = main.nodes().nth(1).unwrap();
        let c = main.nodes().nth(2).unwrap();
        assert!(main.has_incoming(b.inputs[0].id));
        assert!(main.has_incoming(c.inputs[0].id));
        let a = main.nodes().next().unwrap();
        assert!(!main.has_incoming(a.inputs[0].id));
    }

    #[test]
    fn test_socket_out_of_range() {
        let text = r#"(graphs: [(
            name: "Main",
            nodes: [
                (key: "a", type_id: "A", outputs: [(name: "x")]),
                (key: "b", type_id: "B", inputs: [(name: "y")]),
            ],
            links: [(from: ("a", 3), to: ("b", 0)), (from: ("a", 0), to: ("b", 0))],
        )])"#;
        let loaded = Snapshot::from_ron(text).unwrap().build().unwrap();
        assert_eq!(loaded.library.find_by_name("Main").unwrap().link_count(), 1);
    }

    #[test]
    fn test_unknown_subgraph() {
        let text = r#"(graphs: [(
            name: "Main",
            nodes: [(key: "g", type_id: "GeometryNodeGroup", kind: Group(Some("Missing")))],
        )])"#;
        let err = Snapshot::from_ron(text).unwrap().build().unwrap_err();
        assert!(matches!(err, SnapshotError::UnknownGraph(name) if name == "Missing"));
    }
}
