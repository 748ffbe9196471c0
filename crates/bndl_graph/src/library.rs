// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph library and the host instance that applies a graph.

use crate::graph::{Graph, GraphId};
use crate::value::Value;
use indexmap::IndexMap;

/// All graph scopes of one snapshot, keyed by identity
#[derive(Debug, Clone, Default)]
pub struct Library {
    graphs: IndexMap<GraphId, Graph>,
}

impl Library {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a graph, returning its identity
    pub fn insert(&mut self, graph: Graph) -> GraphId {
        let id = graph.id;
        self.graphs.insert(id, graph);
        id
    }

    /// Look up a graph by identity
    pub fn get(&self, id: GraphId) -> Option<&Graph> {
        self.graphs.get(&id)
    }

    /// Find the first graph with the given name
    pub fn find_by_name(&self, name: &str) -> Option<&Graph> {
        self.graphs.values().find(|g| g.name == name)
    }

    /// Number of graphs
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Whether the library holds no graphs
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

/// A graph modifier on a subject, carrying per-instance input values
#[derive(Debug, Clone, Default)]
pub struct Modifier {
    /// Modifier name
    pub name: String,
    /// Applied graph, if any
    pub graph: Option<GraphId>,
    /// Instance values keyed by host key (identifier, name, `Input_1`...)
    pub values: IndexMap<String, Value>,
}

impl Modifier {
    /// Create a modifier applying `graph`
    pub fn new(name: impl Into<String>, graph: Option<GraphId>) -> Self {
        Self {
            name: name.into(),
            graph,
            values: IndexMap::new(),
        }
    }

    /// Set an instance value
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Read an instance value by host key
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

/// The host object being exported
#[derive(Debug, Clone, Default)]
pub struct Subject {
    /// Subject name
    pub name: String,
    /// Modifiers in stack order
    pub modifiers: Vec<Modifier>,
}

impl Subject {
    /// Create a subject without modifiers
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
        }
    }

    /// Append a modifier
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// First modifier that applies a graph
    pub fn graph_modifier(&self) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.graph.is_some())
    }
}
