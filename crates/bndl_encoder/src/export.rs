// SPDX-License-Identifier: MIT OR Apache-2.0
//! Whole-document export.
//!
//! One pass walks the root scope and, depth-first, every subgraph it
//! references. Each subgraph is emitted once as a `START GROUP NAMED` block;
//! the root's statements form the top-level section.

use crate::config::EncoderConfig;
use crate::diagnostics::Diagnostics;
use crate::overrides::{diff_overrides, render_appendix, OverrideEntry};
use crate::scope::{ScopeEmitter, ScopeOutput};
use bndl_graph::{Graph, GraphId, Library, Subject};
use std::collections::HashSet;
use thiserror::Error;

/// Fatal export preconditions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    /// Nothing selected to export
    #[error("No active subject to export")]
    NoActiveSubject,

    /// The subject applies no graph
    #[error("Subject '{0}' has no graph modifier")]
    NoGraphModifier(String),

    /// The graph to export is not in the library
    #[error("No node data for graph '{0}'")]
    NoNodeData(String),
}

/// Result of one export pass
#[derive(Debug, Clone, Default)]
pub struct ExportOutput {
    /// The BNDL document
    pub text: String,
    /// Non-fatal problems, oldest first
    pub warnings: Vec<String>,
    /// Instance values that differ from the root defaults
    pub overrides: Vec<OverrideEntry>,
}

/// Scratch state of one export pass
pub(crate) struct ExportContext<'a> {
    library: &'a Library,
    config: &'a EncoderConfig,
    visited: HashSet<GraphId>,
    group_lines: Vec<String>,
    diagnostics: Diagnostics,
}

impl<'a> ExportContext<'a> {
    /// Start a pass over `library`
    pub(crate) fn new(library: &'a Library, config: &'a EncoderConfig) -> Self {
        Self {
            library,
            config,
            visited: HashSet::new(),
            group_lines: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Emit the root scope and everything it references
    fn run(&mut self, root: &'a Graph) -> ScopeOutput {
        self.visited.insert(root.id);
        let output = ScopeEmitter::new(root, self.library, self.config).emit(&mut self.diagnostics);
        self.recurse(root);
        output
    }

    fn recurse(&mut self, graph: &'a Graph) {
        for node in graph.nodes() {
            let Some(id) = node.subgraph() else {
                continue;
            };
            if self.visited.contains(&id) {
                continue;
            }
            // The group node already warned when it was created
            let Some(subgraph) = self.library.get(id) else {
                continue;
            };
            self.visited.insert(id);
            self.emit_group(subgraph);
        }
    }

    fn emit_group(&mut self, graph: &'a Graph) {
        tracing::debug!("Emitting group '{}'", graph.name);
        let output =
            ScopeEmitter::new(graph, self.library, self.config).emit(&mut self.diagnostics);
        self.group_lines.push(format!("START GROUP NAMED {}", graph.name));
        self.group_lines.extend(output.lines);
        self.group_lines.push(format!("END GROUP NAMED {}", graph.name));
        self.recurse(graph);
    }

    fn document(&self, top_level: Vec<String>) -> String {
        let mut lines = vec![
            format!("# BNDL v{}", self.config.version),
            "# === GROUP DEFINITIONS ===".to_string(),
        ];
        lines.extend(self.group_lines.iter().cloned());
        lines.push(String::new());
        lines.push("# === TOP LEVEL ===".to_string());
        lines.extend(top_level);
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

/// Export one graph of the library as a BNDL document
pub fn export_graph(
    library: &Library,
    root: GraphId,
    config: &EncoderConfig,
) -> Result<ExportOutput, ExportError> {
    let graph = library
        .get(root)
        .ok_or_else(|| ExportError::NoNodeData(root.0.to_string()))?;

    let mut context = ExportContext::new(library, config);
    let top = context.run(graph);
    let text = context.document(top.lines);
    tracing::info!("Exported '{}' ({} groups)", graph.name, context.visited.len() - 1);

    Ok(ExportOutput {
        text,
        warnings: context.diagnostics.into_warnings(),
        overrides: Vec::new(),
    })
}

/// Export the graph applied to `subject`, appending its differing instance values
pub fn export_subject(
    library: &Library,
    subject: Option<&Subject>,
    config: &EncoderConfig,
) -> Result<ExportOutput, ExportError> {
    let subject = subject.ok_or(ExportError::NoActiveSubject)?;
    let modifier = subject
        .graph_modifier()
        .ok_or_else(|| ExportError::NoGraphModifier(subject.name.clone()))?;
    let graph = modifier
        .graph
        .and_then(|id| library.get(id))
        .ok_or_else(|| ExportError::NoNodeData(modifier.name.clone()))?;

    let mut context = ExportContext::new(library, config);
    let top = context.run(graph);
    let mut text = context.document(top.lines);

    let overrides = match &top.defaults {
        Some(table) => {
            let entries = diff_overrides(table, graph, modifier, config, &mut context.diagnostics);
            text.push_str(&render_appendix(&table.node, &entries));
            entries
        }
        None => Vec::new(),
    };
    tracing::info!(
        "Exported '{}' from '{}' ({} overrides)",
        graph.name,
        subject.name,
        overrides.len()
    );

    Ok(ExportOutput {
        text,
        warnings: context.diagnostics.into_warnings(),
        overrides,
    })
}
