// SPDX-License-Identifier: MIT OR Apache-2.0
//! Instance override diffing.
//!
//! After the document is produced, the root scope's emitted boundary-input
//! defaults are compared against the values stored on the exported instance.
//! Only values that really differ end up in the `SetUser` appendix.

use crate::config::EncoderConfig;
use crate::diagnostics::Diagnostics;
use crate::enumerate::NodeRef;
use crate::serialize::{parse_numeric_token, serialize_value};
use bndl_graph::{Graph, InterfaceItem, Modifier, SocketDirection, Value};
use serde::{Deserialize, Serialize};

/// One way of naming an interface item on the instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverrideProbe {
    /// The item's stable identifier
    Identifier,
    /// The item's display name
    Name,
    /// `Input_<n>`, 1-based among input items
    InputIndex,
    /// `Socket_<n>`, 1-based among input items
    SocketIndex,
}

/// Probes tried in order until one yields a value
pub const DEFAULT_PROBES: &[OverrideProbe] = &[
    OverrideProbe::Identifier,
    OverrideProbe::Name,
    OverrideProbe::InputIndex,
    OverrideProbe::SocketIndex,
];

impl OverrideProbe {
    /// Instance key this probe looks up, if the item offers one
    pub fn key(self, item: &InterfaceItem, position: usize) -> Option<String> {
        match self {
            Self::Identifier => item.identifier.clone().filter(|id| !id.is_empty()),
            Self::Name => Some(item.name.clone()).filter(|name| !name.is_empty()),
            Self::InputIndex => Some(format!("Input_{}", position + 1)),
            Self::SocketIndex => Some(format!("Socket_{}", position + 1)),
        }
    }
}

/// Source of per-instance values
pub trait OverrideSource {
    /// Value stored under a host key
    fn lookup(&self, key: &str) -> Option<Value>;
}

impl OverrideSource for Modifier {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.value(key).cloned()
    }
}

/// Read an item's instance value, first successful probe wins
pub fn read_override(
    source: &dyn OverrideSource,
    item: &InterfaceItem,
    position: usize,
    probes: &[OverrideProbe],
) -> Option<Value> {
    probes
        .iter()
        .filter_map(|probe| probe.key(item, position))
        .find_map(|key| source.lookup(&key))
}

/// An emitted boundary-input default
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultRow {
    /// Disambiguated port label
    pub label: String,
    /// Emitted token
    pub token: String,
    /// Position among the scope's input interface items
    pub position: usize,
}

/// The default block emitted for one boundary-input node
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultTable {
    /// Boundary-input node the block was written for
    pub node: NodeRef,
    /// Rows in emission order
    pub rows: Vec<DefaultRow>,
}

/// A differing instance value
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideEntry {
    /// Port label
    pub label: String,
    /// Serialized instance value
    pub token: String,
}

/// Whether an instance value matches a default token within tolerance
pub fn nearly_equal(default_token: &str, value: &Value, tolerance: f64) -> bool {
    let Some(defaults) = parse_numeric_token(default_token) else {
        return false;
    };
    let Some(components) = value.numeric_components() else {
        return false;
    };
    defaults.len() == components.len()
        && defaults
            .iter()
            .zip(&components)
            .all(|(a, b)| (a - b).abs() <= tolerance)
}

/// Compare instance values against the emitted default table
pub fn diff_overrides(
    table: &DefaultTable,
    graph: &Graph,
    source: &dyn OverrideSource,
    config: &EncoderConfig,
    diagnostics: &mut Diagnostics,
) -> Vec<OverrideEntry> {
    let items: Vec<&InterfaceItem> = graph
        .interface_items(SocketDirection::Input)
        .map(|(_, item)| item)
        .collect();

    let mut entries = Vec::new();
    for row in &table.rows {
        let Some(item) = items.get(row.position) else {
            diagnostics.warn(format!("No interface item for default '{}'", row.label));
            continue;
        };
        let Some(raw) = read_override(source, item, row.position, &config.override_probes) else {
            continue;
        };
        let Some(token) = serialize_value(&raw, config.decimals, diagnostics) else {
            continue;
        };
        if token == row.token || nearly_equal(&row.token, &raw, config.tolerance) {
            continue;
        }
        entries.push(OverrideEntry {
            label: row.label.clone(),
            token,
        });
    }
    entries
}

/// Render the `SetUser` appendix; empty when there is nothing to report
pub fn render_appendix(node: &NodeRef, entries: &[OverrideEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let mut lines = vec![
        String::new(),
        "# === USER OVERRIDES ===".to_string(),
        format!("SetUser  {node}:"),
    ];
    lines.extend(entries.iter().map(|e| format!("§ {} § to {}", e.label, e.token)));
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_inputs(items: Vec<InterfaceItem>) -> Graph {
        let mut graph = Graph::new("Main");
        graph.add_interface_item(InterfaceItem::output("Geometry"));
        for item in items {
            graph.add_interface_item(item);
        }
        graph
    }

    fn table(rows: &[(&str, &str)]) -> DefaultTable {
        DefaultTable {
            node: NodeRef { tag: "Group Input".into(), seq: 1 },
            rows: rows
                .iter()
                .enumerate()
                .map(|(position, (label, token))| DefaultRow {
                    label: label.to_string(),
                    token: token.to_string(),
                    position,
                })
                .collect(),
        }
    }

    fn diff(table: &DefaultTable, graph: &Graph, modifier: &Modifier) -> Vec<OverrideEntry> {
        diff_overrides(table, graph, modifier, &EncoderConfig::default(), &mut Diagnostics::new())
    }

    #[test]
    fn test_probe_order() {
        let item = InterfaceItem::input("Size").with_identifier("Socket_7");
        let modifier = Modifier::new("GN", None)
            .with_value("Input_1", 1.0)
            .with_value("Size", 2.0)
            .with_value("Socket_7", 3.0);
        let value = read_override(&modifier, &item, 0, DEFAULT_PROBES);
        assert_eq!(value, Some(Value::Float(3.0)));

        let without_id = InterfaceItem::input("Size");
        let value = read_override(&modifier, &without_id, 0, DEFAULT_PROBES);
        assert_eq!(value, Some(Value::Float(2.0)));

        let unnamed = InterfaceItem::input("");
        let value = read_override(&modifier, &unnamed, 0, DEFAULT_PROBES);
        assert_eq!(value, Some(Value::Float(1.0)));
    }

    #[test]
    fn test_tolerance_suppresses_tiny_differences() {
        let graph = graph_with_inputs(vec![InterfaceItem::input("Offset")]);
        let table = table(&[("Offset", "<1, 0, 0>")]);

        let close = Modifier::new("GN", None).with_value("Offset", [1.0000001, 0.0, 0.0]);
        assert!(diff(&table, &graph, &close).is_empty());

        let far = Modifier::new("GN", None).with_value("Offset", [1.5, 0.0, 0.0]);
        assert_eq!(
            diff(&table, &graph, &far),
            vec![OverrideEntry { label: "Offset".into(), token: "<1.5, 0, 0>".into() }]
        );
    }

    #[test]
    fn test_missing_and_unserializable_overrides_are_skipped() {
        let graph = graph_with_inputs(vec![InterfaceItem::input("A"), InterfaceItem::input("B")]);
        let table = table(&[("A", "<1>"), ("B", "<2>")]);
        let modifier =
            Modifier::new("GN", None).with_value("B", Value::Unsupported("Matrix".into()));
        assert!(diff(&table, &graph, &modifier).is_empty());
    }

    #[test]
    fn test_duplicate_labels_use_positions() {
        let graph = graph_with_inputs(vec![
            InterfaceItem::input("Value"),
            InterfaceItem::input("Value"),
        ]);
        let table = table(&[("Value", "<1>"), ("Value[2]", "<2>")]);
        let modifier = Modifier::new("GN", None)
            .with_value("Input_1", 1.0)
            .with_value("Input_2", 5.0);
        assert_eq!(
            diff(&table, &graph, &modifier),
            vec![OverrideEntry { label: "Value[2]".into(), token: "<5>".into() }]
        );
    }

    #[test]
    fn test_non_numeric_tokens_compare_textually() {
        let graph = graph_with_inputs(vec![
            InterfaceItem::input("Flag"),
            InterfaceItem::input("Name"),
        ]);
        let table = table(&[("Flag", "<False>"), ("Name", "©a©")]);
        let modifier = Modifier::new("GN", None)
            .with_value("Flag", true)
            .with_value("Name", "a");
        assert_eq!(
            diff(&table, &graph, &modifier),
            vec![OverrideEntry { label: "Flag".into(), token: "<True>".into() }]
        );
    }

    #[test]
    fn test_render_appendix() {
        let node = NodeRef { tag: "Group Input".into(), seq: 1 };
        assert_eq!(render_appendix(&node, &[]), "");
        let entry = OverrideEntry {
            label: "Size".into(),
            token: "<2>".into(),
        };
        assert_eq!(
            render_appendix(&node, &[entry]),
            "\n# === USER OVERRIDES ===\nSetUser  [ Group Input #1 ]:\n§ Size § to <2>\n"
        );
    }
}
