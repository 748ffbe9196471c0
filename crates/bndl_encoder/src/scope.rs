// SPDX-License-Identifier: MIT OR Apache-2.0
//! Statement emission for one graph scope.

use crate::config::EncoderConfig;
use crate::dead_end::{is_dead_end_input, is_dead_end_output};
use crate::diagnostics::Diagnostics;
use crate::enumerate::{Enumeration, NodeRef};
use crate::labels::{disambiguate, socket_labels};
use crate::overrides::{DefaultRow, DefaultTable};
use crate::reroute::RerouteCollapser;
use crate::serialize::{
    bool_token, format_number, serialize_value, wrap_escaped, STRING_SENTINEL,
};
use crate::zones::pair_zones;
use bndl_graph::{
    Graph, InterfaceItem, Library, Node, NodeKind, PropertyValue, SocketDirection, Value,
};

/// Badge preceding input socket labels
pub const INPUT_BADGE: &str = "⦿";

/// Badge preceding output socket labels
pub const OUTPUT_BADGE: &str = "○";

/// Statements of one scope
#[derive(Debug, Clone, Default)]
pub struct ScopeOutput {
    /// Emitted lines
    pub lines: Vec<String>,
    /// Defaults of the first boundary-input node, if the scope has one
    pub defaults: Option<DefaultTable>,
}

/// Emits the statements of one scope
pub struct ScopeEmitter<'a> {
    graph: &'a Graph,
    library: &'a Library,
    config: &'a EncoderConfig,
    enumeration: Enumeration,
    lines: Vec<String>,
    defaults: Option<DefaultTable>,
}

impl<'a> ScopeEmitter<'a> {
    /// Prepare a scope; nodes are enumerated immediately
    pub fn new(graph: &'a Graph, library: &'a Library, config: &'a EncoderConfig) -> Self {
        Self {
            graph,
            library,
            config,
            enumeration: Enumeration::new(graph, config),
            lines: Vec::new(),
            defaults: None,
        }
    }

    /// Emit every statement of the scope
    pub fn emit(mut self, diagnostics: &mut Diagnostics) -> ScopeOutput {
        let graph = self.graph;
        let nodes: Vec<(&Node, NodeRef)> = graph
            .nodes()
            .filter_map(|n| self.enumeration.get(n.id).map(|r| (n, r.clone())))
            .collect();

        for (node, node_ref) in &nodes {
            self.emit_create(node, node_ref, diagnostics);
        }
        for (node, node_ref) in &nodes {
            self.emit_declarations(node, node_ref);
        }
        for (node, node_ref) in &nodes {
            self.emit_values(node, node_ref, diagnostics);
        }
        self.emit_links(diagnostics);
        self.emit_zone_pairs();

        ScopeOutput {
            lines: self.lines,
            defaults: self.defaults,
        }
    }

    fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    fn emit_create(&mut self, node: &Node, node_ref: &NodeRef, diagnostics: &mut Diagnostics) {
        let NodeRef { tag, seq } = node_ref;
        if let NodeKind::Group(reference) = &node.kind {
            let name = match reference {
                Some(id) => match self.library.get(*id) {
                    Some(graph) => graph.name.as_str(),
                    None => {
                        diagnostics.warn(format!("{node_ref} references a missing subgraph"));
                        "Unnamed"
                    }
                },
                None => {
                    diagnostics.warn(format!("{node_ref} has no subgraph"));
                    "Unnamed"
                }
            };
            self.push(format!("Create  [ {tag} |  | ] ~ {name} ~ #{seq} ; type={}", node.type_id));
        } else {
            let variant = node
                .variant
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or("—");
            let friendly = node.label.as_deref().map_or("", str::trim);
            self.push(format!(
                "Create  [ {tag} | {variant} | ] ~ {friendly} ~ #{seq} ; type={}",
                node.type_id
            ));
        }

        if let Some(label) = node.label.as_deref().filter(|l| !l.is_empty()) {
            self.push(format!("Rename  {node_ref} to ~ {label} ~"));
        }

        if let Some(items) = &node.items {
            self.push(format!(
                "Adjust  {node_ref}  # {} # to <{}>",
                items.field,
                items.names.len()
            ));
            for (i, name) in items.names.iter().enumerate() {
                let name = name.trim();
                if !name.is_empty() {
                    self.push(format!(
                        "Rename  {node_ref} {INPUT_BADGE} {} {} to ~ {name} ~",
                        items.socket_prefix,
                        i + 1
                    ));
                }
            }
        }
    }

    fn declare(&mut self, direction: SocketDirection, node_ref: &NodeRef, labels: &[String]) {
        if labels.is_empty() {
            return;
        }
        let (kind, badge) = match direction {
            SocketDirection::Input => ("Inputs", INPUT_BADGE),
            SocketDirection::Output => ("Outputs", OUTPUT_BADGE),
        };
        let parts: Vec<String> = labels.iter().map(|l| format!("{badge} {l}")).collect();
        self.push(format!("Declare {kind:<7} {node_ref} : {}", parts.join(" , ")));
    }

    /// Labels of the scope's boundary ports of `direction`, as seen on the boundary node
    fn port_labels(&self, direction: SocketDirection) -> Vec<String> {
        disambiguate(
            self.graph.interface_items(direction).map(|(_, item)| item.name.as_str()),
            direction.flipped(),
        )
    }

    fn emit_declarations(&mut self, node: &Node, node_ref: &NodeRef) {
        let max_steps = self.config.max_walk_steps;
        match node.kind {
            NodeKind::GroupInput => {
                let labels = self.port_labels(SocketDirection::Input);
                self.declare(SocketDirection::Output, node_ref, &labels);
                for (socket, label) in node.outputs.iter().zip(&labels) {
                    if is_dead_end_output(self.graph, socket.id, max_steps) {
                        self.push(format!("Expose  {node_ref} {OUTPUT_BADGE} {label}"));
                    }
                }
            }
            NodeKind::GroupOutput => {
                let labels = self.port_labels(SocketDirection::Output);
                self.declare(SocketDirection::Input, node_ref, &labels);
                for (socket, label) in node.inputs.iter().zip(&labels) {
                    if is_dead_end_input(self.graph, socket.id, max_steps) {
                        self.push(format!("Expose  {node_ref} {INPUT_BADGE} {label}"));
                    }
                }
            }
            _ => {
                let inputs = socket_labels(&node.inputs, SocketDirection::Input);
                let outputs = socket_labels(&node.outputs, SocketDirection::Output);
                self.declare(SocketDirection::Input, node_ref, &inputs);
                self.declare(SocketDirection::Output, node_ref, &outputs);
            }
        }
    }

    fn emit_set_block(&mut self, node_ref: &NodeRef, entries: &[(String, String)]) {
        if entries.is_empty() {
            return;
        }
        self.push(format!("Set  {node_ref}:"));
        for (key, token) in entries {
            self.push(format!("§ {key} § to {token}"));
        }
    }

    fn emit_values(&mut self, node: &Node, node_ref: &NodeRef, diagnostics: &mut Diagnostics) {
        match node.kind {
            NodeKind::GroupInput => {
                let labels = self.port_labels(SocketDirection::Input);
                let mut rows = Vec::new();
                let items = self.graph.interface_items(SocketDirection::Input);
                for ((position, item), label) in items.zip(&labels) {
                    let token = item
                        .default_value
                        .as_ref()
                        .and_then(|v| serialize_value(v, self.config.decimals, diagnostics));
                    if let Some(token) = token {
                        rows.push(DefaultRow {
                            label: label.clone(),
                            token,
                            position,
                        });
                    }
                }
                let entries: Vec<_> = rows
                    .iter()
                    .map(|r| (r.label.clone(), r.token.clone()))
                    .collect();
                self.emit_set_block(node_ref, &entries);
                if self.defaults.is_none() && !rows.is_empty() {
                    self.defaults = Some(DefaultTable {
                        node: node_ref.clone(),
                        rows,
                    });
                }

                let meta = self.interface_meta(SocketDirection::Input, &labels);
                self.emit_set_block(node_ref, &meta);
            }
            NodeKind::GroupOutput => {
                let labels = self.port_labels(SocketDirection::Output);
                let meta = self.interface_meta(SocketDirection::Output, &labels);
                self.emit_set_block(node_ref, &meta);
            }
            _ => {}
        }

        let entries = self.node_entries(node, diagnostics);
        self.emit_set_block(node_ref, &entries);
    }

    /// Unlinked input defaults, output defaults and properties of a node
    fn node_entries(&self, node: &Node, diagnostics: &mut Diagnostics) -> Vec<(String, String)> {
        let decimals = self.config.decimals;
        let mut entries = Vec::new();

        let inputs = socket_labels(&node.inputs, SocketDirection::Input);
        for (socket, label) in node.inputs.iter().zip(inputs) {
            if self.graph.has_incoming(socket.id) {
                continue;
            }
            let token = socket
                .default_value
                .as_ref()
                .and_then(|v| serialize_value(v, decimals, diagnostics));
            if let Some(token) = token.filter(|t| self.config.is_meaningful(t)) {
                entries.push((label, token));
            }
        }

        let outputs = socket_labels(&node.outputs, SocketDirection::Output);
        for (socket, label) in node.outputs.iter().zip(outputs) {
            let token = socket
                .default_value
                .as_ref()
                .and_then(|v| serialize_value(v, decimals, diagnostics));
            if let Some(token) = token.filter(|t| self.config.is_meaningful(t)) {
                entries.push((label, token));
            }
        }

        for property in &node.properties {
            let token = match &property.value {
                PropertyValue::Enum(label) => label
                    .as_deref()
                    .filter(|l| !l.is_empty())
                    .map(|l| wrap_escaped(l, STRING_SENTINEL, diagnostics)),
                PropertyValue::Value(Value::Bool(b)) => Some(bool_token(*b).to_string()),
                PropertyValue::Value(value)
                    if matches!(value, Value::Resource(_))
                        || (value.is_number() && node.inputs.is_empty()) =>
                {
                    serialize_value(value, decimals, diagnostics)
                }
                PropertyValue::Value(_) => None,
            };
            if let Some(token) = token {
                entries.push((property.name.clone(), token));
            }
        }

        entries
    }

    fn interface_meta(
        &self,
        direction: SocketDirection,
        labels: &[String],
    ) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        for ((_, item), label) in self.graph.interface_items(direction).zip(labels) {
            let mut add = |suffix: &str, token: String| {
                entries.push((format!("{label}::{suffix}"), token));
            };
            let description = item
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(|d| format!("~{}~", d.replace('~', "-")));

            match direction {
                SocketDirection::Input => {
                    if let Some(d) = description {
                        add("Description", d);
                    }
                    self.type_meta(item, &mut add);
                    self.bounds_meta(item, &mut add);
                    if let Some(hide) = item.hide_value {
                        add("Hide Value", bool_token(hide).to_string());
                    }
                    if let Some(hide) = item.hide_in_modifier {
                        add("Hide in Modifier", bool_token(hide).to_string());
                    }
                    if let Some(attr) = &item.default_attribute {
                        add("Default Attribute", quoted(attr));
                    }
                }
                SocketDirection::Output => {
                    self.type_meta(item, &mut add);
                    if let Some(hide) = item.hide_in_modifier {
                        add("Hide in Modifier", bool_token(hide).to_string());
                    }
                    if let Some(d) = description {
                        add("Description", d);
                    }
                }
            }
        }
        entries
    }

    fn type_meta(&self, item: &InterfaceItem, add: &mut impl FnMut(&str, String)) {
        let fields = [
            ("Socket Type", &item.socket_type),
            ("Structure Type", &item.structure_type),
            ("Subtype", &item.subtype),
        ];
        for (suffix, value) in fields {
            if let Some(value) = value {
                add(suffix, quoted(value));
            }
        }
    }

    fn bounds_meta(&self, item: &InterfaceItem, add: &mut impl FnMut(&str, String)) {
        for (suffix, bound) in [("Min", item.min_value), ("Max", item.max_value)] {
            if let Some(text) = bound.and_then(|b| format_number(b, self.config.decimals)) {
                add(suffix, format!("<{text}>"));
            }
        }
    }

    fn emit_links(&mut self, diagnostics: &mut Diagnostics) {
        let graph = self.graph;
        let collapser = RerouteCollapser::new(graph, self.config.max_walk_steps);
        for edge in collapser.collapsed_links() {
            let (Some(from), Some(to)) = (graph.locate(edge.from), graph.locate(edge.to)) else {
                diagnostics.warn("Link endpoint is no longer in its graph, skipping");
                continue;
            };
            let (Some(from_ref), Some(to_ref)) = (
                self.enumeration.get(from.node).cloned(),
                self.enumeration.get(to.node).cloned(),
            ) else {
                continue;
            };
            let (Some(from_node), Some(to_node)) = (graph.node(from.node), graph.node(to.node))
            else {
                continue;
            };

            let out_labels = socket_labels(&from_node.outputs, SocketDirection::Output);
            let in_labels = socket_labels(&to_node.inputs, SocketDirection::Input);
            let (Some(out_label), Some(in_label)) =
                (out_labels.get(from.index), in_labels.get(to.index))
            else {
                diagnostics.warn(format!(
                    "Link between {from_ref} and {to_ref} has no socket labels, skipping"
                ));
                continue;
            };

            let concrete = [from_node.output(from.index), to_node.input(to.index)]
                .into_iter()
                .flatten()
                .any(|s| self.config.is_concrete(&s.category));
            let keyword = if concrete { "Connect" } else { "Connect⋯" };
            let from_socket = format!("{from_ref} {OUTPUT_BADGE} {out_label}");
            let to_socket = format!("{to_ref} {INPUT_BADGE} {in_label}");
            self.push(format!("{keyword}  {from_socket}  to  {to_socket}"));
        }
    }

    fn emit_zone_pairs(&mut self) {
        for pair in pair_zones(self.graph, &self.enumeration) {
            let begin = self.enumeration.get(pair.begin);
            if let (Some(begin), Some(end)) = (begin, self.enumeration.get(pair.end)) {
                let line = format!("PairZone  {begin} <-> {end}");
                self.lines.push(line);
            }
        }
    }
}

fn quoted(text: &str) -> String {
    format!("'{}'", text.replace('\'', "\\'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bndl_graph::{DynamicItems, ResourceKind, ResourceRef, Socket, ZoneKind};

    fn emit(graph: &Graph) -> ScopeOutput {
        let library = Library::new();
        let config = EncoderConfig::default();
        ScopeEmitter::new(graph, &library, &config).emit(&mut Diagnostics::new())
    }

    fn contains_run(lines: &[String], run: &[&str]) -> bool {
        lines.windows(run.len()).any(|w| w.iter().zip(run).all(|(a, b)| a == b))
    }

    #[test]
    fn test_dynamic_items() {
        let mut graph = Graph::new("Switch");
        graph.add_node(
            Node::new("GeometryNodeIndexSwitch")
                .with_type_label("Index Switch")
                .with_label("Pick")
                .with_items(DynamicItems {
                    field: "Cases".into(),
                    socket_prefix: "Case".into(),
                    names: vec!["A".into(), " ".into(), "C".into()],
                }),
        );

        let lines = emit(&graph).lines;
        assert!(contains_run(
            &lines,
            &[
                "Create  [ Index Switch | — | ] ~ Pick ~ #1 ; type=GeometryNodeIndexSwitch",
                "Rename  [ Index Switch #1 ] to ~ Pick ~",
                "Adjust  [ Index Switch #1 ]  # Cases # to <3>",
                "Rename  [ Index Switch #1 ] ⦿ Case 1 to ~ A ~",
                "Rename  [ Index Switch #1 ] ⦿ Case 3 to ~ C ~",
            ]
        ));
    }

    #[test]
    fn test_property_rules() {
        let mut graph = Graph::new("Props");
        let steel = ResourceRef::new(ResourceKind::Material, "Steel");
        graph.add_node(
            Node::new("GeometryNodeInputInteger")
                .with_type_label("Integer")
                .with_variant("Integer")
                .with_output(Socket::output("Integer", "INT"))
                .with_property("Mode", PropertyValue::Enum(Some("Linear".into())))
                .with_property("Blank", PropertyValue::Enum(None))
                .with_property("Flip", PropertyValue::Value(Value::Bool(false)))
                .with_property("Integer", PropertyValue::Value(Value::Int(4)))
                .with_property("Material", PropertyValue::Value(Value::Resource(steel)))
                .with_property("Text", PropertyValue::Value(Value::String("x".into()))),
        );
        graph.add_node(
            Node::new("ShaderNodeMath")
                .with_type_label("Math")
                .with_input(Socket::input("Value", "VALUE"))
                .with_property("Factor", PropertyValue::Value(Value::Float(0.5))),
        );

        let lines = emit(&graph).lines;
        assert!(lines.contains(
            &"Create  [ Integer | Integer | ] ~  ~ #1 ; type=GeometryNodeInputInteger".to_string()
        ));
        assert!(contains_run(
            &lines,
            &[
                "Set  [ Integer #1 ]:",
                "§ Mode § to ©Linear©",
                "§ Flip § to <False>",
                "§ Integer § to <4>",
                "§ Material § to ❆Steel❆",
            ]
        ));
        assert!(!lines
            .iter()
            .any(|l| ["Blank", "Text", "Factor"].iter().any(|name| l.contains(name))));
        assert!(!lines.contains(&"Set  [ Math #1 ]:".to_string()));
    }

    #[test]
    fn test_enum_labels_escape_the_string_sentinel() {
        let mut graph = Graph::new("Escape");
        graph.add_node(
            Node::new("GeometryNodeSwitch")
                .with_type_label("Switch")
                .with_property("Mode", PropertyValue::Enum(Some("a©b".into()))),
        );

        let library = Library::new();
        let config = EncoderConfig::default();
        let mut diagnostics = Diagnostics::new();
        let lines = ScopeEmitter::new(&graph, &library, &config)
            .emit(&mut diagnostics)
            .lines;

        assert!(contains_run(&lines, &["Set  [ Switch #1 ]:", "§ Mode § to ©a©©b©"]));
        assert_eq!(diagnostics.warnings().len(), 1);
    }

    #[test]
    fn test_interface_metadata() {
        let mut graph = Graph::new("Meta");
        let mut size = InterfaceItem::input("Size")
            .with_default(1.0)
            .with_socket_type("NodeSocketFloat")
            .with_description("Edge ~length~")
            .with_bounds(0.0, 10.0);
        size.hide_value = Some(false);
        size.default_attribute = Some("size".into());
        graph.add_interface_item(size);
        graph.add_interface_item(
            InterfaceItem::output("Geometry")
                .with_socket_type("NodeSocketGeometry")
                .with_description("Result"),
        );
        graph.add_node(
            Node::new("NodeGroupInput")
                .with_kind(NodeKind::GroupInput)
                .with_output(Socket::output("Size", "VALUE")),
        );
        graph.add_node(
            Node::new("NodeGroupOutput")
                .with_kind(NodeKind::GroupOutput)
                .with_input(Socket::input("Geometry", "GEOMETRY")),
        );

        let output = emit(&graph);
        assert!(contains_run(
            &output.lines,
            &[
                "Set  [ Group Input #1 ]:",
                "§ Size § to <1>",
                "Set  [ Group Input #1 ]:",
                "§ Size::Description § to ~Edge -length-~",
                "§ Size::Socket Type § to 'NodeSocketFloat'",
                "§ Size::Min § to <0>",
                "§ Size::Max § to <10>",
                "§ Size::Hide Value § to <False>",
                "§ Size::Default Attribute § to 'size'",
                "Set  [ Group Output #1 ]:",
                "§ Geometry::Socket Type § to 'NodeSocketGeometry'",
                "§ Geometry::Description § to ~Result~",
            ]
        ));

        let table = output.defaults.unwrap();
        assert_eq!(table.node.to_string(), "[ Group Input #1 ]");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].token, "<1>");
    }

    #[test]
    fn test_blank_interface_names_use_node_side_placeholder() {
        let mut graph = Graph::new("Blank");
        graph.add_interface_item(InterfaceItem::input("").with_default(0.0));
        graph.add_node(
            Node::new("NodeGroupInput")
                .with_kind(NodeKind::GroupInput)
                .with_output(Socket::output("", "VALUE")),
        );

        let output = emit(&graph);
        for line in [
            "Declare Outputs [ Group Input #1 ] : ○ output",
            "Expose  [ Group Input #1 ] ○ output",
            "§ output § to <0>",
        ] {
            assert!(output.lines.iter().any(|l| l == line), "missing {line:?}");
        }
    }

    #[test]
    fn test_links_through_reroutes_and_zone_pairs() {
        let mut graph = Graph::new("Zones");
        let begin = Node::new("GeometryNodeRepeatInput")
            .with_type_label("Repeat Input")
            .with_kind(NodeKind::ZoneInput(ZoneKind::Repeat))
            .with_position(0.0, 0.0)
            .with_output(Socket::output("Geometry", "GEOMETRY"));
        let end = Node::new("GeometryNodeRepeatOutput")
            .with_type_label("Repeat Output")
            .with_kind(NodeKind::ZoneOutput(ZoneKind::Repeat))
            .with_position(300.0, 0.0)
            .with_input(Socket::input("Geometry", "GEOMETRY"));
        let reroute = Node::reroute();
        let (geo_out, geo_in) = (begin.outputs[0].id, end.inputs[0].id);
        let (r_in, r_out) = (reroute.inputs[0].id, reroute.outputs[0].id);
        graph.add_node(end);
        graph.add_node(reroute);
        graph.add_node(begin);
        graph.connect(geo_out, r_in).unwrap();
        graph.connect(r_out, geo_in).unwrap();

        let lines = emit(&graph).lines;
        let tail: Vec<&str> = lines.iter().rev().take(2).rev().map(String::as_str).collect();
        assert_eq!(
            tail,
            vec![
                "Connect  [ Repeat Input #1 ] ○ Geometry  to  [ Repeat Output #1 ] ⦿ Geometry",
                "PairZone  [ Repeat Input #1 ] <-> [ Repeat Output #1 ]",
            ]
        );
        assert!(!lines.iter().any(|l| l.contains("Reroute")));
    }
}
