//! Mermaid flowchart rendering of a workflow table.
//!
//! The output is deterministic for a given table and options: node
//! definitions follow table order, connections follow graph edge order and
//! styling follows [`NodeType::ALL`]. No line carries trailing whitespace and
//! the text does not end with a newline.

mod ident;
mod theme;

pub use ident::{IdAllocator, escape_label, sanitize_id};
pub use theme::{NodeStyle, Palette, Theme, is_hex_color};

use crate::config::{Verbosity, default_verbosity};
use crate::error::ConfigError;
use crate::graph::{EdgeKind, WorkflowGraph};
use crate::model::{Node, NodeType, WorkflowTable};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    TopDown,
    LeftRight,
    BottomTop,
    RightLeft,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::TopDown => "TD",
            Direction::LeftRight => "LR",
            Direction::BottomTop => "BT",
            Direction::RightLeft => "RL",
        }
    }
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TD" | "TB" => Ok(Direction::TopDown),
            "LR" => Ok(Direction::LeftRight),
            "BT" => Ok(Direction::BottomTop),
            "RL" => Ok(Direction::RightLeft),
            _ => Err(ConfigError::UnknownDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What text goes inside a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeLabelMode {
    #[default]
    Label,
    Id,
    /// `label (id)`
    Both,
}

impl FromStr for NodeLabelMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "label" => Ok(NodeLabelMode::Label),
            "id" => Ok(NodeLabelMode::Id),
            "both" => Ok(NodeLabelMode::Both),
            _ => Err(ConfigError::UnknownNodeLabelMode(s.to_string())),
        }
    }
}

/// Bytes escaped in click paths: anything that would end the quoted
/// directive, split its line or be read as URI syntax.
const URI_PATH_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'#')
    .add(b'?')
    .add(b'&')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// Editor URI scheme used by click directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickProtocol {
    Vscode,
    File,
    Rstudio,
}

impl ClickProtocol {
    fn uri(self, path: &Path, line: Option<usize>) -> String {
        let path = path.to_string_lossy().replace('\\', "/");
        let path = utf8_percent_encode(&path, URI_PATH_UNSAFE);
        match (self, line) {
            (ClickProtocol::Vscode, Some(line)) => format!("vscode://file/{path}:{line}"),
            (ClickProtocol::Vscode, None) => format!("vscode://file/{path}"),
            (ClickProtocol::File, Some(line)) => format!("file://{path}#L{line}"),
            (ClickProtocol::File, None) => format!("file://{path}"),
            (ClickProtocol::Rstudio, Some(line)) => {
                format!("rstudio://open-file?path={path}&line={line}")
            }
            (ClickProtocol::Rstudio, None) => format!("rstudio://open-file?path={path}"),
        }
    }
}

impl FromStr for ClickProtocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vscode" => Ok(ClickProtocol::Vscode),
            "file" => Ok(ClickProtocol::File),
            "rstudio" => Ok(ClickProtocol::Rstudio),
            _ => Err(ConfigError::UnknownClickProtocol(s.to_string())),
        }
    }
}

/// Rendering options. Built with the `with_*` methods starting from [`DiagramOptions::new`].
#[derive(Debug, Clone)]
pub struct DiagramOptions {
    pub theme: String,
    pub palette: Option<Palette>,
    pub direction: Direction,
    pub node_labels: NodeLabelMode,
    /// Label data edges with the shared token.
    pub show_files: bool,
    /// Draw every token as a cylinder node between producer and consumer.
    pub show_artifacts: bool,
    pub group_by_file: bool,
    /// Emphasize start/end nodes. When off they render as process nodes.
    pub boundaries: bool,
    pub styled: bool,
    pub clicks: Option<ClickProtocol>,
    pub title: Option<String>,
    pub verbosity: Verbosity,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            theme: Theme::default().name().to_string(),
            palette: None,
            direction: Direction::default(),
            node_labels: NodeLabelMode::default(),
            show_files: false,
            show_artifacts: false,
            group_by_file: false,
            boundaries: true,
            styled: true,
            clicks: None,
            title: None,
            verbosity: default_verbosity(),
        }
    }
}

impl DiagramOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a built-in theme by name. Unknown names fall back to `light` at render time.
    pub fn with_theme(mut self, name: impl Into<String>) -> Self {
        self.theme = name.into();
        self
    }

    /// Uses a custom palette instead of a named theme.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_node_labels(mut self, mode: NodeLabelMode) -> Self {
        self.node_labels = mode;
        self
    }

    pub fn with_show_files(mut self, enabled: bool) -> Self {
        self.show_files = enabled;
        self
    }

    pub fn with_show_artifacts(mut self, enabled: bool) -> Self {
        self.show_artifacts = enabled;
        self
    }

    pub fn with_group_by_file(mut self, enabled: bool) -> Self {
        self.group_by_file = enabled;
        self
    }

    pub fn with_boundaries(mut self, enabled: bool) -> Self {
        self.boundaries = enabled;
        self
    }

    pub fn with_styles(mut self, enabled: bool) -> Self {
        self.styled = enabled;
        self
    }

    pub fn with_clicks(mut self, protocol: ClickProtocol) -> Self {
        self.clicks = Some(protocol);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

/// Diagram text plus the fallbacks taken while producing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutput {
    pub diagram: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DiagramRenderer {
    options: DiagramOptions,
}

impl DiagramRenderer {
    pub fn new(options: DiagramOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DiagramOptions {
        &self.options
    }

    pub fn render(&self, table: &WorkflowTable) -> RenderOutput {
        self.render_nodes(&table.nodes)
    }

    pub fn render_nodes(&self, nodes: &[Node]) -> RenderOutput {
        let mut warnings = Vec::new();
        let palette = self.resolve_palette(&mut warnings);
        let mut lines = vec![format!("flowchart {}", self.options.direction)];

        if let Some(title) = &self.options.title {
            let title = title.replace(['\r', '\n'], " ");
            lines.push(format!("{INDENT}%% {}", title.trim()));
        }

        if nodes.is_empty() {
            lines.push(format!("{INDENT}empty[\"No workflow nodes found\"]"));
            return self.finish(lines, warnings);
        }

        let mut ids = IdAllocator::new();
        let node_ids: Vec<String> = nodes.iter().map(|n| ids.allocate(&n.id)).collect();

        self.push_node_definitions(&mut lines, nodes, &node_ids, &mut ids);

        let graph = WorkflowGraph::build(nodes);
        let artifacts = if self.options.show_artifacts {
            self.push_artifacts(&mut lines, nodes, &node_ids, &graph, &mut ids)
        } else {
            self.push_edges(&mut lines, &node_ids, &graph);
            Vec::new()
        };

        if self.options.styled {
            self.push_styles(&mut lines, nodes, &node_ids, &artifacts, &palette);
        }

        if let Some(protocol) = self.options.clicks {
            for (node, id) in nodes.iter().zip(&node_ids) {
                if node.file_path.as_os_str().is_empty() {
                    continue;
                }
                let uri = protocol.uri(&node.file_path, node.line_number);
                lines.push(format!("{INDENT}click {id} href \"{uri}\" _blank"));
            }
        }

        self.finish(lines, warnings)
    }

    fn finish(&self, lines: Vec<String>, warnings: Vec<String>) -> RenderOutput {
        if self.options.verbosity.warnings_enabled() {
            for warning in &warnings {
                warn!("{warning}");
            }
        }
        RenderOutput {
            diagram: lines.iter().map(|l| l.trim_end()).join("\n"),
            warnings,
        }
    }

    fn resolve_palette(&self, warnings: &mut Vec<String>) -> Palette {
        if let Some(palette) = &self.options.palette {
            return palette.clone();
        }
        match Theme::from_name(&self.options.theme) {
            Some(theme) => Palette::new(theme),
            None => {
                warnings.push(format!(
                    "Unknown theme '{}'; using '{}'",
                    self.options.theme,
                    Theme::default()
                ));
                Palette::new(Theme::default())
            }
        }
    }

    fn effective_type(&self, node: &Node) -> NodeType {
        match node.node_type {
            NodeType::Start | NodeType::End if !self.options.boundaries => NodeType::Process,
            other => other,
        }
    }

    fn node_text(&self, node: &Node) -> String {
        let label = node.label.as_deref().map(str::trim).filter(|l| !l.is_empty());
        let text = match self.options.node_labels {
            NodeLabelMode::Label => node.display_label().to_string(),
            NodeLabelMode::Id if !node.id.is_empty() => node.id.clone(),
            NodeLabelMode::Id => node.display_label().to_string(),
            NodeLabelMode::Both => match label {
                Some(label) if !node.id.is_empty() => format!("{label} ({})", node.id),
                _ => node.display_label().to_string(),
            },
        };
        escape_label(&text)
    }

    fn node_definition(&self, node: &Node, id: &str) -> String {
        let text = self.node_text(node);
        shape(id, &text, self.effective_type(node))
    }

    fn push_node_definitions(
        &self,
        lines: &mut Vec<String>,
        nodes: &[Node],
        node_ids: &[String],
        ids: &mut IdAllocator,
    ) {
        if !self.options.group_by_file {
            for (node, id) in nodes.iter().zip(node_ids) {
                lines.push(format!("{INDENT}{}", self.node_definition(node, id)));
            }
            return;
        }

        let mut groups: Vec<(&PathBuf, Vec<usize>)> = Vec::new();
        let mut group_of: AHashMap<&PathBuf, usize> = AHashMap::new();
        for (index, node) in nodes.iter().enumerate() {
            if node.file_path.as_os_str().is_empty() {
                lines.push(format!("{INDENT}{}", self.node_definition(node, &node_ids[index])));
                continue;
            }
            let slot = *group_of.entry(&node.file_path).or_insert_with(|| {
                groups.push((&node.file_path, Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(index);
        }

        for (path, members) in groups {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let group_id = ids.allocate(&format!("file_{name}"));
            lines.push(format!("{INDENT}subgraph {group_id} [\"{}\"]", escape_label(&name)));
            for index in members {
                lines.push(format!(
                    "{INDENT}{INDENT}{}",
                    self.node_definition(&nodes[index], &node_ids[index])
                ));
            }
            lines.push(format!("{INDENT}end"));
        }
    }

    fn push_edges(&self, lines: &mut Vec<String>, node_ids: &[String], graph: &WorkflowGraph) {
        for edge in graph.edges() {
            let arrow = match edge.kind {
                EdgeKind::Data => "-->",
                EdgeKind::Dependency => "-.->",
            };
            let from = &node_ids[edge.from];
            let to = &node_ids[edge.to];
            if self.options.show_files {
                lines.push(format!("{INDENT}{from} {arrow}|{}| {to}", escape_label(&edge.token)));
            } else {
                lines.push(format!("{INDENT}{from} {arrow} {to}"));
            }
        }
    }

    /// Emits one cylinder per distinct token and routes data through it.
    /// Returns the artifact ids for styling.
    fn push_artifacts(
        &self,
        lines: &mut Vec<String>,
        nodes: &[Node],
        node_ids: &[String],
        graph: &WorkflowGraph,
        ids: &mut IdAllocator,
    ) -> Vec<String> {
        let tokens: Vec<&str> = nodes
            .iter()
            .flat_map(|n| n.output.iter().chain(n.input.iter()))
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .unique()
            .collect();

        let mut artifact_ids: AHashMap<&str, String> = AHashMap::new();
        for &token in &tokens {
            let id = ids.allocate(&format!("artifact_{token}"));
            lines.push(format!("{INDENT}{}", shape(&id, &escape_label(token), NodeType::Artifact)));
            artifact_ids.insert(token, id);
        }

        let mut seen: AHashSet<(String, String)> = AHashSet::new();
        let mut connect = |lines: &mut Vec<String>, from: &str, arrow: &str, to: &str| {
            if seen.insert((from.to_string(), to.to_string())) {
                lines.push(format!("{INDENT}{from} {arrow} {to}"));
            }
        };

        for (node, id) in nodes.iter().zip(node_ids) {
            for token in node.output.iter().map(|t| t.trim()) {
                if let Some(artifact) = artifact_ids.get(token) {
                    connect(lines, id.as_str(), "-->", artifact.as_str());
                }
            }
        }
        for (node, id) in nodes.iter().zip(node_ids) {
            for token in node.input.iter().map(|t| t.trim()) {
                if let Some(artifact) = artifact_ids.get(token) {
                    connect(lines, artifact.as_str(), "-->", id.as_str());
                }
            }
        }
        for edge in graph.edges().iter().filter(|e| e.kind == EdgeKind::Dependency) {
            connect(lines, node_ids[edge.from].as_str(), "-.->", node_ids[edge.to].as_str());
        }

        tokens.iter().filter_map(|t| artifact_ids.remove(t)).collect()
    }

    fn push_styles(
        &self,
        lines: &mut Vec<String>,
        nodes: &[Node],
        node_ids: &[String],
        artifacts: &[String],
        palette: &Palette,
    ) {
        let mut members: AHashMap<NodeType, Vec<&str>> = AHashMap::new();
        for (node, id) in nodes.iter().zip(node_ids) {
            members.entry(self.effective_type(node)).or_default().push(id);
        }
        if !artifacts.is_empty() {
            members
                .entry(NodeType::Artifact)
                .or_default()
                .extend(artifacts.iter().map(String::as_str));
        }

        let present: Vec<NodeType> = NodeType::ALL
            .into_iter()
            .filter(|t| members.contains_key(t))
            .collect();

        for node_type in &present {
            let style = palette.style(*node_type);
            let width = match node_type {
                NodeType::Start | NodeType::End => "3px",
                _ => "2px",
            };
            lines.push(format!(
                "{INDENT}classDef {node_type}Style fill:{},stroke:{},stroke-width:{width},color:{}",
                style.fill, style.stroke, style.color
            ));
        }
        for node_type in &present {
            if let Some(ids) = members.get(node_type) {
                lines.push(format!("{INDENT}class {} {node_type}Style", ids.iter().join(",")));
            }
        }
    }
}

/// One node definition in the shape of its type.
fn shape(id: &str, text: &str, node_type: NodeType) -> String {
    match node_type {
        NodeType::Input | NodeType::Start | NodeType::End => format!("{id}([\"{text}\"])"),
        NodeType::Process => format!("{id}[\"{text}\"]"),
        NodeType::Output => format!("{id}[[\"{text}\"]]"),
        NodeType::Decision => format!("{id}{{\"{text}\"}}"),
        NodeType::Artifact => format!("{id}[(\"{text}\")]"),
    }
}
