//! Edge inference over a workflow table.
//!
//! Nodes are connected by the file tokens they share: a token in one node's
//! `output` that appears in another node's `input` is a data edge. Sourced
//! scripts are connected to the file that sources them with a dependency edge.
//! Cycles are kept as-is and self-loops are never produced.

use crate::model::{Node, WorkflowTable};
use crate::syntax::Language;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// The producer writes a file or value the consumer reads.
    Data,
    /// The target sources or includes the origin.
    Dependency,
}

/// A directed edge between two node positions of the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub token: String,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowGraph {
    node_count: usize,
    edges: Vec<Edge>,
}

impl WorkflowGraph {
    pub fn from_table(table: &WorkflowTable) -> Self {
        Self::build(&table.nodes)
    }

    /// Infers every edge between `nodes`.
    ///
    /// Data edges come first, ordered by producer, consumer and output token.
    /// Dependency edges follow, ordered by sourcing node, dependency token and
    /// sourced node.
    pub fn build(nodes: &[Node]) -> Self {
        let mut edges = Vec::new();

        for (from, producer) in nodes.iter().enumerate() {
            for (to, consumer) in nodes.iter().enumerate() {
                if from == to {
                    continue;
                }
                for token in &producer.output {
                    let token = token.trim();
                    if token.is_empty() {
                        continue;
                    }
                    if consumer.input.iter().any(|input| input.trim() == token) {
                        edges.push(Edge {
                            from,
                            to,
                            token: token.to_string(),
                            kind: EdgeKind::Data,
                        });
                    }
                }
            }
        }

        for (to, sourcing) in nodes.iter().enumerate() {
            for token in &sourcing.dependencies {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                for (from, sourced) in nodes.iter().enumerate() {
                    if from != to && provides(sourced, &sourcing.file_type, token) {
                        edges.push(Edge {
                            from,
                            to,
                            token: token.to_string(),
                            kind: EdgeKind::Dependency,
                        });
                    }
                }
            }
        }

        Self {
            node_count: nodes.len(),
            edges,
        }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn incoming(&self, index: usize) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.to == index)
    }

    pub fn outgoing(&self, index: usize) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.from == index)
    }

    /// Positions of nodes that touch no edge.
    pub fn isolated(&self) -> Vec<usize> {
        let mut connected = vec![false; self.node_count];
        for edge in &self.edges {
            connected[edge.from] = true;
            connected[edge.to] = true;
        }
        connected
            .iter()
            .enumerate()
            .filter(|(_, linked)| !**linked)
            .map(|(index, _)| index)
            .collect()
    }
}

/// True if `node` is the file a dependency token points at.
fn provides(node: &Node, sourcing_type: &str, token: &str) -> bool {
    node.output.iter().any(|o| o.trim() == token)
        || names_file(token, sourcing_type, &node.file_name)
}

/// True if dependency `token`, written in a file of type `sourcing_type`,
/// refers to the file called `file_name`.
///
/// `./lib/util.R` matches `util.R`. A token without an extension, such as
/// `./helper` in TypeScript or `tools` in Ruby, matches by stem, but only files
/// with an extension of the sourcing language.
pub(crate) fn names_file(token: &str, sourcing_type: &str, file_name: &str) -> bool {
    if file_name.is_empty() {
        return false;
    }
    let token_path = Path::new(token);
    let Some(last) = token_path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    if token == file_name || last == file_name {
        return true;
    }
    if token_path.extension().is_some() {
        return false;
    }

    let candidate = Path::new(file_name);
    let same_stem = candidate
        .file_stem()
        .is_some_and(|stem| stem.to_string_lossy() == last);
    let extension = candidate
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match (Language::from_tag(sourcing_type), extension) {
        (Some(language), Some(extension)) if same_stem => {
            language.extensions().contains(&extension.as_str())
        }
        _ => false,
    }
}
