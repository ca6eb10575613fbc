use super::{Issue, IssueKind, Node};
use serde::{Deserialize, Serialize};

/// The row-per-node result of a scan, together with everything that went wrong
/// along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTable {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl WorkflowTable {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            issues: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    /// Only the node rows, serialized as a JSON array.
    pub fn rows_to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.nodes)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
