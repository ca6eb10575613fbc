use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The role a node plays in the workflow. Drives shape and styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Input,
    #[default]
    Process,
    Output,
    Decision,
    Start,
    End,
    Artifact,
}

impl NodeType {
    pub const ALL: [NodeType; 7] = [
        NodeType::Input,
        NodeType::Process,
        NodeType::Output,
        NodeType::Decision,
        NodeType::Start,
        NodeType::End,
        NodeType::Artifact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Input => "input",
            NodeType::Process => "process",
            NodeType::Output => "output",
            NodeType::Decision => "decision",
            NodeType::Start => "start",
            NodeType::End => "end",
            NodeType::Artifact => "artifact",
        }
    }

    /// Case-insensitive lookup. `None` for anything unrecognized.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ConfigError::UnknownNodeType(s.to_string()))
    }
}

/// Where a node came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeOrigin {
    #[default]
    Annotation,
    Detected,
}

/// One row of the workflow table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub file_name: String,
    pub file_path: PathBuf,
    pub file_type: String,
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub node_type: NodeType,
    #[serde(default)]
    pub input: Vec<String>,
    #[serde(default)]
    pub output: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
    /// Files this node sources or includes. Only filled by detection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub origin: NodeOrigin,
    /// Annotation keys without a dedicated column, passed through verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    pub fn with_input<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_output<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dependencies<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Sets `file_path` and derives `file_name` from it.
    pub fn with_file(mut self, path: impl Into<PathBuf>, file_type: impl Into<String>) -> Self {
        self.file_path = path.into();
        self.file_name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.file_type = file_type.into();
        self
    }

    pub fn with_line(mut self, line_number: usize) -> Self {
        self.line_number = Some(line_number);
        self
    }

    /// Label if set, otherwise the id, otherwise the file name.
    pub fn display_label(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.trim().is_empty() => label,
            _ if !self.id.is_empty() => &self.id,
            _ => &self.file_name,
        }
    }
}

/// Splits a comma-separated file list into trimmed, non-empty tokens.
pub fn split_file_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// True for in-memory `.internal` references.
pub fn is_internal_reference(token: &str) -> bool {
    token.ends_with(".internal")
}
