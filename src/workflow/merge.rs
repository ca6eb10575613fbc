use crate::annotation::ValidatedNode;
use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Which nodes a scan produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetectionMode {
    /// Only explicit annotations.
    #[default]
    Annotations,
    /// Only heuristic detection, one node per file.
    Auto,
    /// Both, combined with a [`MergeStrategy`].
    Merge,
}

impl FromStr for DetectionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annotations" | "manual" => Ok(DetectionMode::Annotations),
            "auto" => Ok(DetectionMode::Auto),
            "merge" => Ok(DetectionMode::Merge),
            _ => Err(ConfigError::UnknownDetectionMode(s.to_string())),
        }
    }
}

/// How annotated and detected nodes of the same file are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Annotated nodes win; detection only covers files without annotations.
    #[default]
    ManualPriority,
    /// Detected references missing from a file's annotations are added to its first node.
    Supplement,
    /// Both sets of nodes are kept.
    Union,
}

impl MergeStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            MergeStrategy::ManualPriority => "manual_priority",
            MergeStrategy::Supplement => "supplement",
            MergeStrategy::Union => "union",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "manual_priority" => Ok(MergeStrategy::ManualPriority),
            "supplement" => Ok(MergeStrategy::Supplement),
            "union" => Ok(MergeStrategy::Union),
            _ => Err(ConfigError::UnknownMergeStrategy(s.to_string())),
        }
    }
}

/// Combines the nodes of one file according to `strategy`.
pub(crate) fn merge_file_nodes(
    strategy: MergeStrategy,
    mut annotated: Vec<ValidatedNode>,
    detected: Option<ValidatedNode>,
) -> Vec<ValidatedNode> {
    let Some(detected) = detected else {
        return annotated;
    };
    if annotated.is_empty() {
        return vec![detected];
    }

    match strategy {
        MergeStrategy::ManualPriority => annotated,
        MergeStrategy::Union => {
            annotated.push(detected);
            annotated
        }
        MergeStrategy::Supplement => {
            let declared = |token: &String| {
                annotated.iter().any(|v| {
                    v.node.input.contains(token)
                        || (!v.output_defaulted && v.node.output.contains(token))
                        || v.node.dependencies.contains(token)
                })
            };
            let new_inputs: Vec<String> =
                detected.node.input.iter().filter(|t| !declared(t)).cloned().collect();
            let new_outputs: Vec<String> = if detected.output_defaulted {
                Vec::new()
            } else {
                detected.node.output.iter().filter(|t| !declared(t)).cloned().collect()
            };
            let new_dependencies: Vec<String> = detected
                .node
                .dependencies
                .iter()
                .filter(|t| !declared(t))
                .cloned()
                .collect();

            let first = &mut annotated[0];
            first.node.input.extend(new_inputs);
            if !new_outputs.is_empty() {
                if first.output_defaulted {
                    first.node.output.clear();
                    first.output_defaulted = false;
                }
                first.node.output.extend(new_outputs);
            }
            first.node.dependencies.extend(new_dependencies);
            annotated
        }
    }
}
