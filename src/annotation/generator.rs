use super::tokenizer::is_valid_key;
use crate::error::GenerateError;
use crate::model::Node;
use crate::syntax::{CommentGroup, Language};
use std::path::PathBuf;

/// How generated annotations are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnnotationLayout {
    /// All pairs on the head line.
    #[default]
    SingleLine,
    /// One pair per line, joined with trailing backslashes.
    Multiline,
}

/// Annotation text suggested for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAnnotation {
    pub file_path: PathBuf,
    pub node_id: String,
    pub text: String,
}

/// Renders `pairs` as a `put` annotation for the given comment group.
///
/// Values are double-quoted unless they contain `"`, in which case single quotes
/// are used. A value holding both quote kinds, or a line break, cannot be
/// expressed in annotation syntax.
pub fn format_annotation(
    pairs: &[(String, String)],
    group: CommentGroup,
    layout: AnnotationLayout,
) -> Result<String, GenerateError> {
    if pairs.is_empty() {
        return Err(GenerateError::Empty);
    }

    let rendered = pairs
        .iter()
        .map(|(key, value)| format_pair(key, value))
        .collect::<Result<Vec<_>, _>>()?;

    let prefix = group.prefix();
    Ok(match layout {
        AnnotationLayout::SingleLine => format!("{prefix} put {}", rendered.join(", ")),
        AnnotationLayout::Multiline => {
            let indent = " ".repeat(4);
            let last = rendered.len() - 1;
            rendered
                .iter()
                .enumerate()
                .map(|(i, pair)| {
                    let lead = if i == 0 {
                        format!("{prefix} put ")
                    } else {
                        format!("{prefix}{indent}")
                    };
                    let tail = if i == last { "" } else { ", \\" };
                    format!("{lead}{pair}{tail}")
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    })
}

fn format_pair(key: &str, value: &str) -> Result<String, GenerateError> {
    if !is_valid_key(key) {
        return Err(GenerateError::InvalidKey(key.to_string()));
    }
    if value.contains(['\n', '\r']) {
        return Err(GenerateError::UnquotableValue {
            key: key.to_string(),
            reason: "contains a line break".to_string(),
        });
    }
    match (value.contains('"'), value.contains('\'')) {
        (false, _) => Ok(format!("{key}:\"{value}\"")),
        (true, false) => Ok(format!("{key}:'{value}'")),
        (true, true) => Err(GenerateError::UnquotableValue {
            key: key.to_string(),
            reason: "contains both quote characters".to_string(),
        }),
    }
}

/// The canonical pairs describing `node`: `id`, `label`, `node_type`, `input`,
/// `output`, then pass-through keys.
fn node_pairs(node: &Node) -> Vec<(String, String)> {
    let mut pairs = vec![("id".to_string(), node.id.clone())];
    if let Some(label) = &node.label {
        pairs.push(("label".to_string(), label.clone()));
    }
    pairs.push(("node_type".to_string(), node.node_type.to_string()));

    let inputs: Vec<&str> = node
        .input
        .iter()
        .chain(&node.dependencies)
        .map(String::as_str)
        .collect();
    if !inputs.is_empty() {
        pairs.push(("input".to_string(), inputs.join(", ")));
    }
    if !node.output.is_empty() {
        pairs.push(("output".to_string(), node.output.join(", ")));
    }
    pairs.extend(node.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    pairs
}

/// Annotation text for `node`, using its file's comment syntax.
pub fn annotation_for_node(node: &Node, layout: AnnotationLayout) -> Result<String, GenerateError> {
    let group = Language::from_tag(&node.file_type)
        .map(Language::comment_group)
        .unwrap_or(CommentGroup::Hash);
    format_annotation(&node_pairs(node), group, layout)
}

/// Annotation text for every node, in table order.
pub fn annotations_for_nodes(
    nodes: &[Node],
    layout: AnnotationLayout,
) -> Result<Vec<GeneratedAnnotation>, GenerateError> {
    nodes
        .iter()
        .map(|node| {
            Ok(GeneratedAnnotation {
                file_path: node.file_path.clone(),
                node_id: node.id.clone(),
                text: annotation_for_node(node, layout)?,
            })
        })
        .collect()
}
