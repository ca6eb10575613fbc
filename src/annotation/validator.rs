use super::RawAnnotation;
use crate::model::{Node, NodeOrigin, NodeType, is_internal_reference, split_file_list};
use crate::syntax::Language;
use ahash::AHashSet;
use std::path::{Path, PathBuf};

/// Columns filled from the source file rather than from annotation keys.
const RESERVED_KEYS: [&str; 6] = [
    "file_name",
    "file_path",
    "file_type",
    "line_number",
    "dependencies",
    "origin",
];

/// The file an annotation was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    pub file_name: String,
    pub file_path: PathBuf,
    pub language: Language,
}

impl FileContext {
    pub fn new(file_path: impl Into<PathBuf>, language: Language) -> Self {
        let file_path = file_path.into();
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            file_name,
            file_path,
            language,
        }
    }

    /// The file name without its extension, used to derive generated ids.
    pub fn stem(&self) -> String {
        Path::new(&self.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_name.clone())
    }
}

/// A node built from one annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedNode {
    pub node: Node,
    /// The annotation had no `id` key; the scanner assigns one once the whole
    /// table is known.
    pub needs_id: bool,
    /// `output` was filled with the file name because none was declared.
    pub output_defaulted: bool,
    pub warnings: Vec<String>,
}

/// Applies defaulting rules to raw annotations and reports questionable content.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationValidator;

impl AnnotationValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, raw: &RawAnnotation, ctx: &FileContext) -> ValidatedNode {
        let mut warnings = Vec::new();

        let mut seen = AHashSet::new();
        for (key, _) in &raw.pairs {
            if !seen.insert(key.as_str()) {
                warnings.push(format!("Duplicate property '{key}'; the last value is used"));
            }
        }

        let label = match raw.get("label").map(str::trim) {
            Some(label) if !label.is_empty() => Some(label.to_string()),
            Some(_) => {
                warnings.push("Empty 'label' property".to_string());
                None
            }
            None => {
                warnings.push("Missing 'label' property".to_string());
                None
            }
        };

        let (id, needs_id) = match raw.get("id").map(str::trim) {
            Some("") => {
                warnings.push("Empty 'id' property; the node has no identifier".to_string());
                (String::new(), false)
            }
            Some(id) => (id.to_string(), false),
            None => (String::new(), true),
        };

        let node_type = match raw.get("node_type").map(str::trim) {
            None | Some("") => NodeType::Process,
            Some(tag) => NodeType::from_tag(tag).unwrap_or_else(|| {
                warnings.push(format!("Unknown node_type '{tag}'; using 'process'"));
                NodeType::Process
            }),
        };

        let input = raw.get("input").map(split_file_list).unwrap_or_default();
        for token in &input {
            if is_internal_reference(token) {
                warnings.push(format!(
                    "'{token}' is used as an input, but .internal values are output-only"
                ));
            } else if !has_extension(token) {
                warnings.push(format!("Input '{token}' may be missing a file extension"));
            }
        }

        let mut output = raw.get("output").map(split_file_list).unwrap_or_default();
        let output_defaulted = output.is_empty();
        if output_defaulted {
            output.push(ctx.file_name.clone());
        }

        let mut node = Node {
            file_name: ctx.file_name.clone(),
            file_path: ctx.file_path.clone(),
            file_type: ctx.language.tag().to_string(),
            id,
            label,
            node_type,
            input,
            output,
            line_number: Some(raw.line_number),
            dependencies: Vec::new(),
            origin: NodeOrigin::Annotation,
            extra: Default::default(),
        };

        for (key, value) in &raw.pairs {
            match key.as_str() {
                "id" | "label" | "node_type" | "input" | "output" => {}
                reserved if RESERVED_KEYS.contains(&reserved) => {
                    warnings.push(format!("'{reserved}' is a reserved column and was ignored"));
                }
                _ => {
                    node.extra.insert(key.clone(), value.clone());
                }
            }
        }

        ValidatedNode {
            node,
            needs_id,
            output_defaulted,
            warnings,
        }
    }
}

/// True if the final path component has a non-empty alphanumeric extension.
fn has_extension(token: &str) -> bool {
    Path::new(token)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
}
