//! `put` annotations: parsing comment text into key/value pairs, validating them
//! into workflow nodes, and generating annotation text back from nodes.

mod generator;
mod parser;
mod tokenizer;
mod validator;

pub use generator::{AnnotationLayout, GeneratedAnnotation, annotation_for_node, annotations_for_nodes, format_annotation};
pub use parser::{AnnotationParser, InvalidAnnotation};
pub use tokenizer::{is_valid_key, tokenize};
pub use validator::{AnnotationValidator, FileContext, ValidatedNode};

use std::collections::BTreeMap;

/// The key/value pairs of one annotation, before any defaulting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnnotation {
    /// 1-based line of the annotation head.
    pub line_number: usize,
    /// Pairs in source order. Duplicate keys are kept; the last one wins on lookup.
    pub pairs: Vec<(String, String)>,
}

impl RawAnnotation {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.pairs.iter().cloned().collect()
    }
}
