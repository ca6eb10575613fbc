//! Heuristic detection of file references in ordinary code.
//!
//! Each language has an ordered table of regular expressions that recognize
//! common read, write and source/include calls. The tables are compiled once
//! into an immutable registry keyed by language tag. False positives are
//! expected; the results feed auto-generated workflow nodes.

mod patterns;

use ahash::AHashMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// What a detected reference means for the file it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// The file reads the referenced file.
    Input,
    /// The file writes the referenced file.
    Output,
    /// The file sources or includes another script.
    Dependency,
}

/// How the path is pulled out of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    Position(usize),
    Named(&'static str),
}

/// One compiled entry of the registry.
#[derive(Debug)]
pub struct DetectionPattern {
    pub language: &'static str,
    pub kind: ReferenceKind,
    pub capture: Capture,
    pub regex: Regex,
}

impl DetectionPattern {
    /// Every path this pattern extracts from `line`.
    pub fn extract<'l>(&self, line: &'l str) -> impl Iterator<Item = &'l str> {
        self.regex.captures_iter(line).filter_map(move |caps| {
            let group = match self.capture {
                Capture::Position(index) => caps.get(index),
                Capture::Named(name) => caps.name(name),
            };
            group.map(|m| m.as_str().trim()).filter(|path| !path.is_empty())
        })
    }
}

/// A single reference found on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub kind: ReferenceKind,
    pub path: String,
    /// 1-based line number.
    pub line_number: usize,
}

/// De-duplicated references found in one file, each list in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDetections {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub dependencies: Vec<String>,
}

impl FileDetections {
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty() && self.dependencies.is_empty()
    }
}

static REGISTRY: LazyLock<AHashMap<&'static str, Vec<DetectionPattern>>> = LazyLock::new(|| {
    let mut registry: AHashMap<&'static str, Vec<DetectionPattern>> = AHashMap::new();
    for spec in patterns::pattern_specs() {
        let regex = Regex::new(spec.regex)
            .unwrap_or_else(|e| panic!("invalid detection pattern for {}: {e}", spec.language));
        registry.entry(spec.language).or_default().push(DetectionPattern {
            language: spec.language,
            kind: spec.kind,
            capture: spec.capture,
            regex,
        });
    }
    registry
});

/// The immutable pattern registry.
pub struct DetectionPatternEngine;

impl DetectionPatternEngine {
    /// The ordered patterns for a language tag; empty when the language has none.
    pub fn patterns(language: &str) -> &'static [DetectionPattern] {
        REGISTRY.get(language).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn supports(language: &str) -> bool {
        REGISTRY.contains_key(language)
    }

    /// Language tags that have a pattern table, sorted.
    pub fn languages() -> Vec<&'static str> {
        let mut tags: Vec<_> = REGISTRY.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Runs every pattern of `language` against one line. A line may yield several references.
    pub fn detect_line(language: &str, line: &str, line_number: usize) -> Vec<Detection> {
        Self::patterns(language)
            .iter()
            .flat_map(|pattern| {
                pattern.extract(line).map(move |path| Detection {
                    kind: pattern.kind,
                    path: path.to_string(),
                    line_number,
                })
            })
            .collect()
    }

    /// Runs the patterns of `language` against every line.
    pub fn detect_lines<S: AsRef<str>>(language: &str, lines: &[S]) -> Vec<Detection> {
        lines
            .iter()
            .enumerate()
            .flat_map(|(index, line)| Self::detect_line(language, line.as_ref(), index + 1))
            .collect()
    }

    /// Groups the detections of a file by kind, dropping repeats.
    ///
    /// A path detected as a dependency is not also reported as an input, so a
    /// sourced script is linked once.
    pub fn detect_file<S: AsRef<str>>(language: &str, lines: &[S]) -> FileDetections {
        let mut result = FileDetections::default();
        for detection in Self::detect_lines(language, lines) {
            let list = match detection.kind {
                ReferenceKind::Input => &mut result.inputs,
                ReferenceKind::Output => &mut result.outputs,
                ReferenceKind::Dependency => &mut result.dependencies,
            };
            if !list.contains(&detection.path) {
                list.push(detection.path);
            }
        }
        let dependencies = &result.dependencies;
        result.inputs.retain(|path| !dependencies.contains(path));
        result
    }
}
