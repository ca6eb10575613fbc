use super::merge::{DetectionMode, MergeStrategy, merge_file_nodes};
use super::source::SourceFile;
use crate::annotation::{AnnotationParser, AnnotationValidator, FileContext, ValidatedNode};
use crate::config::{Verbosity, default_verbosity};
use crate::detection::{DetectionPatternEngine, FileDetections};
use crate::error::{ConfigError, ScanError};
use crate::graph::names_file;
use crate::model::{Issue, IssueKind, Node, NodeOrigin, NodeType, WorkflowTable};
use crate::syntax::Language;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Options of a [`Scanner`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub recursive: bool,
    pub include_pattern: Option<Regex>,
    pub detection: DetectionMode,
    pub merge_strategy: MergeStrategy,
    pub verbosity: Verbosity,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            include_pattern: None,
            detection: DetectionMode::default(),
            merge_strategy: MergeStrategy::default(),
            verbosity: default_verbosity(),
        }
    }
}

pub struct ScannerBuilder {
    options: ScanOptions,
    include_pattern: Option<String>,
}

impl ScannerBuilder {
    pub fn new() -> Self {
        Self {
            options: ScanOptions::default(),
            include_pattern: None,
        }
    }

    /// Descend into sub-directories. On by default.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.options.recursive = recursive;
        self
    }

    /// Only scan files whose name matches this regular expression.
    pub fn include_pattern(mut self, pattern: &str) -> Self {
        self.include_pattern = Some(pattern.to_string());
        self
    }

    pub fn detection(mut self, mode: DetectionMode) -> Self {
        self.options.detection = mode;
        self
    }

    pub fn merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.options.merge_strategy = strategy;
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.options.verbosity = verbosity;
        self
    }

    pub fn build(mut self) -> Result<Scanner, ConfigError> {
        if let Some(pattern) = self.include_pattern {
            let regex = Regex::new(&pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            self.options.include_pattern = Some(regex);
        }
        Ok(Scanner {
            options: self.options,
        })
    }
}

impl Default for ScannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The nodes produced by one file before ids are assigned.
struct FileResult {
    ctx: FileContext,
    nodes: Vec<ValidatedNode>,
    detections: FileDetections,
}

/// Reads files and turns their annotations (and, optionally, detected
/// references) into a [`WorkflowTable`].
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn builder() -> ScannerBuilder {
        ScannerBuilder::new()
    }

    pub fn with_options(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scans a single file or a directory.
    ///
    /// A missing path, or an unreadable or unsupported single file, aborts the
    /// call. Inside a directory, unreadable files are recorded as issues and
    /// skipped.
    pub fn scan(&self, path: impl AsRef<Path>) -> Result<WorkflowTable, ScanError> {
        let root = path.as_ref();
        if !root.exists() {
            return Err(ScanError::PathNotFound(root.to_path_buf()));
        }

        let mut issues = Vec::new();
        let files = if root.is_dir() {
            self.read_directory(root, &mut issues)
        } else {
            vec![SourceFile::read(root)?]
        };

        Ok(self.scan_files(&files, issues))
    }

    /// Scans in-memory contents as if they were read from `path`.
    pub fn scan_source(&self, path: impl AsRef<Path>, contents: &str) -> Result<WorkflowTable, ScanError> {
        let path = path.as_ref();
        let language =
            Language::from_path(path).ok_or_else(|| ScanError::UnsupportedFile(path.to_path_buf()))?;
        Ok(self.scan_files(&[SourceFile::new(path, language, contents)], Vec::new()))
    }

    /// Runs the pipeline over already-read files, in the given order.
    pub fn scan_files(&self, files: &[SourceFile], mut issues: Vec<Issue>) -> WorkflowTable {
        let mut results: Vec<FileResult> = files
            .iter()
            .map(|file| self.scan_file(file, &mut issues))
            .collect();

        if self.options.detection != DetectionMode::Annotations {
            add_sourced_file_nodes(&mut results);
        }

        let mut pending: Vec<ValidatedNode> = results.into_iter().flat_map(|r| r.nodes).collect();
        assign_ids(&mut pending, &mut issues);

        for issue in &issues {
            self.log_issue(issue);
        }

        WorkflowTable {
            nodes: pending.into_iter().map(|v| v.node).collect(),
            issues,
        }
    }

    fn read_directory(&self, root: &Path, issues: &mut Vec<Issue>) -> Vec<SourceFile> {
        let max_depth = if self.options.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(root)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    issues.push(Issue::new(IssueKind::Io, path, e.to_string()));
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.is_included(entry.path()) {
                continue;
            }
            match SourceFile::read(entry.path()) {
                Ok(file) => files.push(file),
                Err(ScanError::Io { path, message }) => {
                    issues.push(Issue::new(IssueKind::Io, path, message));
                }
                Err(_) => {}
            }
        }
        files
    }

    fn is_included(&self, path: &Path) -> bool {
        if Language::from_path(path).is_none() {
            return false;
        }
        match &self.options.include_pattern {
            Some(pattern) => path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| pattern.is_match(name)),
            None => true,
        }
    }

    fn scan_file(&self, file: &SourceFile, issues: &mut Vec<Issue>) -> FileResult {
        let ctx = FileContext::new(&file.path, file.language);
        let verbosity = self.options.verbosity;

        let mut annotated = Vec::new();
        if self.options.detection != DetectionMode::Auto {
            let parser = AnnotationParser::for_language(file.language);
            let validator = AnnotationValidator::new();
            for parsed in parser.parse_lines(&file.lines) {
                match parsed {
                    Ok(raw) => {
                        if verbosity.details_enabled() {
                            debug!(file = %file.path.display(), line = raw.line_number, pairs = raw.pairs.len(), "parsed annotation");
                        }
                        let validated = validator.validate(&raw, &ctx);
                        issues.extend(validated.warnings.iter().map(|message| {
                            Issue::new(IssueKind::Validation, &file.path, message.clone())
                                .at_line(raw.line_number)
                        }));
                        annotated.push(validated);
                    }
                    Err(invalid) => issues.push(
                        Issue::new(IssueKind::Syntax, &file.path, invalid.error.to_string())
                            .at_line(invalid.line_number),
                    ),
                }
            }
        }

        let detections = if self.options.detection == DetectionMode::Annotations {
            FileDetections::default()
        } else {
            let detections = DetectionPatternEngine::detect_file(file.language.tag(), &file.lines);
            if verbosity.details_enabled() {
                debug!(
                    file = %file.path.display(),
                    inputs = ?detections.inputs,
                    outputs = ?detections.outputs,
                    dependencies = ?detections.dependencies,
                    "detected references"
                );
            }
            detections
        };
        let detected = detected_node(&ctx, &detections);

        let nodes = match self.options.detection {
            DetectionMode::Annotations => annotated,
            DetectionMode::Auto => detected.into_iter().collect(),
            DetectionMode::Merge => merge_file_nodes(self.options.merge_strategy, annotated, detected),
        };

        if verbosity.progress_enabled() {
            info!(file = %file.path.display(), language = %file.language, nodes = nodes.len(), "scanned file");
        }

        FileResult {
            ctx,
            nodes,
            detections,
        }
    }

    fn log_issue(&self, issue: &Issue) {
        if self.options.verbosity.warnings_enabled() {
            warn!("{issue}");
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// One node summarizing a file's detected references, if it has any.
fn detected_node(ctx: &FileContext, detections: &FileDetections) -> Option<ValidatedNode> {
    if detections.is_empty() {
        return None;
    }
    Some(bare_detected_node(ctx, detections))
}

fn bare_detected_node(ctx: &FileContext, detections: &FileDetections) -> ValidatedNode {
    let output_defaulted = detections.outputs.is_empty();
    let output = if output_defaulted {
        vec![ctx.file_name.clone()]
    } else {
        detections.outputs.clone()
    };
    ValidatedNode {
        node: Node {
            file_name: ctx.file_name.clone(),
            file_path: ctx.file_path.clone(),
            file_type: ctx.language.tag().to_string(),
            id: String::new(),
            label: Some(ctx.file_name.clone()),
            node_type: NodeType::Process,
            input: detections.inputs.clone(),
            output,
            line_number: None,
            dependencies: detections.dependencies.clone(),
            origin: NodeOrigin::Detected,
            extra: Default::default(),
        },
        needs_id: true,
        output_defaulted,
        warnings: Vec::new(),
    }
}

/// Gives a node to scanned files that have none but are sourced by another file,
/// so dependency edges have somewhere to start.
fn add_sourced_file_nodes(results: &mut [FileResult]) {
    let sourced: Vec<(String, String)> = results
        .iter()
        .flat_map(|r| r.nodes.iter())
        .flat_map(|v| {
            v.node
                .dependencies
                .iter()
                .map(|token| (token.trim().to_string(), v.node.file_type.clone()))
        })
        .unique()
        .collect();

    for result in results.iter_mut() {
        let is_sourced = sourced
            .iter()
            .any(|(token, file_type)| names_file(token, file_type, &result.ctx.file_name));
        if result.nodes.is_empty() && is_sourced {
            result
                .nodes
                .push(bare_detected_node(&result.ctx, &result.detections));
        }
    }
}

/// Fills in missing ids and reports duplicate explicit ones.
///
/// Generated ids are `<file stem>_<line>` (or `<file stem>_auto` for detected
/// nodes), suffixed with `_2`, `_3`, ... when taken. Explicit ids are reserved
/// first so a generated id never shadows one.
fn assign_ids(nodes: &mut [ValidatedNode], issues: &mut Vec<Issue>) {
    let mut first_use: AHashMap<String, (PathBuf, Option<usize>)> = AHashMap::new();
    for v in nodes.iter().filter(|v| !v.needs_id && !v.node.id.is_empty()) {
        let node = &v.node;
        match first_use.get(&node.id) {
            Some((path, line)) => {
                let location = match line {
                    Some(line) => format!("{}:{}", path.display(), line),
                    None => path.display().to_string(),
                };
                let mut issue = Issue::new(
                    IssueKind::Validation,
                    &node.file_path,
                    format!("Duplicate id '{}' (first used at {location})", node.id),
                );
                issue.line = node.line_number;
                issues.push(issue);
            }
            None => {
                first_use.insert(node.id.clone(), (node.file_path.clone(), node.line_number));
            }
        }
    }

    let mut used: AHashSet<String> = first_use.keys().cloned().collect();
    for v in nodes.iter_mut().filter(|v| v.needs_id) {
        let stem = Path::new(&v.node.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "node".to_string());
        let base = match v.node.line_number {
            Some(line) => format!("{stem}_{line}"),
            None => format!("{stem}_auto"),
        };

        let mut candidate = base.clone();
        let mut suffix = 2;
        while used.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        used.insert(candidate.clone());
        v.node.id = candidate;
        v.needs_id = false;
    }
}
