//! Common test utilities for writing fixture files and building tables.
use putgraph::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Writes `contents` to `dir/name`, creating parent directories.
#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

/// A temporary directory holding the given `(name, contents)` files.
#[allow(dead_code)]
pub fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for (name, contents) in files {
        write_file(dir.path(), name, contents);
    }
    dir
}

/// A two-step R pipeline: load writes `data.csv`, clean reads it.
///
/// Logic: `load.R` -> data.csv -> `clean.R`
#[allow(dead_code)]
pub fn two_step_pipeline() -> TempDir {
    project(&[
        (
            "load.R",
            "# put label:\"Load\", node_type:\"input\", output:\"data.csv\"\ndata <- read.csv(\"raw.csv\")\n",
        ),
        (
            "clean.R",
            "# put label:\"Clean\", input:\"data.csv\", output:\"clean.csv\"\nclean <- na.omit(data)\n",
        ),
    ])
}

/// A scanner with quiet logging and the given detection mode.
#[allow(dead_code)]
pub fn scanner(mode: DetectionMode) -> Scanner {
    Scanner::builder()
        .detection(mode)
        .verbosity(Verbosity::Quiet)
        .build()
        .expect("Failed to build scanner")
}

/// A table node with explicit id, inputs and outputs.
#[allow(dead_code)]
pub fn node(id: &str, input: &[&str], output: &[&str]) -> Node {
    Node::new(id)
        .with_label(id)
        .with_input(input.iter().copied())
        .with_output(output.iter().copied())
}

/// Quiet renderer options.
#[allow(dead_code)]
pub fn quiet_options() -> DiagramOptions {
    DiagramOptions::new().with_verbosity(Verbosity::Quiet)
}

/// Pairs as owned strings.
#[allow(dead_code)]
pub fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
