//! # putgraph - Workflow Diagrams from Source Annotations
//!
//! **putgraph** reads `put` annotations written in the comments of source files,
//! turns them into a workflow table, infers the connections between the nodes
//! and renders the result as Mermaid flowchart text. Files without annotations
//! can be covered by heuristic detection of the files a script reads, writes or
//! sources.
//!
//! ## Annotation Syntax
//!
//! An annotation is a comment in the file's own syntax, followed by `put` and a
//! list of `key:"value"` pairs:
//!
//! ```text
//! # put id:"load", label:"Load raw data", node_type:"input", output:"data.csv"
//! -- put label:"Aggregate", input:"data.csv", output:"summary.csv"
//! // put label:"Report", \
//! //     input:"summary.csv"
//! ```
//!
//! The canonical keys are `id`, `label`, `node_type`, `input` and `output`; any
//! other key is carried through to the table untouched.
//!
//! ## Core Workflow
//!
//! 1.  **Scan**: Use `Scanner::builder` to configure recursion, file filtering and detection, then call `scan` on a file or directory. The result is a `WorkflowTable` of nodes plus every issue found along the way.
//! 2.  **Connect**: `WorkflowGraph::build` links a node writing a file to every node reading it, and a sourced script to the script that sources it.
//! 3.  **Render**: `DiagramRenderer` produces the Mermaid text, styled by a named theme or a custom palette.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use putgraph::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let scanner = Scanner::builder()
//!         .detection(DetectionMode::Merge)
//!         .merge_strategy(MergeStrategy::Supplement)
//!         .build()?;
//!     let table = scanner.scan("analysis/")?;
//!
//!     for issue in &table.issues {
//!         eprintln!("{issue}");
//!     }
//!
//!     let renderer = DiagramRenderer::new(
//!         DiagramOptions::new()
//!             .with_theme("github")
//!             .with_direction(Direction::LeftRight)
//!             .with_show_files(true),
//!     );
//!     let output = renderer.render(&table);
//!     println!("{}", output.diagram);
//!     Ok(())
//! }
//! ```

pub mod annotation;
pub mod config;
pub mod detection;
pub mod error;
pub mod graph;
pub mod model;
pub mod prelude;
pub mod render;
pub mod syntax;
pub mod workflow;

use std::path::Path;

/// Scans `path` with default options: annotations only, recursive.
pub fn scan(path: impl AsRef<Path>) -> Result<model::WorkflowTable, error::ScanError> {
    workflow::Scanner::default().scan(path)
}

/// Renders a table with `options`.
pub fn render(table: &model::WorkflowTable, options: render::DiagramOptions) -> render::RenderOutput {
    render::DiagramRenderer::new(options).render(table)
}
