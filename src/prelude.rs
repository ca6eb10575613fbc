//! Prelude module for convenient imports
//!
//! Re-exports the types needed to scan files and render diagrams.
//!
//! # Example
//!
//! ```rust,no_run
//! use putgraph::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let table = Scanner::builder().recursive(false).build()?.scan("scripts/")?;
//! let graph = WorkflowGraph::from_table(&table);
//! println!("{} nodes, {} edges", table.len(), graph.edges().len());
//!
//! let output = DiagramRenderer::new(DiagramOptions::new().with_theme("dark")).render(&table);
//! println!("{}", output.diagram);
//! # Ok(())
//! # }
//! ```

// Scanning
pub use crate::workflow::{DetectionMode, MergeStrategy, Scanner, ScannerBuilder};

// Table model
pub use crate::model::{Issue, IssueKind, Node, NodeOrigin, NodeType, WorkflowTable};

// Graph and rendering
pub use crate::graph::{Edge, EdgeKind, WorkflowGraph};
pub use crate::render::{
    ClickProtocol, DiagramOptions, DiagramRenderer, Direction, NodeLabelMode, Palette, RenderOutput, Theme,
};

// Annotation text
pub use crate::annotation::{AnnotationLayout, AnnotationParser, annotation_for_node};
pub use crate::syntax::{CommentGroup, Language};

// Configuration and errors
pub use crate::config::{OutputMode, Verbosity};
pub use crate::error::{AnnotationError, ConfigError, GenerateError, ScanError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
