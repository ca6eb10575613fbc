//! The scan pipeline: discover files, read them once, extract nodes and
//! collect everything that went wrong into a [`WorkflowTable`](crate::model::WorkflowTable).

mod merge;
mod scanner;
mod source;

pub use merge::{DetectionMode, MergeStrategy};
pub use scanner::{ScanOptions, Scanner, ScannerBuilder};
pub use source::SourceFile;
