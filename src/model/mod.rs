//! Workflow table types shared by extraction, graph building and rendering.

mod issue;
mod node;
mod table;

pub use issue::{Issue, IssueKind};
pub use node::{Node, NodeOrigin, NodeType, is_internal_reference, split_file_list};
pub use table::WorkflowTable;
