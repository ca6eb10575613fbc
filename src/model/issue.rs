use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Category of a non-fatal problem found while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    /// Malformed annotation; the annotation was dropped.
    Syntax,
    /// Questionable content; the node was kept.
    Validation,
    /// A file in a directory batch could not be read.
    Io,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IssueKind::Syntax => "syntax",
            IssueKind::Validation => "validation",
            IssueKind::Io => "io",
        })
    }
}

/// A problem recorded against one file (and optionally one line) without aborting the scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind, file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            file: file.into(),
            line: None,
            message: message.into(),
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(
                f,
                "[{}] {}:{}: {}",
                self.kind,
                self.file.display(),
                line,
                self.message
            ),
            None => write!(f, "[{}] {}: {}", self.kind, self.file.display(), self.message),
        }
    }
}
