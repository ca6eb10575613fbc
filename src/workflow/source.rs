use crate::error::ScanError;
use crate::syntax::Language;
use std::fs;
use std::path::{Path, PathBuf};

/// A source file read once for a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language: Language,
    pub lines: Vec<String>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, language: Language, contents: &str) -> Self {
        Self {
            path: path.into(),
            language,
            lines: contents.lines().map(str::to_string).collect(),
        }
    }

    /// Reads `path`, resolving its language from the extension.
    pub fn read(path: &Path) -> Result<Self, ScanError> {
        let language =
            Language::from_path(path).ok_or_else(|| ScanError::UnsupportedFile(path.to_path_buf()))?;
        let contents = fs::read_to_string(path).map_err(|e| ScanError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self::new(path, language, &contents))
    }

    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }
}
