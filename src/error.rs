use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while tokenizing a single annotation.
///
/// These never abort a scan; the scanner records them as syntax issues and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("Annotation has no properties")]
    EmptyAnnotation,

    #[error("Unterminated {quote} quote starting at column {column}")]
    UnterminatedQuote { quote: char, column: usize },

    #[error("Value for '{key}' has mismatched quotes: {value}")]
    MismatchedQuotes { key: String, value: String },

    #[error("Missing ':' separator in '{pair}'")]
    MissingSeparator { pair: String },

    #[error("Invalid property name '{key}'")]
    InvalidKey { key: String },
}

/// Call-level misconfiguration. Any of these aborts the whole call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown output mode '{0}' (expected console, raw or file)")]
    UnknownOutputMode(String),

    #[error("Invalid color '{value}' for {node_type} nodes: expected #rgb or #rrggbb")]
    InvalidColor { node_type: String, value: String },

    #[error("Unknown flowchart direction '{0}' (expected TD, LR, BT or RL)")]
    UnknownDirection(String),

    #[error("Unknown detection mode '{0}' (expected annotations, auto or merge)")]
    UnknownDetectionMode(String),

    #[error("Unknown merge strategy '{0}' (expected manual_priority, supplement or union)")]
    UnknownMergeStrategy(String),

    #[error("Unknown click protocol '{0}' (expected vscode, file or rstudio)")]
    UnknownClickProtocol(String),

    #[error("Unknown node label mode '{0}' (expected label, id or both)")]
    UnknownNodeLabelMode(String),

    #[error("Unknown node type '{0}'")]
    UnknownNodeType(String),

    #[error("Invalid custom palette: {0}")]
    InvalidPalette(String),

    #[error("Invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Errors that abort a scan call.
#[derive(Error, Debug, Clone)]
pub enum ScanError {
    #[error("Path '{}' does not exist", .0.display())]
    PathNotFound(PathBuf),

    #[error("Could not read '{}': {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("No comment syntax is registered for '{}'", .0.display())]
    UnsupportedFile(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised when rendering key/value pairs back into annotation text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Annotation has no properties")]
    Empty,

    #[error("Property name '{0}' is not a valid identifier")]
    InvalidKey(String),

    #[error("Value for '{key}' cannot be quoted: {reason}")]
    UnquotableValue { key: String, reason: String },
}
