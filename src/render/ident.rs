use ahash::AHashSet;

/// Words Mermaid reads as syntax when they appear as a bare node id.
const RESERVED_WORDS: [&str; 14] = [
    "end",
    "graph",
    "flowchart",
    "subgraph",
    "click",
    "call",
    "href",
    "style",
    "class",
    "classdef",
    "linkstyle",
    "direction",
    "default",
    "interpolate",
];

/// Maps `raw` onto `[A-Za-z0-9_]`.
///
/// Empty results become `node`; reserved words and ids starting with a digit
/// get an `n_` prefix.
pub fn sanitize_id(raw: &str) -> String {
    let mut id: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if id.is_empty() {
        id.push_str("node");
    }
    let reserved = RESERVED_WORDS.contains(&id.to_ascii_lowercase().as_str());
    if reserved || id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert_str(0, "n_");
    }
    id
}

/// Hands out sanitized ids that are pairwise distinct.
#[derive(Debug, Default)]
pub struct IdAllocator {
    used: AHashSet<String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitizes `raw` and appends `_2`, `_3`, ... until the result is unused.
    pub fn allocate(&mut self, raw: &str) -> String {
        let base = sanitize_id(raw);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.used.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Makes text safe inside a quoted Mermaid label.
pub fn escape_label(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '#' => escaped.push_str("#35;"),
            '"' => escaped.push_str("#quot;"),
            '|' => escaped.push_str("#124;"),
            '<' => escaped.push_str("#lt;"),
            '>' => escaped.push_str("#gt;"),
            '\r' => {}
            '\n' => escaped.push(' '),
            c => escaped.push(c),
        }
    }
    escaped.trim().to_string()
}
